//! Holographic reduced representation (HRR) operations on real vectors.
//!
//! - **Bind**: circular convolution, `inverse(forward(a) * forward(b))`
//! - **Unbind**: regularized spectral deconvolution
//! - **Correlate**: circular correlation, the noise-tolerant approximate inverse
//! - **Superpose**: additive bundling
//! - **Similarity**: cosine similarity, dot product, RMSE
//!
//! ## References
//!
//! - Plate, T.A. "Holographic Reduced Representations"
//! - Kanerva, P. "Hyperdimensional Computing: An Introduction"

mod bind;
mod bundle;
mod similarity;

pub use bind::{BindingEngine, Regularization, DEFAULT_EPSILON, MIN_EPSILON};
pub(crate) use bind::validate_epsilon;
pub use bundle::{superpose, superpose_weighted};
pub use similarity::{cosine_similarity, dot};
