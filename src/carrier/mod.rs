//! Carrier-plan codec.
//!
//! A plan picks a deterministic subset of frequency bins ("carriers") for a
//! given seed and dimension. Symbols are written to those bins only, so the
//! rest of the spectrum stays free for superposition with bound vectors.
//!
//! - [`plan`]: plans, bin eligibility and selection, the plan registry
//! - [`codec`]: trit and byte payload encoding/decoding
//! - [`payload`]: byte to trit packings
//! - [`manifest`]: decode metadata and its JSON document
//! - [`placeholder`]: `k:h:w` / `range:a..b:w` component strings

pub mod codec;
pub mod manifest;
pub mod payload;
pub mod placeholder;
pub mod plan;

pub use codec::{CarrierCodec, DecodeOptions, EncodeOptions, DEFAULT_ZERO_BAND};
pub use manifest::{EncodedDocument, Manifest};
pub use payload::PayloadPacking;
pub use placeholder::{parse_placeholders, render_placeholders, PlaceholderSpec};
pub use plan::{CarrierSet, HarmonicSet, Plan, PlanRegistry, Selection, DEFAULT_PHI};
