//! Spectral (DFT-based) vector binding and a deterministic carrier-plan codec.
//!
//! This crate provides two cooperating pieces built on one set of spectral
//! transforms:
//!
//! - a holographic reduced representation engine that binds and unbinds real
//!   vectors by circular convolution / regularized deconvolution, for any
//!   dimension (not only powers of two), and
//! - a carrier-plan codec that picks a seeded subset of frequency bins and
//!   writes a ternary (or byte) payload onto them, leaving the rest of the
//!   spectrum free for superposition with bound vectors.
//!
//! # Features
//!
//! - **Transforms**: radix-2, direct DFT, Bluestein chirp-z, size-dispatching auto
//! - **HRR**: bind, unbind, correlate, superpose, cosine similarity
//! - **Symbols**: deterministic vectors from a name and typed properties
//! - **Carriers**: frozen named plans, trit and byte payloads, JSON manifests
//!
//! # Quick Start
//!
//! ```rust
//! use spectral_carrier::prelude::*;
//!
//! // Bind two symbols and recover one from the other
//! let generator = SymbolVectorGenerator::new(1024).unwrap();
//! let alpha = generator.generate("alpha", &[Property::new("x", 42)]).unwrap();
//! let beta = generator.generate("beta", &[Property::new("y", 7)]).unwrap();
//!
//! let engine = BindingEngine::default();
//! let bound = engine.bind(&alpha, &beta).unwrap();
//! let recovered = engine.unbind(&bound, &alpha).unwrap();
//! assert!(recovered.rmse(&beta).unwrap() < 1e-10);
//!
//! // Carry a ternary payload on the same vector
//! let codec = CarrierCodec::default();
//! let trits = parse_trits("+0-+").unwrap();
//! let opts = EncodeOptions::new(1024, "demo", "merkaba125");
//! let (carrier, manifest) = codec.encode_trits_onto(&bound, &trits, &opts).unwrap();
//! assert_eq!(codec.decode_with_manifest(&carrier, &manifest).unwrap(), trits);
//! ```
//!
//! # Spectral layout
//!
//! ```text
//! bin:   0    1 .. anchors .. carriers ..   N/2   .. mirrors ..  N-1
//!        DC   |<---- eligible bins ---->|  Nyquist |<- conj ->|
//! ```
//!
//! DC and Nyquist are never carriers, so every carrier has a distinct
//! conjugate mirror and the encoded vector stays real.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_lossless)] // We use explicit casts for clarity

pub mod arithmetic;
pub mod carrier;
pub mod config;
mod error;
pub mod expander;
pub mod hrr;
pub mod symbol;
pub mod transform;
pub mod trit;
mod vector;

pub use carrier::{
    CarrierCodec, DecodeOptions, EncodeOptions, EncodedDocument, Manifest, PayloadPacking, Plan,
    PlanRegistry,
};
pub use config::SpectralConfig;
pub use error::{Result, SpectralError};
pub use expander::{ByteStreamExpander, ChaChaExpander, ExpanderKind, Sha256Expander};
pub use hrr::{BindingEngine, Regularization};
pub use symbol::{Property, PropertyValue, SymbolDistribution, SymbolVectorGenerator};
pub use transform::{build_transform, SpectralTransform, TransformKind};
pub use trit::Trit;
pub use vector::{rmse, SpectralCoefficients, Vector};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use spectral_carrier::prelude::*;
/// ```
pub mod prelude {
    pub use crate::carrier::{
        CarrierCodec, DecodeOptions, EncodeOptions, EncodedDocument, Manifest, PayloadPacking,
    };
    pub use crate::config::SpectralConfig;
    pub use crate::hrr::{cosine_similarity, superpose, BindingEngine};
    pub use crate::symbol::{Property, SymbolVectorGenerator};
    pub use crate::transform::{build_transform, SpectralTransform, TransformKind};
    pub use crate::trit::{parse_trits, trits_to_string, Trit};
    pub use crate::vector::Vector;
    pub use crate::{Result, SpectralError};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_workflow() {
        let config = SpectralConfig::default();
        let generator = config.symbol_generator(256).unwrap();
        let engine = config.binding_engine().unwrap();
        let codec = config.carrier_codec().unwrap();

        let role = generator.generate("role", &[]).unwrap();
        let filler = generator
            .generate("filler", &[Property::new("id", 3)])
            .unwrap();
        let bound = engine.bind(&role, &filler).unwrap();

        let payload = trit::parse_trits("+-+0").unwrap();
        let opts = EncodeOptions::new(256, "workflow", "cube27");
        let (carrier, manifest) = codec.encode_trits_onto(&bound, &payload, &opts).unwrap();
        assert_eq!(codec.decode_with_manifest(&carrier, &manifest).unwrap(), payload);

        // Encoding only touched the carrier bins.
        let stripped = codec.strip_carriers(&carrier, &manifest).unwrap();
        let expected = codec.strip_carriers(&bound, &manifest).unwrap();
        assert!(stripped.rmse(&expected).unwrap() < 1e-12);
    }

    #[test]
    fn test_public_types_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BindingEngine>();
        assert_send_sync::<CarrierCodec>();
        assert_send_sync::<SymbolVectorGenerator>();
        assert_send_sync::<Vector>();
        assert_send_sync::<Manifest>();
    }
}
