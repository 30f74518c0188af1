//! Decode manifests and the JSON document that carries them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::carrier::PayloadPacking;
use crate::error::Result;
use crate::vector::Vector;

fn default_expander() -> String {
    "sha256".to_string()
}

/// Everything a decoder needs besides the vector itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Plan name.
    pub plan: String,
    /// Vector dimension.
    pub dim: usize,
    /// Carrier selection seed.
    pub seed: String,
    /// Carrier bins, anchors first.
    pub carriers: Vec<usize>,
    /// Number of leading anchor bins in `carriers`.
    pub anchors: usize,
    /// Number of symbols encoded.
    pub symbol_count: usize,
    /// Plan gain at encode time.
    pub gain: f64,
    /// Expander used for carrier selection.
    #[serde(default = "default_expander")]
    pub expander: String,
    /// Byte packing, for binary payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packing: Option<PayloadPacking>,
}

impl Manifest {
    /// Anchor bins.
    #[must_use]
    pub fn anchor_bins(&self) -> &[usize] {
        &self.carriers[..self.anchors.min(self.carriers.len())]
    }

    /// Data bins in symbol order.
    #[must_use]
    pub fn data_bins(&self) -> &[usize] {
        &self.carriers[self.anchors.min(self.carriers.len())..]
    }

    /// Number of data carriers.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data_bins().len()
    }

    /// Payload length in bytes, for binary manifests.
    #[must_use]
    pub fn payload_len(&self) -> Option<usize> {
        self.packing
            .map(|packing| self.symbol_count / packing.trits_per_byte())
    }
}

/// An encoded vector together with its manifest.
///
/// Serializes as one flat JSON object:
/// `{"plan": .., "dim": .., "seed": .., "carriers": [..], .., "vector": [..]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedDocument {
    /// Decode metadata.
    #[serde(flatten)]
    pub manifest: Manifest,
    /// Encoded vector.
    pub vector: Vector,
}

impl EncodedDocument {
    /// Pair a vector with its manifest.
    #[must_use]
    pub fn new(vector: Vector, manifest: Manifest) -> Self {
        Self { manifest, vector }
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::Json` for malformed documents.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the document to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::Io` or `SpectralError::Json` on failure.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a document from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::Io` or `SpectralError::Json` on failure.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
