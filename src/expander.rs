//! Deterministic byte-stream expanders.
//!
//! A [`ByteStreamExpander`] turns a key into an unbounded pseudo-random byte
//! stream. Symbol vector generation and carrier selection both draw from the
//! same abstraction, so a given key always yields the same bytes on every
//! platform.
//!
//! Keys are assembled with [`KeyBuilder`], which length-prefixes every field
//! so `("ab", "c")` and `("a", "bc")` can never collide.

use std::fmt;
use std::sync::Arc;

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Scale for turning the top 53 bits of a `u64` into a unit float.
const UNIT_SCALE: f64 = 1.0 / (1u64 << 53) as f64;

/// Keyed hash producing an unbounded deterministic byte stream.
///
/// Implementations must be pure: the bytes written by `fill_bytes` depend on
/// `key` and `out.len()` only, and a shorter request is always a prefix of a
/// longer one.
pub trait ByteStreamExpander: Send + Sync + fmt::Debug {
    /// Expander name for debugging/logging.
    fn name(&self) -> &'static str;

    /// Fill `out` with the first `out.len()` bytes of the stream for `key`.
    fn fill_bytes(&self, key: &[u8], out: &mut [u8]);

    /// First `len` bytes of the stream for `key`.
    fn expand(&self, key: &[u8], len: usize) -> Vec<u8> {
        let mut out = vec![0u8; len];
        self.fill_bytes(key, &mut out);
        out
    }

    /// First eight stream bytes as a little-endian `u64`.
    fn hash_u64(&self, key: &[u8]) -> u64 {
        let mut word = [0u8; 8];
        self.fill_bytes(key, &mut word);
        u64::from_le_bytes(word)
    }

    /// `n` uniform floats in `[0, 1)`, one per eight stream bytes.
    fn unit_f64s(&self, key: &[u8], n: usize) -> Vec<f64> {
        self.expand(key, n * 8)
            .chunks_exact(8)
            .map(|chunk| {
                let mut word = [0u8; 8];
                word.copy_from_slice(chunk);
                unit_f64(u64::from_le_bytes(word))
            })
            .collect()
    }
}

/// Map a `u64` onto `[0, 1)` using its top 53 bits.
#[must_use]
pub fn unit_f64(word: u64) -> f64 {
    (word >> 11) as f64 * UNIT_SCALE
}

/// SHA-256 in counter mode.
///
/// Block `i` is `SHA-256(len(key) || key || i)` with both integers encoded as
/// little-endian `u64`; the stream is the concatenation of blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Expander;

impl ByteStreamExpander for Sha256Expander {
    fn name(&self) -> &'static str {
        "sha256"
    }

    fn fill_bytes(&self, key: &[u8], out: &mut [u8]) {
        let mut prefix = Sha256::new();
        prefix.update((key.len() as u64).to_le_bytes());
        prefix.update(key);

        for (counter, block) in out.chunks_mut(32).enumerate() {
            let mut hasher = prefix.clone();
            hasher.update((counter as u64).to_le_bytes());
            let digest = hasher.finalize();
            block.copy_from_slice(&digest[..block.len()]);
        }
    }
}

/// ChaCha20 keystream seeded with `SHA-256(key)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChaChaExpander;

impl ByteStreamExpander for ChaChaExpander {
    fn name(&self) -> &'static str {
        "chacha20"
    }

    fn fill_bytes(&self, key: &[u8], out: &mut [u8]) {
        let seed: [u8; 32] = Sha256::digest(key).into();
        let mut rng = ChaCha20Rng::from_seed(seed);
        rng.fill_bytes(out);
    }
}

/// Expander selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpanderKind {
    /// [`Sha256Expander`].
    #[default]
    Sha256,
    /// [`ChaChaExpander`].
    Chacha20,
}

/// Build a shared expander of the given kind.
#[must_use]
pub fn build_expander(kind: ExpanderKind) -> Arc<dyn ByteStreamExpander> {
    match kind {
        ExpanderKind::Sha256 => Arc::new(Sha256Expander),
        ExpanderKind::Chacha20 => Arc::new(ChaChaExpander),
    }
}

/// Length-prefixed key serializer.
///
/// # Examples
///
/// ```
/// use spectral_carrier::expander::KeyBuilder;
///
/// let a = KeyBuilder::new("demo").str("ab").str("c").finish();
/// let b = KeyBuilder::new("demo").str("a").str("bc").finish();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone)]
pub struct KeyBuilder {
    buf: Vec<u8>,
}

impl KeyBuilder {
    /// Start a key under a domain-separation tag.
    #[must_use]
    pub fn new(domain: &str) -> Self {
        Self { buf: Vec::new() }.str(domain)
    }

    /// Append raw bytes.
    #[must_use]
    pub fn bytes(mut self, value: &[u8]) -> Self {
        self.buf.extend_from_slice(&(value.len() as u64).to_le_bytes());
        self.buf.extend_from_slice(value);
        self
    }

    /// Append a UTF-8 string.
    #[must_use]
    pub fn str(self, value: &str) -> Self {
        self.bytes(value.as_bytes())
    }

    /// Append an unsigned integer.
    #[must_use]
    pub fn u64(self, value: u64) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    /// Append a single tag byte.
    #[must_use]
    pub fn tag(mut self, tag: u8) -> Self {
        self.buf.push(tag);
        self
    }

    /// Finished key bytes.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}
