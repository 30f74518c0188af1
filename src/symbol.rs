//! Deterministic symbol vectors.
//!
//! [`SymbolVectorGenerator`] derives the atomic vectors the binding engine
//! composes. A vector is a pure function of `(name, properties, dimension)`:
//! the name and each property are serialized into a [`KeyBuilder`] key and
//! the coordinates are drawn from the expander's stream for that key.

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectralError};
use crate::expander::{unit_f64, ByteStreamExpander, KeyBuilder, Sha256Expander};
use crate::vector::Vector;

const SYMBOL_DOMAIN: &str = "spectral-carrier/symbol/v1";

/// Distribution of generated coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolDistribution {
    /// Standard normal, N(0, 1), via Box-Muller.
    #[default]
    Normal,
    /// Uniform on `[-1, 1)`.
    Uniform,
    /// Normal with variance `1/N`, so vectors have unit expected norm.
    HrrNormal,
}

/// Typed property value; the type tag is part of the key, so `42` and `"42"`
/// produce different vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point, keyed by its bit pattern.
    Float(f64),
    /// String.
    Str(String),
}

impl PropertyValue {
    fn append_to(&self, key: KeyBuilder) -> KeyBuilder {
        match self {
            PropertyValue::Bool(b) => key.tag(b'b').u64(u64::from(*b)),
            PropertyValue::Int(i) => key.tag(b'i').bytes(&i.to_le_bytes()),
            PropertyValue::Float(f) => key.tag(b'f').u64(f.to_bits()),
            PropertyValue::Str(s) => key.tag(b's').str(s),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Int(i) => write!(f, "{i}"),
            PropertyValue::Float(x) => write!(f, "{x}"),
            PropertyValue::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(i64::from(value))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Str(value)
    }
}

/// One `(key, value)` pair of a symbol's property list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Property key.
    pub key: String,
    /// Property value.
    pub value: PropertyValue,
}

impl Property {
    /// Create a property.
    ///
    /// # Examples
    ///
    /// ```
    /// use spectral_carrier::symbol::{Property, PropertyValue};
    ///
    /// let p = Property::new("x", 42);
    /// assert_eq!(p.value, PropertyValue::Int(42));
    /// ```
    pub fn new(key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Generates deterministic pseudo-random vectors from symbol names.
///
/// # Examples
///
/// ```
/// use spectral_carrier::symbol::{Property, SymbolVectorGenerator};
///
/// let generator = SymbolVectorGenerator::new(1024).unwrap();
/// let a = generator.generate("alpha", &[Property::new("x", 42)]).unwrap();
/// let again = generator.generate("alpha", &[Property::new("x", 42)]).unwrap();
/// assert_eq!(a, again);
/// ```
#[derive(Debug, Clone)]
pub struct SymbolVectorGenerator {
    dim: usize,
    distribution: SymbolDistribution,
    expander: Arc<dyn ByteStreamExpander>,
}

impl SymbolVectorGenerator {
    /// Generator with the default distribution and the SHA-256 expander.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidDimension` if `dim` is zero.
    pub fn new(dim: usize) -> Result<Self> {
        Self::with_expander(dim, Arc::new(Sha256Expander))
    }

    /// Generator drawing from a specific expander.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidDimension` if `dim` is zero.
    pub fn with_expander(dim: usize, expander: Arc<dyn ByteStreamExpander>) -> Result<Self> {
        if dim == 0 {
            return Err(SpectralError::InvalidDimension(dim));
        }
        Ok(Self {
            dim,
            distribution: SymbolDistribution::default(),
            expander,
        })
    }

    /// Set the coordinate distribution.
    #[must_use]
    pub fn with_distribution(mut self, distribution: SymbolDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Output dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Configured distribution.
    #[must_use]
    pub fn distribution(&self) -> SymbolDistribution {
        self.distribution
    }

    /// Derive the vector for `name` and its ordered properties.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::NumericInstability` if a non-finite coordinate
    /// is produced (not reachable with the built-in distributions).
    pub fn generate(&self, name: &str, properties: &[Property]) -> Result<Vector> {
        let key = symbol_key(name, properties);
        let data = match self.distribution {
            SymbolDistribution::Uniform => self
                .expander
                .unit_f64s(&key, self.dim)
                .into_iter()
                .map(|u| 2.0 * u - 1.0)
                .collect(),
            SymbolDistribution::Normal => self.normals(&key, 1.0),
            SymbolDistribution::HrrNormal => self.normals(&key, 1.0 / (self.dim as f64).sqrt()),
        };
        Vector::new(data)?.ensure_finite()
    }

    /// Box-Muller over consecutive pairs of stream words.
    fn normals(&self, key: &[u8], std_dev: f64) -> Vec<f64> {
        let pairs = self.dim.div_ceil(2);
        let bytes = self.expander.expand(key, pairs * 16);
        let mut out = Vec::with_capacity(pairs * 2);
        for chunk in bytes.chunks_exact(16) {
            let (lo, hi) = chunk.split_at(8);
            let u1 = 1.0 - unit_f64(read_u64(lo));
            let u2 = unit_f64(read_u64(hi));
            let radius = (-2.0 * u1.ln()).sqrt() * std_dev;
            let (sin, cos) = (2.0 * PI * u2).sin_cos();
            out.push(radius * cos);
            out.push(radius * sin);
        }
        out.truncate(self.dim);
        out
    }
}

fn symbol_key(name: &str, properties: &[Property]) -> Vec<u8> {
    let mut key = KeyBuilder::new(SYMBOL_DOMAIN)
        .str(name)
        .u64(properties.len() as u64);
    for property in properties {
        key = property.value.append_to(key.str(&property.key));
    }
    key.finish()
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(bytes);
    u64::from_le_bytes(word)
}
