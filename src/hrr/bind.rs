//! Bind / unbind via the spectral domain.
//!
//! Binding is circular convolution and is exactly invertible wherever the
//! cue's spectrum is non-zero. Unbinding divides spectra, so the divisor is
//! regularized to keep near-zero bins from blowing up.

use std::sync::Arc;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectralError};
use crate::transform::{build_transform, SpectralTransform, TransformKind};
use crate::vector::{check_same_len, SpectralCoefficients, Vector};

/// Default regularization epsilon for [`BindingEngine::unbind`].
pub const DEFAULT_EPSILON: f64 = 1e-8;

/// Smallest epsilon a caller may configure.
pub const MIN_EPSILON: f64 = 1e-12;

/// How the spectral divisor of `unbind` is regularized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regularization {
    /// `X * conj(Y) / max(|Y|^2, eps)`: exact division except on bins whose
    /// power is below `eps`.
    #[default]
    Floor,
    /// `X * conj(Y) / (|Y|^2 + eps)` on every bin.
    Tikhonov,
}

/// Circular convolution binding engine over a pluggable transform.
///
/// # Examples
///
/// ```
/// use spectral_carrier::hrr::BindingEngine;
/// use spectral_carrier::symbol::{Property, SymbolVectorGenerator};
///
/// let generator = SymbolVectorGenerator::new(1024).unwrap();
/// let a = generator.generate("alpha", &[Property::new("x", 42)]).unwrap();
/// let b = generator.generate("beta", &[Property::new("y", 7)]).unwrap();
///
/// let engine = BindingEngine::default();
/// let bound = engine.bind(&a, &b).unwrap();
/// let recovered = engine.unbind(&bound, &a).unwrap();
/// assert!(recovered.rmse(&b).unwrap() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BindingEngine {
    transform: Arc<dyn SpectralTransform>,
    epsilon: f64,
    regularization: Regularization,
}

impl Default for BindingEngine {
    fn default() -> Self {
        Self::new(build_transform(TransformKind::Auto))
    }
}

impl BindingEngine {
    /// Engine over the given transform with default regularization.
    #[must_use]
    pub fn new(transform: Arc<dyn SpectralTransform>) -> Self {
        Self {
            transform,
            epsilon: DEFAULT_EPSILON,
            regularization: Regularization::default(),
        }
    }

    /// Set the regularization epsilon.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidConfig` if `epsilon` is not finite or
    /// is below [`MIN_EPSILON`].
    pub fn with_epsilon(mut self, epsilon: f64) -> Result<Self> {
        validate_epsilon(epsilon)?;
        self.epsilon = epsilon;
        Ok(self)
    }

    /// Set the regularization mode.
    #[must_use]
    pub fn with_regularization(mut self, regularization: Regularization) -> Self {
        self.regularization = regularization;
        self
    }

    /// Configured epsilon.
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Configured regularization mode.
    #[must_use]
    pub fn regularization(&self) -> Regularization {
        self.regularization
    }

    /// Underlying transform.
    #[must_use]
    pub fn transform(&self) -> &Arc<dyn SpectralTransform> {
        &self.transform
    }

    /// Bind two vectors by circular convolution.
    ///
    /// `bind(a, b)[k] = sum_i a[i] * b[(k - i) mod N]`.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::DimensionMismatch` if the lengths differ.
    pub fn bind(&self, a: &Vector, b: &Vector) -> Result<Vector> {
        check_same_len(a.len(), b.len())?;
        let fa = self.transform.forward(a)?;
        let fb = self.transform.forward(b)?;
        self.transform.inverse(&fa.hadamard(&fb)?)
    }

    /// Recover the vector that was bound with `cue` to produce `bound`.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::DimensionMismatch` if the lengths differ and
    /// `SpectralError::NumericInstability` if the result is not finite.
    pub fn unbind(&self, bound: &Vector, cue: &Vector) -> Result<Vector> {
        check_same_len(bound.len(), cue.len())?;
        let fx = self.transform.forward(bound)?;
        let fy = self.transform.forward(cue)?;
        let quotient = fx
            .as_slice()
            .iter()
            .zip(fy.as_slice())
            .map(|(x, y)| self.divide(*x, *y))
            .collect();
        self.transform
            .inverse(&SpectralCoefficients::new(quotient)?)
    }

    /// Circular correlation of `bound` with `cue`: `inverse(X * conj(Y))`.
    ///
    /// The classic HRR approximate inverse; noisier than [`unbind`] but it
    /// never divides.
    ///
    /// [`unbind`]: BindingEngine::unbind
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::DimensionMismatch` if the lengths differ.
    pub fn correlate(&self, bound: &Vector, cue: &Vector) -> Result<Vector> {
        check_same_len(bound.len(), cue.len())?;
        let fx = self.transform.forward(bound)?;
        let fy = self.transform.forward(cue)?;
        let product = fx
            .as_slice()
            .iter()
            .zip(fy.as_slice())
            .map(|(x, y)| x * y.conj())
            .collect();
        self.transform.inverse(&SpectralCoefficients::new(product)?)
    }

    /// Bind several vectors left to right: `bind(bind(v0, v1), v2)...`.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::EmptyInput` for an empty slice and
    /// `SpectralError::DimensionMismatch` if any lengths differ.
    pub fn bind_many(&self, vectors: &[&Vector]) -> Result<Vector> {
        let (first, rest) = vectors
            .split_first()
            .ok_or_else(|| SpectralError::EmptyInput("cannot bind empty vector list".into()))?;
        for v in rest {
            check_same_len(first.len(), v.len())?;
        }

        // One forward per operand and a single inverse at the end.
        let mut acc = self.transform.forward(first)?;
        for v in rest {
            acc = acc.hadamard(&self.transform.forward(v)?)?;
        }
        self.transform.inverse(&acc)
    }

    fn divide(&self, x: Complex64, y: Complex64) -> Complex64 {
        let power = y.norm_sqr();
        let denom = match self.regularization {
            Regularization::Floor => power.max(self.epsilon),
            Regularization::Tikhonov => power + self.epsilon,
        };
        x * y.conj() / denom
    }
}

pub(crate) fn validate_epsilon(epsilon: f64) -> Result<()> {
    if !epsilon.is_finite() || epsilon < MIN_EPSILON {
        return Err(SpectralError::InvalidConfig(format!(
            "epsilon must be finite and >= {MIN_EPSILON}, got {epsilon}"
        )));
    }
    Ok(())
}
