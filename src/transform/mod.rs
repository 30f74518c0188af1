// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Spectral transform strategies (forward / inverse DFT of real vectors).
//!
//! Every strategy implements the same [`SpectralTransform`] trait, so the
//! binding engine and the carrier codec are written once against the trait
//! and the concrete algorithm is picked when they are constructed.
//!
//! # Architecture
//!
//! ```text
//! +---------------------+
//! |  SpectralTransform  |  <- process() in place, forward()/inverse() provided
//! +---------------------+
//!          |
//!    +-----+------+-----------+----------+
//!    |            |           |          |
//!    v            v           v          v
//! +--------+  +-------+  +-----------+  +------+
//! | Radix2 |  |  DFT  |  | Bluestein |  | Auto |
//! +--------+  +-------+  +-----------+  +------+
//!  N = 2^k     any N       any N          dispatch
//!  N log N     N^2         N log N        by size
//! ```
//!
//! # Conventions
//!
//! - Forward: `X[k] = sum_j x[j] * exp(-2*pi*i*j*k/N)`, unscaled.
//! - Inverse: `x[j] = (1/N) * sum_k X[k] * exp(+2*pi*i*j*k/N)`; only the real
//!   part is returned, so callers that build spectra by hand must keep them
//!   Hermitian (`X[N-k] == conj(X[k])`).
//!
//! # Usage
//!
//! ```rust
//! use spectral_carrier::transform::{build_transform, TransformKind};
//! use spectral_carrier::Vector;
//!
//! let transform = build_transform(TransformKind::Auto);
//! let v = Vector::new(vec![1.0, 2.0, 3.0]).unwrap();
//! let coeffs = transform.forward(&v).unwrap();
//! let back = transform.inverse(&coeffs).unwrap();
//! assert!(v.rmse(&back).unwrap() < 1e-12);
//! ```

pub mod bluestein;
pub mod dft;
pub mod radix2;

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectralError};
use crate::vector::{SpectralCoefficients, Vector};

pub use bluestein::BluesteinTransform;
pub use dft::DftTransform;
pub use radix2::Radix2Transform;

/// Default size at or below which [`AutoTransform`] prefers the direct DFT
/// over Bluestein for non-power-of-two dimensions.
pub const DEFAULT_DFT_THRESHOLD: usize = 64;

/// Transform direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Kernel `exp(-2*pi*i*j*k/N)`.
    Forward,
    /// Kernel `exp(+2*pi*i*j*k/N)` (unscaled).
    Inverse,
}

impl Direction {
    /// Sign of the exponent: -1 forward, +1 inverse.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Direction::Forward => -1.0,
            Direction::Inverse => 1.0,
        }
    }
}

/// Strategy selector for spectral transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Radix-2 for powers of two, DFT for small sizes, Bluestein otherwise.
    #[default]
    Auto,
    /// Radix-2 Cooley-Tukey (power-of-two dimensions only).
    Radix2,
    /// Direct O(N^2) summation.
    Dft,
    /// Bluestein chirp-z over a power-of-two convolution.
    Bluestein,
}

/// Backend-agnostic trait for spectral transforms.
///
/// # Implementors
///
/// - [`Radix2Transform`]: iterative Cooley-Tukey, power-of-two sizes only
/// - [`DftTransform`]: reference O(N^2) path, every size
/// - [`BluesteinTransform`]: chirp-z, every size in O(N log N)
/// - [`AutoTransform`]: dispatches to the above by size
///
/// # Thread Safety
///
/// All implementations are stateless and `Send + Sync`.
pub trait SpectralTransform: Send + Sync + fmt::Debug {
    /// Strategy name for debugging/logging.
    fn name(&self) -> &'static str;

    /// Whether this strategy can transform vectors of length `dim`.
    fn supports(&self, dim: usize) -> bool;

    /// Unnormalized in-place complex transform.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimension` for an empty buffer and
    /// `UnsupportedDimension` if the strategy cannot handle its length.
    fn process(&self, buffer: &mut [Complex64], direction: Direction) -> Result<()>;

    /// Forward transform of a real vector.
    ///
    /// # Errors
    ///
    /// Propagates [`SpectralTransform::process`] errors and returns
    /// `NumericInstability` if the input produced a non-finite coefficient.
    fn forward(&self, vector: &Vector) -> Result<SpectralCoefficients> {
        let mut buffer: Vec<Complex64> = vector
            .iter()
            .map(|&re| Complex64::new(re, 0.0))
            .collect();
        self.process(&mut buffer, Direction::Forward)?;
        ensure_finite_bins(&buffer)?;
        SpectralCoefficients::new(buffer)
    }

    /// Inverse transform, returning the real part scaled by `1/N`.
    ///
    /// # Errors
    ///
    /// Propagates [`SpectralTransform::process`] errors and returns
    /// `NumericInstability` if any output coordinate is non-finite.
    fn inverse(&self, coeffs: &SpectralCoefficients) -> Result<Vector> {
        let mut buffer = coeffs.as_slice().to_vec();
        let n = buffer.len();
        self.process(&mut buffer, Direction::Inverse)?;
        let scale = 1.0 / n as f64;
        Vector::new(buffer.iter().map(|c| c.re * scale).collect())?.ensure_finite()
    }
}

/// Dispatching strategy: radix-2 for powers of two, direct DFT up to a size
/// threshold, Bluestein above it.
#[derive(Debug, Clone)]
pub struct AutoTransform {
    radix2: Radix2Transform,
    dft: DftTransform,
    bluestein: BluesteinTransform,
    dft_threshold: usize,
}

impl AutoTransform {
    /// Create a dispatcher with the given DFT/Bluestein crossover size.
    #[must_use]
    pub fn new(dft_threshold: usize) -> Self {
        Self {
            radix2: Radix2Transform,
            dft: DftTransform,
            bluestein: BluesteinTransform,
            dft_threshold,
        }
    }

    /// Strategy used for a given length.
    #[must_use]
    pub fn select(&self, dim: usize) -> &dyn SpectralTransform {
        if dim.is_power_of_two() {
            &self.radix2
        } else if dim <= self.dft_threshold {
            &self.dft
        } else {
            &self.bluestein
        }
    }
}

impl Default for AutoTransform {
    fn default() -> Self {
        Self::new(DEFAULT_DFT_THRESHOLD)
    }
}

impl SpectralTransform for AutoTransform {
    fn name(&self) -> &'static str {
        "auto"
    }

    fn supports(&self, dim: usize) -> bool {
        dim > 0
    }

    fn process(&self, buffer: &mut [Complex64], direction: Direction) -> Result<()> {
        let strategy = self.select(buffer.len());
        tracing::trace!("Dispatching dim {} to {}", buffer.len(), strategy.name());
        strategy.process(buffer, direction)
    }
}

/// Build a shared transform for the given strategy.
///
/// # Examples
///
/// ```
/// use spectral_carrier::transform::{build_transform, TransformKind};
///
/// let t = build_transform(TransformKind::Radix2);
/// assert_eq!(t.name(), "radix2");
/// assert!(!t.supports(12));
/// ```
#[must_use]
pub fn build_transform(kind: TransformKind) -> Arc<dyn SpectralTransform> {
    build_transform_with_threshold(kind, DEFAULT_DFT_THRESHOLD)
}

/// Build a shared transform, overriding the auto strategy's DFT threshold.
#[must_use]
pub fn build_transform_with_threshold(
    kind: TransformKind,
    dft_threshold: usize,
) -> Arc<dyn SpectralTransform> {
    match kind {
        TransformKind::Auto => Arc::new(AutoTransform::new(dft_threshold)),
        TransformKind::Radix2 => Arc::new(Radix2Transform),
        TransformKind::Dft => Arc::new(DftTransform),
        TransformKind::Bluestein => Arc::new(BluesteinTransform),
    }
}

/// Twiddle table `exp(sign * 2*pi*i*m/n)` for `m` in `0..len`.
pub(crate) fn twiddles(n: usize, len: usize, direction: Direction) -> Vec<Complex64> {
    let step = direction.sign() * 2.0 * PI / n as f64;
    (0..len)
        .map(|m| Complex64::from_polar(1.0, step * m as f64))
        .collect()
}

pub(crate) fn check_len(name: &'static str, dim: usize, supported: bool) -> Result<()> {
    if dim == 0 {
        return Err(SpectralError::InvalidDimension(0));
    }
    if !supported {
        return Err(SpectralError::UnsupportedDimension {
            transform: name,
            dim,
        });
    }
    Ok(())
}

fn ensure_finite_bins(bins: &[Complex64]) -> Result<()> {
    if let Some(index) = bins.iter().position(|c| !c.is_finite()) {
        return Err(SpectralError::NumericInstability { index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vector {
        Vector::new((0..n).map(|i| ((i * 7 + 3) % 11) as f64 - 5.0).collect()).unwrap()
    }

    #[test]
    fn test_auto_selects_by_size() {
        let auto = AutoTransform::new(64);
        assert_eq!(auto.select(1024).name(), "radix2");
        assert_eq!(auto.select(1).name(), "radix2");
        assert_eq!(auto.select(63).name(), "dft");
        assert_eq!(auto.select(1500).name(), "bluestein");
    }

    #[test]
    fn test_all_strategies_agree() {
        for n in [1usize, 2, 3, 8, 9, 15, 16, 100] {
            let v = ramp(n);
            let reference = DftTransform.forward(&v).unwrap();
            for kind in [
                TransformKind::Auto,
                TransformKind::Radix2,
                TransformKind::Bluestein,
            ] {
                let t = build_transform(kind);
                if !t.supports(n) {
                    continue;
                }
                let coeffs = t.forward(&v).unwrap();
                for (a, b) in coeffs.as_slice().iter().zip(reference.as_slice()) {
                    assert!((a - b).norm() < 1e-9, "{} disagrees at n={n}", t.name());
                }
            }
        }
    }

    #[test]
    fn test_forward_of_real_input_is_hermitian() {
        let t = build_transform(TransformKind::Auto);
        for n in [6usize, 7, 64, 99] {
            let coeffs = t.forward(&ramp(n)).unwrap();
            assert!(coeffs.hermitian_defect() < 1e-9, "n={n}");
        }
    }

    #[test]
    fn test_radix2_rejects_non_power_of_two() {
        let t = build_transform(TransformKind::Radix2);
        let err = t.forward(&ramp(12)).unwrap_err();
        assert!(matches!(
            err,
            SpectralError::UnsupportedDimension {
                transform: "radix2",
                dim: 12
            }
        ));
    }

    #[test]
    fn test_non_finite_input_detected() {
        let t = build_transform(TransformKind::Dft);
        let v = Vector::new(vec![1.0, f64::NAN, 0.0]).unwrap();
        assert!(matches!(
            t.forward(&v),
            Err(SpectralError::NumericInstability { .. })
        ));
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let mut empty: Vec<Complex64> = Vec::new();
        for kind in [
            TransformKind::Auto,
            TransformKind::Radix2,
            TransformKind::Dft,
            TransformKind::Bluestein,
        ] {
            let t = build_transform(kind);
            assert!(t.process(&mut empty, Direction::Forward).is_err());
        }
    }

    #[test]
    fn test_transform_kind_serde() {
        let json = serde_json::to_string(&TransformKind::Bluestein).unwrap();
        assert_eq!(json, "\"bluestein\"");
        let kind: TransformKind = serde_json::from_str("\"radix2\"").unwrap();
        assert_eq!(kind, TransformKind::Radix2);
    }
}
