//! Real vectors and their spectral coefficients.
//!
//! Both types are immutable once built: every operation returns a new value.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectralError};

/// A fixed-length real vector (N >= 1).
///
/// Serializes as a plain JSON array of numbers.
///
/// # Examples
///
/// ```
/// use spectral_carrier::Vector;
///
/// let v = Vector::new(vec![1.0, -2.0, 0.5]).unwrap();
/// assert_eq!(v.len(), 3);
/// assert!(Vector::new(vec![]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    /// Wrap a sequence of reals.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidDimension` if `data` is empty.
    pub fn new(data: Vec<f64>) -> Result<Self> {
        if data.is_empty() {
            return Err(SpectralError::InvalidDimension(0));
        }
        Ok(Self { data })
    }

    /// All-zero vector of the given dimension.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidDimension` if `dim` is zero.
    pub fn zeros(dim: usize) -> Result<Self> {
        Self::new(vec![0.0; dim])
    }

    /// Vector dimension.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the coordinates.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume into the coordinate buffer.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.data
    }

    /// Iterate over coordinates.
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.data.iter()
    }

    /// Fail with `NumericInstability` if any coordinate is NaN or infinite.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::NumericInstability` naming the first bad index.
    pub fn ensure_finite(self) -> Result<Self> {
        if let Some(index) = self.data.iter().position(|v| !v.is_finite()) {
            return Err(SpectralError::NumericInstability { index });
        }
        Ok(self)
    }

    /// Root-mean-square error against another vector of equal length.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::DimensionMismatch` if lengths differ.
    pub fn rmse(&self, other: &Vector) -> Result<f64> {
        check_same_len(self.len(), other.len())?;
        Ok(rmse(&self.data, &other.data))
    }

    /// Element-wise sum.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::DimensionMismatch` if lengths differ.
    pub fn checked_add(&self, other: &Vector) -> Result<Vector> {
        check_same_len(self.len(), other.len())?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a + b)
            .collect();
        Ok(Vector { data })
    }

    /// Scale every coordinate.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Vector {
        Vector {
            data: self.data.iter().map(|v| v * factor).collect(),
        }
    }

    /// Euclidean norm.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum::<f64>().sqrt()
    }
}

impl TryFrom<Vec<f64>> for Vector {
    type Error = SpectralError;

    fn try_from(data: Vec<f64>) -> Result<Self> {
        Vector::new(data)
    }
}

impl From<Vector> for Vec<f64> {
    fn from(vector: Vector) -> Self {
        vector.data
    }
}

impl AsRef<[f64]> for Vector {
    fn as_ref(&self) -> &[f64] {
        &self.data
    }
}

/// The N complex DFT coefficients of a vector.
///
/// Index `k` holds frequency `k`; for real input, index `N - k` holds the
/// complex conjugate of index `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralCoefficients {
    bins: Vec<Complex64>,
}

impl SpectralCoefficients {
    /// Wrap a coefficient buffer.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidDimension` if `bins` is empty.
    pub fn new(bins: Vec<Complex64>) -> Result<Self> {
        if bins.is_empty() {
            return Err(SpectralError::InvalidDimension(0));
        }
        Ok(Self { bins })
    }

    /// All-zero spectrum of the given dimension.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidDimension` if `dim` is zero.
    pub fn zeros(dim: usize) -> Result<Self> {
        Self::new(vec![Complex64::new(0.0, 0.0); dim])
    }

    /// Number of bins (the transform dimension N).
    #[must_use]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Borrow the bins.
    #[must_use]
    pub fn as_slice(&self) -> &[Complex64] {
        &self.bins
    }

    /// Consume into the bin buffer.
    #[must_use]
    pub fn into_inner(self) -> Vec<Complex64> {
        self.bins
    }

    /// Coefficient at bin `k`, if in range.
    #[must_use]
    pub fn get(&self, k: usize) -> Option<Complex64> {
        self.bins.get(k).copied()
    }

    /// Pointwise complex product (the spectral form of circular convolution).
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::DimensionMismatch` if lengths differ.
    pub fn hadamard(&self, other: &SpectralCoefficients) -> Result<SpectralCoefficients> {
        check_same_len(self.len(), other.len())?;
        let bins = self
            .bins
            .iter()
            .zip(&other.bins)
            .map(|(x, y)| x * y)
            .collect();
        Ok(SpectralCoefficients { bins })
    }

    /// Largest deviation from Hermitian symmetry, `max |X[k] - conj(X[N-k])|`.
    ///
    /// Zero (up to rounding) for the spectrum of any real vector.
    #[must_use]
    pub fn hermitian_defect(&self) -> f64 {
        let n = self.bins.len();
        (0..n)
            .map(|k| (self.bins[k] - self.bins[(n - k) % n].conj()).norm())
            .fold(0.0, f64::max)
    }
}

/// Root-mean-square error between two equal-length slices.
///
/// Slices of different length are compared over their common prefix.
#[must_use]
pub fn rmse(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    (sum / n as f64).sqrt()
}

pub(crate) fn check_same_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(SpectralError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_vector_rejected() {
        assert!(matches!(
            Vector::new(Vec::new()),
            Err(SpectralError::InvalidDimension(0))
        ));
        assert!(Vector::zeros(0).is_err());
        assert!(SpectralCoefficients::zeros(0).is_err());
    }

    #[test]
    fn test_rmse() {
        let a = Vector::new(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Vector::new(vec![1.0, 2.0, 3.0, 6.0]).unwrap();
        assert!((a.rmse(&b).unwrap() - 1.0).abs() < 1e-15);
        assert_eq!(a.rmse(&a).unwrap(), 0.0);

        let c = Vector::new(vec![1.0]).unwrap();
        assert!(matches!(
            a.rmse(&c),
            Err(SpectralError::DimensionMismatch {
                expected: 4,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_ensure_finite() {
        let ok = Vector::new(vec![0.0, 1.0]).unwrap();
        assert!(ok.ensure_finite().is_ok());

        let bad = Vector::new(vec![0.0, f64::NAN, f64::INFINITY]).unwrap();
        assert!(matches!(
            bad.ensure_finite(),
            Err(SpectralError::NumericInstability { index: 1 })
        ));
    }

    #[test]
    fn test_add_and_scale() {
        let a = Vector::new(vec![1.0, -1.0]).unwrap();
        let b = Vector::new(vec![0.5, 0.5]).unwrap();
        assert_eq!(a.checked_add(&b).unwrap().as_slice(), &[1.5, -0.5]);
        assert_eq!(a.scale(2.0).as_slice(), &[2.0, -2.0]);
        assert!((a.norm() - 2.0_f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_vector_serde() {
        let v = Vector::new(vec![0.25, -1.5]).unwrap();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "[0.25,-1.5]");
        let back: Vector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
        assert!(serde_json::from_str::<Vector>("[]").is_err());
    }

    #[test]
    fn test_hermitian_defect() {
        let bins = vec![
            Complex64::new(1.0, 0.0),
            Complex64::new(0.5, 0.25),
            Complex64::new(-2.0, 0.0),
            Complex64::new(0.5, -0.25),
        ];
        let coeffs = SpectralCoefficients::new(bins).unwrap();
        assert!(coeffs.hermitian_defect() < 1e-15);
    }
}
