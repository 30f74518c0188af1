//! Similarity measures for real vectors.

use crate::error::Result;
use crate::vector::{check_same_len, Vector};

/// Dot product.
///
/// # Errors
///
/// Returns `SpectralError::DimensionMismatch` if lengths differ.
pub fn dot(a: &Vector, b: &Vector) -> Result<f64> {
    check_same_len(a.len(), b.len())?;
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
}

/// Cosine similarity in `[-1, 1]`; zero if either vector is all zeros.
///
/// ```text
/// cos(a, b) = (a . b) / (||a|| * ||b||)
/// ```
///
/// # Errors
///
/// Returns `SpectralError::DimensionMismatch` if lengths differ.
///
/// # Examples
///
/// ```
/// use spectral_carrier::hrr::cosine_similarity;
/// use spectral_carrier::Vector;
///
/// let a = Vector::new(vec![1.0, 1.0, 0.0]).unwrap();
/// let b = Vector::new(vec![2.0, 2.0, 0.0]).unwrap();
/// assert!((cosine_similarity(&a, &b).unwrap() - 1.0).abs() < 1e-12);
/// ```
pub fn cosine_similarity(a: &Vector, b: &Vector) -> Result<f64> {
    let dot = dot(a, b)?;
    let norm_a = a.norm();
    let norm_b = b.norm();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a * norm_b))
}
