//! Superposition (additive bundling).
//!
//! The sum of several vectors stays similar to each of them, and because the
//! transform is linear, carrier levels of superposed encodings add.

use crate::error::{Result, SpectralError};
use crate::vector::{check_same_len, Vector};

/// Element-wise sum of all vectors.
///
/// # Errors
///
/// Returns `SpectralError::EmptyInput` for an empty slice and
/// `SpectralError::DimensionMismatch` if any lengths differ.
///
/// # Examples
///
/// ```
/// use spectral_carrier::hrr::superpose;
/// use spectral_carrier::Vector;
///
/// let a = Vector::new(vec![1.0, 0.0]).unwrap();
/// let b = Vector::new(vec![0.5, 2.0]).unwrap();
/// assert_eq!(superpose(&[&a, &b]).unwrap().as_slice(), &[1.5, 2.0]);
/// ```
pub fn superpose(vectors: &[&Vector]) -> Result<Vector> {
    let (first, rest) = split(vectors)?;
    rest.iter()
        .try_fold((*first).clone(), |acc, v| acc.checked_add(v))
}

/// Weighted sum `sum_i w_i * v_i`.
///
/// # Errors
///
/// Returns `SpectralError::EmptyInput` for an empty slice and
/// `SpectralError::DimensionMismatch` if any lengths differ.
pub fn superpose_weighted(terms: &[(f64, &Vector)]) -> Result<Vector> {
    let ((w0, first), rest) = terms
        .split_first()
        .ok_or_else(|| SpectralError::EmptyInput("cannot superpose empty vector list".into()))?;

    let mut acc = first.scale(*w0).into_inner();
    for (w, v) in rest {
        check_same_len(acc.len(), v.len())?;
        for (slot, x) in acc.iter_mut().zip(v.iter()) {
            *slot += w * x;
        }
    }
    Vector::new(acc)
}

fn split<'a, 'b>(vectors: &'a [&'b Vector]) -> Result<(&'a &'b Vector, &'a [&'b Vector])> {
    vectors
        .split_first()
        .ok_or_else(|| SpectralError::EmptyInput("cannot superpose empty vector list".into()))
}
