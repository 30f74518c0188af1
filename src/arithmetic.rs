//! Byte and integer conversions behind the payload packings.
//!
//! `Balanced` packing writes each byte as six balanced-ternary digits of
//! `byte - 128`; `Bits` packing writes each bit as a `P` or `N` carrier.

use crate::error::{Result, SpectralError};
use crate::trit::Trit;

/// Trits needed to hold one byte in balanced ternary (3^6 = 729 >= 256).
pub const TRITS_PER_BYTE: usize = 6;

/// Offset applied to a byte before balanced-ternary conversion, centring
/// `0..=255` on `-128..=127`.
const BYTE_OFFSET: i64 = 128;

/// Balanced-ternary digits of `value`, least significant first, padded with
/// `Z` to at least `min_trits` (and at least one digit).
///
/// Every `i64` is accepted; the extremes take 41 digits.
///
/// ```
/// use spectral_carrier::{Trit, arithmetic::to_balanced_ternary};
///
/// // 5 = -1 - 3 + 9
/// assert_eq!(to_balanced_ternary(5, 4), vec![Trit::N, Trit::N, Trit::P, Trit::Z]);
/// ```
#[must_use]
pub fn to_balanced_ternary(value: i64, min_trits: usize) -> Vec<Trit> {
    let width = min_trits.max(1);
    let mut digits = Vec::with_capacity(width);
    let mut rest = i128::from(value);
    while rest != 0 {
        // Map the residue 0/1/2 onto 0/+1/-1 and carry the -1 case upward.
        let digit = match rest.rem_euclid(3) {
            0 => Trit::Z,
            1 => Trit::P,
            _ => Trit::N,
        };
        rest = (rest - i128::from(digit.value())).div_euclid(3);
        digits.push(digit);
    }
    digits.resize(digits.len().max(width), Trit::Z);
    digits
}

/// Integer value of least-significant-first balanced-ternary digits.
///
/// `trits` must encode a value in the `i64` range (any output of
/// [`to_balanced_ternary`] does); longer digit strings wrap.
///
/// ```
/// use spectral_carrier::{Trit, arithmetic::from_balanced_ternary};
///
/// assert_eq!(from_balanced_ternary(&[Trit::N, Trit::N, Trit::P]), 5);
/// ```
#[must_use]
pub fn from_balanced_ternary(trits: &[Trit]) -> i64 {
    trits
        .iter()
        .rev()
        .fold(0i64, |acc, &trit| {
            acc.wrapping_mul(3).wrapping_add(i64::from(trit.value()))
        })
}

/// Encode one byte as [`TRITS_PER_BYTE`] balanced-ternary trits (LSB first).
#[must_use]
pub fn byte_to_trits(byte: u8) -> [Trit; TRITS_PER_BYTE] {
    let digits = to_balanced_ternary(i64::from(byte) - BYTE_OFFSET, TRITS_PER_BYTE);
    let mut out = [Trit::Z; TRITS_PER_BYTE];
    out.copy_from_slice(&digits[..TRITS_PER_BYTE]);
    out
}

/// Decode [`TRITS_PER_BYTE`] trits written by [`byte_to_trits`].
///
/// # Errors
///
/// Returns `SpectralError::DimensionMismatch` if the slice is not exactly
/// six trits long, and `SpectralError::InvalidValue` if the trits encode a
/// value outside the byte range.
pub fn trits_to_byte(trits: &[Trit]) -> Result<u8> {
    if trits.len() != TRITS_PER_BYTE {
        return Err(SpectralError::DimensionMismatch {
            expected: TRITS_PER_BYTE,
            actual: trits.len(),
        });
    }
    let value = from_balanced_ternary(trits) + BYTE_OFFSET;
    u8::try_from(value).map_err(|_| SpectralError::InvalidValue(value as i32))
}

/// Encode one byte as eight ±1 trits, most significant bit first.
#[must_use]
pub fn byte_to_bit_trits(byte: u8) -> [Trit; 8] {
    let mut out = [Trit::N; 8];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = Trit::from_bit(byte & (0x80 >> i) != 0);
    }
    out
}

/// Decode eight ±1 trits written by [`byte_to_bit_trits`].
///
/// # Errors
///
/// Returns `SpectralError::DimensionMismatch` if the slice is not exactly
/// eight trits long, and `SpectralError::InvalidValue` if any trit is zero
/// (a zero carries no bit).
pub fn bit_trits_to_byte(trits: &[Trit]) -> Result<u8> {
    if trits.len() != 8 {
        return Err(SpectralError::DimensionMismatch {
            expected: 8,
            actual: trits.len(),
        });
    }
    let mut byte = 0u8;
    for &trit in trits {
        let bit = match trit {
            Trit::P => 1,
            Trit::N => 0,
            Trit::Z => return Err(SpectralError::InvalidValue(0)),
        };
        byte = (byte << 1) | bit;
    }
    Ok(byte)
}
