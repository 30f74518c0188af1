//! Byte payload packing into symbol streams.

use serde::{Deserialize, Serialize};

use crate::arithmetic::{
    bit_trits_to_byte, byte_to_bit_trits, byte_to_trits, trits_to_byte, TRITS_PER_BYTE,
};
use crate::error::{Result, SpectralError};
use crate::trit::Trit;

/// How bytes become trits before they are placed on carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadPacking {
    /// Each byte `b` becomes `b - 128` as six balanced-ternary trits, least
    /// significant first.
    #[default]
    Balanced,
    /// Each byte becomes eight `±1` trits, most significant bit first
    /// (`1 -> +1`, `0 -> -1`).
    Bits,
}

impl PayloadPacking {
    /// Trits used per payload byte.
    #[must_use]
    pub const fn trits_per_byte(self) -> usize {
        match self {
            PayloadPacking::Balanced => TRITS_PER_BYTE,
            PayloadPacking::Bits => 8,
        }
    }

    /// Symbols needed for a payload of `bytes` bytes.
    #[must_use]
    pub const fn symbols_for(self, bytes: usize) -> usize {
        bytes * self.trits_per_byte()
    }

    /// Pack a payload into trits.
    ///
    /// # Examples
    ///
    /// ```
    /// use spectral_carrier::carrier::PayloadPacking;
    ///
    /// let trits = PayloadPacking::Bits.pack(b"A");
    /// assert_eq!(spectral_carrier::trit::trits_to_string(&trits), "-+-----+");
    /// assert_eq!(PayloadPacking::Bits.unpack(&trits).unwrap(), b"A");
    /// ```
    #[must_use]
    pub fn pack(self, payload: &[u8]) -> Vec<Trit> {
        let mut out = Vec::with_capacity(self.symbols_for(payload.len()));
        for &byte in payload {
            match self {
                PayloadPacking::Balanced => out.extend(byte_to_trits(byte)),
                PayloadPacking::Bits => out.extend(byte_to_bit_trits(byte)),
            }
        }
        out
    }

    /// Unpack trits written by [`PayloadPacking::pack`].
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidConfig` if the trit count is not a
    /// whole number of bytes, and `SpectralError::InvalidValue` if a group
    /// does not decode to a byte.
    pub fn unpack(self, trits: &[Trit]) -> Result<Vec<u8>> {
        let width = self.trits_per_byte();
        if trits.len() % width != 0 {
            return Err(SpectralError::InvalidConfig(format!(
                "{} trits is not a whole number of {width}-trit bytes",
                trits.len()
            )));
        }
        trits
            .chunks_exact(width)
            .map(|group| match self {
                PayloadPacking::Balanced => trits_to_byte(group),
                PayloadPacking::Bits => bit_trits_to_byte(group),
            })
            .collect()
    }
}
