//! Carrier symbols.
//!
//! Every data carrier holds one balanced ternary digit. On the wire a trit is
//! a carrier level of `-1`, `0` or `+1` (times the plan gain); in text it is
//! one of `-`, `0`, `+`; in JSON it is the integer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectralError};

/// One carrier symbol.
///
/// ```
/// use spectral_carrier::Trit;
///
/// assert_eq!(Trit::P.level(), 1.0);
/// assert_eq!(Trit::from_level(-0.93, 0.5), Trit::N);
/// assert_eq!(Trit::from_level(0.12, 0.5), Trit::Z);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i8)]
pub enum Trit {
    /// Level -1, written `-`.
    N = -1,
    /// Level 0, written `0`. Unused carriers read as this.
    #[default]
    Z = 0,
    /// Level +1, written `+`.
    P = 1,
}

impl Trit {
    /// `N`, `Z`, `P`.
    pub const ALL: [Trit; 3] = [Trit::N, Trit::Z, Trit::P];

    /// Trit for an integer in `{-1, 0, 1}`.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidValue` for any other integer.
    pub const fn from_value(value: i32) -> Result<Self> {
        match value {
            -1 => Ok(Trit::N),
            0 => Ok(Trit::Z),
            1 => Ok(Trit::P),
            _ => Err(SpectralError::InvalidValue(value)),
        }
    }

    /// Integer value.
    #[must_use]
    pub const fn value(self) -> i8 {
        self as i8
    }

    /// Normalized carrier level this trit is encoded as.
    #[must_use]
    pub fn level(self) -> f64 {
        f64::from(self.value())
    }

    /// Decide a trit from a normalized carrier level.
    ///
    /// Levels strictly above `zero_band` are `P`, strictly below
    /// `-zero_band` are `N`; the closed band between them is `Z`.
    #[must_use]
    pub fn from_level(level: f64, zero_band: f64) -> Self {
        if level > zero_band {
            Trit::P
        } else if level < -zero_band {
            Trit::N
        } else {
            Trit::Z
        }
    }

    /// Bit mapping used by the `Bits` payload packing: 1 -> `P`, 0 -> `N`.
    #[must_use]
    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            Trit::P
        } else {
            Trit::N
        }
    }

    /// Whether this is `Z`.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        matches!(self, Trit::Z)
    }

    /// Text form.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Trit::N => '-',
            Trit::Z => '0',
            Trit::P => '+',
        }
    }

    /// Parse the text form.
    ///
    /// # Errors
    ///
    /// Returns `SpectralError::InvalidTritChar` for anything but `-`, `0`, `+`.
    pub const fn from_char(c: char) -> Result<Self> {
        match c {
            '-' => Ok(Trit::N),
            '0' => Ok(Trit::Z),
            '+' => Ok(Trit::P),
            _ => Err(SpectralError::InvalidTritChar(c)),
        }
    }
}

impl fmt::Display for Trit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl TryFrom<i32> for Trit {
    type Error = SpectralError;

    fn try_from(value: i32) -> Result<Self> {
        Trit::from_value(value)
    }
}

impl From<Trit> for i32 {
    fn from(trit: Trit) -> Self {
        i32::from(trit.value())
    }
}

impl From<Trit> for f64 {
    fn from(trit: Trit) -> Self {
        trit.level()
    }
}

/// Render a symbol stream as `-0+` text.
///
/// ```
/// use spectral_carrier::{trit::trits_to_string, Trit};
///
/// assert_eq!(trits_to_string(&[Trit::N, Trit::Z, Trit::P]), "-0+");
/// ```
#[must_use]
pub fn trits_to_string(trits: &[Trit]) -> String {
    trits.iter().map(|t| t.to_char()).collect()
}

/// Parse `-0+` text back into symbols.
///
/// # Errors
///
/// Returns `SpectralError::InvalidTritChar` on the first invalid character.
pub fn parse_trits(s: &str) -> Result<Vec<Trit>> {
    s.chars().map(Trit::from_char).collect()
}
