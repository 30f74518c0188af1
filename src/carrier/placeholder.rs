//! Placeholder component strings.
//!
//! A placeholder puts a plain cosine on one harmonic of a base spacing:
//!
//! ```text
//! k:7:0.8              harmonic 7, amplitude 0.8
//! range:10..20:0.1     harmonics 10 through 19, amplitude 0.1 each
//! range:10..=20:0.1    harmonics 10 through 20
//! k:3:1,range:5..8:0.5 comma-separated lists
//! ```

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use num_complex::Complex64;

use crate::carrier::plan::max_carrier_bin;
use crate::error::{Result, SpectralError};
use crate::transform::SpectralTransform;
use crate::vector::{SpectralCoefficients, Vector};

/// One parsed placeholder component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaceholderSpec {
    /// A single harmonic.
    Harmonic {
        /// Harmonic number (>= 1).
        harmonic: usize,
        /// Cosine amplitude.
        weight: f64,
    },
    /// Harmonics `first..=last`.
    Range {
        /// First harmonic.
        first: usize,
        /// Last harmonic.
        last: usize,
        /// Cosine amplitude of every harmonic.
        weight: f64,
    },
}

impl PlaceholderSpec {
    /// Amplitude of each harmonic.
    #[must_use]
    pub fn weight(&self) -> f64 {
        match self {
            PlaceholderSpec::Harmonic { weight, .. } | PlaceholderSpec::Range { weight, .. } => {
                *weight
            }
        }
    }

    /// Harmonics covered, ascending.
    #[must_use]
    pub fn harmonics(&self) -> RangeInclusive<usize> {
        match *self {
            PlaceholderSpec::Harmonic { harmonic, .. } => harmonic..=harmonic,
            PlaceholderSpec::Range { first, last, .. } => first..=last,
        }
    }
}

impl FromStr for PlaceholderSpec {
    type Err = SpectralError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |why: &str| SpectralError::InvalidPlaceholder(format!("{s:?}: {why}"));

        let mut parts = s.trim().split(':');
        let (Some(kind), Some(target), Some(weight), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid("expected kind:value:weight"));
        };

        let weight: f64 = weight
            .trim()
            .parse()
            .map_err(|_| invalid("weight is not a number"))?;
        if !weight.is_finite() {
            return Err(invalid("weight must be finite"));
        }
        let harmonic = |text: &str| -> Result<usize> {
            match text.trim().parse::<usize>() {
                Ok(h) if h >= 1 => Ok(h),
                _ => Err(invalid("harmonic must be an integer >= 1")),
            }
        };

        match kind.trim() {
            "k" => Ok(PlaceholderSpec::Harmonic {
                harmonic: harmonic(target)?,
                weight,
            }),
            "range" => {
                // `harmonic` is >= 1, so an exclusive end never underflows.
                let (first, last) = if let Some((a, b)) = target.split_once("..=") {
                    (harmonic(a)?, harmonic(b)?)
                } else if let Some((a, b)) = target.split_once("..") {
                    (harmonic(a)?, harmonic(b)? - 1)
                } else {
                    return Err(invalid("range must look like a..b"));
                };
                if first > last {
                    return Err(invalid("range is empty"));
                }
                Ok(PlaceholderSpec::Range {
                    first,
                    last,
                    weight,
                })
            }
            _ => Err(invalid("kind must be `k` or `range`")),
        }
    }
}

impl fmt::Display for PlaceholderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceholderSpec::Harmonic { harmonic, weight } => write!(f, "k:{harmonic}:{weight}"),
            PlaceholderSpec::Range {
                first,
                last,
                weight,
            } => write!(f, "range:{first}..={last}:{weight}"),
        }
    }
}

/// Parse a comma-separated list of placeholder specs.
///
/// # Errors
///
/// Returns `SpectralError::InvalidPlaceholder` on the first malformed entry.
///
/// # Examples
///
/// ```
/// use spectral_carrier::carrier::{parse_placeholders, PlaceholderSpec};
///
/// let specs = parse_placeholders("k:7:0.8, range:10..20:0.1").unwrap();
/// assert_eq!(specs[0], PlaceholderSpec::Harmonic { harmonic: 7, weight: 0.8 });
/// assert_eq!(specs[1].harmonics().count(), 10);
/// ```
pub fn parse_placeholders(list: &str) -> Result<Vec<PlaceholderSpec>> {
    list.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// Render placeholder components as a vector of dimension `dim`.
///
/// Harmonic `h` lands on bin `h * base` as a cosine of amplitude `weight`;
/// components on the same bin add. [`CarrierCodec::render_placeholders`]
/// runs this with the codec's transform.
///
/// # Errors
///
/// Returns `SpectralError::InvalidDimension` for `dim == 0` and
/// `SpectralError::InvalidPlaceholder` if a harmonic falls outside the
/// bins between DC and Nyquist.
///
/// [`CarrierCodec::render_placeholders`]: crate::carrier::CarrierCodec::render_placeholders
pub fn render_placeholders(
    specs: &[PlaceholderSpec],
    dim: usize,
    base: usize,
    transform: &dyn SpectralTransform,
) -> Result<Vector> {
    if dim == 0 {
        return Err(SpectralError::InvalidDimension(dim));
    }
    let max_bin = max_carrier_bin(dim);
    let half = dim as f64 / 2.0;
    let mut bins = vec![Complex64::new(0.0, 0.0); dim];

    for spec in specs {
        for h in spec.harmonics() {
            let bin = match h.checked_mul(base) {
                Some(bin) if bin != 0 && bin <= max_bin => bin,
                _ => {
                    return Err(SpectralError::InvalidPlaceholder(format!(
                        "{spec}: harmonic {h} at base {base} is outside bins 1..={max_bin} \
                         for dimension {dim}"
                    )))
                }
            };
            let coefficient = Complex64::new(spec.weight() * half, 0.0);
            bins[bin] += coefficient;
            bins[dim - bin] += coefficient;
        }
    }

    tracing::debug!(
        "Rendering {} placeholder components at dim {} (base {}) with {}",
        specs.len(),
        dim,
        base,
        transform.name()
    );
    transform.inverse(&SpectralCoefficients::new(bins)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{build_transform, TransformKind};
    use std::f64::consts::PI;

    fn render(specs: &[PlaceholderSpec], dim: usize, base: usize) -> Result<Vector> {
        render_placeholders(specs, dim, base, build_transform(TransformKind::Auto).as_ref())
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(
            "k:7:0.8".parse::<PlaceholderSpec>().unwrap(),
            PlaceholderSpec::Harmonic {
                harmonic: 7,
                weight: 0.8
            }
        );
        assert_eq!(
            "range:10..20:0.1".parse::<PlaceholderSpec>().unwrap(),
            PlaceholderSpec::Range {
                first: 10,
                last: 19,
                weight: 0.1
            }
        );
        assert_eq!(
            "range:10..=20:0.1".parse::<PlaceholderSpec>().unwrap().harmonics(),
            10..=20
        );
        assert_eq!("k:4:1".parse::<PlaceholderSpec>().unwrap().harmonics(), 4..=4);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "", "k", "k:7", "k:7:0.8:1", "q:7:0.8", "k:x:0.8", "k:0:1", "k:7:nan",
            "range:20..10:1", "range:5:1", "range:a..b:1", "k:-3:1", "range:5..5:1",
            "range:1..18446744073709551616:1", "k:18446744073709551616:1",
        ] {
            assert!(
                matches!(bad.parse::<PlaceholderSpec>(), Err(SpectralError::InvalidPlaceholder(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_parse_accepts_extreme_harmonics() {
        let max = usize::MAX;
        let spec: PlaceholderSpec = format!("range:1..={max}:0.1").parse().unwrap();
        assert_eq!(spec.harmonics(), 1..=max);
        let spec: PlaceholderSpec = format!("k:{max}:1").parse().unwrap();
        assert_eq!(spec.harmonics().count(), 1);
        let spec: PlaceholderSpec = format!("range:1..{max}:1").parse().unwrap();
        assert_eq!(spec.harmonics(), 1..=max - 1);
    }

    #[test]
    fn test_display_round_trip() {
        for s in ["k:7:0.8", "range:10..=20:0.1"] {
            let spec: PlaceholderSpec = s.parse().unwrap();
            assert_eq!(spec.to_string(), s);
        }
        let exclusive: PlaceholderSpec = "range:10..20:0.1".parse().unwrap();
        assert_eq!(exclusive.to_string(), "range:10..=19:0.1");
        assert_eq!(exclusive.to_string().parse::<PlaceholderSpec>().unwrap(), exclusive);
    }

    #[test]
    fn test_parse_list() {
        let specs = parse_placeholders("k:1:1,range:2..4:0.5,").unwrap();
        assert_eq!(specs.len(), 2);
        assert!(parse_placeholders("k:1:1,bogus").is_err());
    }

    #[test]
    fn test_render_single_cosine() {
        let dim = 64;
        let v = render(&["k:3:0.8".parse().unwrap()], dim, 2).unwrap();
        for (j, x) in v.iter().enumerate() {
            let expected = 0.8 * (2.0 * PI * 6.0 * j as f64 / dim as f64).cos();
            assert!((x - expected).abs() < 1e-12, "j={j}");
        }
    }

    #[test]
    fn test_render_rejects_out_of_range() {
        let spec = PlaceholderSpec::Harmonic {
            harmonic: 16,
            weight: 1.0,
        };
        // Bin 32 is Nyquist for N = 64.
        assert!(render(&[spec], 64, 2).is_err());
        assert!(render(&[spec], 64, 1).is_ok());
        assert!(render(&[spec], 0, 1).is_err());
        assert!(render(&[spec], 64, 0).is_err());

        for text in [
            format!("k:{}:1", usize::MAX),
            format!("k:{}:1", usize::MAX / 2 + 1),
            format!("range:1..={}:0.1", usize::MAX),
        ] {
            let spec: PlaceholderSpec = text.parse().unwrap();
            assert!(
                matches!(
                    render(&[spec], 64, 4),
                    Err(SpectralError::InvalidPlaceholder(_))
                ),
                "rendered {text}"
            );
        }
    }

    #[test]
    fn test_render_strategies_agree() {
        let specs = parse_placeholders("k:2:0.5,range:4..=9:0.25").unwrap();
        let auto = render(&specs, 90, 3).unwrap();
        for kind in [TransformKind::Dft, TransformKind::Bluestein] {
            let other = render_placeholders(&specs, 90, 3, build_transform(kind).as_ref()).unwrap();
            assert!(auto.rmse(&other).unwrap() < 1e-12);
        }
        assert!(render_placeholders(&specs, 90, 3, build_transform(TransformKind::Radix2).as_ref())
            .is_err());
    }
}
