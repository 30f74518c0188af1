// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Bluestein (chirp-z) transform for arbitrary dimensions.
//!
//! Rewrites `j*k = (j^2 + k^2 - (k-j)^2) / 2`, turning the length-N DFT into
//! a circular convolution that is evaluated with a power-of-two radix-2 FFT
//! of length `M >= 2N - 1`:
//!
//! ```text
//! X[k] = b[k] * sum_j (x[j] * b[j]) * conj(b[k - j]),   b[t] = exp(s*i*pi*t^2/N)
//! ```
//!
//! Chirp phases use `t^2 mod 2N`, which keeps every angle in `[0, 2*pi)`
//! regardless of N.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::error::Result;
use crate::transform::radix2::fft_in_place;
use crate::transform::{check_len, Direction, SpectralTransform};

/// Chirp-z transform, O(N log N) for every N.
#[derive(Debug, Clone, Copy, Default)]
pub struct BluesteinTransform;

impl SpectralTransform for BluesteinTransform {
    fn name(&self) -> &'static str {
        "bluestein"
    }

    fn supports(&self, dim: usize) -> bool {
        dim > 0
    }

    fn process(&self, buffer: &mut [Complex64], direction: Direction) -> Result<()> {
        let n = buffer.len();
        check_len(self.name(), n, self.supports(n))?;
        if n == 1 {
            return Ok(());
        }

        let chirp = chirp(n, direction);
        let m = (2 * n - 1).next_power_of_two();

        let mut a = vec![Complex64::new(0.0, 0.0); m];
        for ((slot, x), b) in a.iter_mut().zip(buffer.iter()).zip(&chirp) {
            *slot = x * b;
        }

        let mut h = vec![Complex64::new(0.0, 0.0); m];
        h[0] = chirp[0].conj();
        for t in 1..n {
            let value = chirp[t].conj();
            h[t] = value;
            h[m - t] = value;
        }

        fft_in_place(&mut a, Direction::Forward);
        fft_in_place(&mut h, Direction::Forward);
        for (x, y) in a.iter_mut().zip(&h) {
            *x *= *y;
        }
        fft_in_place(&mut a, Direction::Inverse);

        let scale = 1.0 / m as f64;
        for ((out, conv), b) in buffer.iter_mut().zip(&a).zip(&chirp) {
            *out = conv * b * scale;
        }
        Ok(())
    }
}

/// `b[t] = exp(sign * i * pi * (t^2 mod 2n) / n)` for `t` in `0..n`.
fn chirp(n: usize, direction: Direction) -> Vec<Complex64> {
    let two_n = 2 * n as u128;
    (0..n)
        .map(|t| {
            let t = t as u128;
            let phase = (t * t) % two_n;
            let angle = direction.sign() * PI * phase as f64 / n as f64;
            Complex64::from_polar(1.0, angle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::DftTransform;
    use crate::vector::Vector;

    #[test]
    fn test_matches_direct_dft() {
        for n in [2usize, 3, 5, 12, 17, 100, 243] {
            let v = Vector::new((0..n).map(|i| ((i * i) % 13) as f64 - 6.0).collect()).unwrap();
            let fast = BluesteinTransform.forward(&v).unwrap();
            let slow = DftTransform.forward(&v).unwrap();
            for (a, b) in fast.as_slice().iter().zip(slow.as_slice()) {
                assert!((a - b).norm() < 1e-9, "n={n}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_roundtrip_large_odd_size() {
        let n = 1500;
        let v = Vector::new((0..n).map(|i| (i as f64 * 0.731).sin()).collect()).unwrap();
        let back = BluesteinTransform
            .inverse(&BluesteinTransform.forward(&v).unwrap())
            .unwrap();
        assert!(v.rmse(&back).unwrap() < 1e-11);
    }

    #[test]
    fn test_chirp_is_unit_modulus() {
        for c in chirp(37, Direction::Forward) {
            assert!((c.norm() - 1.0).abs() < 1e-15);
        }
    }
}
