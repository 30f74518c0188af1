// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Radix-2 Cooley-Tukey transform (in-place, decimation-in-time).
//!
//! O(N log N) for power-of-two N. Twiddles are drawn from one table of
//! size N/2 computed directly from the angle, so no error accumulates across
//! stages the way a running product would.

use num_complex::Complex64;

use crate::error::Result;
use crate::transform::{check_len, twiddles, Direction, SpectralTransform};

/// Iterative radix-2 FFT for power-of-two dimensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Radix2Transform;

impl SpectralTransform for Radix2Transform {
    fn name(&self) -> &'static str {
        "radix2"
    }

    fn supports(&self, dim: usize) -> bool {
        dim.is_power_of_two()
    }

    fn process(&self, buffer: &mut [Complex64], direction: Direction) -> Result<()> {
        let n = buffer.len();
        check_len(self.name(), n, self.supports(n))?;
        fft_in_place(buffer, direction);
        Ok(())
    }
}

/// Radix-2 butterfly network. `data.len()` must be a power of two.
pub(crate) fn fft_in_place(data: &mut [Complex64], direction: Direction) {
    let n = data.len();
    debug_assert!(n.is_power_of_two());
    if n == 1 {
        return;
    }

    bit_reverse_permute(data);

    let table = twiddles(n, n / 2, direction);
    let mut stage_len = 2;
    while stage_len <= n {
        let half = stage_len / 2;
        let stride = n / stage_len;

        for start in (0..n).step_by(stage_len) {
            for j in 0..half {
                let w = table[j * stride];
                let even = data[start + j];
                let odd = data[start + j + half] * w;
                data[start + j] = even + odd;
                data[start + j + half] = even - odd;
            }
        }
        stage_len *= 2;
    }
}

fn bit_reverse_permute(data: &mut [Complex64]) {
    let n = data.len();
    let bits = n.trailing_zeros();
    for i in 0..n {
        let j = bit_reverse(i, bits);
        if i < j {
            data.swap(i, j);
        }
    }
}

#[inline]
fn bit_reverse(mut x: usize, bits: u32) -> usize {
    let mut result = 0usize;
    for _ in 0..bits {
        result = (result << 1) | (x & 1);
        x >>= 1;
    }
    result
}
