// SPDX-License-Identifier: MIT
// Copyright 2026 Tyler Zervas

//! Direct O(N^2) DFT, the reference path for every dimension.
//!
//! The twiddle for `j*k` is looked up as `table[(j*k) mod N]`, so every
//! kernel value comes from an angle in `[0, 2*pi)` rather than from a large
//! argument to `sin`/`cos`.

use num_complex::Complex64;

use crate::error::Result;
use crate::transform::{check_len, twiddles, Direction, SpectralTransform};

/// Direct summation DFT.
#[derive(Debug, Clone, Copy, Default)]
pub struct DftTransform;

impl SpectralTransform for DftTransform {
    fn name(&self) -> &'static str {
        "dft"
    }

    fn supports(&self, dim: usize) -> bool {
        dim > 0
    }

    fn process(&self, buffer: &mut [Complex64], direction: Direction) -> Result<()> {
        let n = buffer.len();
        check_len(self.name(), n, self.supports(n))?;

        let table = twiddles(n, n, direction);
        let input = buffer.to_vec();
        for (k, out) in buffer.iter_mut().enumerate() {
            let mut acc = Complex64::new(0.0, 0.0);
            let mut idx = 0usize;
            for x in &input {
                acc += x * table[idx];
                idx += k;
                if idx >= n {
                    idx -= n;
                }
            }
            *out = acc;
        }
        Ok(())
    }
}
