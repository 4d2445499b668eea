/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Pure arithmetic helpers: GCD and checked binomial coefficient.
//!
//! These are free functions rather than methods so they can be used and tested
//! independently of the [`AllocationTable`](super::AllocationTable).

use crate::error::AllocationError;

/// Iterative Euclidean GCD.  Returns the other operand when one input is `0`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Checked binomial coefficient `C(n, k)`.
///
/// Builds `C(n, i + 1) = C(n, i) * (n - i) / (i + 1)` step by step.  The
/// running value and the divisor are reduced by their GCD before the
/// multiplication, so every intermediate stays exact and the only possible
/// failure is a genuine overflow of the result, reported as
/// `Err(AllocationError::Overflow)`.
///
/// Returns `Ok(0)` when `k > n`.
pub fn binomial(n: usize, k: usize) -> Result<u64, AllocationError> {
    if k > n {
        return Ok(0);
    }
    let k_small = k.min(n - k);
    let overflow = AllocationError::Overflow {
        n_loops: n,
        n_channels: k,
    };

    let mut acc: u64 = 1;
    for i in 0..k_small {
        let num = (n - i) as u64;
        let den = (i + 1) as u64;

        let g = gcd(acc, den);
        let acc_r = acc / g;
        let den_r = den / g;
        // den_r is coprime to acc_r and divides acc_r * num, so it divides num
        let num_r = num / den_r;

        acc = acc_r.checked_mul(num_r).ok_or_else(|| overflow.clone())?;
    }
    Ok(acc)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
