// Copyright (C) 2024 The Perturb Authors
// This file is part of the sos-perturbation library.

// The sos-perturbation library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// The sos-perturbation library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with the sos-perturbation library. If not, see <https://www.gnu.org/licenses/>.

//! Small exact-arithmetic helpers shared by `crate::univariate` and
//! `crate::multivariate`. Everything here is exact: no floating point,
//! no approximation, ever.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::One;

/// `n!` as a `BigInt`. `n` is always a small perturbation degree or
/// dimension in practice, never large enough for this to matter for
/// performance.
pub fn factorial(n: u64) -> BigInt {
    (1..=n).map(BigInt::from).product::<BigInt>().max(BigInt::one())
}

/// `C(n, k)` for small `n, k` (multi-index components, each bounded by
/// `MAX_DEGREE`). Exact, via Pascal's triangle row-by-row, no overflow
/// risk at this scale.
pub fn small_binomial(n: u8, k: u8) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u64 = 1;
    for i in 0..k as u64 {
        result = result * (n as u64 - i) / (i + 1);
    }
    result
}

/// Divides `numerator` by `denominator`, asserting the division is
/// exact. Used where the calling algorithm's own correctness argument
/// guarantees an integer result; a nonzero remainder indicates a defect
/// upstream, not a legitimate numerical outcome.
pub fn exact_div(numerator: &BigInt, denominator: &BigInt) -> BigInt {
    let (quotient, remainder) = numerator.div_rem(denominator);
    debug_assert!(remainder.is_zero(), "expected exact division, got remainder {remainder}");
    quotient
}
