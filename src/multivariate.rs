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

//! C5 — multivariate monomial coefficient recovery.
//!
//! Escalation rounds beyond the first treat the predicate as a
//! polynomial in several perturbation parameters at once. Given its
//! values on the simplex grid of multi-indices produced by
//! `crate::monomial`, this module recovers every monomial coefficient
//! exactly, in two passes:
//!
//! 1. Mixed forward differences `N(alpha) = Delta^alpha g(0)` at every
//!    grid point, via the standard inclusion-exclusion box sum over
//!    `beta <= alpha` (componentwise). Dividing by `alpha!` gives the
//!    coefficient of `g` in the axis-separable falling-factorial basis
//!    `prod_i y_i^(alpha_i)` — the multivariate Newton form.
//! 2. Expanding each falling factorial into monomials one axis at a
//!    time via `crate::vandermonde::sigma` (the same signed Stirling
//!    numbers used by the univariate case, applied per coordinate).

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use crate::bigmath::{factorial, small_binomial};
use crate::monomial::MonomialTable;
use crate::vandermonde::sigma;

fn le_componentwise(beta: &[u8], alpha: &[u8]) -> bool {
    beta.iter().zip(alpha).all(|(b, a)| b <= a)
}

fn ge_componentwise(alpha: &[u8], gamma: &[u8]) -> bool {
    alpha.iter().zip(gamma).all(|(a, g)| a >= g)
}

/// `Delta^alpha g(0)`, the mixed forward difference of `g` at the
/// origin, computed from `values` (indexed the same way as
/// `table.rows`).
fn mixed_difference(table: &MonomialTable, values: &[BigInt], alpha: &[u8]) -> BigInt {
    let mut total = BigInt::zero();
    for (j, beta) in table.rows.iter().enumerate() {
        if !le_componentwise(beta, alpha) {
            continue;
        }
        let mut weight: i64 = 1;
        let mut distance: u32 = 0;
        for (a, b) in alpha.iter().zip(beta) {
            weight *= small_binomial(*a, *b) as i64;
            distance += (a - b) as u32;
        }
        if distance % 2 == 1 {
            weight = -weight;
        }
        total += BigInt::from(weight) * &values[j];
    }
    total
}

/// The monomial coefficient of `gamma`, given `g`'s values on the full
/// simplex grid described by `table`.
fn monomial_coefficient(table: &MonomialTable, newton: &[BigRational], gamma: &[u8]) -> BigRational {
    let mut total = BigRational::zero();
    for (i, alpha) in table.rows.iter().enumerate() {
        if !ge_componentwise(alpha, gamma) {
            continue;
        }
        let mut factor = BigRational::from_integer(BigInt::from(1));
        for (a, g) in alpha.iter().zip(gamma) {
            let s = sigma(*a as usize, *g as usize);
            factor *= BigRational::from_integer(BigInt::from(s));
        }
        total += &newton[i] * factor;
    }
    total
}

/// Every monomial coefficient of `g`, in the same row order as `table`.
///
/// `values[j]` must be `g` evaluated at `table.rows[j]`.
pub fn monomial_coefficients(table: &MonomialTable, values: &[BigInt]) -> Vec<BigRational> {
    debug_assert_eq!(table.rows.len(), values.len());

    let newton: Vec<BigRational> = table
        .rows
        .iter()
        .map(|alpha| {
            let n = mixed_difference(table, values, alpha);
            let denom: BigInt = alpha.iter().map(|&a| factorial(a as u64)).product();
            BigRational::new(n, denom)
        })
        .collect();

    table.rows.iter().map(|gamma| monomial_coefficient(table, &newton, gamma)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monomial::monomials;

    fn eval(alpha: &[u8], row: &[u8]) -> BigInt {
        // g(y) = prod_i y_i^(alpha_i), a single pure monomial, for a
        // controlled round-trip check.
        let mut acc = BigInt::from(1);
        for (a, y) in alpha.iter().zip(row) {
            acc *= BigInt::from(*y as i64).pow(*a as u32);
        }
        acc
    }

    #[test]
    fn recovers_pure_monomial_coefficient() {
        let table = monomials(3, 2).unwrap();
        let target = vec![1u8, 2u8];
        let values: Vec<BigInt> = table.rows.iter().map(|row| eval(&target, row)).collect();

        let coeffs = monomial_coefficients(&table, &values);
        let target_pos = table.position_of(&target).unwrap();
        assert_eq!(coeffs[target_pos], BigRational::from_integer(BigInt::from(1)));

        for (row, coeff) in table.rows.iter().zip(&coeffs) {
            if row != &target {
                assert!(coeff.is_zero(), "unexpected nonzero coefficient at {row:?}: {coeff}");
            }
        }
    }

    #[test]
    fn recovers_sum_of_monomials() {
        let table = monomials(2, 2).unwrap();
        let a = vec![1u8, 0u8];
        let b = vec![0u8, 2u8];
        let values: Vec<BigInt> = table
            .rows
            .iter()
            .map(|row| BigInt::from(3) * eval(&a, row) + BigInt::from(-1) * eval(&b, row))
            .collect();

        let coeffs = monomial_coefficients(&table, &values);
        assert_eq!(coeffs[table.position_of(&a).unwrap()], BigRational::from_integer(BigInt::from(3)));
        assert_eq!(coeffs[table.position_of(&b).unwrap()], BigRational::from_integer(BigInt::from(-1)));
    }

    #[test]
    fn constant_function_has_only_constant_term() {
        let table = monomials(2, 3).unwrap();
        let values: Vec<BigInt> = table.rows.iter().map(|_| BigInt::from(5)).collect();
        let coeffs = monomial_coefficients(&table, &values);
        let zero = vec![0u8, 0u8, 0u8];
        assert_eq!(coeffs[table.position_of(&zero).unwrap()], BigRational::from_integer(BigInt::from(5)));
        for (row, coeff) in table.rows.iter().zip(&coeffs) {
            if row != &zero {
                assert!(coeff.is_zero());
            }
        }
    }
}
