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

//! C4 — single-axis monomial coefficient recovery.
//!
//! Round one of escalation treats the predicate as a single-variable
//! polynomial in one perturbation parameter, with no constant term
//! (the nominal value is assumed already checked and discarded by the
//! caller). Given samples `f(1), f(2), ..., f(degree)` it recovers
//! every monomial coefficient at once, in place, with two triangular
//! passes over the same array:
//!
//! 1. A reversed pass (`k` from `degree - 1` down to `0`) solves the
//!    `(k+1) x (k+1)` truncated system via [`crate::vandermonde::lower_triangle`],
//!    isolating the degree-`(k+1)` Newton coefficient at nodes `1..=k+1`.
//! 2. A forward pass (`k` from `0` to `degree - 1`) expands each
//!    Newton coefficient into the monomial basis via
//!    [`crate::vandermonde::sigma`], the same signed Stirling numbers
//!    `crate::multivariate` uses per axis.
//!
//! The caller scans the result from index `0` upward: the lowest
//! surviving power of the round's infinitesimal dominates, since every
//! later perturbation level is infinitesimal relative to it.

use num_bigint::BigInt;

use crate::bigmath::{exact_div, factorial};
use crate::vandermonde::{lower_triangle, sigma, MAX_DEGREE};
use crate::Error;

/// Every monomial coefficient of the degree-`samples.len()` polynomial
/// sampled at `samples = [f(1), ..., f(degree)]`; `result[k]` is the
/// coefficient of `t^(k+1)`.
///
/// Requires `1 <= samples.len() <= MAX_DEGREE`.
pub fn monomial_coefficients(samples: &[BigInt]) -> Result<Vec<BigInt>, Error> {
    let degree = samples.len();
    if degree == 0 || degree > MAX_DEGREE {
        return Err(Error::DegreeOutOfRange { degree, max_degree: MAX_DEGREE });
    }

    let mut a: Vec<BigInt> = samples.to_vec();

    // Pass 1: reversed triangular solve. At the time index `k` is
    // written, every `a[i]` with `i < k` still holds its original
    // sample — this pass only ever writes to `a[k]`.
    for k in (0..degree).rev() {
        let mut value = BigInt::from(0);
        for (i, sample) in a.iter().enumerate().take(k + 1) {
            value += BigInt::from(lower_triangle(k + 1, i + 1)) * sample;
        }
        a[k] = exact_div(&value, &factorial((k + 1) as u64));
    }

    // Pass 2: forward triangular solve, expanding each Newton
    // coefficient into the monomials it contributes to below it.
    for k in 0..degree {
        let contribution = a[k].clone();
        for i in 0..k {
            a[i] += BigInt::from(sigma(k + 1, i + 1)) * &contribution;
        }
    }

    Ok(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples_of(coeffs: &[i64]) -> Vec<BigInt> {
        // Evaluate sum(coeffs[i] * t^(i+1)) at t = 1..=coeffs.len().
        (1..=coeffs.len())
            .map(|t| {
                coeffs
                    .iter()
                    .enumerate()
                    .map(|(i, c)| BigInt::from(*c) * BigInt::from(t as i64).pow((i + 1) as u32))
                    .sum()
            })
            .collect()
    }

    #[test]
    fn recovers_linear_coefficient() {
        let samples = samples_of(&[7]);
        assert_eq!(monomial_coefficients(&samples).unwrap(), vec![BigInt::from(7)]);
    }

    #[test]
    fn recovers_quadratic_coefficients() {
        let samples = samples_of(&[3, -5]);
        assert_eq!(monomial_coefficients(&samples).unwrap(), vec![BigInt::from(3), BigInt::from(-5)]);
    }

    #[test]
    fn recovers_cubic_coefficients() {
        let samples = samples_of(&[1, 2, 9]);
        assert_eq!(
            monomial_coefficients(&samples).unwrap(),
            vec![BigInt::from(1), BigInt::from(2), BigInt::from(9)]
        );
    }

    #[test]
    fn zero_coefficient_in_the_middle_is_recovered_exactly() {
        // f(t) = 4t + 0*t^2 + 6t^3: the degree-2 coefficient must come
        // back exactly zero, not some artifact of the truncated solve.
        let samples = samples_of(&[4, 0, 6]);
        assert_eq!(
            monomial_coefficients(&samples).unwrap(),
            vec![BigInt::from(4), BigInt::from(0), BigInt::from(6)]
        );
    }

    #[test]
    fn higher_degree_term_does_not_alias_into_lower_coefficients() {
        // A pure quartic term must not leak a spurious value into the
        // lower-degree coefficients once all four samples are in hand.
        let samples = samples_of(&[0, 0, 0, 5]);
        assert_eq!(
            monomial_coefficients(&samples).unwrap(),
            vec![BigInt::from(0), BigInt::from(0), BigInt::from(0), BigInt::from(5)]
        );
    }

    #[test]
    fn rejects_oversized_request() {
        let samples = vec![BigInt::from(0); MAX_DEGREE + 1];
        assert!(monomial_coefficients(&samples).is_err());
    }
}
