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

//! C6 — the escalation driver, `perturbed_sign`.
//!
//! The caller's predicate is an exact integer-valued function of the
//! points' coordinates: a determinant, an orientation test, an in-sphere
//! test, anything that can degenerate to zero. `perturbed_sign` resolves
//! that zero into a definite sign by nesting infinitesimal perturbations
//! `eps_1 >> eps_2 >> ... >> eps_d`, escalating `d` as far as needed —
//! even a single input point can require many levels, since every level
//! is its own fresh perturbation keyed by `(level, id)`, not by how many
//! points were passed in. Unlike a scheme that dedicates one infinitesimal
//! to one point, every level perturbs *every* point at once, just with a
//! distinct perturbation vector per point (keyed by that point's own
//! id, never by its position in the slice):
//!
//! 1. If the predicate is already nonzero at the nominal coordinates,
//!    its sign is the answer — no perturbation needed.
//! 2. Otherwise, shift every point `i` by `t * Y(1, i)` for a single
//!    formal variable `t`, and look for a nonzero coefficient in the
//!    resulting single-variable polynomial (the `crate::univariate`
//!    fast path, levels `t = 1, ..., degree`).
//! 3. If that is identically zero up to `degree`, escalate: introduce
//!    level 2 (every point additionally shifted by `Y(2, i)`), enumerate
//!    the simplex of multi-indices `crate::monomial` produces, and look
//!    for a nonzero coefficient via `crate::multivariate`. Keep adding
//!    levels until one is found.
//!
//! Because perturbation vectors are themselves uniformly random (for
//! practical purposes) and independent across levels, escalation is
//! guaranteed to terminate almost surely long before the table-generation
//! limit is reached; [`Error::EscalationExhausted`] firing in practice
//! signals a bug rather than a genuine geometric tie.

use num_bigint::{BigInt, Sign};

use crate::monomial::monomials;
use crate::multivariate::monomial_coefficients as multivariate_coefficients;
use crate::point::{add_scaled, Point, Vector};
use crate::prng::perturbation;
use crate::univariate::monomial_coefficients as univariate_coefficients;
use crate::Error;

fn sign_of(value: &BigInt) -> i32 {
    match value.sign() {
        Sign::Minus => -1,
        Sign::NoSign => 0,
        Sign::Plus => 1,
    }
}

/// Coordinates of every input point shifted by `sum_v exponents[v] *
/// Y(v + 1, point.id)`, `Y(level, id)` being that point's own
/// perturbation vector at `level` (`crate::prng::perturbation`).
///
/// Every point receives every level — there is no notion of "the point
/// introduced at level `v`" here, so the result (and hence
/// `perturbed_sign`'s answer) does not depend on the order `points` is
/// given in, only on the set of `(id, coordinate)` pairs it contains.
fn apply_perturbation<const M: usize>(points: &[Point<M>], exponents: &[u8]) -> Result<Vec<Vector<M>>, Error> {
    let mut coords: Vec<Vector<M>> = points.iter().map(|p| p.coord).collect();
    for (point_index, point) in points.iter().enumerate() {
        for (level_minus_one, &exponent) in exponents.iter().enumerate() {
            if exponent == 0 {
                continue;
            }
            let vector = perturbation::<M>((level_minus_one + 1) as u64, point.id)?;
            coords[point_index] = add_scaled(&coords[point_index], &vector, exponent as i64);
        }
    }
    Ok(coords)
}

#[cfg(debug_assertions)]
fn assert_unique_ids<const M: usize>(points: &[Point<M>]) {
    let mut seen = std::collections::HashSet::with_capacity(points.len());
    for p in points {
        debug_assert!(seen.insert(p.id), "duplicate point id {} in perturbed_sign call", p.id);
    }
}

/// Resolves the sign of `predicate(points)` exactly, breaking any tie at
/// the nominal coordinates via deterministic symbolic perturbation.
///
/// `degree` bounds the total degree of `predicate` as a polynomial in
/// the perturbation parameters; it must be in `1..=MAX_DEGREE`.
///
/// `predicate` must be a pure function: calling it twice with the same
/// coordinates always returns the same value. Point ids must be
/// pairwise distinct (checked in debug builds only, per spec).
///
/// A caller that already knows `predicate(points)` is zero at the
/// nominal coordinates may skip evaluating it again; this function
/// checks anyway, since the univariate and multivariate recovery
/// passes below both assume a zero constant term and would otherwise
/// alias a nonzero one into a spurious low-degree coefficient.
#[tracing::instrument(level = "debug", skip(points, predicate))]
pub fn perturbed_sign<const M: usize>(
    points: &[Point<M>],
    degree: usize,
    predicate: impl Fn(&[Vector<M>]) -> BigInt,
) -> Result<i32, Error> {
    #[cfg(debug_assertions)]
    assert_unique_ids(points);

    if degree == 0 || degree > crate::vandermonde::MAX_DEGREE {
        return Err(Error::DegreeOutOfRange { degree, max_degree: crate::vandermonde::MAX_DEGREE });
    }

    let nominal_coords: Vec<Vector<M>> = points.iter().map(|p| p.coord).collect();
    let nominal = predicate(&nominal_coords);
    if !num_traits::Zero::is_zero(&nominal) {
        tracing::debug!("resolved at nominal coordinates, no perturbation needed");
        return Ok(sign_of(&nominal));
    }

    // Round-1 fast path: every point shifts by t * Y(1, id), t = 1,
    // ..., degree, recovering every single-axis coefficient at once.
    // The lowest surviving power of `eps_1` dominates, so the array is
    // scanned from index 0 (degree 1) upward.
    {
        let mut samples = Vec::with_capacity(degree);
        for t in 1..=degree as u8 {
            let coords = apply_perturbation(points, &[t])?;
            samples.push(predicate(&coords));
        }
        let coeffs = univariate_coefficients(&samples)?;
        if let Some((k, coeff)) = coeffs.iter().enumerate().find(|(_, c)| !num_traits::Zero::is_zero(c)) {
            tracing::debug!(level = 1, power = k + 1, "resolved by single-axis escalation");
            return Ok(sign_of(coeff));
        }
    }

    // Escalate: introduce one more level at a time, every point
    // picking up its own fresh perturbation vector at the new level,
    // weighted by the multi-index a simplex row of `monomials` gives.
    // Escalation depth is unbounded in principle (spec: a predicate can
    // require round-`k` escalation against a single input point, since
    // every level is keyed by `(level, id)` and never by how many
    // distinct points were passed in), so this loop is not capped by
    // `points.len()` — it runs out to the table-generation limit itself.
    for levels in 2..=crate::vandermonde::MAX_DEGREE {
        tracing::debug!(levels, "escalating to multivariate round");
        let table = monomials(degree, levels)?;
        let values: Result<Vec<BigInt>, Error> = table
            .rows
            .iter()
            .map(|alpha| {
                let coords = apply_perturbation(points, alpha)?;
                Ok(predicate(&coords))
            })
            .collect();
        let values = values?;
        let coeffs = multivariate_coefficients(&table, &values);

        // Infinitesimal size order: `alpha` dominates `beta` when,
        // scanned from the highest (most recently introduced, most
        // infinitesimal) level down, the first differing entry of
        // `alpha` is smaller — i.e. the reversed tuple is
        // lexicographically least. `eps_levels` is vastly smaller than
        // every level introduced before it, so a low exponent on it
        // outweighs any exponent on earlier levels.
        let winner = table
            .rows
            .iter()
            .zip(coeffs.iter())
            .filter(|(_, c)| !num_traits::Zero::is_zero(*c))
            .min_by(|(a, _), (b, _)| a.iter().rev().cmp(b.iter().rev()));

        if let Some((alpha, coeff)) = winner {
            debug_assert!(!num_traits::Zero::is_zero(coeff));
            debug_assert!(
                alpha[levels - 1] > 0,
                "a round-{levels} winner must actually depend on this round's own level"
            );
            return Ok(sign_of(coeff.numer()) * sign_of(coeff.denom()));
        }
    }

    Err(Error::EscalationExhausted { levels: crate::vandermonde::MAX_DEGREE })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orientation_2d(coords: &[Vector<2>]) -> BigInt {
        // Twice the signed area of the triangle formed by three 2D points.
        let [a, b, c] = [coords[0], coords[1], coords[2]];
        let ax = BigInt::from(b[0] - a[0]);
        let ay = BigInt::from(b[1] - a[1]);
        let bx = BigInt::from(c[0] - a[0]);
        let by = BigInt::from(c[1] - a[1]);
        ax * by - ay * bx
    }

    #[test]
    fn nondegenerate_case_needs_no_perturbation() {
        let points = vec![
            Point::new(0, [0, 0]),
            Point::new(1, [4, 0]),
            Point::new(2, [0, 4]),
        ];
        let sign = perturbed_sign(&points, 2, orientation_2d).unwrap();
        assert_eq!(sign, 1);
    }

    #[test]
    fn collinear_case_resolves_to_nonzero_sign() {
        let points = vec![
            Point::new(10, [0, 0]),
            Point::new(11, [1, 1]),
            Point::new(12, [2, 2]),
        ];
        let sign = perturbed_sign(&points, 2, orientation_2d).unwrap();
        assert_ne!(sign, 0);
    }

    #[test]
    fn collinear_case_is_deterministic_across_calls() {
        let points = vec![
            Point::new(20, [0, 0]),
            Point::new(21, [3, 3]),
            Point::new(22, [6, 6]),
        ];
        let first = perturbed_sign(&points, 2, orientation_2d).unwrap();
        let second = perturbed_sign(&points, 2, orientation_2d).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn collinear_case_is_independent_of_argument_order() {
        // Every point carries its own perturbation vectors keyed by id,
        // not by slice position, so permuting the input slice changes
        // only which predicate value is computed (a genuine determinant
        // antisymmetry under a row swap), not which perturbation vectors
        // any point receives.
        let a = Point::new(40, [0, 0]);
        let b = Point::new(41, [1, 1]);
        let c = Point::new(42, [2, 2]);

        let forward = perturbed_sign(&[a, b, c], 2, orientation_2d).unwrap();
        let swapped = perturbed_sign(&[b, a, c], 2, orientation_2d).unwrap();
        assert_eq!(forward, -swapped);
    }

    #[test]
    fn rejects_degree_out_of_range() {
        let points = vec![Point::new(0, [0, 0]), Point::new(1, [1, 0]), Point::new(2, [2, 0])];
        assert!(perturbed_sign(&points, 0, orientation_2d).is_err());
    }
}
