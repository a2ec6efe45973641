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

//! C2 — monomial enumeration for the escalation rounds.
//!
//! [`monomials`] lists every multi-index `alpha` of `variables` entries
//! with `|alpha| <= degree`, ordered by ascending total degree and, within
//! a degree, by the odometer traversal a nested-loop enumeration
//! naturally produces. The resulting [`MonomialTable`] also carries a
//! flat-index map from multi-index to row position, needed by the
//! divided-difference pass in `crate::multivariate` to find a row's
//! "child" in O(1).

use std::collections::HashMap;

use crate::Error;

/// Rows above this count are refused outright — see spec §4.2.
pub const MAX_MONOMIALS: u64 = 1 << 20;

/// A dense table of multi-indices, sorted by ascending total degree.
#[derive(Debug, Clone)]
pub struct MonomialTable {
    /// Number of perturbation variables (columns).
    pub variables: usize,
    /// Rows, each of length `variables`, summing to at most `degree`.
    pub rows: Vec<Vec<u8>>,
    index: HashMap<Vec<u8>, usize>,
}

impl MonomialTable {
    /// Row position of a multi-index, if present.
    pub fn position_of(&self, alpha: &[u8]) -> Option<usize> {
        self.index.get(alpha).copied()
    }
}

/// `C(n, k)`, saturating at `u64::MAX` rather than overflowing — only
/// used to reject oversized requests before any allocation happens.
fn binomial(n: u64, k: u64) -> u64 {
    let k = k.min(n.saturating_sub(k));
    let mut result: u64 = 1;
    for i in 0..k {
        result = match result.checked_mul(n - i) {
            Some(v) => v / (i + 1),
            None => return u64::MAX,
        };
    }
    result
}

/// Enumerates every multi-index of `variables` nonnegative entries
/// summing exactly to `total`, via the odometer-style recursion noted in
/// spec §9 ("any equivalent iterator/generator producing the required
/// ordering is acceptable").
fn enumerate_exact_degree(total: u8, variables: usize, out: &mut Vec<Vec<u8>>) {
    fn recurse(remaining: u8, vars_left: usize, current: &mut Vec<u8>, out: &mut Vec<Vec<u8>>) {
        if vars_left == 1 {
            current.push(remaining);
            out.push(current.clone());
            current.pop();
            return;
        }
        for v in 0..=remaining {
            current.push(v);
            recurse(remaining - v, vars_left - 1, current, out);
            current.pop();
        }
    }

    if variables == 0 {
        return;
    }
    let mut current = Vec::with_capacity(variables);
    recurse(total, variables, &mut current, out);
}

/// Builds the monomial table for `degree` and `variables`, rejecting
/// requests whose row count would exceed [`MAX_MONOMIALS`].
///
/// The zero-variable case returns a table with zero rows (spec §4.2).
pub fn monomials(degree: usize, variables: usize) -> Result<MonomialTable, Error> {
    if variables == 0 {
        return Ok(MonomialTable {
            variables: 0,
            rows: Vec::new(),
            index: HashMap::new(),
        });
    }

    let count = binomial((degree + variables) as u64, degree as u64);
    if count > MAX_MONOMIALS {
        return Err(Error::MonomialCountTooLarge {
            degree,
            variables,
            count,
            limit: MAX_MONOMIALS,
        });
    }

    let mut rows = Vec::with_capacity(count as usize);
    for total in 0..=degree {
        enumerate_exact_degree(total as u8, variables, &mut rows);
    }

    let mut index = HashMap::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        index.insert(row.clone(), i);
    }

    Ok(MonomialTable { variables, rows, index })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_count_matches_binomial_coefficient() {
        for degree in 0..6 {
            for variables in 1..5 {
                let table = monomials(degree, variables).unwrap();
                assert_eq!(table.rows.len() as u64, binomial((degree + variables) as u64, degree as u64));
            }
        }
    }

    #[test]
    fn first_row_is_zero_multi_index() {
        let table = monomials(3, 2).unwrap();
        assert_eq!(table.rows[0], vec![0, 0]);
    }

    #[test]
    fn rows_are_distinct() {
        let table = monomials(4, 3).unwrap();
        let set: std::collections::HashSet<_> = table.rows.iter().cloned().collect();
        assert_eq!(set.len(), table.rows.len());
    }

    #[test]
    fn rows_sorted_by_ascending_total_degree() {
        let table = monomials(4, 3).unwrap();
        let mut last = 0u32;
        for row in &table.rows {
            let total: u32 = row.iter().map(|&x| x as u32).sum();
            assert!(total >= last);
            last = total;
        }
    }

    #[test]
    fn zero_variables_returns_zero_rows() {
        let table = monomials(3, 0).unwrap();
        assert_eq!(table.rows.len(), 0);
    }

    #[test]
    fn oversized_request_is_rejected() {
        assert!(monomials(200, 4).is_err());
    }

    #[test]
    fn index_lookup_round_trips() {
        let table = monomials(5, 3).unwrap();
        for (i, row) in table.rows.iter().enumerate() {
            assert_eq!(table.position_of(row), Some(i));
        }
    }
}
