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

use thiserror::Error;

/// Precondition failures surfaced by the perturbation engine.
///
/// Every variant corresponds to a programmer error (an invalid call),
/// never to a numerical anomaly — the engine's arithmetic is exact and
/// cannot itself fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("degree {degree} is out of range: must be in 1..={max_degree}")]
    DegreeOutOfRange { degree: usize, max_degree: usize },

    #[error("perturbation dimension {dimension} exceeds the supported maximum {max_dimension}")]
    DimensionOutOfRange { dimension: usize, max_dimension: usize },

    #[error("monomial count {count} for degree {degree} over {variables} variables exceeds the limit {limit}")]
    MonomialCountTooLarge {
        degree: usize,
        variables: usize,
        count: u64,
        limit: u64,
    },

    #[error("escalation did not resolve a nonzero sign within {levels} perturbation levels")]
    EscalationExhausted { levels: usize },
}
