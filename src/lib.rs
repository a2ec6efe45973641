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

//! A black-box symbolic perturbation engine for exact geometric
//! predicates.
//!
//! Geometric predicates (orientation, in-circle, in-sphere, and the
//! like) are exact integer- or rational-valued functions that occasionally
//! evaluate to zero on inputs that are not truly special — points that
//! are merely close to collinear, for instance, rather than exactly so.
//! [`perturbed_sign`] resolves that zero into the sign the predicate
//! would have under an infinitesimal, symbolic perturbation of the
//! input, in the manner of Edelsbrunner and Mucke's Simulation of
//! Simplicity: deterministic, seed-free, and consistent across repeated
//! calls on the same points.
//!
//! Everything here is exact arbitrary-precision arithmetic
//! (`num-bigint`, `num-rational`); there is no floating point anywhere
//! in the crate, and no result is ever an approximation.
//!
//! ```
//! use num_bigint::BigInt;
//! use sos_perturbation::{perturbed_sign, Point};
//!
//! // Twice the signed area of a triangle: zero exactly when collinear.
//! let orientation = |coords: &[[i64; 2]]| {
//!     let [a, b, c] = [coords[0], coords[1], coords[2]];
//!     let ax = BigInt::from(b[0] - a[0]);
//!     let ay = BigInt::from(b[1] - a[1]);
//!     let bx = BigInt::from(c[0] - a[0]);
//!     let by = BigInt::from(c[1] - a[1]);
//!     ax * by - ay * bx
//! };
//!
//! let points = vec![Point::new(0, [0, 0]), Point::new(1, [1, 1]), Point::new(2, [2, 2])];
//! let sign = perturbed_sign(&points, 2, orientation).unwrap();
//! assert_ne!(sign, 0);
//! ```

mod bigmath;
mod driver;
mod error;
mod monomial;
mod multivariate;
mod point;
mod prng;
mod univariate;
mod vandermonde;

pub use driver::perturbed_sign;
pub use error::Error;
pub use monomial::{monomials, MonomialTable, MAX_MONOMIALS};
pub use point::{Point, Vector};
pub use vandermonde::MAX_DEGREE;

/// Maximum number of geometric coordinates (`M` in `Point<M>`) the
/// perturbation PRNG supports. Fixed by [`crate::prng::perturbation`]
/// packing four independent 32-bit fields out of one 128-bit Threefry
/// block.
pub const MAX_DIMENSION: usize = 4;

/// `log2` of the half-width of each perturbation component: every
/// coordinate `perturbation` produces lies in `[-2^LOG_BOUND,
/// 2^LOG_BOUND)`. Chosen so a field of `LOG_BOUND + 1` bits fits inside
/// the 32-bit slice the PRNG allots each coordinate, with headroom to
/// spare.
pub const LOG_BOUND: u32 = 24;
