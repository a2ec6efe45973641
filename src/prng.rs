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

//! C1 — deterministic, counter-based perturbation vectors.
//!
//! [`perturbation`] is a pure function of `(level, id)`: no seed, no
//! hidden state, safe to call from any thread. It is built on a
//! reduced-round Threefry-2x64 mix (Salmon et al., "Parallel Random
//! Numbers: As Easy as 1, 2, 3") used purely as a keyed block permutation,
//! not as a general-purpose RNG — we only ever draw a single 128-bit
//! block per `(level, id)` pair.

use crate::{Error, LOG_BOUND, MAX_DIMENSION};

/// Threefry-2x64 rotation schedule (Random123's `R_64x2`), cycled every
/// 8 rounds.
const ROTATION: [u32; 8] = [16, 42, 12, 31, 16, 32, 24, 21];

/// Threefry's fixed key-schedule parity constant.
const KS_PARITY: u64 = 0x1BD1_1BDA_A9FB_4617;

/// Number of mixing rounds. Threefry-2x64 is specified with up to 32
/// rounds for cryptographic-strength output; we only need "astronomically
/// unlikely" collisions on geometric inputs; 13 rounds (just past two key
/// injections) is the value Random123 itself documents as already
/// passing its statistical test suite.
const ROUNDS: usize = 13;

/// Threefry-2x64, keyed with a fixed (zero) key — determinism across
/// processes is a feature, not a limitation, so the engine never accepts
/// an external seed.
fn threefry2x64(input0: u64, input1: u64) -> (u64, u64) {
    let ks0 = 0u64;
    let ks1 = 0u64;
    let ks2 = KS_PARITY ^ ks0 ^ ks1;
    let ks = [ks0, ks1, ks2];

    let mut x0 = input0.wrapping_add(ks[0]);
    let mut x1 = input1.wrapping_add(ks[1]);

    for round in 0..ROUNDS {
        let rotation = ROTATION[round % ROTATION.len()];
        x0 = x0.wrapping_add(x1);
        x1 = x1.rotate_left(rotation) ^ x0;

        if (round + 1) % 4 == 0 {
            let injection = ((round + 1) / 4) as u64;
            x0 = x0.wrapping_add(ks[(injection % 3) as usize]);
            x1 = x1
                .wrapping_add(ks[((injection + 1) % 3) as usize])
                .wrapping_add(injection);
        }
    }

    (x0, x1)
}

/// Produces the level-`level` perturbation vector for point `id`, in
/// `Z^M` with each component in `[-2^LOG_BOUND, 2^LOG_BOUND)`.
///
/// `M` must be at most [`MAX_DIMENSION`]; the 128-bit Threefry block is
/// split into `M` fields of 32 bits, so `M <= 4` and `LOG_BOUND + 1 <= 32`
/// are load-bearing invariants checked once at call time.
pub fn perturbation<const M: usize>(level: u64, id: u64) -> Result<[i64; M], Error> {
    if M > MAX_DIMENSION {
        return Err(Error::DimensionOutOfRange {
            dimension: M,
            max_dimension: MAX_DIMENSION,
        });
    }
    debug_assert!(LOG_BOUND + 1 <= 32, "LOG_BOUND too large to fit a 32-bit field");

    let (block0, block1) = threefry2x64(level, id);
    let bits: u128 = (block0 as u128) | ((block1 as u128) << 64);

    let mask: u32 = (1u32 << (LOG_BOUND + 1)) - 1;
    let bias: i64 = 1i64 << LOG_BOUND;

    let mut out = [0i64; M];
    for (i, slot) in out.iter_mut().enumerate() {
        let field = ((bits >> (32 * i)) & 0xFFFF_FFFF) as u32;
        *slot = (field & mask) as i64 - bias;
    }
    Ok(out)
}
