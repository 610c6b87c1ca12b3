// euler2d - a 2D compressible Euler equations solver
// Copyright (C) 2026 Euler2D contributors

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Point-wise conversions between conserved and primitive variables.
//!
//! Conserved layout: `[rho, rho*u, rho*v, E, rho*s_0, .., rho*s_{n-1}]`.
//! Primitive layout: `[rho, u, v, p, s_0, .., s_{n-1}]`.
//! Grounded on `original_source/src/hydro.cc` (`PrimToCons`, `ConsToPrim`,
//! `PrimLim`, `PointPrimToCons`).

use crate::array::MultiDimArray;

/// Convert one cell's primitive state to conserved, in place into `cons`.
/// Both slices must have the grid's `nquant` length.
pub fn prim_to_cons(prim: &[f64], cons: &mut [f64], gamma: f64) {
    let rho = prim[0];
    let vsquared = prim[1] * prim[1] + prim[2] * prim[2];

    cons[0] = rho;
    cons[1] = rho * prim[1];
    cons[2] = rho * prim[2];
    cons[3] = 0.5 * rho * vsquared + prim[3] / (gamma - 1.0);

    for m in 4..prim.len() {
        cons[m] = rho * prim[m];
    }
}

/// Convert one cell's conserved state to primitive, in place into `prim`.
pub fn cons_to_prim(cons: &[f64], prim: &mut [f64], gamma: f64) {
    let rho = cons[0];
    let v1 = cons[1] / rho;
    let v2 = cons[2] / rho;
    let ke = 0.5 * rho * (v1 * v1 + v2 * v2);

    prim[0] = rho;
    prim[1] = v1;
    prim[2] = v2;
    prim[3] = (cons[3] - ke) * (gamma - 1.0);

    for m in 4..cons.len() {
        prim[m] = cons[m] / rho;
    }
}

/// Clamp a primitive state to its admissible range: density and pressure
/// floors, passive scalars non-negative. Mirrors `Grid::PrimLim`.
pub fn floor_prim(prim: &mut [f64], rho_floor: f64, press_floor: f64) {
    if prim[0] < rho_floor {
        prim[0] = rho_floor;
    }
    if prim[3] < press_floor {
        prim[3] = press_floor;
    }
    for m in prim.iter_mut().skip(4) {
        if *m < 0.0 {
            *m = 0.0;
        }
    }
}

/// `prim_to_cons` applied over `[il,iu) x [jl,ju)` of two `[nquant, nu, nv]`
/// (or `[nquant, nu+1, nv+1]` face) arrays. Used both for the grid's main
/// `prim -> cons` and for converting reconstructed `Lprim/Rprim` into
/// `Lcons/Rcons`. Mirrors `Grid::PrimToCons`.
pub fn prim_to_cons_range(
    prim: &MultiDimArray,
    cons: &mut MultiDimArray,
    gamma: f64,
    nquant: usize,
    il: usize,
    iu: usize,
    jl: usize,
    ju: usize,
) {
    for i in il..iu {
        for j in jl..ju {
            let rho = prim[(0, i, j)];
            let vsquared = prim[(1, i, j)] * prim[(1, i, j)] + prim[(2, i, j)] * prim[(2, i, j)];
            cons[(0, i, j)] = rho;
            cons[(1, i, j)] = rho * prim[(1, i, j)];
            cons[(2, i, j)] = rho * prim[(2, i, j)];
            cons[(3, i, j)] = 0.5 * rho * vsquared + prim[(3, i, j)] / (gamma - 1.0);
            for m in 4..nquant {
                cons[(m, i, j)] = rho * prim[(m, i, j)];
            }
        }
    }
}

/// `cons_to_prim` applied over `[il,iu) x [jl,ju)`. Mirrors
/// `Grid::ConsToPrim`.
pub fn cons_to_prim_range(
    cons: &MultiDimArray,
    prim: &mut MultiDimArray,
    gamma: f64,
    nquant: usize,
    il: usize,
    iu: usize,
    jl: usize,
    ju: usize,
) {
    for i in il..iu {
        for j in jl..ju {
            let rho = cons[(0, i, j)];
            let v1 = cons[(1, i, j)] / rho;
            let v2 = cons[(2, i, j)] / rho;
            let ke = 0.5 * rho * (v1 * v1 + v2 * v2);
            prim[(0, i, j)] = rho;
            prim[(1, i, j)] = v1;
            prim[(2, i, j)] = v2;
            prim[(3, i, j)] = (cons[(3, i, j)] - ke) * (gamma - 1.0);
            for m in 4..nquant {
                prim[(m, i, j)] = cons[(m, i, j)] / rho;
            }
        }
    }
}

/// `floor_prim` applied over `[il,iu) x [jl,ju)`. Mirrors `Grid::PrimLim`.
pub fn floor_prim_range(
    prim: &mut MultiDimArray,
    rho_floor: f64,
    press_floor: f64,
    nquant: usize,
    il: usize,
    iu: usize,
    jl: usize,
    ju: usize,
) {
    for i in il..iu {
        for j in jl..ju {
            if prim[(0, i, j)] < rho_floor {
                prim[(0, i, j)] = rho_floor;
            }
            if prim[(3, i, j)] < press_floor {
                prim[(3, i, j)] = press_floor;
            }
            for m in 4..nquant {
                if prim[(m, i, j)] < 0.0 {
                    prim[(m, i, j)] = 0.0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn round_trip_uniform_state() {
        let prim = [1.0, 0.3, -0.2, 1.0];
        let mut cons = [0.0; 4];
        prim_to_cons(&prim, &mut cons, 1.4);
        let mut back = [0.0; 4];
        cons_to_prim(&cons, &mut back, 1.4);
        for (a, b) in prim.iter().zip(back.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn floor_prim_clamps_rho_and_pressure() {
        let mut prim = [-1.0, 0.0, 0.0, -5.0, -0.5];
        floor_prim(&mut prim, 1e-8, 1e-10);
        assert_eq!(prim[0], 1e-8);
        assert_eq!(prim[3], 1e-10);
        assert_eq!(prim[4], 0.0);
    }
}
