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

//! Per-face signal speed bounds (`Lw`, `Rw`) feeding the HLLC/HLLE solvers.
//! Grounded on `original_source/src/hydro.cc::Wavespeed`.

/// The primitive quantities `Wavespeed` needs on each side of a face: the
/// reconstructed face value and the original cell-centred value of the cell
/// the face value was extrapolated from.
#[derive(Debug, Clone, Copy)]
pub struct FaceSide {
    pub face_rho: f64,
    pub face_press: f64,
    pub face_v: f64,
    pub cell_rho: f64,
    pub cell_press: f64,
    pub cell_v: f64,
}

/// Returns `(Lw, Rw)`, the leftmost and rightmost signal speed bounding the
/// Riemann fan at this face.
pub fn face_wavespeed(gamma: f64, left: FaceSide, right: FaceSide) -> (f64, f64) {
    let lcs = (gamma * left.face_press / left.face_rho)
        .sqrt()
        .max((gamma * left.cell_press / left.cell_rho).sqrt());
    let rcs = (gamma * right.face_press / right.face_rho)
        .sqrt()
        .max((gamma * right.cell_press / right.cell_rho).sqrt());

    let lv = left.face_v.min(left.cell_v);
    let rv = right.face_v.max(right.cell_v);

    let lw = (lv - lcs).min(rv - rcs);
    let rw = (lv + lcs).max(rv + rcs);
    (lw, rw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_state_has_symmetric_wavespeeds() {
        let side = FaceSide {
            face_rho: 1.0,
            face_press: 1.0,
            face_v: 0.0,
            cell_rho: 1.0,
            cell_press: 1.0,
            cell_v: 0.0,
        };
        let (lw, rw) = face_wavespeed(1.4, side, side);
        let cs = (1.4f64).sqrt();
        assert!((lw + cs).abs() < 1e-12);
        assert!((rw - cs).abs() < 1e-12);
    }
}
