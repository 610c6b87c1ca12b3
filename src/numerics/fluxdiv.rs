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

//! Flux divergence and the CFL timestep reduction.
//! Grounded on `original_source/src/hydro.cc::CalculateFluxDiv/DetermineDt`.

/// `(Ju(i,j) - Ju(i+1,j))/du + (Jv(i,j) - Jv(i,j+1))/dv` for one cell.
pub fn flux_divergence(ju_left: f64, ju_right: f64, du: f64, jv_bot: f64, jv_top: f64, dv: f64) -> f64 {
    (ju_left - ju_right) / du + (jv_bot - jv_top) / dv
}

/// Reduces `dt` against the CFL-limited crossing time at one face, given
/// `Rw` at this face and `Lw` at the next face along the sweep direction.
pub fn reduce_dt(dt: f64, ds: f64, rw_here: f64, lw_next: f64) -> f64 {
    let cross_time = (ds / rw_here.abs()).min(ds / lw_next.abs());
    dt.min(cross_time)
}
