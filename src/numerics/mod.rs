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

//! The numerical kernels: variable transforms, reconstruction, wavespeed
//! estimation, Riemann solvers and flux divergence. Each submodule holds
//! pure, allocation-free functions operating on single cells or faces;
//! [`crate::grid::Grid`] and [`crate::worker`] supply the iteration over the
//! mesh.

pub mod fluxdiv;
pub mod reconstruct;
pub mod riemann;
pub mod transform;
pub mod wavespeed;
