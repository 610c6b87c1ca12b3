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

//! A 2D compressible Euler equations solver: finite-volume, PPM
//! reconstruction, an HLLC (or HLLE) approximate Riemann solver and
//! explicit SSPRK time integration, driven by a fixed pool of persistent
//! worker threads synchronized with a reusable barrier.
//!
//! Grounded throughout on `original_source/`, a single-file C++
//! implementation of the same scheme; see `DESIGN.md` for the
//! module-by-module grounding ledger.

pub mod array;
pub mod barrier;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod grid;
pub mod integrator;
pub mod numerics;
pub mod problem;
pub mod simulation;
pub mod worker;

pub use config::Config;
pub use error::{Error, Result};
pub use grid::Grid;
pub use problem::Problem;
pub use simulation::Simulation;
