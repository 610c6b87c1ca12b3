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

//! Crate-wide error taxonomy.
//!
//! Most numerical hazards (division by a floored density, `sqrt` of a
//! floored pressure) are pre-empted by [`crate::numerics::transform::prim_floor`]
//! and therefore never surface as an `Error`. What remains are configuration
//! mistakes caught at startup and transport failures that must never abort
//! the simulation.

use thiserror::Error;

/// Errors that can arise while configuring or driving a simulation.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value was out of its admissible range.
    ///
    /// This mirrors `original_source/src/grid.cc`'s
    /// `InitGrid`, which aborts with `exit(EXIT_FAILURE)` when
    /// `reconstruct_order` is not in `{1,2,3}`.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Reconstruction order was not one of `{1, 2, 3}`. Fatal at init.
    #[error("reconstruct_order must be 1, 2 or 3, got {0}")]
    ReconstructOrder(i32),

    /// A shape mismatch was found where two [`crate::array::MultiDimArray`]s
    /// were expected to have equal linear length (e.g. `copy_data_from`).
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The broadcast transport failed to open, send or close. Never fatal:
    /// callers log this and drop the frame/connection.
    #[error("broadcast transport error: {0}")]
    Transport(String),

    /// Failure to parse or read a configuration file.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(#[from] ConfigLoadError),
}

/// Narrower error for [`crate::config::Config::load`], kept separate so
/// library consumers that build a [`crate::config::Config`] in memory never
/// need to handle I/O errors.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("could not read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
