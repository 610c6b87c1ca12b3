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

//! Runtime configuration, loadable from TOML. `Default` reproduces
//! `original_source/src/config.h`'s compile-time constants.

use crate::error::{ConfigLoadError, Error, Result};
use crate::integrator::Scheme;
use crate::numerics::reconstruct::PpmTunables;
use crate::numerics::riemann::FluxKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of persistent worker threads. Mirrors `config.h`'s `NTHREAD`.
    pub nthread: usize,
    /// Interior (non-ghost) cell count along u.
    pub nu: usize,
    /// Interior (non-ghost) cell count along v.
    pub nv: usize,
    /// Number of passive scalar fields carried alongside the five
    /// hydrodynamic quantities.
    pub nscalar: usize,
    /// Ghost cell count on each side of each axis.
    pub nghost: usize,

    pub umin: f64,
    pub umax: f64,
    pub vmin: f64,
    pub vmax: f64,

    /// Reconstruction order: 1 (piecewise constant), 2 (PLM) or 3 (PPM).
    pub reconstruct_order: i32,
    pub rho_floor: f64,
    pub press_floor: f64,
    pub gamma: f64,

    pub ppm: PpmTunables,
    pub flux_kind: FluxKind,

    pub scheme: Scheme,
    pub cfl_num: f64,
    pub max_epoch: f64,
    pub max_out: u64,
    pub out_tf: f64,

    pub broadcast_port: u16,
    pub broadcast_max_clients: usize,
    pub broadcast_timeout_ms: u64,
    pub broadcast_max_fps: u32,
    pub broadcast_preimage_min: f64,
    pub broadcast_preimage_max: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nthread: 8,
            nu: 320,
            nv: 320,
            nscalar: 0,
            nghost: 4,
            umin: -1.0,
            umax: 1.0,
            vmin: -1.0,
            vmax: 1.0,
            reconstruct_order: 3,
            rho_floor: 1e-8,
            press_floor: 1e-10,
            gamma: 1.4,
            ppm: PpmTunables::default(),
            flux_kind: FluxKind::default(),
            scheme: Scheme::default(),
            cfl_num: 0.43,
            max_epoch: 1e9,
            max_out: 50,
            out_tf: 1.0,
            broadcast_port: 9743,
            broadcast_max_clients: 2,
            broadcast_timeout_ms: 0,
            broadcast_max_fps: 24,
            broadcast_preimage_min: -1.0,
            broadcast_preimage_max: 1.0,
        }
    }
}

impl Config {
    /// `out_dt = out_tf / (max_out - 1)`, the wall-clock-independent
    /// simulation-time spacing between broadcast frames.
    pub fn out_dt(&self) -> f64 {
        self.out_tf / (self.max_out.saturating_sub(1).max(1) as f64)
    }

    /// Load a configuration from a TOML file, falling back to `Default` for
    /// any field the file omits.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(ConfigLoadError::Io)?;
        let config: Config = toml::from_str(&text).map_err(ConfigLoadError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=3).contains(&self.reconstruct_order) {
            return Err(Error::ReconstructOrder(self.reconstruct_order));
        }
        if self.nthread == 0 {
            return Err(Error::Config("nthread must be at least 1".into()));
        }
        if self.nu < self.nthread {
            return Err(Error::Config(format!(
                "nu ({}) must be at least nthread ({}) so every tile owns at least one cell",
                self.nu, self.nthread
            )));
        }
        Ok(())
    }
}
