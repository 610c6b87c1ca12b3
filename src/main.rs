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

//! CLI entry point. Mirrors `original_source/src/main.cc::main`'s wiring
//! (allocate the grid, construct the integrator, open the broadcaster,
//! run), generalised to load configuration from an optional TOML file and
//! select the scenario by name instead of by what got `#include`d.

use euler2d::config::Config;
use euler2d::problem::{Problem, ReflectingGaussianPulse, RiemannConfig3, SmoothAdvection, SodShockTube, UniformState};
use euler2d::simulation::Simulation;
use std::process::ExitCode;
use std::sync::Arc;

fn problem_by_name(name: &str) -> Option<Arc<dyn Problem>> {
    match name {
        "uniform_state" => Some(Arc::new(UniformState::default())),
        "sod_shock_tube" => Some(Arc::new(SodShockTube)),
        "riemann_config_3" => Some(Arc::new(RiemannConfig3)),
        "smooth_advection" => Some(Arc::new(SmoothAdvection::default())),
        "reflecting_gaussian_pulse" => Some(Arc::new(ReflectingGaussianPulse::default())),
        _ => None,
    }
}

fn run() -> euler2d::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next();
    let problem_name = args.next().unwrap_or_else(|| "uniform_state".to_string());

    let config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let problem = problem_by_name(&problem_name).unwrap_or_else(|| {
        log::warn!("unknown problem '{problem_name}', falling back to uniform_state");
        Arc::new(UniformState::default())
    });

    log::info!("starting '{}' on a {}x{} grid with {} threads", problem.name(), config.nu, config.nv, config.nthread);

    let simulation = Simulation::new(config, problem)?;
    simulation.run(u64::MAX)?;
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("euler2d: {e}");
            ExitCode::FAILURE
        }
    }
}
