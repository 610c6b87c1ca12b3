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

//! Top-level wiring: compose a [`crate::problem::Problem`], a [`Config`]
//! and the worker pool into a runnable simulation. Grounded on
//! `original_source/src/main.cc::main`, generalised from a fixed
//! `#include`-selected scenario into an injected `Box<dyn Problem>`.

use crate::broadcast::{BroadcastSink, FrameSlot, WebSocketSink};
use crate::config::Config;
use crate::error::Result;
use crate::grid::Grid;
use crate::integrator::Integrator;
use crate::problem::Problem;
use crate::worker::WorkerPool;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Owns the grid, the configured scenario and the broadcaster for one run.
pub struct Simulation {
    grid: Grid,
    integrator: Integrator,
    problem: Arc<dyn Problem>,
    config: Config,
}

impl Simulation {
    /// Build a simulation: allocate the grid, fill it with `problem`'s
    /// initial condition, and apply the initial boundary pass. Mirrors
    /// `Grid::InitGrid`'s closing sequence (`InitCond; ConsLim; ConsToPrim;
    /// Boundary(time); ConsLim; ConsToPrim`).
    pub fn new(config: Config, problem: Arc<dyn Problem>) -> Result<Self> {
        config.validate()?;

        let mut grid = Grid::new(&config)?;
        grid.init_uv_coord();
        problem.init_cond(&mut grid);
        grid.prim_to_cons_full();
        grid.cons_lim();
        grid.cons_to_prim();
        problem.boundary(&mut grid, grid.time);
        grid.cons_lim();
        grid.cons_to_prim();

        let integrator = Integrator::new(config.scheme);

        Ok(Self { grid, integrator, problem, config })
    }

    pub fn problem_name(&self) -> &str {
        self.problem.name()
    }

    /// Run the simulation for `epochs` timesteps, broadcasting rendered
    /// frames over WebSocket as it goes. Blocks until every worker thread
    /// and the broadcaster have exited.
    pub fn run(self, epochs: u64) -> Result<Grid> {
        let slot = FrameSlot::new();
        let sender = slot.sender();
        let receiver = slot.receiver();
        // `slot` itself holds a sender clone that never gets moved into a
        // worker thread; drop it now so the broadcaster's `receiver.iter()`
        // can see a disconnect once the pool's own clones are gone.
        drop(slot);

        let mut sink = WebSocketSink::new();
        sink.open(
            self.config.broadcast_port,
            self.config.broadcast_max_clients,
            self.config.broadcast_timeout_ms,
            self.config.broadcast_max_fps,
        )?;

        let broadcaster_handle: JoinHandle<WebSocketSink> = std::thread::spawn(move || {
            for frame in receiver.iter() {
                if let Err(e) = sink.broadcast(&frame) {
                    log::warn!("broadcast: failed to send frame: {e}");
                }
            }
            let _ = sink.close();
            sink
        });

        let pool = WorkerPool::spawn(self.grid, self.integrator, self.problem, &self.config, Some(sender), epochs);
        let grid = pool.join();

        // Dropping `slot`'s sender (already moved into `pool`, now gone)
        // closes the channel, which ends the broadcaster's `for frame in
        // receiver.iter()` loop.
        let _ = broadcaster_handle.join();

        Ok(grid)
    }

    /// Run without a broadcaster, for tests and benchmarks that only care
    /// about the numerics.
    pub fn run_headless(self, epochs: u64) -> Grid {
        let pool = WorkerPool::spawn(self.grid, self.integrator, self.problem, &self.config, None, epochs);
        pool.join()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{SodShockTube, UniformState};

    fn test_config() -> Config {
        let mut cfg = Config::default();
        cfg.nthread = 2;
        cfg.nu = 32;
        cfg.nv = 16;
        cfg.nghost = 2;
        cfg
    }

    #[test]
    fn uniform_state_stays_uniform() {
        let cfg = test_config();
        let sim = Simulation::new(cfg, Arc::new(UniformState::default())).unwrap();
        let grid = sim.run_headless(5);
        for i in grid.nghost..grid.nu - grid.nghost {
            for j in grid.nghost..grid.nv - grid.nghost {
                assert!((grid.cons[(0, i, j)] - 1.0).abs() < 1e-9);
                assert!(grid.cons[(1, i, j)].abs() < 1e-9);
            }
        }
    }

    #[test]
    fn sod_shock_tube_runs_without_panicking() {
        let cfg = test_config();
        let sim = Simulation::new(cfg, Arc::new(SodShockTube)).unwrap();
        let grid = sim.run_headless(5);
        assert!(grid.time > 0.0);
    }
}
