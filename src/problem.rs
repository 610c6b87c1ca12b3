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

//! The `Problem` plug-in contract and a handful of built-in scenarios.
//!
//! Grounded on `original_source/src/init_cond/template_init_cond.hh`: the
//! reference selects a scenario at compile time by swapping which
//! `init_cond/*.hh` gets `#include`d into `main.cc`. This crate instead
//! installs one `Box<dyn Problem>` at `Simulation::new` -- a capability
//! record, not a base class: a `Problem` answers "what initial state, what
//! boundary treatment, what source term", and nothing here is ever
//! downcast or matched on by type.

use crate::grid::Grid;

/// A simulated scenario: initial condition, boundary treatment and source
/// term. Implementors only need `name` and `init_cond`; the rest default to
/// the reference template's defaults (periodic boundary, zero source).
pub trait Problem: Send + Sync {
    fn name(&self) -> &str;

    /// Fill `grid.prim` with the scenario's initial condition. The caller
    /// converts to `grid.cons` afterwards (`Grid::prim_to_cons_full`).
    fn init_cond(&self, grid: &mut Grid);

    /// Apply ghost-cell boundary conditions to `grid.cons`. Default:
    /// periodic on all four sides, matching
    /// `original_source/src/init_cond/template_init_cond.hh::Boundary`.
    fn boundary(&self, grid: &mut Grid, _time: f64) {
        grid.periodic_left();
        grid.periodic_right();
        grid.periodic_bot();
        grid.periodic_top();
        grid.periodic_lb();
        grid.periodic_rb();
        grid.periodic_rt();
        grid.periodic_lt();
    }

    /// Fill `grid.src` over `[il,iu) x [jl,ju)`, the calling worker's own
    /// tile (spec.md §5 step 4: "each worker... over its tile", matching the
    /// thread-local `il/iu/jl/ju` bounds the reference template's scenario
    /// override of `CalculateSrc` uses, not the weak-symbol default's
    /// full-grid loop). Default: zero, which is `grid.src`'s allocated
    /// value, so the default is a no-op rather than an explicit zero-fill.
    fn calculate_src(&self, _grid: &mut Grid, _il: usize, _iu: usize, _jl: usize, _ju: usize) {}
}

/// A single uniform state everywhere, periodic boundaries. The reference
/// template's own example scenario (`rho=1, v=0, p=1`).
pub struct UniformState {
    pub rho: f64,
    pub vx: f64,
    pub vy: f64,
    pub press: f64,
}

impl Default for UniformState {
    fn default() -> Self {
        Self { rho: 1.0, vx: 0.0, vy: 0.0, press: 1.0 }
    }
}

impl Problem for UniformState {
    fn name(&self) -> &str {
        "uniform_state"
    }

    fn init_cond(&self, grid: &mut Grid) {
        for i in 0..grid.nu {
            for j in 0..grid.nv {
                grid.prim[(0, i, j)] = self.rho;
                grid.prim[(1, i, j)] = self.vx;
                grid.prim[(2, i, j)] = self.vy;
                grid.prim[(3, i, j)] = self.press;
            }
        }
    }
}

/// The classic 1D Sod shock tube, oriented along u and invariant along v.
/// Discontinuity at `u = 0`: left state `(rho, p) = (1, 1)`, right state
/// `(0.125, 0.1)`, both at rest. Smooth/zero-gradient boundaries along u,
/// periodic along v.
pub struct SodShockTube;

impl Problem for SodShockTube {
    fn name(&self) -> &str {
        "sod_shock_tube"
    }

    fn init_cond(&self, grid: &mut Grid) {
        for i in 0..grid.nu {
            let (rho, press) = if grid.u_cc[(i,)] < 0.0 { (1.0, 1.0) } else { (0.125, 0.1) };
            for j in 0..grid.nv {
                grid.prim[(0, i, j)] = rho;
                grid.prim[(1, i, j)] = 0.0;
                grid.prim[(2, i, j)] = 0.0;
                grid.prim[(3, i, j)] = press;
            }
        }
    }

    fn boundary(&self, grid: &mut Grid, _time: f64) {
        grid.smooth_left();
        grid.smooth_right();
        grid.smooth_bot();
        grid.smooth_top();
        grid.smooth_lb();
        grid.smooth_rb();
        grid.smooth_rt();
        grid.smooth_lt();
    }
}

/// The four-quadrant 2D Riemann problem, configuration 3 of Lax & Liska
/// (also Schulz-Rinne et al.): four constant states meeting at the domain
/// centre, each producing a different elementary wave (shock/shock,
/// shock/rarefaction pairs) across the four quadrant boundaries.
pub struct RiemannConfig3;

impl Problem for RiemannConfig3 {
    fn name(&self) -> &str {
        "riemann_config_3"
    }

    fn init_cond(&self, grid: &mut Grid) {
        let umid = 0.5 * (grid.umin + grid.umax);
        let vmid = 0.5 * (grid.vmin + grid.vmax);
        for i in 0..grid.nu {
            let u = grid.u_cc[(i,)];
            for j in 0..grid.nv {
                let v = grid.v_cc[(j,)];
                let (rho, vx, vy, press) = match (u >= umid, v >= vmid) {
                    (true, true) => (1.5, 0.0, 0.0, 1.5),
                    (false, true) => (0.5323, 1.206, 0.0, 0.3),
                    (false, false) => (0.138, 1.206, 1.206, 0.029),
                    (true, false) => (0.5323, 0.0, 1.206, 0.3),
                };
                grid.prim[(0, i, j)] = rho;
                grid.prim[(1, i, j)] = vx;
                grid.prim[(2, i, j)] = vy;
                grid.prim[(3, i, j)] = press;
            }
        }
    }

    fn boundary(&self, grid: &mut Grid, _time: f64) {
        grid.smooth_left();
        grid.smooth_right();
        grid.smooth_bot();
        grid.smooth_top();
        grid.smooth_lb();
        grid.smooth_rb();
        grid.smooth_rt();
        grid.smooth_lt();
    }
}

/// A smooth, periodic density wave advected at a fixed oblique velocity.
/// Used to check spatial order of accuracy: exact solution is the initial
/// condition translated rigidly, so the numerical error at a fixed final
/// time should shrink with the reconstruction order.
pub struct SmoothAdvection {
    pub vx: f64,
    pub vy: f64,
}

impl Default for SmoothAdvection {
    fn default() -> Self {
        Self { vx: 1.0, vy: 1.0 }
    }
}

impl Problem for SmoothAdvection {
    fn name(&self) -> &str {
        "smooth_advection"
    }

    fn init_cond(&self, grid: &mut Grid) {
        use std::f64::consts::TAU;
        for i in 0..grid.nu {
            let u = grid.u_cc[(i,)];
            for j in 0..grid.nv {
                let v = grid.v_cc[(j,)];
                grid.prim[(0, i, j)] = 1.0 + 0.2 * (TAU * u).sin() * (TAU * v).sin();
                grid.prim[(1, i, j)] = self.vx;
                grid.prim[(2, i, j)] = self.vy;
                grid.prim[(3, i, j)] = 1.0;
            }
        }
    }
}

/// A Gaussian overpressure pulse at rest in the domain centre, bounded by
/// reflecting walls on all four sides. Checks that reflecting boundaries
/// conserve the pulse's symmetry and that HLLC resolves the outgoing shock
/// cleanly without spurious momentum leaking through a corner.
pub struct ReflectingGaussianPulse {
    pub amplitude: f64,
    pub width: f64,
}

impl Default for ReflectingGaussianPulse {
    fn default() -> Self {
        Self { amplitude: 5.0, width: 0.1 }
    }
}

impl Problem for ReflectingGaussianPulse {
    fn name(&self) -> &str {
        "reflecting_gaussian_pulse"
    }

    fn init_cond(&self, grid: &mut Grid) {
        for i in 0..grid.nu {
            let u = grid.u_cc[(i,)];
            for j in 0..grid.nv {
                let v = grid.v_cc[(j,)];
                let r2 = u * u + v * v;
                grid.prim[(0, i, j)] = 1.0;
                grid.prim[(1, i, j)] = 0.0;
                grid.prim[(2, i, j)] = 0.0;
                grid.prim[(3, i, j)] = 1.0 + self.amplitude * (-r2 / (2.0 * self.width * self.width)).exp();
            }
        }
    }

    fn boundary(&self, grid: &mut Grid, _time: f64) {
        grid.reflecting_left();
        grid.reflecting_right();
        grid.reflecting_bot();
        grid.reflecting_top();
        grid.reflecting_lb();
        grid.reflecting_rb();
        grid.reflecting_rt();
        grid.reflecting_lt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn small_grid() -> Grid {
        let mut cfg = Config::default();
        cfg.nu = 8;
        cfg.nv = 8;
        cfg.nghost = 2;
        Grid::new(&cfg).unwrap()
    }

    #[test]
    fn uniform_state_fills_every_cell() {
        let mut grid = small_grid();
        grid.init_uv_coord();
        let problem = UniformState::default();
        problem.init_cond(&mut grid);
        for i in 0..grid.nu {
            for j in 0..grid.nv {
                assert_eq!(grid.prim[(0, i, j)], 1.0);
                assert_eq!(grid.prim[(3, i, j)], 1.0);
            }
        }
    }

    #[test]
    fn sod_shock_tube_splits_at_midplane() {
        let mut grid = small_grid();
        grid.init_uv_coord();
        let problem = SodShockTube;
        problem.init_cond(&mut grid);
        let j = grid.nghost;
        assert_eq!(grid.prim[(0, 0, j)], 1.0);
        assert_eq!(grid.prim[(0, grid.nu - 1, j)], 0.125);
    }

    #[test]
    fn riemann_config_3_has_four_distinct_quadrants() {
        let mut grid = small_grid();
        grid.init_uv_coord();
        let problem = RiemannConfig3;
        problem.init_cond(&mut grid);
        let (lo, hi) = (1, grid.nu - 2);
        let densities = [
            grid.prim[(0, hi, hi)],
            grid.prim[(0, lo, hi)],
            grid.prim[(0, lo, lo)],
            grid.prim[(0, hi, lo)],
        ];
        assert_eq!(densities, [1.5, 0.5323, 0.138, 0.5323]);
    }
}
