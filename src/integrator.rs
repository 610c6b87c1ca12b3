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

//! SSPRK time integration: the per-stage weight tables and the convex
//! combination that folds a stage's flux divergence into the running
//! conserved state.
//!
//! Grounded on `original_source/src/integrator.cc`. The commented-out
//! SSPRK4 variant in the reference is intentionally not carried over.

use crate::grid::Grid;

/// Explicit SSPRK scheme selection. `Euler` is first-order (1 stage),
/// `Rk2` is the optimal second-order 2-stage scheme, `Ssprk3` is the
/// strong-stability-preserving third-order 3-stage scheme of Shu & Osher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    Euler,
    Rk2,
    #[default]
    Ssprk3,
}

/// Per-stage `(a, b, c)` weights and the derived SSPRK integrator.
///
/// At stage `s`, `cons_new = a[s]*cons_gen + b[s]*cons + c[s]*dt*(fluxdiv +
/// src)`, where `cons_gen` is the state at the start of the full step (the
/// "previous RK generation") and `cons` is the current running state. This
/// is `Integrator::AddFluxDivSrc` generalised over the scheme's weight
/// table instead of inlined per call site.
pub struct Integrator {
    pub scheme: Scheme,
    weight: Vec<[f64; 3]>,
    time_weight: Vec<f64>,
}

impl Integrator {
    pub fn new(scheme: Scheme) -> Self {
        let weight = match scheme {
            Scheme::Euler => vec![[1.0, 0.0, 1.0]],
            Scheme::Rk2 => vec![[1.0, 0.0, 1.0], [0.5, 0.5, 0.5]],
            Scheme::Ssprk3 => vec![
                [1.0, 0.0, 1.0],
                [3.0 / 4.0, 1.0 / 4.0, 1.0 / 4.0],
                [1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0],
            ],
        };
        let time_weight = weight.iter().map(|w| (w[1] + w[2]) / (w[0] + w[1])).collect();
        Self { scheme, weight, time_weight }
    }

    /// Number of RK stages this scheme takes per full timestep.
    pub fn nstep(&self) -> usize {
        self.weight.len()
    }

    /// `time_weight[s]`, used to advance `step_time` within a stage and,
    /// summed appropriately, to land on `global_time + dt` after the last
    /// stage.
    pub fn time_weight(&self, s: usize) -> f64 {
        self.time_weight[s]
    }

    /// Fold stage `s`'s flux divergence and source term into `grid.cons`
    /// over the tile range `[il,iu) x [jl,ju)`. Mirrors
    /// `Integrator::AddFluxDivSrc`.
    pub fn add_flux_div_src(&self, grid: &mut Grid, s: usize, dt: f64, il: usize, iu: usize, jl: usize, ju: usize) {
        let [a, b, c] = self.weight[s];
        let nquant = grid.nquant;
        for m in 0..nquant {
            for i in il..iu {
                for j in jl..ju {
                    let deriv = grid.fluxdiv[(m, i, j)] + grid.src[(m, i, j)];
                    grid.cons[(m, i, j)] = a * grid.cons_gen[(m, i, j)] + b * grid.cons[(m, i, j)] + c * deriv * dt;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euler_has_a_single_stage() {
        let integ = Integrator::new(Scheme::Euler);
        assert_eq!(integ.nstep(), 1);
        assert_eq!(integ.time_weight(0), 1.0);
    }

    #[test]
    fn ssprk3_time_weights_match_reference_formula() {
        let integ = Integrator::new(Scheme::Ssprk3);
        assert_eq!(integ.nstep(), 3);
        // time_weight(s) = (b+c)/(a+b)
        assert!((integ.time_weight(0) - 1.0).abs() < 1e-12);
        assert!((integ.time_weight(1) - 0.5).abs() < 1e-12);
        assert!((integ.time_weight(2) - 1.0).abs() < 1e-12);
    }
}
