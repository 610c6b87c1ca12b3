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

//! The mesh: cell-centred and face-centred coordinate arrays, the
//! conserved/primitive state, reconstruction/flux scratch arrays, and the
//! twelve canned boundary operators.
//!
//! Grounded on `original_source/src/grid.hh`, `grid.cc` and
//! `grid_boundary.cc`. Unlike the reference, this `Grid` has no mutex or
//! condition variable of its own (the broadcast hand-off lives in
//! [`crate::broadcast`] instead) and no per-thread `tid`/`il`/`iu` fields
//! (those live in [`crate::worker::TileGeometry`]): this `Grid` is always
//! the one, full-extent grid, referenced by every worker.

use crate::array::MultiDimArray;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::numerics::reconstruct::{self, PpmTunables};
use crate::numerics::transform;
use crate::numerics::riemann::{self, FluxKind};
use crate::numerics::wavespeed::{self, FaceSide};

pub struct Grid {
    pub nquant: usize,
    pub nghost: usize,

    pub nu: usize,
    pub nv: usize,
    pub umin: f64,
    pub umax: f64,
    pub vmin: f64,
    pub vmax: f64,
    pub du: f64,
    pub dv: f64,

    pub reconstruct_order: i32,
    pub rho_floor: f64,
    pub press_floor: f64,
    pub gamma: f64,
    pub ppm: PpmTunables,
    pub flux_kind: FluxKind,

    pub time: f64,
    pub dt: f64,
    pub step_time: f64,
    pub step_dt: f64,
    /// Current RK stage within the timestep in progress. Leader-written,
    /// read by every worker after a barrier; see `src/worker.rs`.
    pub stage: usize,

    pub u_cc: MultiDimArray,
    pub v_cc: MultiDimArray,
    pub u_ufc: MultiDimArray,
    pub v_ufc: MultiDimArray,
    pub u_vfc: MultiDimArray,
    pub v_vfc: MultiDimArray,

    pub cons: MultiDimArray,
    pub prim: MultiDimArray,
    pub cons_gen: MultiDimArray,

    pub fluxdiv: MultiDimArray,
    pub src: MultiDimArray,

    pub ju: MultiDimArray,
    pub jv: MultiDimArray,

    pub lprim: MultiDimArray,
    pub lcons: MultiDimArray,
    pub rprim: MultiDimArray,
    pub rcons: MultiDimArray,

    pub lw: MultiDimArray,
    pub rw: MultiDimArray,
}

impl Grid {
    /// Allocate a grid from `config`. Does not set up coordinates or an
    /// initial condition; callers (via [`crate::simulation::Simulation`])
    /// follow with `init_uv_coord` and a [`crate::problem::Problem`]'s
    /// `init_cond`. Mirrors `Grid::InitGrid`'s validation and
    /// `Grid::AllocGrid`'s shapes.
    pub fn new(config: &Config) -> Result<Self> {
        if config.reconstruct_order != 1 && config.reconstruct_order != 2 && config.reconstruct_order != 3 {
            return Err(Error::ReconstructOrder(config.reconstruct_order));
        }

        let nquant = 4 + config.nscalar;
        let nghost = config.nghost;
        let nu = config.nu + 2 * nghost;
        let nv = config.nv + 2 * nghost;
        let du = (config.umax - config.umin) / (config.nu as f64);
        let dv = (config.vmax - config.vmin) / (config.nv as f64);

        Ok(Self {
            nquant,
            nghost,
            nu,
            nv,
            umin: config.umin,
            umax: config.umax,
            vmin: config.vmin,
            vmax: config.vmax,
            du,
            dv,
            reconstruct_order: config.reconstruct_order,
            rho_floor: config.rho_floor,
            press_floor: config.press_floor,
            gamma: config.gamma,
            ppm: config.ppm,
            flux_kind: config.flux_kind,
            time: 0.0,
            dt: 0.0,
            step_time: 0.0,
            step_dt: 0.0,
            stage: 0,
            u_cc: MultiDimArray::new(&[nu]),
            v_cc: MultiDimArray::new(&[nv]),
            u_ufc: MultiDimArray::new(&[nu + 1]),
            v_ufc: MultiDimArray::new(&[nv + 1]),
            u_vfc: MultiDimArray::new(&[nu + 1]),
            v_vfc: MultiDimArray::new(&[nv + 1]),
            cons: MultiDimArray::new(&[nquant, nu, nv]),
            prim: MultiDimArray::new(&[nquant, nu, nv]),
            cons_gen: MultiDimArray::new(&[nquant, nu, nv]),
            fluxdiv: MultiDimArray::new(&[nquant, nu, nv]),
            src: MultiDimArray::new(&[nquant, nu, nv]),
            ju: MultiDimArray::new(&[nquant, nu + 1, nv + 1]),
            jv: MultiDimArray::new(&[nquant, nu + 1, nv + 1]),
            lprim: MultiDimArray::new(&[nquant, nu + 1, nv + 1]),
            lcons: MultiDimArray::new(&[nquant, nu + 1, nv + 1]),
            rprim: MultiDimArray::new(&[nquant, nu + 1, nv + 1]),
            rcons: MultiDimArray::new(&[nquant, nu + 1, nv + 1]),
            lw: MultiDimArray::new(&[nu + 1, nv + 1]),
            rw: MultiDimArray::new(&[nu + 1, nv + 1]),
        })
    }

    /// Fill the cell-centred and face-centred coordinate arrays. Mirrors
    /// `Grid::InitUVCoord`.
    pub fn init_uv_coord(&mut self) {
        let nghost = self.nghost as f64;
        for i in 0..self.nu {
            self.u_cc[(i,)] = self.umin + (i as f64 - nghost + 0.5) * self.du;
        }
        for j in 0..self.nv {
            self.v_cc[(j,)] = self.vmin + (j as f64 - nghost + 0.5) * self.dv;
        }
        for i in 0..=self.nu {
            self.u_ufc[(i,)] = self.umin + (i as f64 - nghost + 0.5) * self.du;
            self.u_vfc[(i,)] = self.umin + (i as f64 - nghost) * self.du;
        }
        for j in 0..=self.nv {
            self.v_ufc[(j,)] = self.vmin + (j as f64 - nghost) * self.dv;
            self.v_vfc[(j,)] = self.vmin + (j as f64 - nghost + 0.5) * self.dv;
        }
    }

    /// `ConsToPrim(); PrimLim(prim); PrimToCons(prim, cons)` over the whole
    /// grid. Mirrors `Grid::ConsLim`, called once during `Simulation::new`'s
    /// one-time setup. Workers call the tile-bounded
    /// [`Grid::cons_lim_range`] per timestep instead; see `src/worker.rs`.
    pub fn cons_lim(&mut self) {
        let (nu, nv) = (self.nu, self.nv);
        self.cons_lim_range(0, nu, 0, nv);
    }

    pub fn cons_to_prim(&mut self) {
        let (nu, nv) = (self.nu, self.nv);
        self.cons_to_prim_range(0, nu, 0, nv);
    }

    /// `ConsToPrim(); PrimLim(prim); PrimToCons(prim, cons)` restricted to
    /// `[il,iu) x [jl,ju)`. Mirrors `Grid::ConsLim`; called by every worker
    /// over its own tile (spec.md §5 steps 5 and 7) instead of once over the
    /// whole grid. When `ppm.strict_lim` is set, a non-finite density or
    /// pressure is first replaced by its floor: on IEEE-754, `NaN.max(floor)`
    /// returns `NaN`, so the floor comparison alone would let a NaN slip
    /// through.
    pub fn cons_lim_range(&mut self, il: usize, iu: usize, jl: usize, ju: usize) {
        self.cons_to_prim_range(il, iu, jl, ju);
        if self.ppm.strict_lim {
            for i in il..iu {
                for j in jl..ju {
                    if !self.prim[(0, i, j)].is_finite() {
                        self.prim[(0, i, j)] = self.rho_floor;
                    }
                    if !self.prim[(3, i, j)].is_finite() {
                        self.prim[(3, i, j)] = self.press_floor;
                    }
                }
            }
        }
        transform::floor_prim_range(&mut self.prim, self.rho_floor, self.press_floor, self.nquant, il, iu, jl, ju);
        transform::prim_to_cons_range(&self.prim, &mut self.cons, self.gamma, self.nquant, il, iu, jl, ju);
    }

    pub fn cons_to_prim_range(&mut self, il: usize, iu: usize, jl: usize, ju: usize) {
        transform::cons_to_prim_range(&self.cons, &mut self.prim, self.gamma, self.nquant, il, iu, jl, ju);
    }

    /// `prim -> cons` over the whole grid. Used once after a
    /// [`crate::problem::Problem`] has filled `self.prim` with an initial
    /// condition.
    pub fn prim_to_cons_full(&mut self) {
        transform::prim_to_cons_range(&self.prim, &mut self.cons, self.gamma, self.nquant, 0, self.nu, 0, self.nv);
    }

    pub fn point_prim_to_cons(&self, prim: &[f64], cons: &mut [f64]) {
        transform::prim_to_cons(prim, cons, self.gamma);
    }

    /// `Grid::Reconstruct(dir)` restricted to `[il,iu) x [jl,ju)`. Called by
    /// every worker over its own
    /// [`crate::worker::TileGeometry::recon_range`], not the whole grid:
    /// unlike the reference (whose `local_grid.prim` is attached to the
    /// *entire* global array regardless of thread, making a full-grid call
    /// redundant-but-harmless there), this crate's workers write genuinely
    /// disjoint slices of `Lprim`/`Rprim`. See `DESIGN.md`.
    pub fn reconstruct(&mut self, dir: usize, il: usize, iu: usize, jl: usize, ju: usize) {
        let (di, dj) = if dir == 0 { (1i64, 0i64) } else { (0i64, 1i64) };

        for m in 0..self.nquant {
            let mut i = il as i64;
            while i < iu as i64 {
                let mut j = jl as i64;
                while j < ju as i64 {
                    let q0 = self.prim[(m, (i - 2 * di) as usize, (j - 2 * dj) as usize)];
                    let q1 = self.prim[(m, (i - di) as usize, (j - dj) as usize)];
                    let q2 = self.prim[(m, i as usize, j as usize)];
                    let q3 = self.prim[(m, (i + di) as usize, (j + dj) as usize)];
                    let q4 = self.prim[(m, (i + 2 * di) as usize, (j + 2 * dj) as usize)];

                    let (ql, qr) = reconstruct::reconstruct_cell(self.reconstruct_order, q0, q1, q2, q3, q4, self.ppm);

                    self.rprim[(m, i as usize, j as usize)] = ql;
                    self.lprim[(m, (i + di) as usize, (j + dj) as usize)] = qr;
                    j += 1;
                }
                i += 1;
            }
        }
    }

    /// Floors and converts the reconstructed `Lprim`/`Rprim` faces into
    /// `Lcons`/`Rcons` over `[il,iu) x [jl,ju)`. Called by every worker over
    /// the same range it just called `reconstruct` with. Mirrors the
    /// `PrimLim`/`PrimToCons` calls made on the face arrays in
    /// `Grid::CalculateRiemannJ` / `main.cc`'s pipeline.
    pub fn limit_and_convert_faces(&mut self, il: usize, iu: usize, jl: usize, ju: usize) {
        let nquant = self.nquant;
        transform::floor_prim_range(&mut self.lprim, self.rho_floor, self.press_floor, nquant, il, iu, jl, ju);
        transform::floor_prim_range(&mut self.rprim, self.rho_floor, self.press_floor, nquant, il, iu, jl, ju);
        transform::prim_to_cons_range(&self.lprim, &mut self.lcons, self.gamma, nquant, il, iu, jl, ju);
        transform::prim_to_cons_range(&self.rprim, &mut self.rcons, self.gamma, nquant, il, iu, jl, ju);
    }

    /// `Grid::Wavespeed(dir)` restricted to `[il,iu) x [jl,ju)`, tile-bounded
    /// for the same reason `reconstruct` is.
    pub fn wavespeed(&mut self, dir: usize, il: usize, iu: usize, jl: usize, ju: usize) {
        let (di, dj) = if dir == 0 { (1i64, 0i64) } else { (0i64, 1i64) };
        let normal = 1 + dir;

        let mut i = il as i64;
        while i < iu as i64 {
            let mut j = jl as i64;
            while j < ju as i64 {
                let (fi, fj) = (i as usize, j as usize);
                let (icell, jcell) = ((i - di) as usize, (j - dj) as usize);

                let left = FaceSide {
                    face_rho: self.lprim[(0, fi, fj)],
                    face_press: self.lprim[(3, fi, fj)],
                    face_v: self.lprim[(normal, fi, fj)],
                    cell_rho: self.prim[(0, icell, jcell)],
                    cell_press: self.prim[(3, icell, jcell)],
                    cell_v: self.prim[(normal, icell, jcell)],
                };
                let right = FaceSide {
                    face_rho: self.rprim[(0, fi, fj)],
                    face_press: self.rprim[(3, fi, fj)],
                    face_v: self.rprim[(normal, fi, fj)],
                    cell_rho: self.prim[(0, fi, fj)],
                    cell_press: self.prim[(3, fi, fj)],
                    cell_v: self.prim[(normal, fi, fj)],
                };

                let (lw, rw) = wavespeed::face_wavespeed(self.gamma, left, right);
                self.lw[(fi, fj)] = lw;
                self.rw[(fi, fj)] = rw;
                j += 1;
            }
            i += 1;
        }
    }

    /// Reduce `self.dt` against the CFL condition along `dir`. Mirrors
    /// `Grid::DetermineDt`.
    pub fn determine_dt(&mut self, dir: usize) {
        let (di, dj, ds) = if dir == 0 { (1usize, 0usize, self.du) } else { (0usize, 1usize, self.dv) };
        for i in self.nghost..self.nu - self.nghost {
            for j in self.nghost..self.nv - self.nghost {
                let rw_here = self.rw[(i, j)];
                let lw_next = self.lw[(i + di, j + dj)];
                self.dt = crate::numerics::fluxdiv::reduce_dt(self.dt, ds, rw_here, lw_next);
            }
        }
    }

    /// Evaluate the face flux (`Ju` for `dir == 0`, `Jv` for `dir == 1`) over
    /// `[il,iu) x [jl,ju)` of face indices, dispatching to HLLC or HLLE per
    /// `self.flux_kind`. Tile-bounded: every worker computes its own
    /// disjoint face range concurrently. Mirrors the reference's
    /// `riemann::HLLC`/`riemann::HLLE`, called once per direction from
    /// `IntegratorThread::take_timestep` with the thread's own `(il, iuf,
    /// jl, ju)` (axis 0) or `(il, iu, jl, juf)` (axis 1).
    pub fn calculate_riemann_j(&mut self, dir: usize, il: usize, iu: usize, jl: usize, ju: usize) {
        let nquant = self.nquant;
        let mut lprim = vec![0.0; nquant];
        let mut lcons = vec![0.0; nquant];
        let mut rprim = vec![0.0; nquant];
        let mut rcons = vec![0.0; nquant];
        let mut lj = vec![0.0; nquant];
        let mut rj = vec![0.0; nquant];
        let mut j_out = vec![0.0; nquant];

        for i in il..iu {
            for j in jl..ju {
                for m in 0..nquant {
                    lprim[m] = self.lprim[(m, i, j)];
                    lcons[m] = self.lcons[(m, i, j)];
                    rprim[m] = self.rprim[(m, i, j)];
                    rcons[m] = self.rcons[(m, i, j)];
                }
                let lw = self.lw[(i, j)];
                let rw = self.rw[(i, j)];

                match self.flux_kind {
                    FluxKind::Hllc => {
                        riemann::hllc(dir, &lprim, &lcons, lw, &rprim, &rcons, rw, &mut j_out);
                    }
                    FluxKind::Hlle => {
                        riemann::direct_flux(dir, &lcons, &lprim, &mut lj);
                        riemann::direct_flux(dir, &rcons, &rprim, &mut rj);
                        riemann::hlle(&lcons, &lj, lw, &rcons, &rj, rw, &mut j_out);
                    }
                }

                let flux = if dir == 0 { &mut self.ju } else { &mut self.jv };
                for m in 0..nquant {
                    flux[(m, i, j)] = j_out[m];
                }
            }
        }
    }

    /// `Grid::CalculateFluxDiv` over `[il,iu) x [jl,ju)`. Tile-bounded:
    /// every worker computes its own disjoint slice concurrently.
    pub fn calculate_flux_div(&mut self, il: usize, iu: usize, jl: usize, ju: usize) {
        for m in 0..self.nquant {
            for i in il..iu {
                for j in jl..ju {
                    self.fluxdiv[(m, i, j)] = crate::numerics::fluxdiv::flux_divergence(
                        self.ju[(m, i, j)],
                        self.ju[(m, i + 1, j)],
                        self.du,
                        self.jv[(m, i, j)],
                        self.jv[(m, i, j + 1)],
                        self.dv,
                    );
                }
            }
        }
    }

    // ---- Boundary operators -------------------------------------------
    //
    // All twelve canned operators write `cons` directly (including the
    // inflow operators: the reference writes `prim` for three of the four
    // inflow sides, which `original_source`'s own author notes is
    // inconsistent with the left side's `cons` write -- treated as a bug
    // and fixed here, see DESIGN.md).

    pub fn periodic_left(&mut self) {
        let i = 0;
        for m in 0..self.nquant {
            for k in 0..self.nghost {
                for j in self.nghost..self.nv - self.nghost {
                    self.cons[(m, i + k, j)] = self.cons[(m, self.nu - 2 * self.nghost + k, j)];
                }
            }
        }
    }

    pub fn periodic_right(&mut self) {
        let i = self.nu - 1;
        for m in 0..self.nquant {
            for k in 0..self.nghost {
                for j in self.nghost..self.nv - self.nghost {
                    self.cons[(m, i - k, j)] = self.cons[(m, 2 * self.nghost - 1 - k, j)];
                }
            }
        }
    }

    pub fn periodic_bot(&mut self) {
        let j = 0;
        for m in 0..self.nquant {
            for i in self.nghost..self.nu - self.nghost {
                for k in 0..self.nghost {
                    self.cons[(m, i, j + k)] = self.cons[(m, i, self.nv - 2 * self.nghost + k)];
                }
            }
        }
    }

    pub fn periodic_top(&mut self) {
        let j = self.nv - 1;
        for m in 0..self.nquant {
            for i in self.nghost..self.nu - self.nghost {
                for k in 0..self.nghost {
                    self.cons[(m, i, j - k)] = self.cons[(m, i, 2 * self.nghost - 1 - k)];
                }
            }
        }
    }

    pub fn periodic_lb(&mut self) {
        for m in 0..self.nquant {
            for i in 0..self.nghost {
                for j in 0..self.nghost {
                    self.cons[(m, i, j)] = self.cons[(m, self.nu - 2 * self.nghost + i, self.nv - 2 * self.nghost + j)];
                }
            }
        }
    }

    pub fn periodic_rb(&mut self) {
        for m in 0..self.nquant {
            for i in 0..self.nghost {
                for j in 0..self.nghost {
                    self.cons[(m, self.nu - self.nghost + i, j)] = self.cons[(m, i + self.nghost, self.nv - 2 * self.nghost + j)];
                }
            }
        }
    }

    pub fn periodic_rt(&mut self) {
        for m in 0..self.nquant {
            for i in 0..self.nghost {
                for j in 0..self.nghost {
                    self.cons[(m, self.nu - self.nghost + i, self.nv - self.nghost + j)] = self.cons[(m, i + self.nghost, j + self.nghost)];
                }
            }
        }
    }

    pub fn periodic_lt(&mut self) {
        for m in 0..self.nquant {
            for i in 0..self.nghost {
                for j in 0..self.nghost {
                    self.cons[(m, i, self.nv - self.nghost + j)] = self.cons[(m, self.nu - 2 * self.nghost + i, j + self.nghost)];
                }
            }
        }
    }

    pub fn smooth_left(&mut self) {
        for m in 0..self.nquant {
            for k in 0..self.nghost {
                for j in self.nghost..self.nv - self.nghost {
                    self.cons[(m, k, j)] = self.cons[(m, self.nghost, j)];
                }
            }
        }
    }

    pub fn smooth_right(&mut self) {
        let i = self.nu - 1;
        for m in 0..self.nquant {
            for k in 0..self.nghost {
                for j in self.nghost..self.nv - self.nghost {
                    self.cons[(m, i - k, j)] = self.cons[(m, self.nu - self.nghost - 1, j)];
                }
            }
        }
    }

    pub fn smooth_bot(&mut self) {
        for m in 0..self.nquant {
            for i in self.nghost..self.nu - self.nghost {
                for k in 0..self.nghost {
                    self.cons[(m, i, k)] = self.cons[(m, i, self.nghost)];
                }
            }
        }
    }

    pub fn smooth_top(&mut self) {
        let j = self.nv - 1;
        for m in 0..self.nquant {
            for i in self.nghost..self.nu - self.nghost {
                for k in 0..self.nghost {
                    self.cons[(m, i, j - k)] = self.cons[(m, i, self.nv - self.nghost - 1)];
                }
            }
        }
    }

    pub fn smooth_lb(&mut self) {
        for m in 0..self.nquant {
            for i in 0..self.nghost {
                for j in 0..self.nghost {
                    self.cons[(m, i, j)] = self.cons[(m, self.nghost, self.nghost)];
                }
            }
        }
    }

    pub fn smooth_rb(&mut self) {
        for m in 0..self.nquant {
            for i in 0..self.nghost {
                for j in 0..self.nghost {
                    self.cons[(m, self.nu - self.nghost + i, j)] = self.cons[(m, self.nu - 1 - self.nghost, self.nghost)];
                }
            }
        }
    }

    pub fn smooth_rt(&mut self) {
        for m in 0..self.nquant {
            for i in 0..self.nghost {
                for j in 0..self.nghost {
                    self.cons[(m, self.nu - self.nghost + i, self.nv - self.nghost + j)] =
                        self.cons[(m, self.nu - 1 - self.nghost, self.nv - 1 - self.nghost)];
                }
            }
        }
    }

    pub fn smooth_lt(&mut self) {
        for m in 0..self.nquant {
            for i in 0..self.nghost {
                for j in 0..self.nghost {
                    self.cons[(m, i, self.nv - self.nghost + j)] = self.cons[(m, self.nghost, self.nv - 1 - self.nghost)];
                }
            }
        }
    }

    pub fn reflecting_left(&mut self) {
        for k in 0..self.nghost {
            for j in self.nghost..self.nv - self.nghost {
                let src_i = 2 * self.nghost - 1 - k;
                self.cons[(0, k, j)] = self.cons[(0, src_i, j)];
                self.cons[(1, k, j)] = -self.cons[(1, src_i, j)];
                self.cons[(2, k, j)] = self.cons[(2, src_i, j)];
                self.cons[(3, k, j)] = self.cons[(3, src_i, j)];
            }
        }
    }

    pub fn reflecting_right(&mut self) {
        let i = self.nu - 1;
        for k in 0..self.nghost {
            for j in self.nghost..self.nv - self.nghost {
                let src_i = i - 2 * self.nghost + 1 + k;
                self.cons[(0, i - k, j)] = self.cons[(0, src_i, j)];
                self.cons[(1, i - k, j)] = -self.cons[(1, src_i, j)];
                self.cons[(2, i - k, j)] = self.cons[(2, src_i, j)];
                self.cons[(3, i - k, j)] = self.cons[(3, src_i, j)];
            }
        }
    }

    pub fn reflecting_bot(&mut self) {
        for i in self.nghost..self.nu - self.nghost {
            for k in 0..self.nghost {
                let src_j = 2 * self.nghost - 1 - k;
                self.cons[(0, i, k)] = self.cons[(0, i, src_j)];
                self.cons[(1, i, k)] = self.cons[(1, i, src_j)];
                self.cons[(2, i, k)] = -self.cons[(2, i, src_j)];
                self.cons[(3, i, k)] = self.cons[(3, i, src_j)];
            }
        }
    }

    pub fn reflecting_top(&mut self) {
        let j = self.nv - 1;
        for i in self.nghost..self.nu - self.nghost {
            for k in 0..self.nghost {
                let src_j = j - 2 * self.nghost + 1 + k;
                self.cons[(0, i, j - k)] = self.cons[(0, i, src_j)];
                self.cons[(1, i, j - k)] = self.cons[(1, i, src_j)];
                self.cons[(2, i, j - k)] = -self.cons[(2, i, src_j)];
                self.cons[(3, i, j - k)] = self.cons[(3, i, src_j)];
            }
        }
    }

    pub fn reflecting_lb(&mut self) {
        for i in 0..self.nghost {
            for j in 0..self.nghost {
                let (si, sj) = (2 * self.nghost - 1 - i, 2 * self.nghost - 1 - j);
                self.cons[(0, i, j)] = self.cons[(0, si, sj)];
                self.cons[(1, i, j)] = -self.cons[(1, si, sj)];
                self.cons[(2, i, j)] = -self.cons[(2, si, sj)];
                self.cons[(3, i, j)] = self.cons[(3, si, sj)];
            }
        }
    }

    pub fn reflecting_rb(&mut self) {
        for i in 0..self.nghost {
            for j in 0..self.nghost {
                let (si, sj) = (self.nu - 2 * self.nghost + i, 2 * self.nghost - 1 - j);
                self.cons[(0, self.nu - 1 - i, j)] = self.cons[(0, si, sj)];
                self.cons[(1, self.nu - 1 - i, j)] = -self.cons[(1, si, sj)];
                self.cons[(2, self.nu - 1 - i, j)] = -self.cons[(2, si, sj)];
                self.cons[(3, self.nu - 1 - i, j)] = self.cons[(3, si, sj)];
            }
        }
    }

    pub fn reflecting_rt(&mut self) {
        for i in 0..self.nghost {
            for j in 0..self.nghost {
                let (si, sj) = (self.nu - 2 * self.nghost + i, self.nv - 2 * self.nghost + j);
                self.cons[(0, self.nu - 1 - i, self.nv - 1 - j)] = self.cons[(0, si, sj)];
                self.cons[(1, self.nu - 1 - i, self.nv - 1 - j)] = -self.cons[(1, si, sj)];
                self.cons[(2, self.nu - 1 - i, self.nv - 1 - j)] = -self.cons[(2, si, sj)];
                self.cons[(3, self.nu - 1 - i, self.nv - 1 - j)] = self.cons[(3, si, sj)];
            }
        }
    }

    pub fn reflecting_lt(&mut self) {
        for i in 0..self.nghost {
            for j in 0..self.nghost {
                let (si, sj) = (2 * self.nghost - 1 - i, self.nv - 2 * self.nghost + j);
                self.cons[(0, i, self.nv - 1 - j)] = self.cons[(0, si, sj)];
                self.cons[(1, i, self.nv - 1 - j)] = -self.cons[(1, si, sj)];
                self.cons[(2, i, self.nv - 1 - j)] = -self.cons[(2, si, sj)];
                self.cons[(3, i, self.nv - 1 - j)] = self.cons[(3, si, sj)];
            }
        }
    }

    fn inflow_fill(&mut self, rho: f64, vx: f64, vy: f64, press: f64, cells: impl Iterator<Item = (usize, usize)>) {
        let prim = [rho, vx, vy, press];
        let mut cons = vec![0.0; self.nquant];
        // passive scalars default to zero on inflow; problems needing a
        // nonzero inflow scalar concentration should call
        // `point_prim_to_cons` directly with a fuller state.
        let mut full_prim = vec![0.0; self.nquant];
        full_prim[..4].copy_from_slice(&prim);
        self.point_prim_to_cons(&full_prim, &mut cons);
        for (i, j) in cells {
            for m in 0..self.nquant {
                self.cons[(m, i, j)] = cons[m];
            }
        }
    }

    pub fn inflow_left(&mut self, rho: f64, vx: f64, vy: f64, press: f64) {
        let nghost = self.nghost;
        let nv = self.nv;
        let cells = (0..nghost).flat_map(move |k| (nghost..nv - nghost).map(move |j| (k, j)));
        self.inflow_fill(rho, vx, vy, press, cells);
    }

    pub fn inflow_right(&mut self, rho: f64, vx: f64, vy: f64, press: f64) {
        let i = self.nu - 1;
        let nghost = self.nghost;
        let nv = self.nv;
        let cells = (0..nghost).flat_map(move |k| (nghost..nv - nghost).map(move |j| (i - k, j)));
        self.inflow_fill(rho, vx, vy, press, cells);
    }

    pub fn inflow_bot(&mut self, rho: f64, vx: f64, vy: f64, press: f64) {
        let nghost = self.nghost;
        let nu = self.nu;
        let cells = (nghost..nu - nghost).flat_map(move |i| (0..nghost).map(move |k| (i, k)));
        self.inflow_fill(rho, vx, vy, press, cells);
    }

    pub fn inflow_top(&mut self, rho: f64, vx: f64, vy: f64, press: f64) {
        let j = self.nv - 1;
        let nghost = self.nghost;
        let nu = self.nu;
        let cells = (nghost..nu - nghost).flat_map(move |i| (0..nghost).map(move |k| (i, j - k)));
        self.inflow_fill(rho, vx, vy, press, cells);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_grid() -> Grid {
        let mut cfg = Config::default();
        cfg.nu = 16;
        cfg.nv = 16;
        cfg.nghost = 2;
        Grid::new(&cfg).unwrap()
    }

    #[test]
    fn rejects_bad_reconstruct_order() {
        let mut cfg = Config::default();
        cfg.reconstruct_order = 7;
        assert!(matches!(Grid::new(&cfg), Err(Error::ReconstructOrder(7))));
    }

    #[test]
    fn periodic_left_right_wrap_cons() {
        let mut g = test_grid();
        for m in 0..g.nquant {
            for i in 0..g.nu {
                for j in 0..g.nv {
                    g.cons[(m, i, j)] = (i * 100 + j) as f64;
                }
            }
        }
        g.periodic_left();
        g.periodic_right();
        let j = g.nghost + 1;
        assert_eq!(g.cons[(0, 0, j)], g.cons[(0, g.nu - 2 * g.nghost, j)]);
    }

    #[test]
    fn reflecting_left_flips_normal_momentum_only() {
        let mut g = test_grid();
        for j in g.nghost..g.nv - g.nghost {
            g.cons[(0, 2 * g.nghost - 1, j)] = 1.0;
            g.cons[(1, 2 * g.nghost - 1, j)] = 2.0;
            g.cons[(2, 2 * g.nghost - 1, j)] = 3.0;
            g.cons[(3, 2 * g.nghost - 1, j)] = 4.0;
        }
        g.reflecting_left();
        let j = g.nghost + 1;
        assert_eq!(g.cons[(0, 0, j)], 1.0);
        assert_eq!(g.cons[(1, 0, j)], -2.0);
        assert_eq!(g.cons[(2, 0, j)], 3.0);
        assert_eq!(g.cons[(3, 0, j)], 4.0);
    }

    #[test]
    fn periodic_corners_copy_from_the_opposite_interior_corner_block() {
        let mut g = test_grid();
        for m in 0..g.nquant {
            for i in 0..g.nu {
                for j in 0..g.nv {
                    g.cons[(m, i, j)] = (i * 100 + j) as f64;
                }
            }
        }
        g.periodic_lb();
        g.periodic_rb();
        g.periodic_rt();
        g.periodic_lt();
        let ng = g.nghost;
        // Check the corner cell nearest each edge's own origin within its
        // ghost block (i.e. the (i=0, j=0) iterate of each operator).
        assert_eq!(g.cons[(0, 0, 0)], g.cons[(0, g.nu - 2 * ng, g.nv - 2 * ng)]);
        assert_eq!(g.cons[(0, g.nu - ng, 0)], g.cons[(0, ng, g.nv - 2 * ng)]);
        assert_eq!(g.cons[(0, g.nu - ng, g.nv - ng)], g.cons[(0, ng, ng)]);
        assert_eq!(g.cons[(0, 0, g.nv - ng)], g.cons[(0, g.nu - 2 * ng, ng)]);
    }

    #[test]
    fn reflecting_corner_flips_both_momenta() {
        let mut g = test_grid();
        let (si, sj) = (2 * g.nghost - 1, 2 * g.nghost - 1);
        g.cons[(0, si, sj)] = 1.0;
        g.cons[(1, si, sj)] = 2.0;
        g.cons[(2, si, sj)] = 3.0;
        g.cons[(3, si, sj)] = 4.0;
        g.reflecting_lb();
        assert_eq!(g.cons[(0, 0, 0)], 1.0);
        assert_eq!(g.cons[(1, 0, 0)], -2.0);
        assert_eq!(g.cons[(2, 0, 0)], -3.0);
        assert_eq!(g.cons[(3, 0, 0)], 4.0);
    }

    #[test]
    fn riemann_flux_of_uniform_state_is_zero_momentum_difference() {
        let mut g = test_grid();
        // Uniform rho=1, v=0, p=1 everywhere: zero wavespeed spread means
        // HLLC collapses to a single direct flux with no momentum in the
        // tangential direction and a pure-pressure normal term.
        for m in 0..g.nquant {
            for i in 0..=g.nu {
                for j in 0..=g.nv {
                    let val = if m == 0 { 1.0 } else if m == 3 { 2.5 } else { 0.0 };
                    g.lprim[(m, i, j)] = if m == 3 { 1.0 } else { val };
                    g.rprim[(m, i, j)] = if m == 3 { 1.0 } else { val };
                    g.lcons[(m, i, j)] = val;
                    g.rcons[(m, i, j)] = val;
                }
            }
        }
        for i in 0..=g.nu {
            for j in 0..=g.nv {
                g.lw[(i, j)] = -1.0;
                g.rw[(i, j)] = 1.0;
            }
        }
        g.calculate_riemann_j(0, g.nghost, g.nu - g.nghost, g.nghost, g.nv - g.nghost);
        let (i, j) = (g.nghost + 1, g.nghost + 1);
        assert_eq!(g.ju[(0, i, j)], 0.0);
        assert_eq!(g.ju[(2, i, j)], 0.0);
    }

    #[test]
    fn inflow_writes_cons_on_every_side() {
        let mut g = test_grid();
        g.inflow_left(2.0, 0.1, 0.0, 1.5);
        g.inflow_right(2.0, 0.1, 0.0, 1.5);
        g.inflow_bot(2.0, 0.1, 0.0, 1.5);
        g.inflow_top(2.0, 0.1, 0.0, 1.5);
        let j = g.nghost + 1;
        assert_eq!(g.cons[(0, 0, j)], 2.0);
        assert_eq!(g.cons[(0, g.nu - 1, j)], 2.0);
        let i = g.nghost + 1;
        assert_eq!(g.cons[(0, i, 0)], 2.0);
        assert_eq!(g.cons[(0, i, g.nv - 1)], 2.0);
    }
}
