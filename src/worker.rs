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

//! The persistent worker pool and the per-timestep pipeline.
//!
//! Grounded on `original_source/src/main.cc`'s `IntegratorThread`: this
//! crate follows its barrier choreography call-for-call, but deviates from
//! it in one way spec.md §5 specifically asks for.
//!
//! The reference has every thread redundantly recompute `Reconstruct`,
//! `PrimLim`/`PrimToCons` on the faces, `Wavespeed`, `CalculateFluxDiv` and
//! `CalculateSrc` over the *entire* grid (its `local_grid` is attached, via
//! `AttachReference`, to the *whole* of `global_grid`'s arrays, not a tile
//! of them) -- harmless there because every thread writes the same values
//! to the same cells, but a data race by the letter of the C++ (and Rust)
//! memory model, and not what spec.md §5's "over each worker's tile"
//! wording describes. This crate instead makes every one of these
//! genuinely tile-bounded: each thread touches only its own
//! [`TileGeometry`]-derived range, with no two threads ever writing the
//! same cell. `calculate_riemann_j` and `add_flux_div_src` were already
//! disjoint per-thread in the reference and remain so here.
//!
//! A few barriers the reference doesn't need still appear here (marked
//! `// EXTRA BARRIER`), not because of a leader/follower split any more,
//! but because tile boundaries aren't quite stencil-aligned: reconstruction
//! and wavespeed write one face past their own interior range at the
//! domain's two outer edges ([`TileGeometry::recon_range`]), so a tile's
//! own face read can depend on a face its neighbor wrote. See `DESIGN.md`.

use crate::barrier::Barrier;
use crate::broadcast::{render_frame, FrameSender};
use crate::config::Config;
use crate::grid::Grid;
use crate::integrator::Integrator;
use crate::problem::Problem;
use std::sync::Arc;
use std::thread::JoinHandle;

/// The cell/face index range one worker thread owns along axis 0 (`u`).
/// The grid is tiled along `u` only; every thread's range spans the full
/// extent of `v`. `iuf` is `iu` widened by one cell on the last thread, so
/// the rightmost internal face of the whole domain gets a flux.
///
/// The reference additionally carries `ilr`/`iur` ("for reconstruction"),
/// but nothing in `original_source` ever reads them -- `Reconstruct`
/// always loops the full grid regardless of thread there, since its
/// `local_grid` aliases the whole global array. spec.md §5's tile geometry
/// gives those fields real meaning for a genuinely tile-bounded
/// reconstruction, realized here by [`TileGeometry::recon_range`] (which is
/// numerically `(ilr, iur, jl, ju)` in spec.md's notation; `iur` coincides
/// with `iuf`, so only one field is kept).
#[derive(Debug, Clone, Copy)]
pub struct TileGeometry {
    pub tid: usize,
    pub il: usize,
    pub iu: usize,
    pub iuf: usize,
    pub jl: usize,
    pub ju: usize,
    /// The grid's full `u` extent (interior + both ghost margins). Only
    /// needed to find the domain's true outer edge from a single tile's
    /// own geometry; see [`TileGeometry::ghost_refresh_range`].
    pub nu: usize,
}

impl TileGeometry {
    /// Partition `nu - 2*nghost` interior cells across `nthread` threads.
    /// Mirrors `IntegratorThread::IntegratorThread`'s tile arithmetic.
    pub fn partition(nthread: usize, nu: usize, nghost: usize, nv: usize) -> Vec<TileGeometry> {
        let ni_per_thread = (nu - 2 * nghost + nthread - 1) / nthread;
        (0..nthread)
            .map(|tid| {
                let il = nghost + ni_per_thread * tid;
                let (iu, iuf) = if tid == nthread - 1 {
                    let iu = nu - nghost;
                    (iu, iu + 1)
                } else {
                    let iu = nghost + ni_per_thread * (tid + 1);
                    (iu, iu)
                };
                TileGeometry { tid, il, iu, iuf, jl: nghost, ju: nv - nghost, nu }
            })
            .collect()
    }

    /// The cell range `reconstruct`, `limit_and_convert_faces` and
    /// `wavespeed` operate over for this tile (spec.md §5's `(ilr, iur, jl,
    /// ju)`): `u` is widened by one only at the domain's two true outer
    /// edges (a middle tile's neighbor supplies the shared boundary value
    /// on its own side, same reasoning as [`TileGeometry::face_range`]);
    /// `v` is never split across tiles, so every tile independently covers
    /// the full `v` extent (ghost cells included) to reach both of `v`'s own
    /// domain edges.
    pub fn recon_range(&self) -> (usize, usize, usize, usize) {
        let il = if self.tid == 0 { self.il - 1 } else { self.il };
        let nv_total = self.jl + self.ju;
        (il, self.iuf, 0, nv_total)
    }

    /// The cell range a tile owns when refreshing `prim` from `cons` right
    /// after the leader's boundary fill (spec.md §5 step 7, "boundary cells
    /// now need a final prim refresh"): its own interior range, plus -- only
    /// for the first and last tile -- the full depth of ghost cells on its
    /// own outer edge, the only ghost cells `Boundary` just wrote that this
    /// tile alone is responsible for. `v` is never split, so every tile owns
    /// the complete ghost depth on both `v` edges here too.
    pub fn ghost_refresh_range(&self) -> (usize, usize, usize, usize) {
        let il = if self.tid == 0 { 0 } else { self.il };
        let iu = if self.iuf > self.iu { self.nu } else { self.iu };
        let nv_total = self.jl + self.ju;
        (il, iu, 0, nv_total)
    }

    /// The face-index range this tile owns for a direction-`dir` Riemann
    /// flux evaluation: `(il, iu, jl, ju)` with the widened bound on
    /// whichever axis `dir` points along.
    ///
    /// Along the split axis (`u`, `dir == 0`), only the last tile's `iu`
    /// needs to grow by one (to `iuf`) to reach the domain's final face --
    /// every other tile's own right edge is an interior face another tile
    /// also owns the left side of. Along the untiled axis (`v`, `dir == 1`),
    /// every tile shares the same full `[jl, ju)` cell range, so every tile
    /// -- not just one -- must widen `ju` by one to reach that axis's final
    /// face; this is still race-free because each tile writes it at a
    /// distinct, disjoint `i` range.
    pub fn face_range(&self, dir: usize) -> (usize, usize, usize, usize) {
        if dir == 0 {
            (self.il, self.iuf, self.jl, self.ju)
        } else {
            (self.il, self.iu, self.jl, self.ju + 1)
        }
    }
}

/// A raw, non-owning handle to the one [`Grid`] shared by every worker
/// thread, in the same spirit as [`crate::array::TileView`].
///
/// # Safety
///
/// Every worker thread holds a clone of the same pointer. Mutation is only
/// ever sound because of two invariants, both enforced by convention at
/// call sites in this module, not by the type system:
///
/// 1. Operations this module marks leader-only are called from exactly one
///    thread (`tid == 0`) per pipeline phase.
/// 2. Operations this module marks tile-bounded are called from every
///    thread, each restricted to its own [`TileGeometry`]'s disjoint range,
///    established once at startup by [`TileGeometry::partition`].
///
/// Crucially, every phase transition passes through [`Barrier::wait`],
/// which internally locks and unlocks the same `Mutex` on every
/// participating thread. That shared lock/unlock pair is what makes a
/// leader-only write visible to every other thread's subsequent read: the
/// `Mutex` establishes the happens-before edge, not `Grid`'s own fields.
/// A `SharedGrid` must never outlive the `Grid` it was built from.
#[derive(Clone, Copy)]
struct SharedGrid(*mut Grid);

unsafe impl Send for SharedGrid {}
unsafe impl Sync for SharedGrid {}

impl SharedGrid {
    /// # Safety
    /// See the struct-level safety note: the caller must hold up its end
    /// of the leader-only/tile-bounded discipline.
    #[allow(clippy::mut_from_ref)]
    unsafe fn get(&self) -> &mut Grid {
        &mut *self.0
    }
}

/// Advance one full timestep (every RK stage of `integrator`), following
/// `IntegratorThread::take_timestep`.
#[allow(clippy::too_many_arguments)]
fn take_timestep(
    tid: usize,
    geo: &TileGeometry,
    shared: SharedGrid,
    integrator: &Integrator,
    problem: &dyn Problem,
    barrier: &Barrier,
    cfl_num: f64,
) {
    if tid == 0 {
        let grid = unsafe { shared.get() };
        grid.stage = 0;
        grid.cons_gen.copy_data_from(&grid.cons).expect("cons/cons_gen shapes must match");
        grid.dt = f64::MAX;
    }
    barrier.wait();

    loop {
        let stage = unsafe { shared.get() }.stage;
        if stage >= integrator.nstep() {
            break;
        }

        for dir in 0..2 {
            {
                let (il, iu, jl, ju) = geo.recon_range();
                unsafe { shared.get() }.reconstruct(dir, il, iu, jl, ju);
            }
            barrier.wait(); // EXTRA BARRIER: a tile's own face read below can depend on the face its neighbor just wrote one cell past its own range (see recon_range).

            {
                let (il, iu, jl, ju) = geo.recon_range();
                unsafe { shared.get() }.limit_and_convert_faces(il, iu, jl, ju);
            }
            barrier.wait();

            {
                let (il, iu, jl, ju) = geo.recon_range();
                unsafe { shared.get() }.wavespeed(dir, il, iu, jl, ju);
            }
            barrier.wait();

            if tid == 0 && stage == 0 {
                unsafe { shared.get() }.determine_dt(dir);
            }
            barrier.wait();

            let (il, iu, jl, ju) = geo.face_range(dir);
            unsafe { shared.get() }.calculate_riemann_j(dir, il, iu, jl, ju);
            barrier.wait(); // EXTRA BARRIER: guards the next dir's tile-bounded reconstruct (and, after dir==1, CalculateFluxDiv) against this dir's still-in-flight tile reads/writes at a shared face.
        }

        if tid == 0 {
            let grid = unsafe { shared.get() };
            if stage == 0 {
                grid.dt *= cfl_num;
            }
            grid.step_dt = integrator.time_weight(stage) * grid.dt;
            grid.step_time = if stage == 0 {
                grid.time
            } else {
                grid.time + integrator.time_weight(stage - 1) * grid.dt
            };
        }
        barrier.wait();

        {
            let grid = unsafe { shared.get() };
            grid.calculate_flux_div(geo.il, geo.iu, geo.jl, geo.ju);
            problem.calculate_src(grid, geo.il, geo.iu, geo.jl, geo.ju);
        }
        // No barrier: AddFluxDivSrc below reads fluxdiv/src only over this
        // same thread's own [geo.il, geo.iu) x [geo.jl, geo.ju) tile, just
        // written by this same thread above.
        {
            let grid = unsafe { shared.get() };
            let dt = grid.dt;
            integrator.add_flux_div_src(grid, stage, dt, geo.il, geo.iu, geo.jl, geo.ju);
        }
        barrier.wait();

        {
            let grid = unsafe { shared.get() };
            grid.cons_lim_range(geo.il, geo.iu, geo.jl, geo.ju);
            grid.cons_to_prim_range(geo.il, geo.iu, geo.jl, geo.ju);
        }
        barrier.wait();

        if tid == 0 {
            let grid = unsafe { shared.get() };
            let step_time = grid.step_time;
            problem.boundary(grid, step_time);
        }
        barrier.wait();

        {
            let (il, iu, jl, ju) = geo.ghost_refresh_range();
            let grid = unsafe { shared.get() };
            grid.cons_lim_range(il, iu, jl, ju);
            grid.cons_to_prim_range(il, iu, jl, ju);
        }
        if tid == 0 {
            unsafe { shared.get() }.stage += 1;
        }
        barrier.wait();
    }

    if tid == 0 {
        let grid = unsafe { shared.get() };
        grid.time += grid.dt;
    }
    barrier.wait();
}

#[allow(clippy::too_many_arguments)]
fn thread_main(
    tid: usize,
    geo: TileGeometry,
    shared: SharedGrid,
    integrator: Arc<Integrator>,
    problem: Arc<dyn Problem>,
    barrier: Arc<Barrier>,
    config: Config,
    frame_sender: Option<FrameSender>,
    epochs: u64,
) {
    let mut out_time = 0.0;

    for epoch in 0..epochs {
        if tid == 0 {
            let grid = unsafe { shared.get() };
            if epoch % 100 == 0 {
                log::info!(
                    "t = {:.3e}\tdt = {:.3e}\t{:.2}%",
                    grid.time,
                    grid.dt,
                    100.0 * grid.time / config.out_tf
                );
            }
            if grid.time >= out_time {
                if let Some(sender) = &frame_sender {
                    let frame = render_frame(grid, &config);
                    sender.publish(frame);
                    log::debug!("broadcast: frame published at t = {:.3e}", grid.time);
                }
                out_time = grid.time + config.out_dt();
            }
        }

        take_timestep(tid, &geo, shared, &integrator, problem.as_ref(), &barrier, config.cfl_num);
    }
}

/// Owns the fixed thread pool driving a [`Grid`] to completion. Workers are
/// spawned once, here, and joined once, in [`WorkerPool::join`] -- never
/// respawned inside the step loop, per `spec.md` §5.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    grid_ptr: *mut Grid,
}

unsafe impl Send for WorkerPool {}

impl WorkerPool {
    pub fn spawn(grid: Grid, integrator: Integrator, problem: Arc<dyn Problem>, config: &Config, frame_sender: Option<FrameSender>, epochs: u64) -> Self {
        let geometries = TileGeometry::partition(config.nthread, grid.nu, grid.nghost, grid.nv);
        let barrier = Arc::new(Barrier::new(config.nthread));
        let integrator = Arc::new(integrator);
        let grid_ptr = Box::into_raw(Box::new(grid));
        let shared = SharedGrid(grid_ptr);

        let handles = geometries
            .into_iter()
            .map(|geo| {
                let tid = geo.tid;
                let integrator = Arc::clone(&integrator);
                let problem = Arc::clone(&problem);
                let barrier = Arc::clone(&barrier);
                let frame_sender = frame_sender.clone();
                let config = config.clone();
                std::thread::spawn(move || {
                    thread_main(tid, geo, shared, integrator, problem, barrier, config, frame_sender, epochs);
                })
            })
            .collect();

        Self { handles, grid_ptr }
    }

    /// Block until every worker has run its `epochs` and exited, then
    /// reclaim the grid.
    pub fn join(self) -> Grid {
        for handle in self.handles {
            let _ = handle.join();
        }
        *unsafe { Box::from_raw(self.grid_ptr) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_covers_the_whole_interior_with_no_gaps() {
        let geo = TileGeometry::partition(4, 16 + 8, 4, 16 + 8);
        assert_eq!(geo[0].il, 4);
        assert_eq!(geo.last().unwrap().iu, 20);
        for pair in geo.windows(2) {
            assert_eq!(pair[0].iu, pair[1].il);
        }
    }

    #[test]
    fn last_tile_widens_iuf_by_one() {
        let geo = TileGeometry::partition(2, 16 + 8, 4, 16 + 8);
        assert_eq!(geo[0].iuf, geo[0].iu);
        assert_eq!(geo[1].iuf, geo[1].iu + 1);
    }

    #[test]
    fn face_range_widens_iu_only_for_the_last_tile_along_dir0() {
        let geo = TileGeometry::partition(2, 16 + 8, 4, 16 + 8);
        let (il0, iu0, jl0, ju0) = geo[0].face_range(0);
        assert_eq!((il0, iu0), (geo[0].il, geo[0].iu));
        assert_eq!((jl0, ju0), (geo[0].jl, geo[0].ju));

        let (_, iu1, ..) = geo[1].face_range(0);
        assert_eq!(iu1, geo[1].iu + 1);
    }

    #[test]
    fn face_range_widens_ju_for_every_tile_along_dir1() {
        // The grid is only strip-decomposed along u: every tile shares the
        // full v range and must independently reach v's final face.
        let geo = TileGeometry::partition(3, 16 + 8, 4, 16 + 8);
        for g in &geo {
            let (il, iu, jl, ju) = g.face_range(1);
            assert_eq!((il, iu), (g.il, g.iu));
            assert_eq!((jl, ju), (g.jl, g.ju + 1));
        }
    }

    #[test]
    fn recon_range_widens_u_by_one_only_at_the_outer_edges_and_covers_full_v() {
        let geo = TileGeometry::partition(3, 16 + 8, 4, 16 + 8);

        let (il0, iu0, jl0, ju0) = geo[0].recon_range();
        assert_eq!(il0, geo[0].il - 1);
        assert_eq!(iu0, geo[0].iuf);
        assert_eq!((jl0, ju0), (0, 16 + 8));

        let (il_mid, iu_mid, ..) = geo[1].recon_range();
        assert_eq!((il_mid, iu_mid), (geo[1].il, geo[1].iuf));

        let (_, iu_last, ..) = geo[2].recon_range();
        assert_eq!(iu_last, geo[2].iuf);
        assert!(geo[2].iuf > geo[2].iu);
    }

    #[test]
    fn ghost_refresh_range_reaches_the_domain_edge_only_for_the_outer_tiles() {
        let geo = TileGeometry::partition(3, 16 + 8, 4, 16 + 8);

        let (il0, _, jl0, ju0) = geo[0].ghost_refresh_range();
        assert_eq!(il0, 0);
        assert_eq!((jl0, ju0), (0, 16 + 8));

        let (il_mid, iu_mid, ..) = geo[1].ghost_refresh_range();
        assert_eq!((il_mid, iu_mid), (geo[1].il, geo[1].iu));

        let (_, iu_last, ..) = geo[2].ghost_refresh_range();
        assert_eq!(iu_last, geo[2].nu);
    }

    #[test]
    fn single_thread_runs_a_handful_of_epochs_without_panicking() {
        use crate::problem::UniformState;

        let mut cfg = Config::default();
        cfg.nthread = 1;
        cfg.nu = 16;
        cfg.nv = 16;
        cfg.nghost = 2;
        cfg.max_epoch = 3.0;

        let mut grid = Grid::new(&cfg).unwrap();
        grid.init_uv_coord();
        let problem: Arc<dyn Problem> = Arc::new(UniformState::default());
        problem.init_cond(&mut grid);
        grid.prim_to_cons_full();

        let integrator = Integrator::new(cfg.scheme);
        let pool = WorkerPool::spawn(grid, integrator, problem, &cfg, None, 3);
        let grid = pool.join();
        assert!(grid.time > 0.0);
    }
}
