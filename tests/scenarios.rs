//! End-to-end scenario and invariant tests driving the whole `Simulation`
//! pipeline (grid setup, worker pool, barrier choreography) rather than a
//! single numerical kernel in isolation. Resolutions are reduced from the
//! literal figures in `spec.md` §8 to keep these fast; tolerances are
//! loosened in proportion where the coarser mesh changes the expected
//! truncation error, and documented inline where that happens.

use approx::assert_relative_eq;
use euler2d::config::Config;
use euler2d::problem::{Problem, ReflectingGaussianPulse, SmoothAdvection, SodShockTube, UniformState};
use euler2d::simulation::Simulation;
use std::sync::Arc;

fn base_config() -> Config {
    let mut cfg = Config::default();
    cfg.nghost = 4;
    cfg.cfl_num = 0.4;
    cfg
}

fn total_mass(grid: &euler2d::Grid) -> f64 {
    let mut total = 0.0;
    for i in grid.nghost..grid.nu - grid.nghost {
        for j in grid.nghost..grid.nv - grid.nghost {
            total += grid.cons[(0, i, j)];
        }
    }
    total * grid.du * grid.dv
}

fn total_energy(grid: &euler2d::Grid) -> f64 {
    let mut total = 0.0;
    for i in grid.nghost..grid.nu - grid.nghost {
        for j in grid.nghost..grid.nv - grid.nghost {
            total += grid.cons[(3, i, j)];
        }
    }
    total * grid.du * grid.dv
}

/// Spec §8 scenario 3: a stationary uniform state under periodic boundaries
/// should not drift at all (flux divergence is exactly zero cell-by-cell),
/// to within floating-point roundoff accumulated over the run.
#[test]
fn stationary_uniform_state_does_not_drift() {
    let mut cfg = base_config();
    cfg.nthread = 3;
    cfg.nu = 24;
    cfg.nv = 24;

    let problem: Arc<dyn Problem> = Arc::new(UniformState::default());
    let sim = Simulation::new(cfg, problem).unwrap();
    let grid = sim.run_headless(100);

    for i in grid.nghost..grid.nu - grid.nghost {
        for j in grid.nghost..grid.nv - grid.nghost {
            for m in 0..grid.nquant {
                let expected = if m == 0 {
                    1.0
                } else if m == 3 {
                    2.5 // E = p/(gamma-1) for rho=1, v=0, p=1, gamma=1.4
                } else {
                    0.0
                };
                assert!(
                    (grid.cons[(m, i, j)] - expected).abs() < 1e-9,
                    "component {m} drifted at ({i},{j}): {} vs {expected}",
                    grid.cons[(m, i, j)]
                );
            }
        }
    }
}

/// Spec §8 scenario 6: running the same scenario with different thread
/// counts must not change the result beyond the floating-point summation
/// order that `spec.md` §1 explicitly declines to pin down.
#[test]
fn thread_count_does_not_change_the_result_beyond_roundoff() {
    fn run_with(nthread: usize) -> euler2d::Grid {
        let mut cfg = base_config();
        cfg.nthread = nthread;
        cfg.nu = 16;
        cfg.nv = 8;
        cfg.reconstruct_order = 2;
        let problem: Arc<dyn Problem> = Arc::new(SmoothAdvection::default());
        Simulation::new(cfg, problem).unwrap().run_headless(5)
    }

    let reference = run_with(1);
    for nthread in [2, 4] {
        let grid = run_with(nthread);
        for i in reference.nghost..reference.nu - reference.nghost {
            for j in reference.nghost..reference.nv - reference.nghost {
                for m in 0..reference.nquant {
                    let a = reference.cons[(m, i, j)];
                    let b = grid.cons[(m, i, j)];
                    assert!(
                        (a - b).abs() < 1e-8,
                        "nthread={nthread} diverged at ({i},{j},{m}): {a} vs {b}"
                    );
                }
            }
        }
    }
}

/// Spec §8 scenario 5: in a reflecting box, total mass and total energy are
/// conserved (flux-divergence telescopes to zero net flux through the
/// mirrored walls); momentum is explicitly exempted in the spec since the
/// scheme is diffusive there.
#[test]
fn reflecting_box_conserves_mass_and_energy() {
    let mut cfg = base_config();
    cfg.nthread = 2;
    cfg.nu = 32;
    cfg.nv = 32;
    cfg.umin = -1.0;
    cfg.umax = 1.0;
    cfg.vmin = -1.0;
    cfg.vmax = 1.0;

    let problem: Arc<dyn Problem> = Arc::new(ReflectingGaussianPulse::default());
    let sim = Simulation::new(cfg, problem.clone()).unwrap();

    // Capture the initial totals from a second, unevolved instance built
    // from the same problem (Simulation::new already applies one cons_lim +
    // boundary pass, so this is the state actually integrated from).
    let initial_cfg = {
        let mut c = base_config();
        c.nthread = 2;
        c.nu = 32;
        c.nv = 32;
        c
    };
    let initial = Simulation::new(initial_cfg, problem).unwrap();
    let initial_grid = initial.run_headless(0);
    let initial_mass = total_mass(&initial_grid);
    let initial_energy = total_energy(&initial_grid);

    let grid = sim.run_headless(20);
    let final_mass = total_mass(&grid);
    let final_energy = total_energy(&grid);

    assert_relative_eq!(final_mass, initial_mass, max_relative = 1e-8);
    assert_relative_eq!(final_energy, initial_energy, max_relative = 1e-8);
}

/// Spec §8 scenario 1 (reduced resolution): the Sod shock tube separates
/// into a left high-density / high-pressure region and a right low-density
/// / low-pressure region, with density monotonically non-increasing from
/// left to right through the fan/shock structure, and never leaving the
/// physical range spanned by the two initial states.
#[test]
fn sod_shock_tube_stays_within_physical_bounds_and_orders_correctly() {
    let mut cfg = base_config();
    cfg.nthread = 4;
    cfg.nu = 128;
    cfg.nv = 4;
    cfg.umin = -1.0;
    cfg.umax = 1.0;
    cfg.vmin = 0.0;
    cfg.vmax = 1.0;

    let problem: Arc<dyn Problem> = Arc::new(SodShockTube);
    let sim = Simulation::new(cfg, problem).unwrap();
    let grid = sim.run_headless(40);

    let j = grid.nghost + 1;
    let mut last_rho = f64::INFINITY;
    for i in grid.nghost..grid.nu - grid.nghost {
        let rho = grid.cons[(0, i, j)];
        let press = grid.prim[(3, i, j)];
        assert!(rho >= 0.125 - 1e-6 && rho <= 1.0 + 1e-6, "density {rho} left the physical range");
        assert!(press >= 0.1 - 1e-6 && press <= 1.0 + 1e-6, "pressure {press} left the physical range");
        // Allow a small overshoot for the PPM limiter's extrema tolerance
        // around the contact discontinuity, but forbid large non-monotone
        // excursions far from it.
        assert!(rho <= last_rho + 0.05, "density rose sharply moving rightwards at i={i}: {last_rho} -> {rho}");
        last_rho = rho;
    }

    // Left state is still intact several cells in from the left boundary.
    assert_relative_eq!(grid.cons[(0, grid.nghost + 2, j)], 1.0, max_relative = 1e-3);
}

/// Spec §8 scenario 2 (reduced resolution, coarser tolerance): a smooth
/// density wave advected one full period by a periodic-BC grid should
/// return close to its initial profile (the exact solution is a rigid
/// translation that coincides with the initial condition once `u*t`, `v*t`
/// are each a whole number of periods).
#[test]
fn smooth_advection_returns_close_to_initial_profile() {
    let mut cfg = base_config();
    cfg.nthread = 2;
    cfg.nu = 48;
    cfg.nv = 48;
    cfg.umin = 0.0;
    cfg.umax = 1.0;
    cfg.vmin = 0.0;
    cfg.vmax = 1.0;
    cfg.cfl_num = 0.3;

    let problem = SmoothAdvection { vx: 1.0, vy: 1.0 };
    let sim = Simulation::new(cfg.clone(), Arc::new(problem)).unwrap();
    // Advect for a short duration well inside the domain's period; compare
    // the L1 error against the initial profile shifted by `v*t` rather than
    // a full-period return, since a coarse mesh run for 100s of steps to
    // reach t=1 would be slow for a unit test.
    let grid = sim.run_headless(60);

    let du_domain = cfg.umax - cfg.umin;
    let dv_domain = cfg.vmax - cfg.vmin;
    let mut l1 = 0.0;
    let mut norm = 0.0;
    for i in grid.nghost..grid.nu - grid.nghost {
        for j in grid.nghost..grid.nv - grid.nghost {
            let u = (grid.u_cc[(i,)] - grid.time * 1.0).rem_euclid(du_domain);
            let v = (grid.v_cc[(j,)] - grid.time * 1.0).rem_euclid(dv_domain);
            let expected_rho = 1.0 + 0.2 * (std::f64::consts::TAU * u).sin() * (std::f64::consts::TAU * v).sin();
            l1 += (grid.cons[(0, i, j)] - expected_rho).abs();
            norm += 1.0;
        }
    }
    let mean_l1 = l1 / norm;
    assert!(mean_l1 < 5e-2, "advected profile drifted too far from the exact translate: mean L1 = {mean_l1}");
}
