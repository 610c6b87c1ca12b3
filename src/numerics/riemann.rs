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

//! Approximate Riemann solvers turning a pair of face states into a
//! numerical flux. HLLC (three-wave) is the default; HLLE (two-wave) is a
//! supplemental, cheaper alternative also present in
//! `original_source/src/riemann.cc`, kept here as a second [`FluxKind`].

/// Which approximate Riemann solver to evaluate at each face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluxKind {
    #[default]
    Hllc,
    Hlle,
}

/// Three-wave HLLC flux at one face. `dir` is the flux direction (`0` = u,
/// `1` = v). All state slices have the grid's `nquant` length; `j_out` is
/// written in full. Grounded on `original_source/src/riemann.cc::HLLC`.
pub fn hllc(dir: usize, lprim: &[f64], lcons: &[f64], lw: f64, rprim: &[f64], rcons: &[f64], rw: f64, j_out: &mut [f64]) {
    if lw == 0.0 && rw == 0.0 {
        j_out.fill(0.0);
        return;
    }

    let normal = 1 + dir;
    let lrho = lprim[0];
    let rrho = rprim[0];
    let lv = lprim[normal];
    let rv = rprim[normal];
    let lpress = lprim[3];
    let rpress = rprim[3];
    let le = lcons[3];
    let re = rcons[3];

    // supersonic right-going / left-going
    if rw < 0.0 {
        direct_flux(dir, rcons, rprim, j_out);
        return;
    }
    if lw > 0.0 {
        direct_flux(dir, lcons, lprim, j_out);
        return;
    }

    let mw = ((rrho * rv * (rv - rw) + rpress) - (lrho * lv * (lv - lw) + lpress)) / (rrho * (rv - rw) - lrho * (lv - lw));
    let rho2 = lrho * (lv - lw) / (mw - lw);
    let rho3 = rrho * (rv - rw) / (mw - rw);

    let mpress_l = lrho * lv * lv + lpress - lw * lrho * lv - rho2 * mw * mw + lw * rho2 * mw;
    let mpress_r = rrho * rv * rv + rpress - rw * rrho * rv - rho3 * mw * mw + rw * rho3 * mw;
    let mpress = if mw > 0.0 {
        mpress_l
    } else if mw < 0.0 {
        mpress_r
    } else {
        0.5 * (mpress_l + mpress_r)
    };

    if mw == 0.0 {
        j_out.fill(0.0);
        j_out[normal] += mpress;
        return;
    }

    if mw < 0.0 {
        let e3 = (rv * (re + rpress) - rw * re - mw * mpress) / (mw - rw);
        j_out[0] = rho3 * mw;
        if dir == 0 {
            j_out[1] = rho3 * mw * mw + mpress;
            j_out[2] = rho3 * rprim[2] * mw;
        } else {
            j_out[1] = rho3 * rprim[1] * mw;
            j_out[2] = rho3 * mw * mw + mpress;
        }
        j_out[3] = (e3 + mpress) * mw;
        for m in 4..j_out.len() {
            j_out[m] = rho3 * rprim[m] * mw;
        }
    } else {
        let e2 = (lv * (le + lpress) - lw * le - mw * mpress) / (mw - lw);
        j_out[0] = rho2 * mw;
        if dir == 0 {
            j_out[1] = rho2 * mw * mw + mpress;
            j_out[2] = rho2 * lprim[2] * mw;
        } else {
            j_out[1] = rho2 * lprim[1] * mw;
            j_out[2] = rho2 * mw * mw + mpress;
        }
        j_out[3] = (e2 + mpress) * mw;
        for m in 4..j_out.len() {
            j_out[m] = rho2 * lprim[m] * mw;
        }
    }
}

/// The direct (non-Riemann) flux of a single state, `F(U) = v*U + pressure
/// terms`. Used both for HLLC's supersonic branches and as the two local
/// fluxes HLLE averages between. Grounded on
/// `original_source/src/hydro.cc::CalculateJ`.
pub fn direct_flux(dir: usize, cons: &[f64], prim: &[f64], j_out: &mut [f64]) {
    let normal = 1 + dir;
    let v = prim[normal];
    for m in 0..j_out.len() {
        j_out[m] = v * cons[m];
        if m == normal {
            j_out[m] += prim[3];
        }
        if m == 3 {
            j_out[m] += v * prim[3];
        }
    }
}

/// Two-wave HLLE flux at one face, built from the two sides' direct fluxes
/// (`lj`/`rj`) rather than a full Riemann fan solve. Grounded on
/// `original_source/src/riemann.cc::HLLE`.
pub fn hlle(lcons: &[f64], lj: &[f64], lw: f64, rcons: &[f64], rj: &[f64], rw: f64, j_out: &mut [f64]) {
    for m in 0..j_out.len() {
        j_out[m] = if lw == 0.0 && rw == 0.0 {
            0.0
        } else if rw <= 0.0 {
            rj[m]
        } else if lw >= 0.0 {
            lj[m]
        } else {
            (lj[m] * rw - rj[m] * lw + rw * lw * (rcons[m] - lcons[m])) / (rw - lw)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_state(gamma: f64) -> ([f64; 4], [f64; 4]) {
        let prim = [1.0, 0.0, 0.0, 1.0];
        let mut cons = [0.0; 4];
        crate::numerics::transform::prim_to_cons(&prim, &mut cons, gamma);
        (prim, cons)
    }

    #[test]
    fn hllc_zero_wavespeeds_give_zero_flux() {
        let (prim, cons) = uniform_state(1.4);
        let mut j = [0.0; 4];
        hllc(0, &prim, &cons, 0.0, &prim, &cons, 0.0, &mut j);
        assert_eq!(j, [0.0; 4]);
    }

    #[test]
    fn hllc_matches_direct_flux_when_fully_supersonic_right() {
        let (prim, cons) = uniform_state(1.4);
        let mut expected = [0.0; 4];
        direct_flux(0, &cons, &prim, &mut expected);
        let mut j = [0.0; 4];
        // Rw < 0: fully right-supersonic, should reduce to the right state's
        // direct flux regardless of the left state.
        hllc(0, &prim, &cons, -5.0, &prim, &cons, -1.0, &mut j);
        for (a, b) in j.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn hllc_consistency_equal_states_reduce_to_the_analytic_flux() {
        // spec.md §8: "HLLC consistency" -- when Lprim == Rprim and both
        // sides equal a single admissible state, the face flux must equal
        // that state's analytic Euler flux, for any (subsonic) wavespeed
        // bracket straddling zero.
        let prim = [1.2, 0.4, -0.3, 0.9];
        let mut cons = [0.0; 4];
        crate::numerics::transform::prim_to_cons(&prim, &mut cons, 1.4);
        let mut expected = [0.0; 4];
        direct_flux(0, &cons, &prim, &mut expected);

        let mut j = [0.0; 4];
        hllc(0, &prim, &cons, -2.0, &prim, &cons, 3.0, &mut j);
        for (a, b) in j.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-10, "{a} vs {b}");
        }
    }

    #[test]
    fn hlle_reduces_to_left_flux_when_left_supersonic() {
        let (prim, cons) = uniform_state(1.4);
        let mut lj = [0.0; 4];
        direct_flux(0, &cons, &prim, &mut lj);
        let rj = lj;
        let mut j = [0.0; 4];
        hlle(&cons, &lj, 1.0, &cons, &rj, 5.0, &mut j);
        assert_eq!(j, lj);
    }
}
