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

//! Slope/parabola reconstruction of face states from cell-centred primitive
//! values, order 1 (piecewise constant), 2 (PLM, van Leer limiter) or 3
//! (PPM, Colella & Woodward style with an extrema-preserving limiter).
//!
//! Grounded on `original_source/src/reconstruct.cc`, translated term for
//! term; `PPM_ALWAYS_LIM`, `PPM_STRICT_LIM` and `WEIRD_PPM` are the same
//! tunables as the reference, now [`crate::config::Config`] fields instead
//! of compile-time constants.

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn fmin3(a: f64, b: f64, c: f64) -> f64 {
    a.min(b).min(c)
}

fn fmin4(a: f64, b: f64, c: f64, d: f64) -> f64 {
    a.min(b).min(c).min(d)
}

fn vl_lim(r: f64) -> f64 {
    (r + r.abs()) / (1.0 + r.abs())
}

/// Tunables controlling the PPM limiter, carried at runtime instead of as
/// compile-time `#define`s.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PpmTunables {
    pub always_lim: bool,
    pub strict_lim: bool,
    pub weird_ppm: bool,
}

impl Default for PpmTunables {
    fn default() -> Self {
        Self {
            always_lim: false,
            strict_lim: true,
            weird_ppm: false,
        }
    }
}

/// Second-order piecewise-linear reconstruction (van Leer limiter) of the
/// left/right face values of the cell holding `q2`, given its neighbours
/// `q1` (previous cell) and `q3` (next cell) along the reconstruction axis.
pub fn plm(q1: f64, q2: f64, q3: f64) -> (f64, f64) {
    let half_step = if q3 - q2 == 0.0 {
        0.0
    } else {
        0.5 * vl_lim((q2 - q1) / (q3 - q2)) * (q3 - q2)
    };
    (q2 - half_step, q2 + half_step)
}

fn ppm_lim_parabola(
    mut ql: f64,
    mut qr: f64,
    q0: f64,
    q1: f64,
    q2: f64,
    q3: f64,
    q4: f64,
    tun: PpmTunables,
) -> (f64, f64) {
    let d = if tun.strict_lim { 1.0 } else { 1.26 };

    if (qr - q2) * (q2 - ql) <= 0.0 || (q3 - q2) * (q2 - q1) <= 0.0 {
        let curvc = (q1 + q3) - 2.0 * q2;
        let curvl = (q0 + q2) - 2.0 * q1;
        let curvr = (q2 + q4) - 2.0 * q3;
        let curvf = if tun.weird_ppm {
            4.0 * ((ql + qr) - 2.0 * q2)
        } else {
            6.0 * ((ql + qr) - 2.0 * q2)
        };

        let curv = if sign(curvl) == sign(curvc) && sign(curvc) == sign(curvr) && sign(curvc) == sign(curvf) {
            sign(curvf) * fmin4(d * curvl.abs(), d * curvc.abs(), d * curvr.abs(), curvf.abs())
        } else {
            0.0
        };

        if curvf != 0.0 {
            ql = q2 + (ql - q2) * curv / curvf;
            qr = q2 + (qr - q2) * curv / curvf;
        } else {
            ql = q2;
            qr = q2;
        }
    } else if (ql - q2).abs() >= 2.0 * (qr - q2).abs() {
        ql = q2 - 2.0 * (qr - q2);
    } else if (qr - q2).abs() >= 2.0 * (ql - q2).abs() {
        qr = q2 - 2.0 * (ql - q2);
    }

    (ql, qr)
}

/// Third-order parabolic reconstruction (PPM) of the left/right face values
/// of the cell holding `q2`, given the four-point stencil `q0..q4` centred
/// on it. Seeds both faces with the standard 7/12-1/12 interpolant, applies
/// the extrema-preserving curvature limiter, then `ppm_lim_parabola`.
pub fn fancy_ppm(q0: f64, q1: f64, q2: f64, q3: f64, q4: f64, tun: PpmTunables) -> (f64, f64) {
    let c = if tun.strict_lim { 1.0 } else { 1.26 };

    let mut ql = (7.0 * (q1 + q2) - (q0 + q3)) / 12.0;
    let curvl = (q0 + q2) - 2.0 * q1;
    let curvr = (q1 + q3) - 2.0 * q2;
    let curvf = 3.0 * ((q1 + q2) - 2.0 * ql);
    if tun.always_lim || (curvr - curvf) * (curvl - curvf) > 0.0 {
        let curv = if sign(curvl) == sign(curvf) && sign(curvf) == sign(curvr) {
            sign(curvf) * fmin3(c * curvl.abs(), c * curvr.abs(), curvf.abs())
        } else {
            0.0
        };
        ql = 0.5 * (q1 + q2) - curv / 6.0;
    }

    let mut qr = (7.0 * (q2 + q3) - (q1 + q4)) / 12.0;
    let curvl = (q1 + q3) - 2.0 * q2;
    let curvr = (q2 + q4) - 2.0 * q3;
    let curvf = 3.0 * ((q2 + q3) - 2.0 * qr);
    if tun.always_lim || (curvr - curvf) * (curvl - curvf) > 0.0 {
        let curv = if sign(curvl) == sign(curvf) && sign(curvf) == sign(curvr) {
            sign(curvf) * fmin3(c * curvl.abs(), c * curvr.abs(), curvf.abs())
        } else {
            0.0
        };
        qr = 0.5 * (q2 + q3) - curv / 6.0;
    }

    let (mut ql, mut qr) = ppm_lim_parabola(ql, qr, q0, q1, q2, q3, q4, tun);

    if tun.strict_lim {
        ql = ql.min(q1.max(q2)).max(q1.min(q2));
        qr = qr.min(q3.max(q2)).max(q3.min(q2));
    }

    (ql, qr)
}

/// Reconstruct the left/right face values of the cell holding `q2`, from a
/// five-point stencil `q0..q4` (only `q1..q3` are used below order 3).
/// Returns `(ql, qr)`: the extrapolated value at the cell's left face and
/// right face respectively.
pub fn reconstruct_cell(order: i32, q0: f64, q1: f64, q2: f64, q3: f64, q4: f64, tun: PpmTunables) -> (f64, f64) {
    match order {
        1 => (q2, q2),
        2 => plm(q1, q2, q3),
        3 => fancy_ppm(q0, q1, q2, q3, q4, tun),
        _ => (0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order1_is_piecewise_constant() {
        assert_eq!(reconstruct_cell(1, 1.0, 2.0, 3.0, 4.0, 5.0, PpmTunables::default()), (3.0, 3.0));
    }

    #[test]
    fn plm_reduces_to_zero_slope_at_local_extremum() {
        let (ql, qr) = plm(1.0, 2.0, 1.0);
        assert_eq!(ql, 2.0);
        assert_eq!(qr, 2.0);
    }

    #[test]
    fn plm_is_exact_for_linear_data() {
        let (ql, qr) = plm(1.0, 2.0, 3.0);
        assert!((ql - 1.5).abs() < 1e-12);
        assert!((qr - 2.5).abs() < 1e-12);
    }

    #[test]
    fn ppm_on_uniform_data_reproduces_the_constant() {
        let tun = PpmTunables::default();
        let (ql, qr) = fancy_ppm(5.0, 5.0, 5.0, 5.0, 5.0, tun);
        assert!((ql - 5.0).abs() < 1e-12);
        assert!((qr - 5.0).abs() < 1e-12);
    }

    #[test]
    fn ppm_stays_within_neighbor_bounds_for_monotone_data() {
        let tun = PpmTunables::default();
        let (ql, qr) = fancy_ppm(1.0, 2.0, 3.0, 4.0, 5.0, tun);
        assert!(ql >= 2.0 - 1e-9 && ql <= 3.0 + 1e-9);
        assert!(qr >= 3.0 - 1e-9 && qr <= 4.0 + 1e-9);
    }
}
