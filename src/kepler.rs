//! # Kepler equation
//!
//! Eccentric anomaly from mean anomaly for elliptic binary orbits:
//!
//! ```text
//! E − e·sin(E) = M
//! ```
//!
//! The mean anomaly of a binary pulsar is cumulative (it grows by 2π per orbit since the
//! reference epoch), so the nearest whole number of orbits is split off first and the
//! equation is solved for `M` in `[−π, π]`; the count is added back to the result. The
//! reduced solution has the sign of `M`, so `⌊E / 2π⌋ = ⌊M / 2π⌋` still holds.
//!
//! The solve is a Newton–Raphson iteration seeded at `E₀ = M`, kept inside the bracket
//! `[M, M + e·sign(M)]` (clipped to `[−π, π]`). A Newton step that leaves the bracket is
//! replaced by a bisection step, which keeps orbits with `e → 1` convergent near
//! periastron.
//!
//! Orbits with `e` under [`EngineConfig::circular_eccentricity`] skip the solve and
//! return `E = M`.
use std::f64::consts::PI;

use crate::{
    binphase_errors::BinPhaseError,
    constants::{Radian, DPI},
    engine_config::EngineConfig,
};

/// Principal value of an angle in radians, in `[0, 2π)`.
pub fn principal_angle(a: f64) -> f64 {
    let r = a.rem_euclid(DPI);
    // rem_euclid rounds tiny negative inputs up to exactly 2π
    if r >= DPI {
        0.0
    } else {
        r
    }
}

/// Solve Kepler's equation for one mean anomaly.
///
/// Arguments
/// -----------------
/// * `mean_anomaly`: cumulative mean anomaly `M` (rad).
/// * `eccentricity`: orbital eccentricity, `0 <= e < 1`.
/// * `tolerance`: Newton step size (rad) below which the iteration stops.
/// * `max_iter`: maximum number of Newton iterations.
///
/// Return
/// ----------
/// * The eccentric anomaly `E` (rad), carrying the same orbit count as `M`.
/// * [`BinPhaseError::NumericalNonConvergence`] if `max_iter` steps do not reach `tolerance`.
pub fn solve_kepler(
    mean_anomaly: Radian,
    eccentricity: f64,
    tolerance: f64,
    max_iter: usize,
) -> Result<Radian, BinPhaseError> {
    let orbits = (mean_anomaly / DPI).round();
    let reduced = mean_anomaly - orbits * DPI;

    let kepler = |e_anom: f64| e_anom - eccentricity * e_anom.sin() - reduced;

    // E − M = e·sin(E) has the sign of M on [−π, π]
    let (mut lo, mut hi) = if reduced >= 0.0 {
        (reduced, (reduced + eccentricity).min(PI))
    } else {
        ((reduced - eccentricity).max(-PI), reduced)
    };

    let mut e_anom = reduced;
    for _ in 0..max_iter {
        let f = kepler(e_anom);
        if f < 0.0 {
            lo = e_anom;
        } else {
            hi = e_anom;
        }

        let newton = e_anom - f / (1.0 - eccentricity * e_anom.cos());
        let next = if (lo..=hi).contains(&newton) {
            newton
        } else {
            0.5 * (lo + hi)
        };

        let step = (next - e_anom).abs();
        e_anom = next;
        if step < tolerance {
            return Ok(e_anom + orbits * DPI);
        }
    }

    Err(BinPhaseError::NumericalNonConvergence {
        mean_anomaly,
        eccentricity,
        iterations: max_iter,
        residual: kepler(e_anom),
    })
}

/// Eccentric anomaly for one mean anomaly, honouring the circular-orbit shortcut.
pub fn eccentric_anomaly(
    mean_anomaly: Radian,
    eccentricity: f64,
    config: &EngineConfig,
) -> Result<Radian, BinPhaseError> {
    if eccentricity < config.circular_eccentricity {
        return Ok(mean_anomaly);
    }
    solve_kepler(
        mean_anomaly,
        eccentricity,
        config.kepler_tolerance,
        config.max_kepler_iterations,
    )
}

/// Eccentric anomalies for a series of mean anomalies.
///
/// The whole series shares one eccentricity, so the circular-orbit decision is made once.
pub fn eccentric_anomalies(
    mean_anomalies: &[Radian],
    eccentricity: f64,
    config: &EngineConfig,
) -> Result<Vec<Radian>, BinPhaseError> {
    if eccentricity < config.circular_eccentricity {
        log::debug!(
            "eccentricity {eccentricity:e} below {:e}: circular orbit, E = M",
            config.circular_eccentricity
        );
        return Ok(mean_anomalies.to_vec());
    }

    mean_anomalies
        .iter()
        .map(|&m| {
            solve_kepler(
                m,
                eccentricity,
                config.kepler_tolerance,
                config.max_kepler_iterations,
            )
        })
        .collect()
}
