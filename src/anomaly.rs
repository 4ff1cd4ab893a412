//! # Mean and true anomaly
//!
//! Time → mean anomaly → (Kepler) eccentric anomaly → true anomaly.
//!
//! The mean anomaly is measured from [`BinaryOrbit::reference_epoch`] and depends on the
//! period representation:
//!
//! ```text
//! constant period   : M = OMB · (Δt − ½ · (PBDOT / PB) · Δt²)
//! frequency series  : M = 2π · 86400 · Σᵢ FBi · Δt^(i+1) / (i+1)!
//! ```
//!
//! with `Δt = t − T0` in days. Anomalies are **cumulative**: they keep growing by 2π per
//! orbit, and the true anomaly is unwrapped to the same orbit count as the eccentric
//! anomaly so that downstream periastron advance sees the total angle travelled.
use crate::{
    binary_model::{BinaryOrbit, PeriodModel},
    binphase_errors::BinPhaseError,
    constants::{Radian, DPI, MJD, SECONDS_PER_DAY},
    engine_config::EngineConfig,
    kepler::eccentric_anomalies,
};

impl BinaryOrbit {
    fn mean_anomaly_since(&self, dt: f64, omb: f64) -> Radian {
        match &self.period {
            PeriodModel::ConstantPeriod { pb, pbdot } => omb * (dt - 0.5 * (pbdot / pb) * dt * dt),
            PeriodModel::FrequencySeries { fb } => {
                // dt^(i+1) / (i+1)!, built incrementally
                let mut taylor = 1.0;
                let cycles: f64 = fb
                    .iter()
                    .enumerate()
                    .map(|(i, fbi)| {
                        taylor *= dt / (i + 1) as f64;
                        fbi * taylor
                    })
                    .sum();
                cycles * DPI * SECONDS_PER_DAY
            }
        }
    }

    /// Mean anomaly (rad) at a barycentric MJD.
    pub fn mean_anomaly(&self, mjd: MJD) -> Radian {
        self.mean_anomaly_since(mjd - self.reference_epoch(), self.orbital_frequency())
    }

    /// Mean anomalies (rad) for a barycentric time series.
    pub fn mean_anomalies(&self, mjds: &[MJD]) -> Vec<Radian> {
        let t0 = self.reference_epoch();
        let omb = self.orbital_frequency();
        mjds.iter()
            .map(|&t| self.mean_anomaly_since(t - t0, omb))
            .collect()
    }

    /// Cumulative true anomalies (rad) for a barycentric time series.
    ///
    /// Return
    /// ----------
    /// * One true anomaly per input time, or
    ///   [`BinPhaseError::NumericalNonConvergence`] if a Kepler solve fails.
    pub fn true_anomalies(
        &self,
        mjds: &[MJD],
        config: &EngineConfig,
    ) -> Result<Vec<Radian>, BinPhaseError> {
        let ecc = self.eccentricity();
        let ecc_anomalies = eccentric_anomalies(&self.mean_anomalies(mjds), ecc, config)?;
        Ok(true_anomalies(&ecc_anomalies, ecc))
    }
}

/// Cumulative true anomaly from an eccentric anomaly.
///
/// ```text
/// U = 2·atan2(√(1+e)·sin(E/2), √(1−e)·cos(E/2))   mapped to [0, 2π)
/// U += ⌊E / 2π⌋ · 2π
/// ```
///
/// Arguments
/// -----------------
/// * `eccentric_anomaly`: cumulative eccentric anomaly `E` (rad).
/// * `eccentricity`: orbital eccentricity `0 <= e < 1`.
pub fn true_anomaly(eccentric_anomaly: Radian, eccentricity: f64) -> Radian {
    let half = 0.5 * eccentric_anomaly;
    let y = (1.0 + eccentricity).sqrt() * half.sin();
    let x = (1.0 - eccentricity).sqrt() * half.cos();
    let mut u = 2.0 * y.atan2(x);
    if u < 0.0 {
        u += DPI;
    }
    u + (eccentric_anomaly / DPI).floor() * DPI
}

pub fn true_anomalies(eccentric_anomalies: &[Radian], eccentricity: f64) -> Vec<Radian> {
    eccentric_anomalies
        .iter()
        .map(|&e_anom| true_anomaly(e_anom, eccentricity))
        .collect()
}
