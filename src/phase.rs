//! # Binary orbital phase
//!
//! [`BinaryPhaseEngine`] turns a timing model and barycentric arrival times into
//! fractional orbital phases in `[0, 1)`, measured from the ascending node:
//!
//! ```text
//! t ──► M (mean anomaly) ──► E (Kepler) ──► U (true anomaly) ──► ω(U)
//! phase = ((U mod 2π) + ω + 2π) mod 2π / 2π
//! ```
//!
//! The orbit parameterization is selected once when the engine is built
//! ([`BinaryOrbit::from_par`]); every call recomputes phases from scratch and the engine
//! holds no mutable state, so one engine can be shared between threads.
//!
//! Precision is that of `f64`: for mean anomalies up to ~10⁴ rad the phase error stays
//! around 1e-12 rad.
//!
//! ## Example
//!
//! ```rust
//! use binphase::{par_file::ParFile, phase::BinaryPhaseEngine};
//!
//! let par: ParFile = "BINARY BT\nPB 1.0\nT0 55000.0\nOM 90.0\nECC 0.0\n".parse().unwrap();
//! let engine = BinaryPhaseEngine::new(&par).unwrap();
//!
//! let phases = engine.phases(&[55000.0, 55000.25, 55000.5]).unwrap();
//! assert!((phases[1] - 0.5).abs() < 1e-12);
//! ```
use hifitime::Epoch;
use itertools::{izip, Itertools};
use serde::{Deserialize, Serialize};

use crate::{
    anomaly::true_anomalies,
    binary_model::BinaryOrbit,
    binphase_errors::BinPhaseError,
    constants::{Phase, Radian, DPI, MJD},
    engine_config::EngineConfig,
    kepler::{eccentric_anomalies, principal_angle},
    par_file::ParFile,
    time::epochs_to_mjd_tdb,
};

/// Every intermediate quantity of a phase computation at one epoch.
///
/// Angles are in radians; anomalies are cumulative since the reference epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalState {
    pub mjd: MJD,
    pub mean_anomaly: Radian,
    pub eccentric_anomaly: Radian,
    pub true_anomaly: Radian,
    pub periastron_argument: Radian,
    pub phase: Phase,
    /// Complete orbits since the reference epoch, `⌊E / 2π⌋`
    pub orbit_number: i64,
}

/// Fractional orbital phase from a true anomaly and an argument of periastron.
///
/// The result is in `[0, 1)`, also when rounding would otherwise land on 1.
pub fn orbital_phase(true_anomaly: Radian, periastron_argument: Radian) -> Phase {
    let angle = principal_angle(principal_angle(true_anomaly) + periastron_argument + DPI);
    let phase = angle / DPI;
    if phase >= 1.0 {
        0.0
    } else {
        phase
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryPhaseEngine {
    orbit: BinaryOrbit,
    config: EngineConfig,
}

impl BinaryPhaseEngine {
    /// Build an engine with the default [`EngineConfig`].
    pub fn new(par: &ParFile) -> Result<Self, BinPhaseError> {
        Self::with_config(par, EngineConfig::default())
    }

    /// Build an engine from a timing model.
    ///
    /// Arguments
    /// -----------------
    /// * `par`: parsed timing-model parameters.
    /// * `config`: numerical configuration, validated here.
    ///
    /// Return
    /// ----------
    /// * The engine, or the error raised by [`EngineConfig::validate`] or
    ///   [`BinaryOrbit::from_par`].
    pub fn with_config(par: &ParFile, config: EngineConfig) -> Result<Self, BinPhaseError> {
        config.validate()?;
        let orbit = BinaryOrbit::from_par(par, &config)?;
        Ok(BinaryPhaseEngine { orbit, config })
    }

    /// Build an engine from an already selected orbit.
    pub fn from_orbit(orbit: BinaryOrbit, config: EngineConfig) -> Result<Self, BinPhaseError> {
        config.validate()?;
        Ok(BinaryPhaseEngine { orbit, config })
    }

    pub fn orbit(&self) -> &BinaryOrbit {
        &self.orbit
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Orbital phases for a barycentric time series.
    ///
    /// Arguments
    /// -----------------
    /// * `mjds`: barycentric arrival times (MJD, TDB).
    ///
    /// Return
    /// ----------
    /// * One phase in `[0, 1)` per input time, or
    ///   [`BinPhaseError::NumericalNonConvergence`] if a Kepler solve fails.
    pub fn phases(&self, mjds: &[MJD]) -> Result<Vec<Phase>, BinPhaseError> {
        let true_anomalies = self.orbit.true_anomalies(mjds, &self.config)?;
        let omegas = self.orbit.periastron_arguments(&true_anomalies);

        Ok(true_anomalies
            .into_iter()
            .zip_eq(omegas)
            .map(|(u, omega)| orbital_phase(u, omega))
            .collect())
    }

    /// Orbital phase at a single barycentric MJD.
    pub fn phase_at(&self, mjd: MJD) -> Result<Phase, BinPhaseError> {
        let phases = self.phases(&[mjd])?;
        Ok(phases[0])
    }

    /// Orbital phases for epochs in any time scale, converted to MJD (TDB) first.
    pub fn phases_at_epochs(&self, epochs: &[Epoch]) -> Result<Vec<Phase>, BinPhaseError> {
        self.phases(&epochs_to_mjd_tdb(epochs))
    }

    /// Full orbital state (anomalies, periastron argument, phase) for a time series.
    pub fn orbital_states(&self, mjds: &[MJD]) -> Result<Vec<OrbitalState>, BinPhaseError> {
        let ecc = self.orbit.eccentricity();
        let mean = self.orbit.mean_anomalies(mjds);
        let eccentric = eccentric_anomalies(&mean, ecc, &self.config)?;
        let true_anom = true_anomalies(&eccentric, ecc);
        let omegas = self.orbit.periastron_arguments(&true_anom);

        Ok(izip!(mjds, mean, eccentric, true_anom, omegas)
            .map(|(&mjd, m, e_anom, u, omega)| OrbitalState {
                mjd,
                mean_anomaly: m,
                eccentric_anomaly: e_anom,
                true_anomaly: u,
                periastron_argument: omega,
                phase: orbital_phase(u, omega),
                orbit_number: (e_anom / DPI).floor() as i64,
            })
            .collect())
    }

    pub fn orbital_state(&self, mjd: MJD) -> Result<OrbitalState, BinPhaseError> {
        let states = self.orbital_states(&[mjd])?;
        Ok(states[0])
    }
}

/// Orbital phases of `mjds` for the timing model `par`, with the default configuration.
pub fn binary_phases(par: &ParFile, mjds: &[MJD]) -> Result<Vec<Phase>, BinPhaseError> {
    BinaryPhaseEngine::new(par)?.phases(mjds)
}
