//! # Argument of periastron
//!
//! Instantaneous argument of periastron `ω(U) = ω₀ + ω̇ · U / OMB`, where:
//!
//! - `ω₀` is `ell1_arctan(EPS1, EPS2)` for ELL1 orbits and `OM` (deg → rad) otherwise;
//! - `ω̇` is `OMDOT` converted from deg/yr to rad/day;
//! - `U / OMB` converts the cumulative **true** anomaly into days.
//!
//! Scaling the advance by the true anomaly instead of the elapsed time follows the
//! periastron-advance convention of the DD family of timing models. It differs from the
//! elapsed-time form by a periodic term that grows with eccentricity and `OMDOT`, so it
//! is not exact for strongly relativistic systems.
use crate::{
    binary_model::{ell1_arctan, BinaryOrbit, PeriastronModel},
    constants::{Radian, DAYS_PER_YEAR, RADEG},
};

impl BinaryOrbit {
    /// Argument of periastron at the reference epoch (rad).
    pub fn reference_periastron(&self) -> Radian {
        match self.periastron {
            PeriastronModel::Ell1 { eps1, eps2, .. } => ell1_arctan(eps1, eps2),
            PeriastronModel::Standard { om, .. } => om * RADEG,
        }
    }

    /// Periastron advance `OMDOT` in rad/day.
    pub fn periastron_advance_rate(&self) -> f64 {
        self.omdot * RADEG / DAYS_PER_YEAR
    }

    /// Argument of periastron (rad) after a cumulative true anomaly `true_anomaly`.
    pub fn periastron_argument(&self, true_anomaly: Radian) -> Radian {
        self.reference_periastron()
            + self.periastron_advance_rate() * true_anomaly / self.orbital_frequency()
    }

    pub fn periastron_arguments(&self, true_anomalies: &[Radian]) -> Vec<Radian> {
        let omega0 = self.reference_periastron();
        let advance = self.periastron_advance_rate() / self.orbital_frequency();
        true_anomalies.iter().map(|u| omega0 + advance * u).collect()
    }
}
