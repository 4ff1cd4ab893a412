//! # Engine configuration
//!
//! [`EngineConfig`] gathers the numerical knobs of the orbital-phase engine: Kepler
//! solver tolerance and iteration cap, the circular-orbit threshold, the `PBDOT` unit
//! heuristic, and the policy applied when a parameter set specifies two competing
//! binary parameterizations.
//!
//! The [`Default`] configuration reproduces the reference behaviour:
//!
//! | Field                      | Default  |
//! |----------------------------|----------|
//! | `kepler_tolerance`         | `1e-12`  |
//! | `max_kepler_iterations`    | `50`     |
//! | `circular_eccentricity`    | `1e-4`   |
//! | `legacy_pbdot_threshold`   | `1e-6`   |
//! | `legacy_pbdot_scale`       | `1e-12`  |
//! | `reject_ambiguous_models`  | `true`   |
//!
//! ```rust
//! use binphase::engine_config::EngineConfig;
//!
//! let config = EngineConfig::default()
//!     .with_kepler_tolerance(1e-14)
//!     .with_reject_ambiguous_models(false);
//! assert!(config.validate().is_ok());
//! ```
use serde::{Deserialize, Serialize};

use crate::{
    binphase_errors::BinPhaseError,
    constants::{
        CIRCULAR_ECCENTRICITY, KEPLER_MAX_ITER, KEPLER_TOLERANCE, LEGACY_PBDOT_SCALE,
        LEGACY_PBDOT_THRESHOLD,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Newton step size (rad) below which the Kepler solve stops
    pub kepler_tolerance: f64,
    /// Maximum Newton iterations per solve
    pub max_kepler_iterations: usize,
    /// Eccentricity below which the orbit is treated as circular
    pub circular_eccentricity: f64,
    /// `|PBDOT|` above which the value is considered to be in 1e-12 units
    pub legacy_pbdot_threshold: f64,
    /// Rescaling applied to such a `PBDOT`
    pub legacy_pbdot_scale: f64,
    /// Fail on `PB`+`FB0` or fully specified ELL1+standard sets instead of
    /// falling back to the `PB` / ELL1 precedence
    pub reject_ambiguous_models: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            kepler_tolerance: KEPLER_TOLERANCE,
            max_kepler_iterations: KEPLER_MAX_ITER,
            circular_eccentricity: CIRCULAR_ECCENTRICITY,
            legacy_pbdot_threshold: LEGACY_PBDOT_THRESHOLD,
            legacy_pbdot_scale: LEGACY_PBDOT_SCALE,
            reject_ambiguous_models: true,
        }
    }
}

impl EngineConfig {
    pub fn with_kepler_tolerance(mut self, tolerance: f64) -> Self {
        self.kepler_tolerance = tolerance;
        self
    }

    pub fn with_max_kepler_iterations(mut self, max_iter: usize) -> Self {
        self.max_kepler_iterations = max_iter;
        self
    }

    pub fn with_circular_eccentricity(mut self, threshold: f64) -> Self {
        self.circular_eccentricity = threshold;
        self
    }

    pub fn with_legacy_pbdot(mut self, threshold: f64, scale: f64) -> Self {
        self.legacy_pbdot_threshold = threshold;
        self.legacy_pbdot_scale = scale;
        self
    }

    pub fn with_reject_ambiguous_models(mut self, reject: bool) -> Self {
        self.reject_ambiguous_models = reject;
        self
    }

    /// Check that the solver settings can terminate.
    ///
    /// Return
    /// ----------
    /// * [`BinPhaseError::InvalidConfig`] if the tolerance is not a positive finite
    ///   number, the iteration cap is zero, or a threshold is negative.
    pub fn validate(&self) -> Result<(), BinPhaseError> {
        if !(self.kepler_tolerance.is_finite() && self.kepler_tolerance > 0.0) {
            return Err(BinPhaseError::InvalidConfig(format!(
                "kepler_tolerance must be positive, got {}",
                self.kepler_tolerance
            )));
        }
        if self.max_kepler_iterations == 0 {
            return Err(BinPhaseError::InvalidConfig(
                "max_kepler_iterations must be at least 1".into(),
            ));
        }
        if self.circular_eccentricity < 0.0 || self.legacy_pbdot_threshold < 0.0 {
            return Err(BinPhaseError::InvalidConfig(
                "thresholds must be non-negative".into(),
            ));
        }
        Ok(())
    }
}
