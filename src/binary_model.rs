//! # Binary orbit parameterizations
//!
//! A timing model describes a binary orbit with one of two **period representations**
//! and one of two **periastron representations**:
//!
//! - [`PeriodModel::ConstantPeriod`]: `PB` (days) with an optional decay `PBDOT`.
//! - [`PeriodModel::FrequencySeries`]: orbital frequency Taylor series `FB0, FB1, …`
//!   (Hz, Hz/s, …).
//! - [`PeriastronModel::Ell1`]: low-eccentricity form `(TASC, EPS1, EPS2)` with
//!   `EPS1 = e·sin ω`, `EPS2 = e·cos ω`.
//! - [`PeriastronModel::Standard`]: Keplerian form `(T0, ECC, OM)`.
//!
//! [`BinaryOrbit::from_par`] selects both representations once from a [`ParFile`]; the
//! calculators ([`crate::anomaly`], [`crate::periastron`], [`crate::phase`]) then match
//! on the variants instead of probing keys again.
//!
//! ## Selection rules
//!
//! - `PB` present → constant period; else `FB0` present → frequency series; else
//!   [`BinPhaseError::MissingParameter`].
//! - `TASC`, `EPS1` and `EPS2` all present → ELL1; otherwise standard, with `ECC` and `OM`
//!   defaulting to 0 and the epoch taken from `T0`, or from `TASC` when `T0` is absent.
//! - `PB` together with `FB0`, or a complete ELL1 set together with a complete
//!   `T0`/`ECC`/`OM` set, is reported as [`BinPhaseError::AmbiguousModel`] unless
//!   [`EngineConfig::reject_ambiguous_models`] is disabled; then `PB` and ELL1 win.
//!
//! ## Units
//!
//! - Epochs: **MJD** (barycentric).
//! - `PB`: **days**; `PBDOT`: dimensionless (s/s).
//! - `FBi`: **Hz / s^i**.
//! - `OM`: **degrees**; `OMDOT`: **degrees per year**.
//! - Orbital angular frequency [`BinaryOrbit::orbital_frequency`]: **rad / day**.
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use smallvec::SmallVec;

use crate::{
    binphase_errors::BinPhaseError,
    constants::{Degree, Radian, DPI, MJD, SECONDS_PER_DAY},
    engine_config::EngineConfig,
    kepler::principal_angle,
    par_file::ParFile,
};

/// Orbital period representation.
#[derive(Debug, Clone, PartialEq)]
pub enum PeriodModel {
    /// Constant period `pb` (days) with first derivative `pbdot` (s/s, already rescaled
    /// if it was given in legacy units).
    ConstantPeriod { pb: f64, pbdot: f64 },
    /// Orbital frequency and its derivatives `FB0..FBn`, contiguous from `FB0`.
    FrequencySeries { fb: SmallVec<[f64; 4]> },
}

/// Periastron representation.
#[derive(Debug, Clone, PartialEq)]
pub enum PeriastronModel {
    /// Low-eccentricity model: epoch of ascending node and Laplace–Lagrange parameters.
    Ell1 { tasc: MJD, eps1: f64, eps2: f64 },
    /// Keplerian model: epoch of periastron, eccentricity and argument of periastron.
    Standard { t0: MJD, ecc: f64, om: Degree },
}

/// Binary orbit selected from a timing model.
///
/// Fields
/// -----------------
/// * `period`: period representation.
/// * `periastron`: periastron representation.
/// * `omdot`: secular periastron advance (deg/yr), 0 when absent.
/// * `model_name`: value of the `BINARY` parameter (e.g. `ELL1`, `BT`, `DD`), if any.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOrbit {
    pub period: PeriodModel,
    pub periastron: PeriastronModel,
    pub omdot: f64,
    pub model_name: Option<String>,
}

/// Angle `ω` of the ELL1 parameters `EPS1 = e·sin ω`, `EPS2 = e·cos ω`, in `[0, 2π)`.
///
/// `EPS2 = 0` is the vertical-tangent case: `π/2` or `3π/2` depending on the sign of
/// `EPS1`, and `0` when both vanish (the orbit is circular and `ω` is undefined).
pub fn ell1_arctan(eps1: f64, eps2: f64) -> Radian {
    let angle = if eps2 == 0.0 {
        if eps1 > 0.0 {
            FRAC_PI_2
        } else if eps1 < 0.0 {
            -FRAC_PI_2
        } else {
            0.0
        }
    } else {
        let angle = (eps1 / eps2).atan();
        if eps2 < 0.0 {
            angle + PI
        } else {
            angle
        }
    };
    principal_angle(angle)
}

/// True when the parameter set describes a binary pulsar.
///
/// Requires a `BINARY` model name, a period (`PB` or `FB0`) and an epoch (`TASC` or `T0`).
pub fn is_binary(par: &ParFile) -> bool {
    let has = |name: &str| par.entry(name).is_some();
    has("BINARY") && (has("PB") || has("FB0")) && (has("TASC") || has("T0"))
}

fn invalid(name: &str, reason: impl Into<String>) -> BinPhaseError {
    BinPhaseError::InvalidParameter {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Numeric parameter that must be finite when present.
fn finite_f64(par: &ParFile, name: &str) -> Result<Option<f64>, BinPhaseError> {
    match par.get_f64(name)? {
        Some(value) if !value.is_finite() => {
            Err(invalid(name, format!("value must be finite, got {value}")))
        }
        value => Ok(value),
    }
}

fn select_period(par: &ParFile, config: &EngineConfig) -> Result<PeriodModel, BinPhaseError> {
    let pb = par.get_f64("PB")?;
    let fb0 = par.get_f64("FB0")?;

    if pb.is_some() && fb0.is_some() {
        if config.reject_ambiguous_models {
            return Err(BinPhaseError::AmbiguousModel(
                "both PB and FB0 are present".into(),
            ));
        }
        log::warn!("both PB and FB0 are present, using PB");
    }

    match (pb, fb0) {
        (Some(pb), _) => {
            if !(pb.is_finite() && pb > 0.0) {
                return Err(invalid("PB", format!("orbital period must be positive, got {pb}")));
            }
            let mut pbdot = finite_f64(par, "PBDOT")?.unwrap_or(0.0);
            if pbdot.abs() > config.legacy_pbdot_threshold {
                log::debug!(
                    "PBDOT = {pbdot} above {:e}, rescaling by {:e}",
                    config.legacy_pbdot_threshold,
                    config.legacy_pbdot_scale
                );
                pbdot *= config.legacy_pbdot_scale;
            }
            Ok(PeriodModel::ConstantPeriod { pb, pbdot })
        }
        (None, Some(fb0)) => {
            if !(fb0.is_finite() && fb0 != 0.0) {
                return Err(invalid(
                    "FB0",
                    format!("orbital frequency must be non-zero, got {fb0}"),
                ));
            }
            let mut fb: SmallVec<[f64; 4]> = SmallVec::new();
            fb.push(fb0);
            // the series stops at the first missing derivative
            while let Some(value) = finite_f64(par, &format!("FB{}", fb.len()))? {
                fb.push(value);
            }
            Ok(PeriodModel::FrequencySeries { fb })
        }
        (None, None) => Err(BinPhaseError::MissingParameter(
            "orbital period (PB or FB0)".into(),
        )),
    }
}

fn select_periastron(
    par: &ParFile,
    config: &EngineConfig,
) -> Result<PeriastronModel, BinPhaseError> {
    let tasc = finite_f64(par, "TASC")?;
    let eps1 = finite_f64(par, "EPS1")?;
    let eps2 = finite_f64(par, "EPS2")?;
    let t0 = finite_f64(par, "T0")?;
    let ecc = finite_f64(par, "ECC")?;
    let om = finite_f64(par, "OM")?;

    let standard_complete = t0.is_some() && ecc.is_some() && om.is_some();

    let model = match (tasc, eps1, eps2) {
        (Some(tasc), Some(eps1), Some(eps2)) => {
            if standard_complete {
                if config.reject_ambiguous_models {
                    return Err(BinPhaseError::AmbiguousModel(
                        "both ELL1 (TASC, EPS1, EPS2) and standard (T0, ECC, OM) parameters \
                         are present"
                            .into(),
                    ));
                }
                log::warn!("both ELL1 and standard periastron parameters are present, using ELL1");
            }
            PeriastronModel::Ell1 { tasc, eps1, eps2 }
        }
        _ => {
            let epoch = t0.or(tasc).ok_or_else(|| {
                BinPhaseError::MissingParameter("reference epoch (T0 or TASC)".into())
            })?;
            PeriastronModel::Standard {
                t0: epoch,
                ecc: ecc.unwrap_or(0.0),
                om: om.unwrap_or(0.0),
            }
        }
    };

    let e = model.eccentricity();
    if !(0.0..1.0).contains(&e) {
        return Err(invalid("ECC", format!("eccentricity must be in [0, 1), got {e}")));
    }
    Ok(model)
}

impl PeriastronModel {
    /// Orbital eccentricity: `sqrt(EPS1² + EPS2²)` for ELL1, `ECC` otherwise.
    pub fn eccentricity(&self) -> f64 {
        match *self {
            PeriastronModel::Ell1 { eps1, eps2, .. } => eps1.hypot(eps2),
            PeriastronModel::Standard { ecc, .. } => ecc,
        }
    }
}

impl BinaryOrbit {
    /// Select the period and periastron models of a timing model.
    ///
    /// Arguments
    /// -----------------
    /// * `par`: parsed timing-model parameters.
    /// * `config`: engine configuration (ambiguity policy and `PBDOT` heuristic).
    ///
    /// Return
    /// ----------
    /// * The selected [`BinaryOrbit`], or
    ///   [`BinPhaseError::MissingParameter`], [`BinPhaseError::AmbiguousModel`],
    ///   [`BinPhaseError::InvalidParameter`].
    pub fn from_par(par: &ParFile, config: &EngineConfig) -> Result<Self, BinPhaseError> {
        let orbit = BinaryOrbit {
            period: select_period(par, config)?,
            periastron: select_periastron(par, config)?,
            omdot: finite_f64(par, "OMDOT")?.unwrap_or(0.0),
            model_name: par.get("BINARY").map(|value| value.to_string()),
        };
        log::debug!("selected binary model: {orbit}");
        Ok(orbit)
    }

    /// Orbital angular frequency `OMB` (rad/day).
    pub fn orbital_frequency(&self) -> f64 {
        match &self.period {
            PeriodModel::ConstantPeriod { pb, .. } => DPI / pb,
            PeriodModel::FrequencySeries { fb } => DPI * fb[0] * SECONDS_PER_DAY,
        }
    }

    /// Epoch (MJD) at which the mean anomaly is zero.
    ///
    /// For ELL1 this is `TASC + ω/OMB`, with no `PBDOT` correction.
    pub fn reference_epoch(&self) -> MJD {
        match self.periastron {
            PeriastronModel::Ell1 { tasc, eps1, eps2 } => {
                tasc + ell1_arctan(eps1, eps2) / self.orbital_frequency()
            }
            PeriastronModel::Standard { t0, .. } => t0,
        }
    }

    pub fn eccentricity(&self) -> f64 {
        self.periastron.eccentricity()
    }
}

impl fmt::Display for BinaryOrbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BINARY {}", self.model_name.as_deref().unwrap_or("?"))?;
        match &self.period {
            PeriodModel::ConstantPeriod { pb, pbdot } => {
                write!(f, " | PB = {pb} d, PBDOT = {pbdot:e}")?
            }
            PeriodModel::FrequencySeries { fb } => {
                write!(f, " | FB = [")?;
                for (i, value) in fb.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value:e}")?;
                }
                write!(f, "]")?
            }
        }
        match &self.periastron {
            PeriastronModel::Ell1 { tasc, eps1, eps2 } => {
                write!(f, " | TASC = {tasc}, EPS1 = {eps1:e}, EPS2 = {eps2:e}")?
            }
            PeriastronModel::Standard { t0, ecc, om } => {
                write!(f, " | T0 = {t0}, ECC = {ecc}, OM = {om} deg")?
            }
        }
        write!(f, " | OMDOT = {} deg/yr", self.omdot)
    }
}
