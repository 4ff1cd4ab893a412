//! # binphase
//!
//! Orbital phase of binary pulsars from a tempo/tempo2 timing model.
//!
//! Given a `.par` ephemeris and barycentric arrival times (MJD), the crate computes the
//! fractional orbital phase of each time, in `[0, 1)`, measured from the ascending node.
//!
//! ## Modules
//!
//! - [`par_file`] – `.par` reader producing a typed parameter set.
//! - [`binary_model`] – selection of the period (`PB` / `FBn`) and periastron
//!   (ELL1 / standard) parameterizations; binary detection.
//! - [`anomaly`] – mean and true anomaly.
//! - [`kepler`] – bounded Newton–Raphson solve of Kepler's equation.
//! - [`periastron`] – argument of periastron with secular advance.
//! - [`phase`] – [`BinaryPhaseEngine`], the entry point.
//! - [`engine_config`] – numerical tolerances and model-selection policy.
//! - [`time`] – `hifitime` epochs to barycentric MJD.
//!
//! ## Example
//!
//! ```rust, no_run
//! use binphase::{is_binary, BinaryPhaseEngine, ParFile};
//! use camino::Utf8Path;
//!
//! let par = ParFile::from_path(Utf8Path::new("J1012+5307.par")).unwrap();
//! if is_binary(&par) {
//!     let engine = BinaryPhaseEngine::new(&par).unwrap();
//!     let phases = engine.phases(&[56000.1, 56000.2, 56000.3]).unwrap();
//!     println!("{phases:?}");
//! }
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`] facade (`debug!` for model selection and the
//! circular-orbit shortcut, `warn!` for ambiguous models resolved by precedence). No
//! logger is installed by the library.
pub mod anomaly;
pub mod binary_model;
pub mod binphase_errors;
pub mod constants;
pub mod engine_config;
pub mod kepler;
pub mod par_file;
pub mod periastron;
pub mod phase;
pub mod time;

pub use binary_model::{ell1_arctan, is_binary, BinaryOrbit, PeriastronModel, PeriodModel};
pub use binphase_errors::BinPhaseError;
pub use constants::{Phase, Radian, MJD};
pub use engine_config::EngineConfig;
pub use kepler::solve_kepler;
pub use par_file::{ParFile, ParFileError, ParValue};
pub use phase::{binary_phases, BinaryPhaseEngine, OrbitalState};
