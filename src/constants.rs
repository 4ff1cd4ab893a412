//! # Constants and type definitions for binphase
//!
//! Unit conversions, numerical defaults and the parameter ignore-list shared by the
//! parser and the orbital-phase engine.
//!
//! ## Overview
//!
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, years ↔ days)
//! - Default numerical thresholds used by the Kepler solver and the `PBDOT` heuristic
//! - Parameters that are never stored when reading a `.par` file
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of days in a Julian year
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

// -------------------------------------------------------------------------------------------------
// Numerical defaults
// -------------------------------------------------------------------------------------------------

/// Newton step size (radians) below which the Kepler solve is converged
pub const KEPLER_TOLERANCE: f64 = 1e-12;

/// Maximum number of Newton iterations for one Kepler solve
pub const KEPLER_MAX_ITER: usize = 50;

/// Eccentricities below this value are treated as circular orbits (E = M)
pub const CIRCULAR_ECCENTRICITY: f64 = 1e-4;

/// `|PBDOT|` above this value is assumed to be in units of 1e-12
pub const LEGACY_PBDOT_THRESHOLD: f64 = 1e-6;

/// Factor applied to a `PBDOT` flagged by [`LEGACY_PBDOT_THRESHOLD`]
pub const LEGACY_PBDOT_SCALE: f64 = 1e-12;

// -------------------------------------------------------------------------------------------------
// Parameter file
// -------------------------------------------------------------------------------------------------

/// Parameter names never inserted into a [`ParFile`](crate::par_file::ParFile).
///
/// These lines either carry several values per line (noise and jump specifications) or
/// are fitting directives with no meaning for the orbital model.
pub const IGNORED_PARAMETERS: &[&str] = &[
    "DMMODEL",
    "CONSTRAIN",
    "JUMP",
    "DMJUMP",
    "FDJUMP",
    "DMEFAC",
    "DMEQUAD",
    "NITS",
    "NTOA",
    "EFAC",
    "EQUAD",
    "T2EFAC",
    "T2EQUAD",
    "ECORR",
    "TNEF",
    "TNEQ",
    "TNECORR",
];

/// Parameter name prefixes never inserted into a [`ParFile`](crate::par_file::ParFile)
pub const IGNORED_PREFIXES: &[&str] = &["DM_", "CM_"];

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
/// Fractional orbital phase in [0, 1)
pub type Phase = f64;
