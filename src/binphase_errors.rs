use thiserror::Error;

use crate::par_file::ParFileError;

#[derive(Error, Debug)]
pub enum BinPhaseError {
    #[error("Error while parsing the ephemeris file: {0}")]
    ParFile(#[from] ParFileError),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing binary parameter: {0}")]
    MissingParameter(String),

    #[error("Ambiguous binary model: {0}")]
    AmbiguousModel(String),

    #[error("Invalid value for parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error(
        "Kepler equation did not converge after {iterations} iterations \
         (M = {mean_anomaly}, e = {eccentricity}, residual = {residual:e})"
    )]
    NumericalNonConvergence {
        mean_anomaly: f64,
        eccentricity: f64,
        iterations: usize,
        residual: f64,
    },

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),
}

impl PartialEq for BinPhaseError {
    fn eq(&self, other: &Self) -> bool {
        use BinPhaseError::*;
        match (self, other) {
            (ParFile(a), ParFile(b)) => a == b,

            // I/O errors are not comparable: equal if same variant
            (IoError(_), IoError(_)) => true,

            (MissingParameter(a), MissingParameter(b)) => a == b,
            (AmbiguousModel(a), AmbiguousModel(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,
            (
                InvalidParameter {
                    name: na,
                    reason: ra,
                },
                InvalidParameter {
                    name: nb,
                    reason: rb,
                },
            ) => na == nb && ra == rb,
            (
                NumericalNonConvergence {
                    mean_anomaly: ma,
                    eccentricity: ea,
                    iterations: ia,
                    ..
                },
                NumericalNonConvergence {
                    mean_anomaly: mb,
                    eccentricity: eb,
                    iterations: ib,
                    ..
                },
            ) => ma == mb && ea == eb && ia == ib,

            _ => false,
        }
    }
}
