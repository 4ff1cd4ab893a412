//! # Pulsar ephemeris (`.par`) reader
//!
//! Parse **tempo/tempo2 timing-model files** into a typed parameter mapping consumed by
//! the orbital-phase engine.
//!
//! ## Overview
//! -----------------
//! A `.par` file holds one parameter per line:
//!
//! ```text
//! NAME  VALUE  [ERR_OR_FITFLAG  [ERR]]
//! ```
//!
//! - Blank lines, lines starting with `#` and tempo comments (`C ` prefix) are skipped.
//! - Lines whose name is listed in [`IGNORED_PARAMETERS`] or starts with one of
//!   [`IGNORED_PREFIXES`] are skipped before any validation.
//! - The legacy eccentricity name `E` is renamed `ECC`.
//! - Values are typed as integer, then float (Fortran `D` exponents are accepted), then
//!   kept as a literal string.
//! - A third token `0`/`1` is a fit flag and the uncertainty is read from the fourth
//!   token; any other third token is the uncertainty itself.
//!
//! Every stored parameter exposes two sibling views through [`ParFile::get`]:
//! `<NAME>_ERR` (the uncertainty, when present) and `<NAME>_TYPE` (the value type tag).
//!
//! ## Error Handling
//! -----------------
//! Malformed lines are reported as [`ParFileError`] with the 1-based line number;
//! [`ParFile::from_path`] wraps them, together with I/O failures, into
//! [`BinPhaseError`].
//!
//! ## Example
//! -----------------
//! ```rust
//! use binphase::par_file::{ParFile, ParValue};
//!
//! let par: ParFile = "PSRJ J0437-4715\nPB 5.741 1 1.2D-9\n".parse().unwrap();
//! assert_eq!(par.get_f64("PB").unwrap(), Some(5.741));
//! assert_eq!(par.get("PB_ERR"), Some(ParValue::Float(1.2e-9)));
//! assert_eq!(par.get("PB_TYPE"), Some(ParValue::Str("float".into())));
//! ```
use std::{collections::BTreeMap, fmt, str::FromStr};

use camino::Utf8Path;
use nom::{
    character::complete::i64 as integer, combinator::all_consuming, number::complete::double,
    IResult, Parser,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    binphase_errors::BinPhaseError,
    constants::{IGNORED_PARAMETERS, IGNORED_PREFIXES},
};

const ERR_SUFFIX: &str = "_ERR";
const TYPE_SUFFIX: &str = "_TYPE";

/// Line-level parsing errors for `.par` files.
///
/// Variants
/// -----------------
/// * `MissingValue` – The line holds a parameter name but no value.
/// * `TooManyTokens` – More tokens than `NAME VALUE [FLAG] [ERR]` allows.
/// * `InvalidUncertainty` – The uncertainty token is not a number.
#[derive(Error, Debug, PartialEq)]
pub enum ParFileError {
    #[error("line {line}: missing value in {content:?}")]
    MissingValue { line: usize, content: String },
    #[error("line {line}: unexpected token count in {content:?}")]
    TooManyTokens { line: usize, content: String },
    #[error("line {line}: invalid uncertainty {token:?}")]
    InvalidUncertainty { line: usize, token: String },
}

/// Value of a timing-model parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParValue {
    /// Numeric view of the value, `None` for strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParValue::Int(i) => Some(*i as f64),
            ParValue::Float(f) => Some(*f),
            ParValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParValue::Int(i) => write!(f, "{i}"),
            ParValue::Float(x) => write!(f, "{x}"),
            ParValue::Str(s) => write!(f, "{s}"),
        }
    }
}

/// Type tag recorded for every parameter (the `<NAME>_TYPE` view).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParType {
    Integer,
    Float,
    Exponential,
    String,
}

impl ParType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParType::Integer => "integer",
            ParType::Float => "float",
            ParType::Exponential => "exponential",
            ParType::String => "string",
        }
    }
}

/// One parameter line of a `.par` file.
///
/// * `value`: typed value (token 1).
/// * `value_type`: how the value token was recognised.
/// * `uncertainty`: 1σ uncertainty, if given.
/// * `fitted`: fit flag, if given (`Some(true)` for `1`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParEntry {
    pub value: ParValue,
    pub value_type: ParType,
    pub uncertainty: Option<f64>,
    pub fitted: Option<bool>,
}

impl ParEntry {
    fn numeric(value: f64) -> Self {
        ParEntry {
            value: ParValue::Float(value),
            value_type: ParType::Float,
            uncertainty: None,
            fitted: None,
        }
    }
}

/// Parsed timing-model parameter set.
///
/// Keys are unique; when a name appears twice the last line wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParFile {
    entries: BTreeMap<String, ParEntry>,
}

fn integer_value(input: &str) -> IResult<&str, i64> {
    all_consuming(integer).parse(input)
}

fn float_value(input: &str) -> IResult<&str, f64> {
    all_consuming(double).parse(input)
}

/// Parse a float, accepting Fortran `D` exponent markers.
fn parse_fortran_float(token: &str) -> Option<f64> {
    let normalized = token.replace(['D', 'd'], "E");
    float_value(&normalized).ok().map(|(_, v)| v)
}

/// Type a value token: integer, then float, then literal string.
fn parse_value(token: &str) -> (ParValue, ParType) {
    if let Ok((_, i)) = integer_value(token) {
        return (ParValue::Int(i), ParType::Integer);
    }

    match parse_fortran_float(token) {
        Some(f) if token.contains(['e', 'E', 'd', 'D']) => {
            (ParValue::Float(f), ParType::Exponential)
        }
        Some(f) => (ParValue::Float(f), ParType::Float),
        None => (ParValue::Str(token.to_string()), ParType::String),
    }
}

fn is_ignored(name: &str) -> bool {
    IGNORED_PARAMETERS.contains(&name) || IGNORED_PREFIXES.iter().any(|p| name.starts_with(p))
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("C ") || line == "C"
}

/// Parse one line of a `.par` file.
///
/// Arguments
/// -----------------
/// * `line_number`: 1-based line index, used in error reports.
/// * `line`: raw line content.
///
/// Return
/// ----------
/// * `Ok(None)` for skipped lines (blank, comment, ignored parameter).
/// * `Ok(Some((name, entry)))` for a parameter line.
/// * A [`ParFileError`] for malformed lines.
fn parse_line(line_number: usize, line: &str) -> Result<Option<(String, ParEntry)>, ParFileError> {
    let line = line.trim();
    if line.is_empty() || is_comment(line) {
        return Ok(None);
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let name = tokens[0];
    if is_ignored(name) {
        log::trace!("skipping ignored parameter {name}");
        return Ok(None);
    }

    let name = if name == "E" { "ECC" } else { name };

    let (value, value_type) = match tokens.get(1) {
        Some(token) => parse_value(token),
        None => {
            return Err(ParFileError::MissingValue {
                line: line_number,
                content: line.to_string(),
            })
        }
    };

    let fit_flag = match tokens.get(2) {
        Some(&"0") => Some(false),
        Some(&"1") => Some(true),
        _ => None,
    };

    // the uncertainty sits after the fit flag when there is one
    let err_token = match (fit_flag, tokens.len()) {
        (_, 2) => None,
        (Some(_), 3) => None,
        (Some(_), 4) => Some(tokens[3]),
        (None, 3) => Some(tokens[2]),
        _ => {
            return Err(ParFileError::TooManyTokens {
                line: line_number,
                content: line.to_string(),
            })
        }
    };

    let uncertainty = err_token
        .map(|token| {
            parse_fortran_float(token).ok_or_else(|| ParFileError::InvalidUncertainty {
                line: line_number,
                token: token.to_string(),
            })
        })
        .transpose()?;

    Ok(Some((
        name.to_string(),
        ParEntry {
            value,
            value_type,
            uncertainty,
            fitted: fit_flag,
        },
    )))
}

impl FromStr for ParFile {
    type Err = ParFileError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let mut par = ParFile::default();
        for (idx, line) in content.lines().enumerate() {
            if let Some((name, entry)) = parse_line(idx + 1, line)? {
                if par.entries.contains_key(&name) {
                    log::warn!(
                        "parameter {name} redefined at line {}, keeping last value",
                        idx + 1
                    );
                }
                par.entries.insert(name, entry);
            }
        }
        Ok(par)
    }
}

impl ParFile {
    /// Read and parse a `.par` file from disk.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: location of the ephemeris file.
    ///
    /// Return
    /// ----------
    /// * The parsed parameter set, or a [`BinPhaseError::IoError`] /
    ///   [`BinPhaseError::ParFile`] on failure.
    pub fn from_path(path: &Utf8Path) -> Result<Self, BinPhaseError> {
        let content = std::fs::read_to_string(path)?;
        Ok(content.parse()?)
    }

    /// Build a parameter set from numeric `(name, value)` pairs.
    ///
    /// Values are stored as floats with no uncertainty. Useful to describe an orbit
    /// programmatically without going through a file.
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        ParFile {
            entries: values
                .into_iter()
                .map(|(name, value)| (name.to_string(), ParEntry::numeric(value)))
                .collect(),
        }
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: ParValue) {
        let value_type = match value {
            ParValue::Int(_) => ParType::Integer,
            ParValue::Float(_) => ParType::Float,
            ParValue::Str(_) => ParType::String,
        };
        self.entries.insert(
            name.into(),
            ParEntry {
                value,
                value_type,
                uncertainty: None,
                fitted: None,
            },
        );
    }

    pub fn entry(&self, name: &str) -> Option<&ParEntry> {
        self.entries.get(name)
    }

    /// Look up a parameter value, resolving the `<NAME>_ERR` and `<NAME>_TYPE` views.
    pub fn get(&self, name: &str) -> Option<ParValue> {
        if let Some(entry) = self.entries.get(name) {
            return Some(entry.value.clone());
        }
        if let Some(base) = name.strip_suffix(ERR_SUFFIX) {
            return self.uncertainty(base).map(ParValue::Float);
        }
        if let Some(base) = name.strip_suffix(TYPE_SUFFIX) {
            return self
                .value_type(base)
                .map(|t| ParValue::Str(t.as_str().to_string()));
        }
        None
    }

    /// Numeric value of a parameter.
    ///
    /// Return
    /// ----------
    /// * `Ok(None)` if the parameter is absent.
    /// * [`BinPhaseError::InvalidParameter`] if it holds a string.
    pub fn get_f64(&self, name: &str) -> Result<Option<f64>, BinPhaseError> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| BinPhaseError::InvalidParameter {
                    name: name.to_string(),
                    reason: format!("expected a number, found {value:?}"),
                }),
        }
    }

    pub fn uncertainty(&self, name: &str) -> Option<f64> {
        self.entries.get(name).and_then(|e| e.uncertainty)
    }

    pub fn value_type(&self, name: &str) -> Option<ParType> {
        self.entries.get(name).map(|e| e.value_type)
    }

    /// True if `name` is a stored parameter or one of its sibling views.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod par_file_test {
    use super::*;

    #[test]
    fn test_parse_value_types() {
        assert_eq!(parse_value("42"), (ParValue::Int(42), ParType::Integer));
        assert_eq!(parse_value("-7"), (ParValue::Int(-7), ParType::Integer));
        assert_eq!(
            parse_value("5.7410459"),
            (ParValue::Float(5.7410459), ParType::Float)
        );
        assert_eq!(
            parse_value("1.5e-12"),
            (ParValue::Float(1.5e-12), ParType::Exponential)
        );
        assert_eq!(
            parse_value("3.2D-05"),
            (ParValue::Float(3.2e-5), ParType::Exponential)
        );
        assert_eq!(
            parse_value("J0437-4715"),
            (ParValue::Str("J0437-4715".into()), ParType::String)
        );
        assert_eq!(
            parse_value("04:37:15.8"),
            (ParValue::Str("04:37:15.8".into()), ParType::String)
        );
        assert_eq!(
            parse_value("DE440"),
            (ParValue::Str("DE440".into()), ParType::String)
        );
    }

    #[test]
    fn test_skipped_lines() {
        assert_eq!(parse_line(1, ""), Ok(None));
        assert_eq!(parse_line(1, "   "), Ok(None));
        assert_eq!(parse_line(1, "# PB 1.0"), Ok(None));
        assert_eq!(parse_line(1, "C PB 1.0"), Ok(None));
        assert_eq!(parse_line(1, "JUMP -f 430_PUPPI 0.1 1 0.01"), Ok(None));
        assert_eq!(parse_line(1, "DMMODEL DM 1"), Ok(None));
        assert_eq!(parse_line(1, "DM_SERIES TAYLOR"), Ok(None));
        assert_eq!(parse_line(1, "CM_IDX 4"), Ok(None));
        assert_eq!(parse_line(1, "TNEF -be GUPPI 1.02"), Ok(None));
        assert_eq!(parse_line(1, "DMJUMP -fe 430 0.1 1"), Ok(None));
        assert_eq!(parse_line(1, "FDJUMP -f 430_PUPPI 1 1.2e-6 1 3e-7"), Ok(None));
        assert_eq!(parse_line(1, "DMEFAC -f 430_PUPPI 1.1"), Ok(None));
        assert_eq!(parse_line(1, "DMEQUAD -f 430_PUPPI 0.0002"), Ok(None));
    }

    #[test]
    fn test_comment_prefix_requires_space() {
        let (name, _) = parse_line(1, "CLK TT(BIPM2019)").unwrap().unwrap();
        assert_eq!(name, "CLK");
    }

    #[test]
    fn test_fit_flag_and_uncertainty() {
        let (name, entry) = parse_line(3, "PB 5.7410459 1 0.0000002").unwrap().unwrap();
        assert_eq!(name, "PB");
        assert_eq!(entry.value, ParValue::Float(5.7410459));
        assert_eq!(entry.fitted, Some(true));
        assert_eq!(entry.uncertainty, Some(2e-7));

        let (_, entry) = parse_line(3, "OM 1.2 0").unwrap().unwrap();
        assert_eq!(entry.fitted, Some(false));
        assert_eq!(entry.uncertainty, None);

        let (_, entry) = parse_line(3, "A1 3.3667 0.0000003").unwrap().unwrap();
        assert_eq!(entry.fitted, None);
        assert_eq!(entry.uncertainty, Some(3e-7));
    }

    #[test]
    fn test_eccentricity_rename() {
        let (name, entry) = parse_line(1, "E 0.0000191 1 0.0000001").unwrap().unwrap();
        assert_eq!(name, "ECC");
        assert_eq!(entry.value, ParValue::Float(1.91e-5));
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(
            parse_line(7, "PB"),
            Err(ParFileError::MissingValue {
                line: 7,
                content: "PB".into()
            })
        );
        assert_eq!(
            parse_line(8, "PB 1.0 2.0 3.0"),
            Err(ParFileError::TooManyTokens {
                line: 8,
                content: "PB 1.0 2.0 3.0".into()
            })
        );
        assert_eq!(
            parse_line(9, "PB 1.0 1 0.1 extra"),
            Err(ParFileError::TooManyTokens {
                line: 9,
                content: "PB 1.0 1 0.1 extra".into()
            })
        );
        assert_eq!(
            parse_line(10, "PB 1.0 1 abc"),
            Err(ParFileError::InvalidUncertainty {
                line: 10,
                token: "abc".into()
            })
        );
    }

    #[test]
    fn test_sibling_views() {
        let par: ParFile = "PB 1.5 1 0.25\nBINARY ELL1\nNTOA 1234\n".parse().unwrap();

        assert_eq!(par.len(), 2);
        assert_eq!(par.get("PB_ERR"), Some(ParValue::Float(0.25)));
        assert_eq!(par.get("PB_TYPE"), Some(ParValue::Str("float".into())));
        assert_eq!(par.get("BINARY_TYPE"), Some(ParValue::Str("string".into())));
        assert_eq!(par.get("BINARY_ERR"), None);
        assert!(!par.contains("NTOA"));
        assert!(par.contains("PB_ERR"));
    }

    #[test]
    fn test_get_f64() {
        let par: ParFile = "PB 2\nBINARY BT\n".parse().unwrap();
        assert_eq!(par.get_f64("PB").unwrap(), Some(2.0));
        assert_eq!(par.get_f64("ECC").unwrap(), None);
        assert!(matches!(
            par.get_f64("BINARY"),
            Err(BinPhaseError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_error_reports_line_number() {
        let err = "PSRJ J0000+0000\n\nPB\n".parse::<ParFile>().unwrap_err();
        assert_eq!(
            err,
            ParFileError::MissingValue {
                line: 3,
                content: "PB".into()
            }
        );
    }

    #[test]
    fn test_last_definition_wins() {
        let par: ParFile = "PB 1.0\nPB 2.0\n".parse().unwrap();
        assert_eq!(par.get_f64("PB").unwrap(), Some(2.0));
    }
}
