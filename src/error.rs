//! Error types
//!
//! Every failure carries the values that caused it. [`FopdtError::kind`] folds the concrete
//! variants into the four categories callers usually branch on.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

use crate::identification::{FopdtParameters, Method};
use crate::solvers::SolverError;

/// Broad failure category of a [`FopdtError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input: mismatched lengths, non-monotonic time, empty or non-finite data
    Data,
    /// Zero step amplitude, zero gain or zero dead time where a division needs them
    DegenerateSystem,
    /// No sample crosses a required fraction of the output change
    ThresholdNotFound,
    /// Integration did not produce a finite, converged result
    NumericInstability,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Data => "data error",
            ErrorKind::DegenerateSystem => "degenerate system",
            ErrorKind::ThresholdNotFound => "threshold not found",
            ErrorKind::NumericInstability => "numeric instability",
        };
        f.write_str(name)
    }
}

/// Errors raised by the identification, tuning and simulation engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FopdtError {
    #[error("expected at least {min} samples, got {len}")]
    TooFewSamples { len: usize, min: usize },

    #[error("time has {time} samples but output has {output}")]
    LengthMismatch { time: usize, output: usize },

    #[error("time must be strictly increasing: t[{index}] = {current} follows {previous}")]
    NonMonotonicTime {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("non-finite {field} value at index {index}")]
    NonFinite { field: &'static str, index: usize },

    #[error("dead time cannot be negative (theta = {theta})")]
    NegativeDeadTime { theta: f64 },

    #[error("{which} polynomial has no coefficients")]
    EmptyPolynomial { which: &'static str },

    #[error("improper transfer function: numerator degree {num_degree} exceeds denominator degree {den_degree}")]
    ImproperSystem { num_degree: usize, den_degree: usize },

    #[error("invalid setting {name} = {value}")]
    InvalidSetting { name: &'static str, value: f64 },

    #[error("step amplitude must be nonzero")]
    ZeroStepAmplitude,

    #[error("denominator is the zero polynomial")]
    ZeroDenominator,

    #[error("{parameter} = {value} leaves the formula without a usable divisor")]
    DegenerateParameter { parameter: &'static str, value: f64 },

    #[error("no sample reaches fraction {fraction} of the final output change {change}")]
    ThresholdNotFound { fraction: f64, change: f64 },

    #[error("output never departs from its initial value {baseline}")]
    NoDeparture { baseline: f64 },

    #[error("integration failed at t = {time}: {source}")]
    Integration {
        time: f64,
        #[source]
        source: SolverError,
    },

    #[error("simulation produced a non-finite state at t = {time}")]
    Diverged { time: f64 },

    #[error("step budget of {max_steps} exhausted at t = {time}")]
    StepBudgetExceeded { max_steps: usize, time: f64 },

    #[error("{method} fit with {params} failed: {source}")]
    FitFailed {
        method: Method,
        params: FopdtParameters,
        #[source]
        source: Box<FopdtError>,
    },

    #[error("no estimator produced a usable model ({} failed)", .failures.len())]
    NoValidModel { failures: Vec<FopdtError> },
}

impl FopdtError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FopdtError::TooFewSamples { .. }
            | FopdtError::LengthMismatch { .. }
            | FopdtError::NonMonotonicTime { .. }
            | FopdtError::NonFinite { .. }
            | FopdtError::NegativeDeadTime { .. }
            | FopdtError::EmptyPolynomial { .. }
            | FopdtError::ImproperSystem { .. }
            | FopdtError::InvalidSetting { .. } => ErrorKind::Data,
            FopdtError::ZeroStepAmplitude
            | FopdtError::ZeroDenominator
            | FopdtError::DegenerateParameter { .. } => ErrorKind::DegenerateSystem,
            FopdtError::ThresholdNotFound { .. } | FopdtError::NoDeparture { .. } => {
                ErrorKind::ThresholdNotFound
            }
            FopdtError::Integration { .. }
            | FopdtError::Diverged { .. }
            | FopdtError::StepBudgetExceeded { .. } => ErrorKind::NumericInstability,
            FopdtError::FitFailed { source, .. } => source.kind(),
            FopdtError::NoValidModel { failures } => failures
                .first()
                .map(FopdtError::kind)
                .unwrap_or(ErrorKind::Data),
        }
    }
}

/// Reports serialize as `{"kind": ..., "message": ...}`
impl Serialize for FopdtError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FopdtError", 2)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FopdtError>;

/// Errors raised while loading datasets or configuration files
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: cannot parse '{value}' in column '{column}'")]
    Parse {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("no step amplitude given and the dataset has no input column")]
    MissingStepAmplitude,

    #[error("{0}")]
    Invalid(#[from] FopdtError),
}
