//! Error types for the exposure calculator engine.

use thiserror::Error;

use crate::hardware::Instrument;
use crate::photometry::Filter;
use crate::solver::SolveMode;

/// Errors that can occur while resolving calibration data or solving an observation.
///
/// Every variant is a local failure of a single solve; nothing here is retried
/// internally and nothing is fatal to the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EtcError {
    #[error("Unknown filter '{0}' (expected one of U, B, V, R, I, u, g, r, i, Z, Y)")]
    InvalidFilter(String),

    #[error("Instrument id {0} is out of range (expected 0..=4)")]
    InvalidInstrument(i64),

    #[error("{instrument} has no {quantity} calibration for filter {filter}")]
    IncompleteCalibration {
        instrument: Instrument,
        filter: Filter,
        quantity: &'static str,
    },

    #[error("{mode} solve did not reach the target S/N after {iterations} iterations")]
    ConvergenceError { mode: SolveMode, iterations: u64 },

    #[error("Invalid {field} '{value}': {reason}")]
    InvalidNumericInput {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl EtcError {
    pub(crate) fn numeric(field: &'static str, value: impl ToString, reason: &'static str) -> Self {
        EtcError::InvalidNumericInput {
            field,
            value: value.to_string(),
            reason,
        }
    }
}
