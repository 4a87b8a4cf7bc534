//! Errors for the signal subsystem.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("split plan has no phases")]
    NoPhases,

    #[error("choice set entry has {got} percentages, expected {expected} (one per phase)")]
    ChoiceSetShapeMismatch { got: usize, expected: usize },

    #[error("DS vector has {got} entries, expected {expected} (one per phase)")]
    DsShapeMismatch { got: usize, expected: usize },

    #[error("empty choice set")]
    EmptyChoiceSet,

    #[error("color sequence has zero total duration and cannot resolve a color")]
    MalformedColorSequence,
}

pub type SignalResult<T> = Result<T, SignalError>;
