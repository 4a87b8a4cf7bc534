//! Errors for the double-buffering subsystem.

use thiserror::Error;

/// Precondition violations on the buffered-state protocol (§7 kind 3).
///
/// These are programming errors, not runtime conditions to recover from:
/// `debug_assert!` catches them in debug builds; release builds log and
/// ignore the offending write rather than corrupt `next`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("set() called outside the Tick phase (current phase: {0:?})")]
    SetOutsideTick(super::buffered::Phase),

    #[error("flip() called outside the Flip phase (current phase: {0:?})")]
    FlipOutsidePhase(super::buffered::Phase),
}

pub type BufferResult<T> = Result<T, BufferError>;
