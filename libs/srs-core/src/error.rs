//! Error types for srs-core.

use thiserror::Error;

/// Result type alias using ScheduleError.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors raised while validating scheduler input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("quality {0} out of range (expected 0-4)")]
    QualityOutOfRange(u8),

    #[error("unknown rating: {0}")]
    UnknownRating(String),
}
