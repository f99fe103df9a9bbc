//! Error handling for the review service

use srs_core::ScheduleError;
use thiserror::Error;

use crate::db::DbError;

/// Service error types
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_database() {
        let error = ServiceError::from(DbError::CardNotFound(42));
        assert_eq!(error.to_string(), "Database error: card not found: 42");
    }

    #[test]
    fn test_error_display_schedule() {
        let error = ServiceError::from(ScheduleError::QualityOutOfRange(9));
        assert_eq!(
            error.to_string(),
            "Schedule error: quality 9 out of range (expected 0-4)"
        );
    }

    #[test]
    fn test_error_display_config() {
        let error = ServiceError::Config("bad hour".to_string());
        assert_eq!(error.to_string(), "Config error: bad hour");
    }
}
