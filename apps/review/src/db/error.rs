//! Database error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("card not found: {0}")]
    CardNotFound(i64),

    #[error("stale state for card {card_id}: expected version {expected_version}")]
    StaleState { card_id: i64, expected_version: i64 },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
