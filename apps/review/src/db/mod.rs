//! Local SQLite storage for review state.

pub mod date_utils;
pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{
    Card, CardRepository, ReviewLogRepository, ReviewRecord, ReviewStats, SqliteRepository,
    StateRepository, StatsRepository, StoredState,
};
