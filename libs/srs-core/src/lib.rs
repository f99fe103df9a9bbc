//! Core spaced repetition library for ExHub flashcards.
//!
//! Provides:
//! - SM-2 review scheduling over a 0-4 quality scale
//! - Validated quality and rating types
//! - Due-card queue ordering

pub mod algorithm;
pub mod error;
pub mod queue;
pub mod types;

pub use algorithm::{schedule, sm2::Sm2, SpacedRepetitionAlgorithm};
pub use error::{Result, ScheduleError};
pub use queue::{DueCard, StudyQueue};
pub use types::{CardReviewState, Quality, Rating};
