//! Spaced repetition algorithm implementations.

pub mod sm2;

use crate::types::{CardReviewState, Quality};
use chrono::{DateTime, Utc};

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate the next review state after a review. Must not depend on
    /// anything but its arguments.
    fn schedule(&self, state: &CardReviewState, quality: Quality, now: DateTime<Utc>) -> CardReviewState;

    /// Initial state for a card created at `created_at`.
    fn initial_state(&self, created_at: DateTime<Utc>) -> CardReviewState;
}

/// Schedule a review with the default SM-2 parameters.
pub fn schedule(state: &CardReviewState, quality: Quality, now: DateTime<Utc>) -> CardReviewState {
    sm2::Sm2::default().schedule(state, quality, now)
}
