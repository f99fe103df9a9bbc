//! SM-2 spaced repetition algorithm.
//!
//! Quality is rated 0-4. Ratings at or above `pass_threshold` advance the
//! repetition count; anything lower resets the card to a one-day interval.
//! Intervals are whole days. `f64::round` is used when growing an interval,
//! so halves round away from zero.

use super::SpacedRepetitionAlgorithm;
use crate::types::{CardReviewState, Quality};
use chrono::{DateTime, Duration, Utc};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub pass_threshold: u8,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: CardReviewState::INITIAL_EASE,
            minimum_ease: 1.3,
            pass_threshold: 3,
        }
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_state(&self, created_at: DateTime<Utc>) -> CardReviewState {
        CardReviewState {
            ease_factor: self.initial_ease,
            ..CardReviewState::new(created_at)
        }
    }

    fn schedule(&self, state: &CardReviewState, quality: Quality, now: DateTime<Utc>) -> CardReviewState {
        let (interval_days, repetitions) = if quality.value() >= self.pass_threshold {
            let interval = match state.repetitions {
                0 => 1,
                1 => 6,
                // Float-to-int `as` saturates at u32::MAX.
                _ => (f64::from(state.interval_days) * state.ease_factor).round() as u32,
            };
            (interval, state.repetitions.saturating_add(1))
        } else {
            (1, 0)
        };

        CardReviewState {
            ease_factor: self.next_ease(state.ease_factor, quality),
            interval_days,
            repetitions,
            next_review_date: next_review_date(now, interval_days),
        }
    }
}

impl Sm2 {
    /// EF' = max(min, EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)))
    fn next_ease(&self, ease_factor: f64, quality: Quality) -> f64 {
        let miss = 5.0 - f64::from(quality.value());
        let delta = 0.1 - miss * (0.08 + miss * 0.02);
        (ease_factor + delta).max(self.minimum_ease)
    }
}

fn next_review_date(now: DateTime<Utc>, interval_days: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(interval_days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
