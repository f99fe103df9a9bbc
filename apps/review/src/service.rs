//! Review workflow: load state, schedule, write back conditionally.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use srs_core::{CardReviewState, Quality, Sm2, SpacedRepetitionAlgorithm, StudyQueue};

use crate::config::Config;
use crate::db::date_utils::study_day_cutoff;
use crate::db::{
    Card, CardRepository, DbError, ReviewLogRepository, ReviewRecord, ReviewStats,
    SqliteRepository, StateRepository, StatsRepository,
};
use crate::error::{Result, ServiceError};

/// Result of applying one review.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReviewOutcome {
    pub card_id: i64,
    pub previous: CardReviewState,
    pub state: CardReviewState,
    pub version: i64,
}

/// Review service over a SQLite repository.
pub struct ReviewService<A = Sm2> {
    repository: Mutex<SqliteRepository>,
    algorithm: A,
    daily_reset_hour: u32,
    queue_limit: usize,
}

impl ReviewService<Sm2> {
    /// Open the configured database with SM-2 scheduling.
    pub fn from_config(config: &Config) -> Result<Self> {
        tracing::info!(path = %config.database_path.display(), "Opening review database");
        let repository = SqliteRepository::open(&config.database_path)?;
        Ok(Self::with_repository(repository, config))
    }

    /// Wrap an existing repository, using SM-2 with the configured threshold.
    pub fn with_repository(repository: SqliteRepository, config: &Config) -> Self {
        let algorithm = Sm2 {
            pass_threshold: config.pass_threshold,
            ..Sm2::default()
        };
        Self::new(repository, algorithm, config)
    }
}

impl<A: SpacedRepetitionAlgorithm> ReviewService<A> {
    pub fn new(repository: SqliteRepository, algorithm: A, config: &Config) -> Self {
        Self {
            repository: Mutex::new(repository),
            algorithm,
            daily_reset_hour: config.daily_reset_hour,
            queue_limit: config.queue_limit,
        }
    }

    fn repo(&self) -> Result<MutexGuard<'_, SqliteRepository>> {
        self.repository
            .lock()
            .map_err(|_| ServiceError::Internal("repository lock poisoned".to_string()))
    }

    /// Create a card with a fresh review state, due immediately.
    pub fn add_card(&self, front: &str, back: &str, now: DateTime<Utc>) -> Result<i64> {
        let initial = self.algorithm.initial_state(now);
        let id = self.repo()?.add_card(front, back, &initial, now)?;
        tracing::info!(card_id = id, "Card created");
        Ok(id)
    }

    pub fn card(&self, card_id: i64) -> Result<Option<Card>> {
        Ok(self.repo()?.get_card(card_id)?)
    }

    pub fn delete_card(&self, card_id: i64) -> Result<()> {
        self.repo()?.delete_card(card_id)?;
        tracing::info!(card_id, "Card deleted");
        Ok(())
    }

    /// Apply one review to a card.
    ///
    /// Fails with `StaleState` if the stored state changed since it was read;
    /// the review is then not applied and is not retried.
    pub fn review(
        &self,
        card_id: i64,
        quality: impl Into<Quality>,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome> {
        let quality = quality.into();
        let repo = self.repo()?;

        let stored = repo
            .get_card_state(card_id)?
            .ok_or(DbError::CardNotFound(card_id))?;
        let previous = stored.state;
        let state = self.algorithm.schedule(&previous, quality, now);

        let record = ReviewRecord {
            id: 0,
            card_id,
            reviewed_at: now,
            quality,
            interval_before: previous.interval_days,
            interval_after: state.interval_days,
            ease_before: previous.ease_factor,
            ease_after: state.ease_factor,
            repetitions_before: previous.repetitions,
            repetitions_after: state.repetitions,
        };

        let version = match repo.apply_review(stored.version, &state, &record) {
            Ok(version) => version,
            Err(e @ DbError::StaleState { .. }) => {
                tracing::warn!(card_id, expected_version = stored.version, "Review rejected: state changed concurrently");
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            card_id,
            quality = %quality,
            algorithm = self.algorithm.name(),
            interval_days = state.interval_days,
            repetitions = state.repetitions,
            ease_factor = state.ease_factor,
            "Review applied"
        );

        Ok(ReviewOutcome {
            card_id,
            previous,
            state,
            version,
        })
    }

    /// Cards due before the end of the current study day.
    pub fn study_queue(&self, now: DateTime<Utc>) -> Result<StudyQueue<Card>> {
        self.study_queue_with_limit(now, self.queue_limit)
    }

    pub fn study_queue_with_limit(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<StudyQueue<Card>> {
        let cutoff = study_day_cutoff(now, self.daily_reset_hour);
        let candidates = self.repo()?.get_due_cards(cutoff)?;
        let queue = StudyQueue::from_candidates(candidates, cutoff, limit);
        tracing::debug!(due = queue.len(), remaining = queue.remaining, %cutoff, "Study queue built");
        Ok(queue)
    }

    pub fn stats(&self, now: DateTime<Utc>) -> Result<ReviewStats> {
        let cutoff = study_day_cutoff(now, self.daily_reset_hour);
        Ok(self.repo()?.get_stats(cutoff)?)
    }

    pub fn reviews(&self, card_id: i64) -> Result<Vec<ReviewRecord>> {
        Ok(self.repo()?.get_reviews(card_id)?)
    }
}
