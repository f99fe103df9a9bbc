//! Due-card queue ordering.

use crate::types::CardReviewState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A card that is up for review, with its current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueCard<T> {
    pub card_id: i64,
    pub card: T,
    pub state: CardReviewState,
}

/// Cards to study in this session, oldest due first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyQueue<T> {
    pub cards: Vec<DueCard<T>>,
    /// Due cards left out because of the limit.
    pub remaining: usize,
}

impl<T> StudyQueue<T> {
    /// Build a queue from candidate cards.
    ///
    /// Cards not due by `cutoff` are dropped. The rest are ordered by
    /// `next_review_date`, ties broken by card id, and truncated to `limit`.
    pub fn from_candidates<I>(candidates: I, cutoff: DateTime<Utc>, limit: usize) -> Self
    where
        I: IntoIterator<Item = DueCard<T>>,
    {
        let mut cards: Vec<DueCard<T>> = candidates
            .into_iter()
            .filter(|c| c.state.is_due(cutoff))
            .collect();
        cards.sort_by(|a, b| {
            a.state
                .next_review_date
                .cmp(&b.state.next_review_date)
                .then(a.card_id.cmp(&b.card_id))
        });

        let remaining = cards.len().saturating_sub(limit);
        cards.truncate(limit);

        Self { cards, remaining }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }
}
