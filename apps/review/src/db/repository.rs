//! Repository pattern for database access.

use crate::db::date_utils::{format_timestamp, parse_timestamp};
use crate::db::error::DbError;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use srs_core::{CardReviewState, DueCard, Quality};
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

/// Flashcard content.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Card {
    pub id: i64,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
}

/// Review state as stored, with the version used for conditional updates.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StoredState {
    pub state: CardReviewState,
    pub version: i64,
}

/// One applied review.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReviewRecord {
    pub id: i64,
    pub card_id: i64,
    pub reviewed_at: DateTime<Utc>,
    pub quality: Quality,
    pub interval_before: u32,
    pub interval_after: u32,
    pub ease_before: f64,
    pub ease_after: f64,
    pub repetitions_before: u32,
    pub repetitions_after: u32,
}

/// Aggregate review statistics.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReviewStats {
    pub total_cards: usize,
    pub due_cards: usize,
    pub average_ease: f64,
    pub average_interval: f64,
    pub total_reviews: usize,
}

/// Repository for card operations.
pub trait CardRepository {
    fn add_card(
        &self,
        front: &str,
        back: &str,
        initial: &CardReviewState,
        created_at: DateTime<Utc>,
    ) -> Result<i64>;
    fn get_card(&self, id: i64) -> Result<Option<Card>>;
    fn delete_card(&self, id: i64) -> Result<()>;
    /// All cards due at or before `cutoff`, oldest first.
    fn get_due_cards(&self, cutoff: DateTime<Utc>) -> Result<Vec<DueCard<Card>>>;
}

/// Repository for card state operations.
pub trait StateRepository {
    fn get_card_state(&self, card_id: i64) -> Result<Option<StoredState>>;
    /// Write `state` only if the stored version still equals
    /// `expected_version`. Returns the new version.
    fn save_card_state(
        &self,
        card_id: i64,
        expected_version: i64,
        state: &CardReviewState,
    ) -> Result<i64>;
}

/// Repository for the review log.
pub trait ReviewLogRepository {
    fn insert_review(&self, review: &ReviewRecord) -> Result<i64>;
    fn get_reviews(&self, card_id: i64) -> Result<Vec<ReviewRecord>>;
}

/// Repository for statistics operations.
pub trait StatsRepository {
    fn get_stats(&self, cutoff: DateTime<Utc>) -> Result<ReviewStats>;
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![super::schema::SCHEMA_VERSION],
        )?;
        Ok(())
    }

    /// Save a scheduled state and append its log entry atomically.
    ///
    /// Nothing is written if the state version has moved on.
    pub fn apply_review(
        &self,
        expected_version: i64,
        state: &CardReviewState,
        review: &ReviewRecord,
    ) -> Result<i64> {
        let tx = self.conn.unchecked_transaction()?;
        let version = self.save_card_state(review.card_id, expected_version, state)?;
        self.insert_review(review)?;
        tx.commit()?;
        Ok(version)
    }

    fn row_to_due_card(row: &Row) -> rusqlite::Result<DueCard<Card>> {
        let card_id: i64 = row.get(0)?;
        Ok(DueCard {
            card_id,
            card: Card {
                id: card_id,
                front: row.get(1)?,
                back: row.get(2)?,
                created_at: timestamp_at(row, 3)?,
            },
            state: CardReviewState {
                ease_factor: row.get(4)?,
                interval_days: row.get(5)?,
                repetitions: row.get(6)?,
                next_review_date: timestamp_at(row, 7)?,
            },
        })
    }

    fn row_to_review(row: &Row) -> rusqlite::Result<ReviewRecord> {
        let raw_quality: u8 = row.get(3)?;
        let quality = Quality::new(raw_quality)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, Box::new(e)))?;

        Ok(ReviewRecord {
            id: row.get(0)?,
            card_id: row.get(1)?,
            reviewed_at: timestamp_at(row, 2)?,
            quality,
            interval_before: row.get(4)?,
            interval_after: row.get(5)?,
            ease_before: row.get(6)?,
            ease_after: row.get(7)?,
            repetitions_before: row.get(8)?,
            repetitions_after: row.get(9)?,
        })
    }
}

fn timestamp_at(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl CardRepository for SqliteRepository {
    fn add_card(
        &self,
        front: &str,
        back: &str,
        initial: &CardReviewState,
        created_at: DateTime<Utc>,
    ) -> Result<i64> {
        let tx = self.conn.unchecked_transaction()?;
        self.conn.execute(
            "INSERT INTO cards (front, back, created_at) VALUES (?1, ?2, ?3)",
            params![front, back, format_timestamp(created_at)],
        )?;
        let id = self.conn.last_insert_rowid();

        self.conn.execute(
            "INSERT INTO card_states (card_id, ease_factor, interval_days, repetitions, next_review_at, version) VALUES (?1, ?2, ?3, ?4, ?5, 0)",
            params![
                id,
                initial.ease_factor,
                initial.interval_days,
                initial.repetitions,
                format_timestamp(initial.next_review_date)
            ],
        )?;
        tx.commit()?;
        Ok(id)
    }

    fn get_card(&self, id: i64) -> Result<Option<Card>> {
        self.conn
            .query_row(
                "SELECT id, front, back, created_at FROM cards WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Card {
                        id: row.get(0)?,
                        front: row.get(1)?,
                        back: row.get(2)?,
                        created_at: timestamp_at(row, 3)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    fn delete_card(&self, id: i64) -> Result<()> {
        let count = self
            .conn
            .execute("DELETE FROM cards WHERE id = ?1", params![id])?;
        if count == 0 {
            return Err(DbError::CardNotFound(id));
        }
        Ok(())
    }

    fn get_due_cards(&self, cutoff: DateTime<Utc>) -> Result<Vec<DueCard<Card>>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.front, c.back, c.created_at, cs.ease_factor, cs.interval_days, cs.repetitions, cs.next_review_at
                FROM cards c
                JOIN card_states cs ON c.id = cs.card_id
                WHERE cs.next_review_at <= ?1
                ORDER BY cs.next_review_at, c.id",
        )?;

        let cards = stmt.query_map(params![format_timestamp(cutoff)], Self::row_to_due_card)?;
        cards.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
    }
}

impl StateRepository for SqliteRepository {
    fn get_card_state(&self, card_id: i64) -> Result<Option<StoredState>> {
        self.conn
            .query_row(
                "SELECT ease_factor, interval_days, repetitions, next_review_at, version FROM card_states WHERE card_id = ?1",
                params![card_id],
                |row| {
                    Ok(StoredState {
                        state: CardReviewState {
                            ease_factor: row.get(0)?,
                            interval_days: row.get(1)?,
                            repetitions: row.get(2)?,
                            next_review_date: timestamp_at(row, 3)?,
                        },
                        version: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    fn save_card_state(
        &self,
        card_id: i64,
        expected_version: i64,
        state: &CardReviewState,
    ) -> Result<i64> {
        let count = self.conn.execute(
            "UPDATE card_states SET ease_factor = ?1, interval_days = ?2, repetitions = ?3, next_review_at = ?4, version = version + 1
                WHERE card_id = ?5 AND version = ?6",
            params![
                state.ease_factor,
                state.interval_days,
                state.repetitions,
                format_timestamp(state.next_review_date),
                card_id,
                expected_version
            ],
        )?;
        if count == 0 {
            return Err(DbError::StaleState {
                card_id,
                expected_version,
            });
        }
        Ok(expected_version + 1)
    }
}

impl ReviewLogRepository for SqliteRepository {
    fn insert_review(&self, review: &ReviewRecord) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO review_log (card_id, reviewed_at, quality, interval_before, interval_after, ease_before, ease_after, repetitions_before, repetitions_after)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                review.card_id,
                format_timestamp(review.reviewed_at),
                review.quality.value(),
                review.interval_before,
                review.interval_after,
                review.ease_before,
                review.ease_after,
                review.repetitions_before,
                review.repetitions_after
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_reviews(&self, card_id: i64) -> Result<Vec<ReviewRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, card_id, reviewed_at, quality, interval_before, interval_after, ease_before, ease_after, repetitions_before, repetitions_after
                FROM review_log WHERE card_id = ?1 ORDER BY id",
        )?;
        let reviews = stmt.query_map(params![card_id], Self::row_to_review)?;
        reviews.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
    }
}

impl StatsRepository for SqliteRepository {
    fn get_stats(&self, cutoff: DateTime<Utc>) -> Result<ReviewStats> {
        let (total_cards, average_ease, average_interval): (i64, f64, f64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(AVG(ease_factor), 0.0), COALESCE(AVG(interval_days), 0.0) FROM card_states",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        let due_cards: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM card_states WHERE next_review_at <= ?1",
            params![format_timestamp(cutoff)],
            |row| row.get(0),
        )?;

        let total_reviews: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM review_log", [], |row| row.get(0))?;

        Ok(ReviewStats {
            total_cards: total_cards as usize,
            due_cards: due_cards as usize,
            average_ease,
            average_interval,
            total_reviews: total_reviews as usize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, hour, 0, 0).unwrap()
    }

    fn add(repo: &SqliteRepository, front: &str, created: DateTime<Utc>) -> i64 {
        repo.add_card(front, "back", &CardReviewState::new(created), created)
            .unwrap()
    }

    #[test]
    fn add_card_creates_default_state() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let id = add(&repo, "hola", at(9));

        let card = repo.get_card(id).unwrap().unwrap();
        assert_eq!(card.front, "hola");
        assert_eq!(card.created_at, at(9));

        let stored = repo.get_card_state(id).unwrap().unwrap();
        assert_eq!(stored.version, 0);
        assert_eq!(stored.state, CardReviewState::new(at(9)));
    }

    #[test]
    fn save_state_bumps_version() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let id = add(&repo, "q", at(9));
        let next = CardReviewState {
            ease_factor: 2.36,
            interval_days: 1,
            repetitions: 1,
            next_review_date: at(9) + Duration::days(1),
        };

        assert_eq!(repo.save_card_state(id, 0, &next).unwrap(), 1);
        let stored = repo.get_card_state(id).unwrap().unwrap();
        assert_eq!(stored.version, 1);
        assert_eq!(stored.state, next);
    }

    #[test]
    fn save_state_rejects_stale_version() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let id = add(&repo, "q", at(9));
        let next = CardReviewState::new(at(10));

        repo.save_card_state(id, 0, &next).unwrap();
        let err = repo.save_card_state(id, 0, &next).unwrap_err();
        assert!(matches!(
            err,
            DbError::StaleState {
                expected_version: 0,
                ..
            }
        ));
    }

    #[test]
    fn due_cards_ordered_and_filtered() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let late = add(&repo, "late", at(11));
        let early = add(&repo, "early", at(8));
        let _future = add(&repo, "future", at(20));

        let due = repo.get_due_cards(at(12)).unwrap();
        let ids: Vec<i64> = due.iter().map(|d| d.card_id).collect();
        assert_eq!(ids, vec![early, late]);
        assert_eq!(due[0].card.front, "early");
    }

    #[test]
    fn delete_card_cascades() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let id = add(&repo, "gone", at(9));
        repo.delete_card(id).unwrap();

        assert!(repo.get_card(id).unwrap().is_none());
        assert!(repo.get_card_state(id).unwrap().is_none());
        assert!(matches!(repo.delete_card(id), Err(DbError::CardNotFound(_))));
    }

    #[test]
    fn stats_on_empty_database() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let stats = repo.get_stats(at(12)).unwrap();
        assert_eq!(stats.total_cards, 0);
        assert_eq!(stats.due_cards, 0);
        assert_eq!(stats.average_ease, 0.0);
        assert_eq!(stats.total_reviews, 0);
    }
}
