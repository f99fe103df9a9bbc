//! Concurrent writers on a shared database file.

mod common;

use std::sync::Arc;
use std::thread;

use exhub_review::db::{DbError, SqliteRepository, StateRepository};
use exhub_review::{Config, ReviewService, ServiceError};
use srs_core::{schedule, Rating};
use tempfile::TempDir;

use common::t0;

fn file_config(dir: &TempDir) -> Config {
    Config {
        database_path: dir.path().join("reviews.db"),
        ..Config::default()
    }
}

#[test]
fn test_stale_read_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    let service = ReviewService::from_config(&config).unwrap();
    let id = service.add_card("front", "back", t0()).unwrap();

    // A second writer reads the state before the review lands
    let other = SqliteRepository::open(&config.database_path).unwrap();
    let stale = other.get_card_state(id).unwrap().unwrap();

    service.review(id, Rating::Good, t0()).unwrap();

    let next = schedule(&stale.state, Rating::Good.into(), t0());
    let err = other.save_card_state(id, stale.version, &next).unwrap_err();
    assert!(matches!(err, DbError::StaleState { card_id, expected_version: 0 } if card_id == id));

    // Only one review was applied
    assert_eq!(service.reviews(id).unwrap().len(), 1);
    let stored = other.get_card_state(id).unwrap().unwrap();
    assert_eq!(stored.version, 1);
    assert_eq!(stored.state.repetitions, 1);
}

#[test]
fn test_parallel_reviews_serialize() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    let service = Arc::new(ReviewService::from_config(&config).unwrap());
    let id = service.add_card("front", "back", t0()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || service.review(id, Rating::Good, t0()))
        })
        .collect();

    let outcomes: Vec<Result<_, ServiceError>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(outcomes.iter().all(|o| o.is_ok()));

    let log = service.reviews(id).unwrap();
    assert_eq!(log.len(), 4);
    let reps: Vec<u32> = log.iter().map(|r| r.repetitions_after).collect();
    assert_eq!(reps, vec![1, 2, 3, 4]);
}
