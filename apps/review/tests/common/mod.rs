//! Shared fixtures for review service integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use exhub_review::db::SqliteRepository;
use exhub_review::{Config, ReviewService};

/// Fixed clock for deterministic scheduling.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, 10, 0, 0).unwrap()
}

/// Service over a fresh in-memory database with default config.
pub fn memory_service() -> ReviewService {
    memory_service_with(Config::default())
}

pub fn memory_service_with(config: Config) -> ReviewService {
    let repo = SqliteRepository::open_in_memory().expect("in-memory database");
    ReviewService::with_repository(repo, &config)
}

/// Add `count` cards created at `t0()`.
pub fn seed_cards(service: &ReviewService, count: usize) -> Vec<i64> {
    (0..count)
        .map(|i| {
            service
                .add_card(&format!("question {}", i), &format!("answer {}", i), t0())
                .expect("add card")
        })
        .collect()
}
