//! Environment-based configuration.
//!
//! Values are read from the process environment after loading an optional
//! `.env` file.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Result, ServiceError};

pub const ENV_DATABASE_PATH: &str = "EXHUB_DATABASE_PATH";
pub const ENV_DAILY_RESET_HOUR: &str = "EXHUB_DAILY_RESET_HOUR";
pub const ENV_QUEUE_LIMIT: &str = "EXHUB_QUEUE_LIMIT";
pub const ENV_PASS_THRESHOLD: &str = "EXHUB_PASS_THRESHOLD";

/// Review service configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Config {
    pub database_path: PathBuf,
    /// Hour of day (UTC, 0-23) when a new study day begins.
    pub daily_reset_hour: u32,
    /// Maximum cards in one study queue.
    pub queue_limit: usize,
    /// Lowest quality counted as a successful recall (1-4).
    pub pass_threshold: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("exhub-review.db"),
            daily_reset_hour: 0,
            queue_limit: 200,
            pass_threshold: 3,
        }
    }
}

impl Config {
    /// Load from the environment (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup. Missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_DAILY_RESET_HOUR) {
            config.daily_reset_hour = parse_var(ENV_DAILY_RESET_HOUR, &raw)?;
        }
        if let Some(raw) = lookup(ENV_QUEUE_LIMIT) {
            config.queue_limit = parse_var(ENV_QUEUE_LIMIT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_PASS_THRESHOLD) {
            config.pass_threshold = parse_var(ENV_PASS_THRESHOLD, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.daily_reset_hour > 23 {
            return Err(ServiceError::Config(format!(
                "{} must be 0-23, got {}",
                ENV_DAILY_RESET_HOUR, self.daily_reset_hour
            )));
        }
        if !(1..=4).contains(&self.pass_threshold) {
            return Err(ServiceError::Config(format!(
                "{} must be 1-4, got {}",
                ENV_PASS_THRESHOLD, self.pass_threshold
            )));
        }
        Ok(())
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ServiceError::Config(format!("invalid {}={:?}: {}", key, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_all_values() {
        let config = Config::from_lookup(lookup(&[
            (ENV_DATABASE_PATH, "/tmp/cards.db"),
            (ENV_DAILY_RESET_HOUR, "4"),
            (ENV_QUEUE_LIMIT, " 50 "),
            (ENV_PASS_THRESHOLD, "2"),
        ]))
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/cards.db"));
        assert_eq!(config.daily_reset_hour, 4);
        assert_eq!(config.queue_limit, 50);
        assert_eq!(config.pass_threshold, 2);
    }

    #[test]
    fn rejects_unparseable_value() {
        let err = Config::from_lookup(lookup(&[(ENV_QUEUE_LIMIT, "lots")])).unwrap_err();
        assert!(matches!(err, ServiceError::Config(_)));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(Config::from_lookup(lookup(&[(ENV_DAILY_RESET_HOUR, "24")])).is_err());
        assert!(Config::from_lookup(lookup(&[(ENV_PASS_THRESHOLD, "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[(ENV_PASS_THRESHOLD, "5")])).is_err());
    }
}
