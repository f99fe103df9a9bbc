//! Date utilities for study-day boundaries and timestamp storage.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SecondsFormat, Utc};

use super::error::DbError;

/// End of the current study day.
///
/// A study day begins at `daily_reset_hour`:00 UTC. The returned cutoff is
/// the first such boundary strictly after `now`, so cards due later "today"
/// are included in today's queue. Hours above 23 are clamped.
///
/// # Arguments
/// * `now` - Current time
/// * `daily_reset_hour` - Hour of day (0-23) when a new study day begins
pub fn study_day_cutoff(now: DateTime<Utc>, daily_reset_hour: u32) -> DateTime<Utc> {
    let reset = NaiveTime::from_hms_opt(daily_reset_hour.min(23), 0, 0).unwrap_or_default();
    let today_reset = now.date_naive().and_time(reset).and_utc();

    if today_reset > now {
        today_reset
    } else {
        today_reset + Duration::days(1)
    }
}

/// Format a timestamp for storage.
///
/// Dates past year 9999 are clamped, since RFC 3339 cannot express them.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    let latest = NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map(|dt| dt.and_utc());
    let ts = match latest {
        Some(latest) if ts > latest => latest,
        _ => ts,
    };
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse a stored timestamp.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::InvalidData(format!("bad timestamp {:?}: {}", s, e)))
}
