//! Timestamp utilities

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Whole days as a chrono duration
pub fn days(count: u32) -> Duration {
    Duration::days(i64::from(count))
}

/// Hour of day (0-23) of `timestamp` shifted by `utc_offset_minutes`
///
/// Out-of-range offsets (beyond ±24h) fall back to UTC.
pub fn local_hour(timestamp: DateTime<Utc>, utc_offset_minutes: i32) -> u32 {
    match FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60)) {
        Some(offset) => timestamp.with_timezone(&offset).hour(),
        None => timestamp.hour(),
    }
}
