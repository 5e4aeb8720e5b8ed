//! Utility functions that are typically used for one situation in multiple places.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, TimeZone, Utc};

use crate::error::AdapterError;

/// Nanoseconds in a second.
pub const NS_IN_SECOND: u64 = 1_000_000_000;
/// Seconds in a minute.
pub const SECS_IN_MINUTE: u64 = 60;
/// Milliseconds in a minute.
pub const MS_IN_MINUTE: u64 = 60_000;

/// Parse an ISO-8601 timestamp (`YYYY-MM-DDTHH:MM:SS[.fff]Z`) into
/// nanoseconds since the UNIX epoch.
///
/// # Errors
///
/// Will return [`AdapterError::InvalidTimestamp`] if the string is not a
/// valid RFC-3339 timestamp or predates the epoch.
pub fn iso_to_epoch_ns(timestamp: &str) -> Result<u64, AdapterError> {
    let parsed = DateTime::parse_from_rfc3339(timestamp)
        .map_err(|_| AdapterError::InvalidTimestamp(timestamp.to_owned()))?;

    parsed
        .timestamp_nanos_opt()
        .and_then(|nanos| u64::try_from(nanos).ok())
        .ok_or_else(|| AdapterError::InvalidTimestamp(timestamp.to_owned()))
}

/// Format an epoch time in seconds as the `YYYY-MM-DDTHH:MM:SS` string the
/// candles endpoint expects for its `start`/`end` window bounds.
#[must_use]
pub fn epoch_secs_to_iso(epoch_secs: u64) -> String {
    match Utc.timestamp_opt(epoch_secs as i64, 0) {
        chrono::LocalResult::Single(datetime) => datetime.format("%Y-%m-%dT%H:%M:%S").to_string(),
        // Out-of-range epochs cannot come from the minute clock.
        _ => String::new(),
    }
}

/// Milliseconds since the UNIX epoch, now.
#[must_use]
pub fn epoch_now_ms() -> u64 {
    let start = SystemTime::now();
    let since_the_epoch = start
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards");

    since_the_epoch.as_secs() * 1000 + u64::from(since_the_epoch.subsec_nanos()) / 1_000_000
}

/// Seconds since the UNIX epoch, now.
#[must_use]
pub fn epoch_now_secs() -> u64 {
    let start = SystemTime::now();
    let since_the_epoch = start
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards");

    since_the_epoch.as_secs()
}
