//! Time utility functions

use chrono::{DateTime, TimeZone, Utc};

const NANOS_PER_MILLI: u64 = 1_000_000;

/// Convert nanoseconds since Unix epoch to milliseconds since Unix epoch
pub fn nanos_to_millis(nanos: u64) -> i64 {
    (nanos / NANOS_PER_MILLI) as i64
}

/// Convert nanoseconds since Unix epoch to DateTime<Utc>
pub fn nanos_to_datetime(nanos: u64) -> DateTime<Utc> {
    let secs = (nanos / 1_000_000_000) as i64;
    let nsecs = (nanos % 1_000_000_000) as u32;
    Utc.timestamp_opt(secs, nsecs).single().unwrap_or_else(|| {
        tracing::warn!(nanos, "Invalid timestamp, using epoch");
        DateTime::UNIX_EPOCH
    })
}

/// Convert nanoseconds since Unix epoch to ISO 8601 string (millisecond precision)
pub fn nanos_to_iso(nanos: u64) -> String {
    nanos_to_datetime(nanos).to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
