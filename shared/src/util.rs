//! Time helpers

use chrono::{DateTime, Utc};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current UTC time truncated to millisecond precision.
///
/// CQL `timestamp` columns keep milliseconds only; truncating up front means a
/// value handed back to a client equals what a later read returns.
pub fn now_utc() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(now_millis()).unwrap_or_else(Utc::now)
}
