//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Current UTC time for event stamps
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Interval setting to `Duration`
pub fn millis_to_duration(millis: u64) -> std::time::Duration {
    std::time::Duration::from_millis(millis)
}

/// Whole seconds in a millisecond count, truncated (1999ms is 1s)
pub fn millis_to_whole_seconds(millis: u64) -> u64 {
    millis / 1000
}
