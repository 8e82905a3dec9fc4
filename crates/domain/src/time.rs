//! Time and timestamp helpers.

use chrono::{DateTime, Duration, Utc};

/// UTC timestamp used for cookie expiry.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Return `from` shifted forward by a whole number of days.
#[must_use]
pub fn days_after(from: Timestamp, days: u32) -> Timestamp {
    from + Duration::days(i64::from(days))
}
