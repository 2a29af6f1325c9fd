//! Time and timestamp helpers.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Absolute UTC instant used for prayer times, jamat times and "now".
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Civil calendar date of `instant` in the given timezone.
#[must_use]
pub fn civil_date(instant: Timestamp, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}
