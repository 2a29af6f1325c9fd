//! Display formatting of schedule instants.

use chrono_tz::Tz;

use crate::time::Timestamp;

/// 12-hour clock time in `tz`, e.g. `5:22 AM`.
#[must_use]
pub fn clock_time(instant: Timestamp, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%-I:%M %p").to_string()
}

/// Long civil date in `tz`, e.g. `Friday, March 15, 2024`.
#[must_use]
pub fn long_date(instant: Timestamp, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%A, %B %-d, %Y").to_string()
}
