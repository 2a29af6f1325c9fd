//! Jamat overrides: parsing local `HH:MM` strings and anchoring them to a day.
//!
//! Shared by the schedule builder and by anything that edits settings, so
//! both agree on what counts as a valid time of day.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::config::CalculationConfig;
use crate::prayer::PrayerName;
use crate::time::Timestamp;

/// Parse a 24-hour `H:MM` / `HH:MM` time of day.
///
/// Returns `None` for anything else, including out-of-range hours or minutes.
#[must_use]
pub fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    let (hours, minutes) = text.trim().split_once(':')?;
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Canonical `HH:MM` form of a time of day.
#[must_use]
pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Normalise user input to `HH:MM`, or `None` if it is not a valid time.
#[must_use]
pub fn normalize_time_of_day(text: &str) -> Option<String> {
    parse_time_of_day(text).map(format_time_of_day)
}

/// Combine a local time of day with a civil date in `tz`.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant;
/// non-existent ones (DST spring-forward gap) yield `None`.
#[must_use]
pub fn anchor(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<Timestamp> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// Resolve the configured jamat for `name` on `date` in `tz`.
///
/// Missing or unparseable entries resolve to `None`.
#[must_use]
pub fn resolve(
    config: &CalculationConfig,
    name: PrayerName,
    date: NaiveDate,
    tz: Tz,
) -> Option<Timestamp> {
    let time = parse_time_of_day(config.jamat_time(name)?)?;
    anchor(date, time, tz)
}
