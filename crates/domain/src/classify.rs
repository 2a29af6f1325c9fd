//! Temporal classification of a day schedule against "now".
//!
//! Event *i* is active while `now` is in `[instant_i, instant_{i+1})`; the
//! last event's window closes at tomorrow's Fajr. A prohibited event is never
//! reported active even while its window is current. An event is passed once
//! `now` is strictly after its instant and it is not the current slot.
//!
//! Next prayer, in priority order:
//! 1. inside the sunrise window: the midday prayer,
//! 2. the first non-prohibited event strictly after `now`,
//! 3. otherwise tomorrow's Fajr.

use serde::{Deserialize, Serialize};

use crate::prayer::{PrayerEvent, PrayerName};
use crate::schedule::DaySchedule;
use crate::time::Timestamp;

/// A schedule event with its state relative to "now".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedPrayerEvent {
    pub event: PrayerEvent,
    pub is_active: bool,
    pub is_passed: bool,
}

/// The soonest prayer to count down to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextPrayer {
    pub name: PrayerName,
    pub instant: Timestamp,
}

/// Outcome of classifying one schedule at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub events: Vec<ClassifiedPrayerEvent>,
    pub next: NextPrayer,
}

impl Classification {
    /// The event currently reported as active, if any.
    #[must_use]
    pub fn active(&self) -> Option<&ClassifiedPrayerEvent> {
        self.events.iter().find(|e| e.is_active)
    }
}

/// Classify `schedule` at `now`.
///
/// `tomorrow_fajr` is only invoked when `now` is at or after the last event,
/// and at most once.
///
/// # Errors
///
/// Propagates the error of `tomorrow_fajr`.
pub fn classify<F, E>(
    schedule: &DaySchedule,
    now: Timestamp,
    tomorrow_fajr: F,
) -> Result<Classification, E>
where
    F: FnOnce() -> Result<Timestamp, E>,
{
    let events = schedule.events();
    let last = &events[events.len() - 1];

    let tomorrow = if now >= last.instant {
        Some(tomorrow_fajr()?)
    } else {
        None
    };

    let current = events.iter().enumerate().position(|(index, event)| {
        let window_end = events
            .get(index + 1)
            .map(|next| next.instant)
            .or(tomorrow);
        now >= event.instant && window_end.is_some_and(|end| now < end)
    });

    let classified = events
        .iter()
        .enumerate()
        .map(|(index, event)| {
            let is_current = current == Some(index);
            ClassifiedPrayerEvent {
                event: event.clone(),
                is_active: is_current && !event.prohibited,
                is_passed: now > event.instant && !is_current,
            }
        })
        .collect();

    let next = next_prayer(schedule, now, tomorrow);

    Ok(Classification {
        events: classified,
        next,
    })
}

fn next_prayer(schedule: &DaySchedule, now: Timestamp, tomorrow: Option<Timestamp>) -> NextPrayer {
    let to_next = |event: &PrayerEvent| NextPrayer {
        name: event.name,
        instant: event.instant,
    };

    if schedule.sunrise().in_prohibited_window(now) {
        return to_next(schedule.midday());
    }

    if let Some(event) = schedule
        .events()
        .iter()
        .find(|event| event.instant > now && !event.prohibited)
    {
        return to_next(event);
    }

    match tomorrow {
        Some(instant) => NextPrayer {
            name: PrayerName::Fajr,
            instant,
        },
        // Unreachable for a well-formed schedule: every instant before the
        // last event has a later non-prohibited event.
        None => to_next(schedule.fajr()),
    }
}
