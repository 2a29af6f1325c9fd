//! Remaining time until the next prayer, for countdown displays.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Whole hours, minutes and seconds left until a target instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Countdown {
    /// Time left from `now` until `target`, clamped to zero once passed.
    #[must_use]
    pub fn until(target: Timestamp, now: Timestamp) -> Self {
        let total = u64::try_from((target - now).num_seconds()).unwrap_or(0);
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}
