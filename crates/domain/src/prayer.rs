//! Prayer names, raw astronomical instants, and schedule events.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Display name of a slot in the daily schedule.
///
/// `Jummah` replaces `Dhuhr` on Fridays; every other name is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrayerName {
    Fajr,
    Sunrise,
    Dhuhr,
    Jummah,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    /// Canonical text form, also used as the key in `jamatTimes`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fajr => "Fajr",
            Self::Sunrise => "Sunrise",
            Self::Dhuhr => "Dhuhr",
            Self::Jummah => "Jummah",
            Self::Asr => "Asr",
            Self::Maghrib => "Maghrib",
            Self::Isha => "Isha",
        }
    }

    /// Whether this is the midday slot (`Dhuhr` or its Friday substitute).
    #[must_use]
    pub fn is_midday(self) -> bool {
        matches!(self, Self::Dhuhr | Self::Jummah)
    }
}

impl fmt::Display for PrayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unrecognised prayer name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown prayer name {0:?}")]
pub struct UnknownPrayerName(pub String);

impl FromStr for PrayerName {
    type Err = UnknownPrayerName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fajr" => Ok(Self::Fajr),
            "Sunrise" => Ok(Self::Sunrise),
            "Dhuhr" => Ok(Self::Dhuhr),
            "Jummah" => Ok(Self::Jummah),
            "Asr" => Ok(Self::Asr),
            "Maghrib" => Ok(Self::Maghrib),
            "Isha" => Ok(Self::Isha),
            other => Err(UnknownPrayerName(other.to_string())),
        }
    }
}

/// Raw instants for one civil day, as produced by an astronomical engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayInstants {
    pub fajr: Timestamp,
    pub sunrise: Timestamp,
    pub dhuhr: Timestamp,
    pub asr: Timestamp,
    pub maghrib: Timestamp,
    pub isha: Timestamp,
}

/// One named slot of a day's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerEvent {
    pub name: PrayerName,
    pub instant: Timestamp,
    /// Only the sunrise slot is prohibited.
    pub prohibited: bool,
    /// End of the prohibited window, present only when `prohibited`.
    pub window_end: Option<Timestamp>,
    /// Congregation time override, if configured and valid.
    pub jamat: Option<Timestamp>,
}

impl PrayerEvent {
    /// A regular (non-prohibited) event without a jamat override.
    #[must_use]
    pub fn new(name: PrayerName, instant: Timestamp) -> Self {
        Self {
            name,
            instant,
            prohibited: false,
            window_end: None,
            jamat: None,
        }
    }

    /// A prohibited event whose window runs from `instant` until `window_end`.
    #[must_use]
    pub fn prohibited(name: PrayerName, instant: Timestamp, window_end: Timestamp) -> Self {
        Self {
            name,
            instant,
            prohibited: true,
            window_end: Some(window_end),
            jamat: None,
        }
    }

    /// Whether `now` lies inside this event's prohibited window.
    #[must_use]
    pub fn in_prohibited_window(&self, now: Timestamp) -> bool {
        match self.window_end {
            Some(end) if self.prohibited => now >= self.instant && now < end,
            _ => false,
        }
    }
}
