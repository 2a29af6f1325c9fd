//! Calculation settings supplied by the user.
//!
//! The persisted form is camelCase JSON:
//!
//! ```json
//! { "fiqh": "hanafi", "jamatTimes": { "Fajr": "05:45" }, "sunriseDurationMinutes": 15 }
//! ```
//!
//! Every field is optional; unknown keys are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::prayer::PrayerName;

/// Default length of the prohibited window after sunrise, in minutes.
pub const DEFAULT_SUNRISE_DURATION_MINUTES: u32 = 15;

/// Jurisprudence school. Only the Asr instant depends on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fiqh {
    /// Later Asr: shadow length twice the object's height.
    #[default]
    Hanafi,
    /// Earlier Asr: shadow length equal to the object's height.
    #[serde(alias = "shafi", alias = "shafii")]
    Shafee,
}

impl Fiqh {
    /// Shadow-length factor used for the Asr threshold.
    #[must_use]
    pub fn asr_shadow_factor(self) -> f64 {
        match self {
            Self::Hanafi => 2.0,
            Self::Shafee => 1.0,
        }
    }
}

/// Named twilight convention handed to the astronomical engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    /// University of Islamic Sciences, Karachi.
    #[default]
    Karachi,
    MuslimWorldLeague,
    Isna,
    Egyptian,
    UmmAlQura,
}

/// User preferences that shape a day's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculationConfig {
    pub fiqh: Fiqh,
    pub method: CalculationMethod,
    /// Prayer display name → local `HH:MM`. Invalid entries are ignored.
    pub jamat_times: BTreeMap<String, String>,
    #[serde(alias = "sunriseDuration")]
    pub sunrise_duration_minutes: u32,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            fiqh: Fiqh::default(),
            method: CalculationMethod::default(),
            jamat_times: BTreeMap::new(),
            sunrise_duration_minutes: DEFAULT_SUNRISE_DURATION_MINUTES,
        }
    }
}

impl CalculationConfig {
    /// Parse the persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedSettings`] when the text is not a
    /// valid settings object.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::MalformedSettings)
    }

    /// Raw jamat time-of-day string configured for `name`, if any.
    #[must_use]
    pub fn jamat_time(&self, name: PrayerName) -> Option<&str> {
        self.jamat_times.get(name.as_str()).map(String::as_str)
    }

    /// Set or clear the jamat time for `name`.
    pub fn set_jamat_time(&mut self, name: PrayerName, time: Option<String>) {
        match time {
            Some(time) => {
                self.jamat_times.insert(name.as_str().to_string(), time);
            }
            None => {
                self.jamat_times.remove(name.as_str());
            }
        }
    }
}
