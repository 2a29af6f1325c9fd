//! In-memory port fakes shared by the unit tests of this crate.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use miqat_domain::config::{CalculationConfig, CalculationMethod, Fiqh};
use miqat_domain::error::{ComputationError, MiqatError};
use miqat_domain::location::Coordinates;
use miqat_domain::prayer::{DayInstants, PrayerName};
use miqat_domain::time::Timestamp;

use crate::ports::{AstronomicalEngine, Clock, SettingsStore};

/// Karachi wall-clock time (UTC+5, no DST) as a UTC instant.
pub(crate) fn karachi_local(date: NaiveDate, hour: u32, minute: u32, second: u32) -> Timestamp {
    Utc.from_utc_datetime(&date.and_hms_opt(hour, minute, second).unwrap()) - Duration::hours(5)
}

// ── Engine ─────────────────────────────────────────────────────────

/// Same Karachi-like local times every day; Asr depends on fiqh.
#[derive(Default)]
pub(crate) struct FakeEngine {
    failing: HashSet<NaiveDate>,
    calls: AtomicUsize,
}

impl FakeEngine {
    pub(crate) fn failing_on(date: NaiveDate) -> Self {
        Self {
            failing: HashSet::from([date]),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AstronomicalEngine for FakeEngine {
    fn compute_day_instants(
        &self,
        _coordinates: Coordinates,
        date: NaiveDate,
        _timezone: Tz,
        _method: CalculationMethod,
        fiqh: Fiqh,
    ) -> Result<DayInstants, ComputationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&date) {
            return Err(ComputationError::NoSolution {
                prayer: PrayerName::Isha,
                date,
            });
        }
        let asr = match fiqh {
            Fiqh::Hanafi => karachi_local(date, 16, 55, 0),
            Fiqh::Shafee => karachi_local(date, 16, 10, 0),
        };
        Ok(DayInstants {
            fajr: karachi_local(date, 5, 20, 0),
            sunrise: karachi_local(date, 6, 40, 0),
            dhuhr: karachi_local(date, 12, 40, 0),
            asr,
            maghrib: karachi_local(date, 18, 40, 0),
            isha: karachi_local(date, 20, 0, 0),
        })
    }
}

// ── Clock ──────────────────────────────────────────────────────────

/// Clock that only moves when told to.
pub(crate) struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub(crate) fn at(now: Timestamp) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub(crate) fn set(&self, now: Timestamp) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap()
    }
}

// ── Settings ───────────────────────────────────────────────────────

#[derive(Default)]
pub(crate) struct InMemorySettingsStore {
    config: Mutex<CalculationConfig>,
    failing: AtomicBool,
    loads: AtomicUsize,
}

impl InMemorySettingsStore {
    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn load(&self) -> impl Future<Output = Result<CalculationConfig, MiqatError>> + Send {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let result = if self.failing.load(Ordering::SeqCst) {
            Err(MiqatError::Storage("settings unavailable".into()))
        } else {
            Ok(self.config.lock().unwrap().clone())
        };
        async { result }
    }

    fn save(&self, config: &CalculationConfig) -> impl Future<Output = Result<(), MiqatError>> + Send {
        *self.config.lock().unwrap() = config.clone();
        async { Ok(()) }
    }
}
