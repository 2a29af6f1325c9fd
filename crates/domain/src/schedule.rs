//! Day schedule — the ordered list of prayer events for one civil day.
//!
//! Built from the raw instants of an astronomical engine:
//! 1. the midday slot is named `Jummah` when the civil date is a Friday,
//! 2. a prohibited `Sunrise` slot follows `Fajr`, its window lasting the
//!    configured number of minutes,
//! 3. jamat overrides are anchored to the schedule's civil date.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::CalculationConfig;
use crate::error::ComputationError;
use crate::jamat;
use crate::location::Location;
use crate::prayer::{DayInstants, PrayerEvent, PrayerName};

/// Number of events in every day schedule.
pub const EVENTS_PER_DAY: usize = 6;

/// Six events in fixed order with strictly increasing instants.
///
/// Deserialization re-checks both properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDaySchedule")]
pub struct DaySchedule {
    location: String,
    date: NaiveDate,
    timezone: Tz,
    events: Vec<PrayerEvent>,
}

impl DaySchedule {
    /// Assemble the schedule for `date` at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`ComputationError::Unordered`] if the instants are not
    /// strictly increasing in the fixed prayer order.
    pub fn assemble(
        location: &Location,
        date: NaiveDate,
        instants: &DayInstants,
        config: &CalculationConfig,
    ) -> Result<Self, ComputationError> {
        let midday = if date.weekday() == Weekday::Fri {
            PrayerName::Jummah
        } else {
            PrayerName::Dhuhr
        };
        let sunrise_end =
            instants.sunrise + Duration::minutes(i64::from(config.sunrise_duration_minutes));

        let mut events = vec![
            PrayerEvent::new(PrayerName::Fajr, instants.fajr),
            PrayerEvent::prohibited(PrayerName::Sunrise, instants.sunrise, sunrise_end),
            PrayerEvent::new(midday, instants.dhuhr),
            PrayerEvent::new(PrayerName::Asr, instants.asr),
            PrayerEvent::new(PrayerName::Maghrib, instants.maghrib),
            PrayerEvent::new(PrayerName::Isha, instants.isha),
        ];

        check_events(date, &events)?;

        for event in &mut events {
            event.jamat = jamat::resolve(config, event.name, date, location.timezone);
        }

        Ok(Self {
            location: location.name.clone(),
            date,
            timezone: location.timezone,
            events,
        })
    }

    /// Name of the location this schedule was built for.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Civil date of the schedule in the location's timezone.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    #[must_use]
    pub fn events(&self) -> &[PrayerEvent] {
        &self.events
    }

    /// The first event of the day (`Fajr`).
    #[must_use]
    pub fn fajr(&self) -> &PrayerEvent {
        &self.events[0]
    }

    /// The prohibited sunrise event.
    #[must_use]
    pub fn sunrise(&self) -> &PrayerEvent {
        &self.events[1]
    }

    /// The midday event, named `Dhuhr` or `Jummah`.
    #[must_use]
    pub fn midday(&self) -> &PrayerEvent {
        &self.events[2]
    }

    /// Look up an event by display name.
    #[must_use]
    pub fn get(&self, name: PrayerName) -> Option<&PrayerEvent> {
        self.events.iter().find(|e| e.name == name)
    }
}

/// Unchecked serialized form of a [`DaySchedule`].
#[derive(Deserialize)]
struct RawDaySchedule {
    location: String,
    date: NaiveDate,
    timezone: Tz,
    events: Vec<PrayerEvent>,
}

impl TryFrom<RawDaySchedule> for DaySchedule {
    type Error = ComputationError;

    fn try_from(raw: RawDaySchedule) -> Result<Self, Self::Error> {
        check_events(raw.date, &raw.events)?;
        Ok(Self {
            location: raw.location,
            date: raw.date,
            timezone: raw.timezone,
            events: raw.events,
        })
    }
}

fn slot_accepts(index: usize, name: PrayerName) -> bool {
    match index {
        0 => name == PrayerName::Fajr,
        1 => name == PrayerName::Sunrise,
        2 => name.is_midday(),
        3 => name == PrayerName::Asr,
        4 => name == PrayerName::Maghrib,
        5 => name == PrayerName::Isha,
        _ => false,
    }
}

fn check_events(date: NaiveDate, events: &[PrayerEvent]) -> Result<(), ComputationError> {
    let slots_match = events.len() == EVENTS_PER_DAY
        && events
            .iter()
            .enumerate()
            .all(|(index, event)| slot_accepts(index, event.name));
    if !slots_match {
        return Err(ComputationError::MissingSlots { date });
    }
    if events.windows(2).any(|pair| pair[0].instant >= pair[1].instant) {
        return Err(ComputationError::Unordered { date });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::config::Fiqh;
    use crate::location::LocationCatalog;
    use crate::time::Timestamp;

    pub(crate) fn karachi() -> Location {
        LocationCatalog::pakistan().find("Karachi").unwrap().clone()
    }

    fn at(date: NaiveDate, hour: u32, minute: u32) -> Timestamp {
        // Karachi local time to UTC (fixed +05:00).
        Utc.from_utc_datetime(&date.and_hms_opt(hour, minute, 0).unwrap())
            - Duration::hours(5)
    }

    /// Plausible Karachi instants for `date`, close to real mid-March values.
    pub(crate) fn instants(date: NaiveDate) -> DayInstants {
        DayInstants {
            fajr: at(date, 5, 22),
            sunrise: at(date, 6, 38),
            dhuhr: at(date, 12, 41),
            asr: at(date, 16, 57),
            maghrib: at(date, 18, 44),
            isha: at(date, 20, 0),
        }
    }

    pub(crate) fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    pub(crate) fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
    }

    pub(crate) fn schedule(date: NaiveDate) -> DaySchedule {
        DaySchedule::assemble(
            &karachi(),
            date,
            &instants(date),
            &CalculationConfig::default(),
        )
        .unwrap()
    }

    fn names(schedule: &DaySchedule) -> Vec<PrayerName> {
        schedule.events().iter().map(|e| e.name).collect()
    }

    #[test]
    fn should_build_six_events_in_fixed_order() {
        let schedule = schedule(monday());
        assert_eq!(schedule.events().len(), EVENTS_PER_DAY);
        assert_eq!(
            names(&schedule),
            vec![
                PrayerName::Fajr,
                PrayerName::Sunrise,
                PrayerName::Dhuhr,
                PrayerName::Asr,
                PrayerName::Maghrib,
                PrayerName::Isha,
            ]
        );
        assert!(
            schedule
                .events()
                .windows(2)
                .all(|pair| pair[0].instant < pair[1].instant)
        );
    }

    #[test]
    fn should_name_midday_jummah_on_friday() {
        let friday = schedule(friday());
        assert_eq!(friday.midday().name, PrayerName::Jummah);
        assert!(friday.get(PrayerName::Dhuhr).is_none());
        assert_eq!(friday.midday().instant, instants(self::friday()).dhuhr);
    }

    #[test]
    fn should_name_midday_dhuhr_on_monday() {
        let monday = schedule(monday());
        assert_eq!(monday.midday().name, PrayerName::Dhuhr);
        assert!(monday.get(PrayerName::Jummah).is_none());
    }

    #[test]
    fn should_mark_only_sunrise_prohibited_with_default_window() {
        let schedule = schedule(monday());
        let sunrise = schedule.sunrise();
        assert_eq!(sunrise.name, PrayerName::Sunrise);
        assert!(sunrise.prohibited);
        assert_eq!(
            sunrise.window_end,
            Some(sunrise.instant + Duration::minutes(15))
        );
        assert_eq!(
            schedule.events().iter().filter(|e| e.prohibited).count(),
            1
        );
    }

    #[test]
    fn should_use_configured_sunrise_duration() {
        let config = CalculationConfig {
            sunrise_duration_minutes: 20,
            ..CalculationConfig::default()
        };
        let schedule =
            DaySchedule::assemble(&karachi(), monday(), &instants(monday()), &config).unwrap();
        let sunrise = schedule.sunrise();
        assert_eq!(
            sunrise.window_end,
            Some(sunrise.instant + Duration::minutes(20))
        );
    }

    #[test]
    fn should_attach_jamat_by_display_name() {
        let mut config = CalculationConfig {
            fiqh: Fiqh::Shafee,
            ..CalculationConfig::default()
        };
        config.set_jamat_time(PrayerName::Jummah, Some("13:30".to_string()));
        config.set_jamat_time(PrayerName::Dhuhr, Some("13:15".to_string()));
        config.set_jamat_time(PrayerName::Asr, Some("garbage".to_string()));

        let friday =
            DaySchedule::assemble(&karachi(), friday(), &instants(friday()), &config).unwrap();
        assert_eq!(friday.midday().jamat, Some(at(self::friday(), 13, 30)));
        assert_eq!(friday.get(PrayerName::Asr).unwrap().jamat, None);
        assert_eq!(friday.fajr().jamat, None);

        let monday =
            DaySchedule::assemble(&karachi(), monday(), &instants(monday()), &config).unwrap();
        assert_eq!(monday.midday().jamat, Some(at(self::monday(), 13, 15)));
    }

    #[test]
    fn should_reject_unordered_instants() {
        let mut raw = instants(monday());
        raw.asr = raw.dhuhr;
        let result =
            DaySchedule::assemble(&karachi(), monday(), &raw, &CalculationConfig::default());
        assert_eq!(result, Err(ComputationError::Unordered { date: monday() }));
    }

    #[test]
    fn should_keep_location_and_date() {
        let schedule = schedule(monday());
        assert_eq!(schedule.location(), "Karachi");
        assert_eq!(schedule.date(), monday());
        assert_eq!(schedule.timezone(), chrono_tz::Asia::Karachi);
    }

    #[test]
    fn should_restore_assembled_schedule_from_json() {
        let schedule = schedule(friday());
        let json = serde_json::to_string(&schedule).unwrap();
        let restored: DaySchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, schedule);
    }

    #[test]
    fn should_reject_json_schedule_without_events() {
        let json = r#"{"location":"Karachi","date":"2024-03-18","timezone":"Asia/Karachi","events":[]}"#;
        let err = serde_json::from_str::<DaySchedule>(json).unwrap_err();
        assert!(err.to_string().contains("prayer slots"), "{err}");
    }

    #[test]
    fn should_reject_json_schedule_with_swapped_slots() {
        let mut value = serde_json::to_value(schedule(monday())).unwrap();
        value["events"][3]["name"] = serde_json::json!("Isha");
        assert!(serde_json::from_value::<DaySchedule>(value).is_err());
    }

    #[test]
    fn should_reject_json_schedule_with_unordered_instants() {
        let mut value = serde_json::to_value(schedule(monday())).unwrap();
        let fajr = value["events"][0]["instant"].clone();
        value["events"][5]["instant"] = fajr;
        let err = serde_json::from_value::<DaySchedule>(value).unwrap_err();
        assert!(err.to_string().contains("strictly increasing"), "{err}");
    }
}
