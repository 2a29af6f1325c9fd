//! [`SolarEngine`] — the port implementation.

use chrono::{Duration, NaiveDate, Offset, TimeZone};
use chrono_tz::Tz;

use miqat_app::ports::AstronomicalEngine;
use miqat_domain::config::{CalculationMethod, Fiqh};
use miqat_domain::error::ComputationError;
use miqat_domain::location::Coordinates;
use miqat_domain::prayer::{DayInstants, PrayerName};
use miqat_domain::time::Timestamp;

use crate::method::{IshaRule, MethodParams};
use crate::solar::{self, HORIZON_DEPRESSION, Side, SolarDay};

/// Refinement passes; each pass re-evaluates the sun at the previous estimate.
const PASSES: usize = 2;

/// Local mean times (hours) of the six instants.
#[derive(Debug, Clone, Copy)]
struct Hours {
    fajr: f64,
    sunrise: f64,
    dhuhr: f64,
    asr: f64,
    maghrib: f64,
    isha: f64,
}

impl Hours {
    const INITIAL: Self = Self {
        fajr: 5.0,
        sunrise: 6.0,
        dhuhr: 12.0,
        asr: 13.0,
        maghrib: 18.0,
        isha: 18.0,
    };
}

/// Astronomical engine backed by the low-precision solar model.
///
/// Stateless. Instants are computed in local mean solar time for the solar
/// day that lands on the requested civil date in `timezone`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolarEngine;

impl SolarEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn compute_hours(
        day: SolarDay,
        date: NaiveDate,
        params: MethodParams,
        fiqh: Fiqh,
    ) -> Result<Hours, ComputationError> {
        let require = |value: Option<f64>, prayer: PrayerName| {
            value.ok_or(ComputationError::NoSolution { prayer, date })
        };

        let mut hours = Hours::INITIAL;
        for _ in 0..PASSES {
            let previous = hours;
            let maghrib = require(
                day.crossing(HORIZON_DEPRESSION, previous.maghrib, Side::Evening),
                PrayerName::Maghrib,
            )?;
            hours = Hours {
                fajr: require(
                    day.crossing(params.fajr_angle, previous.fajr, Side::Morning),
                    PrayerName::Fajr,
                )?,
                sunrise: require(
                    day.crossing(HORIZON_DEPRESSION, previous.sunrise, Side::Morning),
                    PrayerName::Sunrise,
                )?,
                dhuhr: day.transit(previous.dhuhr),
                asr: require(
                    day.asr(fiqh.asr_shadow_factor(), previous.asr),
                    PrayerName::Asr,
                )?,
                maghrib,
                isha: match params.isha {
                    IshaRule::Angle(angle) => require(
                        day.crossing(angle, previous.isha, Side::Evening),
                        PrayerName::Isha,
                    )?,
                    #[allow(clippy::cast_precision_loss)]
                    IshaRule::MinutesAfterMaghrib(minutes) => maghrib + minutes as f64 / 60.0,
                },
            };
        }
        Ok(hours)
    }
}

/// The mean solar day whose daylight falls on civil `date` in `timezone`.
///
/// Mean solar time runs `longitude / 15` hours ahead of UTC. Near the date
/// line the civil offset can differ from it by about a day.
fn solar_date(date: NaiveDate, longitude: f64, timezone: Tz) -> Option<NaiveDate> {
    let noon = date.and_hms_opt(12, 0, 0)?;
    let offset = timezone.offset_from_utc_datetime(&noon).fix();
    let civil_hours = f64::from(offset.local_minus_utc()) / 3600.0;
    #[allow(clippy::cast_possible_truncation)]
    let days = ((civil_hours - longitude / 15.0) / 24.0).round() as i64;
    date.checked_sub_signed(Duration::try_days(days)?)
}

/// Convert local mean hours on `day` at `longitude` to a UTC instant.
fn to_instant(day: NaiveDate, longitude: f64, hours: f64) -> Option<Timestamp> {
    let seconds = ((hours - longitude / 15.0) * 3600.0).round();
    if !seconds.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let offset = Duration::try_seconds(seconds as i64)?;
    day.and_hms_opt(0, 0, 0)?
        .and_utc()
        .checked_add_signed(offset)
}

impl AstronomicalEngine for SolarEngine {
    fn compute_day_instants(
        &self,
        coordinates: Coordinates,
        date: NaiveDate,
        timezone: Tz,
        method: CalculationMethod,
        fiqh: Fiqh,
    ) -> Result<DayInstants, ComputationError> {
        let params = MethodParams::of(method);
        let solar_date = solar_date(date, coordinates.longitude, timezone)
            .ok_or(ComputationError::DateOutOfRange(date))?;
        let day = SolarDay {
            jd: solar::julian_day(solar_date) - coordinates.longitude / 360.0,
            latitude: coordinates.latitude,
        };
        let hours = Self::compute_hours(day, date, params, fiqh).inspect_err(|err| {
            tracing::debug!(
                latitude = coordinates.latitude,
                longitude = coordinates.longitude,
                %date,
                %timezone,
                error = %err,
                "no solar solution"
            );
        })?;

        let at = |h: f64| {
            to_instant(solar_date, coordinates.longitude, h)
                .ok_or(ComputationError::DateOutOfRange(date))
        };
        let maghrib = at(hours.maghrib)?;
        // Keep fixed delays exact rather than rounding twice.
        let isha = match params.isha {
            IshaRule::Angle(_) => at(hours.isha)?,
            IshaRule::MinutesAfterMaghrib(minutes) => maghrib + Duration::minutes(minutes),
        };

        Ok(DayInstants {
            fajr: at(hours.fajr)?,
            sunrise: at(hours.sunrise)?,
            dhuhr: at(hours.dhuhr)?,
            asr: at(hours.asr)?,
            maghrib,
            isha,
        })
    }
}
