//! Low-precision solar position and altitude-crossing times.
//!
//! Times are expressed in hours of local mean solar time on the requested
//! day; angles are in degrees.

use chrono::NaiveDate;

/// Julian day of 2000-01-01 12:00 TT.
const J2000: f64 = 2_451_545.0;

/// Sun altitude at rise and set: 34' refraction + 16' semidiameter.
pub(crate) const HORIZON_DEPRESSION: f64 = 0.833;

fn sin(deg: f64) -> f64 {
    deg.to_radians().sin()
}

fn cos(deg: f64) -> f64 {
    deg.to_radians().cos()
}

fn tan(deg: f64) -> f64 {
    deg.to_radians().tan()
}

fn arccot(x: f64) -> f64 {
    (1.0 / x).atan().to_degrees()
}

fn fix(value: f64, range: f64) -> f64 {
    value.rem_euclid(range)
}

/// Julian day at 00:00 UTC of `date`.
pub(crate) fn julian_day(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN);
    #[allow(clippy::cast_precision_loss)]
    let days = (date - epoch).num_days() as f64;
    J2000 + days - 0.5
}

/// Declination and equation of time at one instant.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SunPosition {
    pub declination: f64,
    /// Apparent minus mean solar time, in hours.
    pub equation_of_time: f64,
}

impl SunPosition {
    pub(crate) fn at(jd: f64) -> Self {
        let d = jd - J2000;
        let mean_anomaly = fix(357.529 + 0.985_600_28 * d, 360.0);
        let mean_longitude = fix(280.459 + 0.985_647_36 * d, 360.0);
        let longitude = fix(
            mean_longitude + 1.915 * sin(mean_anomaly) + 0.020 * sin(2.0 * mean_anomaly),
            360.0,
        );
        let obliquity = 23.439 - 0.000_000_36 * d;

        let right_ascension = fix(
            (cos(obliquity) * sin(longitude))
                .atan2(cos(longitude))
                .to_degrees()
                / 15.0,
            24.0,
        );
        let equation_of_time = mean_longitude / 15.0 - right_ascension;
        // Keep within (-12, 12] when the two wrap at different moments.
        let equation_of_time = if equation_of_time > 12.0 {
            equation_of_time - 24.0
        } else if equation_of_time < -12.0 {
            equation_of_time + 24.0
        } else {
            equation_of_time
        };

        Self {
            declination: (sin(obliquity) * sin(longitude)).asin().to_degrees(),
            equation_of_time,
        }
    }
}

/// Which side of the transit an altitude crossing lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Morning,
    Evening,
}

/// One solar day at one latitude.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SolarDay {
    /// Julian day at local mean midnight.
    pub jd: f64,
    pub latitude: f64,
}

impl SolarDay {
    fn position(&self, hours: f64) -> SunPosition {
        SunPosition::at(self.jd + hours / 24.0)
    }

    /// Local mean time of the solar transit near `hours`.
    pub(crate) fn transit(&self, hours: f64) -> f64 {
        fix(12.0 - self.position(hours).equation_of_time, 24.0)
    }

    /// Local mean time at which the sun is `depression` degrees below the
    /// horizon, or `None` when it never gets there on this day.
    pub(crate) fn crossing(&self, depression: f64, hours: f64, side: Side) -> Option<f64> {
        let declination = self.position(hours).declination;
        let cos_hour_angle = (-sin(depression) - sin(declination) * sin(self.latitude))
            / (cos(declination) * cos(self.latitude));
        if !(-1.0..=1.0).contains(&cos_hour_angle) {
            return None;
        }
        let hour_angle = cos_hour_angle.acos().to_degrees() / 15.0;
        let noon = self.transit(hours);
        Some(match side {
            Side::Morning => noon - hour_angle,
            Side::Evening => noon + hour_angle,
        })
    }

    /// Local mean time of Asr for the given shadow factor.
    pub(crate) fn asr(&self, shadow_factor: f64, hours: f64) -> Option<f64> {
        let declination = self.position(hours).declination;
        let altitude = arccot(shadow_factor + tan((self.latitude - declination).abs()));
        self.crossing(-altitude, hours, Side::Evening)
    }
}
