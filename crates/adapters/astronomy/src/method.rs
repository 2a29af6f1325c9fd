//! Twilight angles of the supported calculation methods.

use miqat_domain::config::CalculationMethod;

/// How the Isha instant is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IshaRule {
    /// Sun at this many degrees below the horizon after sunset.
    Angle(f64),
    /// Fixed number of minutes after Maghrib.
    MinutesAfterMaghrib(i64),
}

/// Parameters of one calculation method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodParams {
    /// Sun depression at Fajr, in degrees.
    pub fajr_angle: f64,
    pub isha: IshaRule,
}

impl MethodParams {
    #[must_use]
    pub fn of(method: CalculationMethod) -> Self {
        let (fajr_angle, isha) = match method {
            CalculationMethod::Karachi => (18.0, IshaRule::Angle(18.0)),
            CalculationMethod::MuslimWorldLeague => (18.0, IshaRule::Angle(17.0)),
            CalculationMethod::Isna => (15.0, IshaRule::Angle(15.0)),
            CalculationMethod::Egyptian => (19.5, IshaRule::Angle(17.5)),
            CalculationMethod::UmmAlQura => (18.5, IshaRule::MinutesAfterMaghrib(90)),
        };
        Self { fajr_angle, isha }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_use_eighteen_degrees_for_karachi() {
        let params = MethodParams::of(CalculationMethod::Karachi);
        assert!((params.fajr_angle - 18.0).abs() < f64::EPSILON);
        assert_eq!(params.isha, IshaRule::Angle(18.0));
    }

    #[test]
    fn should_use_fixed_isha_delay_for_umm_al_qura() {
        let params = MethodParams::of(CalculationMethod::UmmAlQura);
        assert_eq!(params.isha, IshaRule::MinutesAfterMaghrib(90));
    }
}
