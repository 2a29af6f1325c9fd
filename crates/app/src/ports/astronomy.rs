//! Astronomical port — raw prayer instants for a place and a civil date.

use chrono::NaiveDate;
use chrono_tz::Tz;

use miqat_domain::config::{CalculationMethod, Fiqh};
use miqat_domain::error::ComputationError;
use miqat_domain::location::Coordinates;
use miqat_domain::prayer::DayInstants;

/// Computes the solar prayer instants of one civil day.
///
/// Implementations must be deterministic: identical inputs always yield
/// identical instants. Only the Asr instant may depend on `fiqh`.
pub trait AstronomicalEngine: Send + Sync {
    /// Instants for `date` (a civil date in `timezone`) at `coordinates`.
    ///
    /// # Errors
    ///
    /// Returns a [`ComputationError`] when the sun does not reach a required
    /// altitude on that day or the date cannot be handled.
    fn compute_day_instants(
        &self,
        coordinates: Coordinates,
        date: NaiveDate,
        timezone: Tz,
        method: CalculationMethod,
        fiqh: Fiqh,
    ) -> Result<DayInstants, ComputationError>;
}

impl<E: AstronomicalEngine + ?Sized> AstronomicalEngine for std::sync::Arc<E> {
    fn compute_day_instants(
        &self,
        coordinates: Coordinates,
        date: NaiveDate,
        timezone: Tz,
        method: CalculationMethod,
        fiqh: Fiqh,
    ) -> Result<DayInstants, ComputationError> {
        (**self).compute_day_instants(coordinates, date, timezone, method, fiqh)
    }
}
