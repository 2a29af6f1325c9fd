//! Schedule service — builds day schedules and classifies them.

use chrono::NaiveDate;

use miqat_domain::classify::{self, Classification, NextPrayer};
use miqat_domain::config::CalculationConfig;
use miqat_domain::error::{ComputationError, MiqatError};
use miqat_domain::location::{Location, LocationCatalog};
use miqat_domain::schedule::DaySchedule;
use miqat_domain::time::{self, Timestamp};

use crate::ports::AstronomicalEngine;

/// A schedule together with its classification at one instant.
///
/// Published wholesale; consumers never observe a partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub schedule: DaySchedule,
    pub classification: Classification,
    pub computed_at: Timestamp,
}

impl Snapshot {
    /// The resolved next prayer.
    #[must_use]
    pub fn next(&self) -> NextPrayer {
        self.classification.next
    }
}

/// Application service for the schedule builder and temporal classifier.
pub struct ScheduleService<E> {
    catalog: LocationCatalog,
    engine: E,
}

impl<E: AstronomicalEngine> ScheduleService<E> {
    /// Create a new service over the given catalog and engine.
    pub fn new(catalog: LocationCatalog, engine: E) -> Self {
        Self { catalog, engine }
    }

    #[must_use]
    pub fn catalog(&self) -> &LocationCatalog {
        &self.catalog
    }

    /// Look up a location by name.
    ///
    /// # Errors
    ///
    /// Returns [`MiqatError::Config`] when the name is not in the catalog.
    pub fn location(&self, name: &str) -> Result<&Location, MiqatError> {
        Ok(self.catalog.find(name)?)
    }

    /// Build the schedule of `date` at the named location.
    ///
    /// # Errors
    ///
    /// Returns [`MiqatError::Config`] for an unknown location and
    /// [`MiqatError::Computation`] when the engine cannot produce a valid day.
    pub fn build(
        &self,
        location: &str,
        date: NaiveDate,
        config: &CalculationConfig,
    ) -> Result<DaySchedule, MiqatError> {
        let location = self.location(location)?;
        let instants = self.engine.compute_day_instants(
            location.coordinates,
            date,
            location.timezone,
            config.method,
            config.fiqh,
        )?;
        let schedule = DaySchedule::assemble(location, date, &instants, config)?;
        tracing::debug!(
            location = %location.name,
            %date,
            fiqh = ?config.fiqh,
            "schedule built"
        );
        Ok(schedule)
    }

    /// Build the schedule of the civil day containing `now` at the named location.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn build_for(
        &self,
        location: &str,
        now: Timestamp,
        config: &CalculationConfig,
    ) -> Result<DaySchedule, MiqatError> {
        let tz = self.location(location)?.timezone;
        self.build(location, time::civil_date(now, tz), config)
    }

    /// Classify `schedule` at `now`, building tomorrow's schedule when the
    /// last event's window or the next prayer spills into the next day.
    ///
    /// # Errors
    ///
    /// Returns an error only if tomorrow's schedule is needed and cannot be built.
    pub fn classify(
        &self,
        schedule: &DaySchedule,
        now: Timestamp,
        config: &CalculationConfig,
    ) -> Result<Classification, MiqatError> {
        classify::classify(schedule, now, || -> Result<Timestamp, MiqatError> {
            let date = schedule.date();
            let tomorrow = date
                .succ_opt()
                .ok_or(ComputationError::DateOutOfRange(date))?;
            tracing::trace!(
                location = schedule.location(),
                %tomorrow,
                "rolling over to tomorrow"
            );
            let next_day = self.build(schedule.location(), tomorrow, config)?;
            Ok(next_day.fajr().instant)
        })
    }

    /// Build and classify in one step.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build) and [`classify`](Self::classify).
    pub fn snapshot(
        &self,
        location: &str,
        now: Timestamp,
        config: &CalculationConfig,
    ) -> Result<Snapshot, MiqatError> {
        let schedule = self.build_for(location, now, config)?;
        self.reclassify(schedule, now, config)
    }

    /// Classify an already-built schedule into a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`classify`](Self::classify).
    pub fn reclassify(
        &self,
        schedule: DaySchedule,
        now: Timestamp,
        config: &CalculationConfig,
    ) -> Result<Snapshot, MiqatError> {
        let classification = self.classify(&schedule, now, config)?;
        Ok(Snapshot {
            schedule,
            classification,
            computed_at: now,
        })
    }
}
