//! Location — a named place with coordinates and a civil timezone.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Geographic coordinates in decimal degrees (north and east positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A selectable place. Immutable reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub coordinates: Coordinates,
    pub timezone: Tz,
}

impl Location {
    /// Create a builder for constructing a [`Location`].
    #[must_use]
    pub fn builder() -> LocationBuilder {
        LocationBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLocation`] when the name is empty or the
    /// coordinates are out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason| ConfigError::InvalidLocation {
            name: self.name.clone(),
            reason,
        };
        if self.name.is_empty() {
            return Err(invalid("name is empty"));
        }
        if !(-90.0..=90.0).contains(&self.coordinates.latitude) {
            return Err(invalid("latitude out of range"));
        }
        if !(-180.0..=180.0).contains(&self.coordinates.longitude) {
            return Err(invalid("longitude out of range"));
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Location`].
#[derive(Debug, Default)]
pub struct LocationBuilder {
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<Tz>,
}

impl LocationBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    #[must_use]
    pub fn timezone(mut self, timezone: Tz) -> Self {
        self.timezone = Some(timezone);
        self
    }

    /// Consume the builder, validate, and return a [`Location`].
    ///
    /// A missing timezone defaults to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLocation`] if the name is missing or the
    /// coordinates are out of range.
    pub fn build(self) -> Result<Location, ConfigError> {
        let location = Location {
            name: self.name.unwrap_or_default(),
            coordinates: Coordinates {
                latitude: self.latitude.unwrap_or_default(),
                longitude: self.longitude.unwrap_or_default(),
            },
            timezone: self.timezone.unwrap_or(Tz::UTC),
        };
        location.validate()?;
        Ok(location)
    }
}

/// Fixed catalog of locations, looked up by name.
#[derive(Debug, Clone, Default)]
pub struct LocationCatalog {
    entries: Vec<Location>,
}

impl LocationCatalog {
    /// The built-in catalog of major Pakistani cities.
    #[must_use]
    pub fn pakistan() -> Self {
        const CITIES: [(&str, f64, f64); 8] = [
            ("Karachi", 24.8607, 67.0011),
            ("Lahore", 31.5204, 74.3587),
            ("Islamabad", 33.6844, 73.0479),
            ("Rawalpindi", 33.5651, 73.0169),
            ("Faisalabad", 31.4504, 73.1350),
            ("Multan", 30.1575, 71.5249),
            ("Peshawar", 34.0151, 71.5249),
            ("Quetta", 30.1798, 66.9750),
        ];
        let entries = CITIES
            .iter()
            .map(|&(name, latitude, longitude)| Location {
                name: name.to_string(),
                coordinates: Coordinates {
                    latitude,
                    longitude,
                },
                timezone: chrono_tz::Asia::Karachi,
            })
            .collect();
        Self { entries }
    }

    /// Add or replace an entry (matched by name).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLocation`] if the location fails validation.
    pub fn insert(&mut self, location: Location) -> Result<(), ConfigError> {
        location.validate()?;
        match self.entries.iter_mut().find(|l| l.name == location.name) {
            Some(existing) => *existing = location,
            None => self.entries.push(location),
        }
        Ok(())
    }

    /// Look up a location by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownLocation`] when no entry has that name.
    pub fn find(&self, name: &str) -> Result<&Location, ConfigError> {
        self.entries
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| ConfigError::UnknownLocation(name.to_string()))
    }

    /// Iterate over the catalog in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
