//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `miqat.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;

use miqat_app::refresh::RefreshIntervals;
use miqat_domain::location::{Location, LocationCatalog};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initially selected location.
    pub location: LocationConfig,
    /// Timer periods.
    pub refresh: RefreshConfig,
    /// Persisted calculation settings.
    pub settings: SettingsConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Extra catalog entries, added to (or replacing) the built-in cities.
    pub locations: Vec<ExtraLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Catalog name of the selected location.
    pub name: String,
}

/// Timer periods of the background tasks.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub classify_interval_secs: u64,
    pub config_reload_interval_secs: u64,
    pub countdown_interval_ms: u64,
}

/// Where the calculation settings are persisted.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// JSON key-value file.
    pub path: PathBuf,
    /// Key holding the settings inside that file.
    pub key: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// A catalog entry declared in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtraLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone name, e.g. `Asia/Dubai`.
    pub timezone: Tz,
}

impl Config {
    /// Load configuration from `miqat.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("miqat.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MIQAT_LOCATION") {
            self.location.name = val;
        }
        if let Ok(val) = std::env::var("MIQAT_SETTINGS_PATH") {
            self.settings.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("MIQAT_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh.classify_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "classify_interval_secs must be non-zero".to_string(),
            ));
        }
        if self.refresh.config_reload_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "config_reload_interval_secs must be non-zero".to_string(),
            ));
        }
        if self.refresh.countdown_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "countdown_interval_ms must be non-zero".to_string(),
            ));
        }
        if self.location.name.is_empty() {
            return Err(ConfigError::Validation(
                "location name must not be empty".to_string(),
            ));
        }
        let catalog = self.catalog()?;
        if catalog.find(&self.location.name).is_err() {
            return Err(ConfigError::Validation(format!(
                "location {:?} is not in the catalog",
                self.location.name
            )));
        }
        Ok(())
    }

    /// Built-in cities plus the extra `[[locations]]` entries.
    ///
    /// # Errors
    ///
    /// Returns an error if an extra entry has an empty name or out-of-range
    /// coordinates.
    pub fn catalog(&self) -> Result<LocationCatalog, ConfigError> {
        let mut catalog = LocationCatalog::pakistan();
        for extra in &self.locations {
            let location = Location::builder()
                .name(extra.name.clone())
                .coordinates(extra.latitude, extra.longitude)
                .timezone(extra.timezone)
                .build()?;
            catalog.insert(location)?;
        }
        Ok(catalog)
    }

    /// Periods of the refresh task.
    #[must_use]
    pub fn intervals(&self) -> RefreshIntervals {
        RefreshIntervals {
            classify: Duration::from_secs(self.refresh.classify_interval_secs),
            settings: Duration::from_secs(self.refresh.config_reload_interval_secs),
        }
    }

    /// Period of the countdown display.
    #[must_use]
    pub fn countdown_interval(&self) -> Duration {
        Duration::from_millis(self.refresh.countdown_interval_ms)
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: "Karachi".to_string(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            classify_interval_secs: 60,
            config_reload_interval_secs: 300,
            countdown_interval_ms: 1000,
        }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("prayer-settings.json"),
            key: miqat_adapter_settings_json::DEFAULT_KEY.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "miqatd=info,miqat_app=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// An extra catalog entry is invalid.
    #[error("invalid location entry")]
    Location(#[from] miqat_domain::error::ConfigError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
