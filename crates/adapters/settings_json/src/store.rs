//! [`JsonSettingsStore`] — the port implementation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use miqat_app::ports::SettingsStore;
use miqat_domain::config::CalculationConfig;
use miqat_domain::error::{ConfigError, MiqatError};

use crate::error::SettingsError;

/// Key the settings are stored under unless configured otherwise.
pub const DEFAULT_KEY: &str = "prayerSettings";

/// Settings stored under one key of a JSON object file.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
    key: String,
}

impl JsonSettingsStore {
    /// Store backed by the file at `path`, using [`DEFAULT_KEY`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: DEFAULT_KEY.to_string(),
        }
    }

    /// Use `key` instead of [`DEFAULT_KEY`].
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The whole key-value document, `None` when the file does not exist.
    async fn read_document(&self) -> Result<Option<Map<String, Value>>, SettingsError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(document) => Ok(Some(document)),
            _ => Err(SettingsError::NotAnObject),
        }
    }
}

/// Accept both the object form and the JSON-encoded string form.
fn decode(value: Value) -> Result<CalculationConfig, ConfigError> {
    match value {
        Value::String(text) => CalculationConfig::from_json(&text),
        other => serde_json::from_value(other).map_err(ConfigError::MalformedSettings),
    }
}

impl SettingsStore for JsonSettingsStore {
    async fn load(&self) -> Result<CalculationConfig, MiqatError> {
        let document = match self.read_document().await {
            Ok(document) => document,
            Err(err @ SettingsError::Io(_)) => return Err(err.into()),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "unreadable settings file, using defaults"
                );
                None
            }
        };
        let Some(mut document) = document else {
            return Ok(CalculationConfig::default());
        };
        let config = match document.remove(&self.key) {
            None | Some(Value::Null) => CalculationConfig::default(),
            Some(value) => decode(value).unwrap_or_else(|err| {
                tracing::warn!(
                    path = %self.path.display(),
                    key = %self.key,
                    error = %err,
                    "malformed settings, using defaults"
                );
                CalculationConfig::default()
            }),
        };
        Ok(config)
    }

    async fn save(&self, config: &CalculationConfig) -> Result<(), MiqatError> {
        let mut document = self.read_document().await?.unwrap_or_default();
        document.insert(
            self.key.clone(),
            serde_json::to_value(config).map_err(SettingsError::from)?,
        );
        let text =
            serde_json::to_string_pretty(&Value::Object(document)).map_err(SettingsError::from)?;
        tokio::fs::write(&self.path, text)
            .await
            .map_err(SettingsError::from)?;
        tracing::debug!(path = %self.path.display(), key = %self.key, "settings saved");
        Ok(())
    }
}
