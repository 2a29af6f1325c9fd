//! Settings-file error type.

use miqat_domain::error::MiqatError;

/// Errors originating from the settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Reading or writing the file failed.
    #[error("settings file error")]
    Io(#[from] std::io::Error),

    /// Failed to encode or decode the settings document.
    #[error("JSON serialization error")]
    Json(#[from] serde_json::Error),

    /// The file holds valid JSON that is not an object.
    #[error("settings file is not a JSON object")]
    NotAnObject,
}

impl From<SettingsError> for MiqatError {
    fn from(err: SettingsError) -> Self {
        Self::Storage(Box::new(err))
    }
}
