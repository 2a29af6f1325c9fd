//! Common error types used across the workspace.
//!
//! Each layer converts its own failures into [`MiqatError`] via `#[from]`.
//! Configuration problems are recoverable (callers fall back to defaults or
//! keep the previous schedule); computation problems mean "no schedule
//! available for this selection".

use chrono::NaiveDate;

use crate::prayer::PrayerName;

/// Top-level error for the miqat workspace.
#[derive(Debug, thiserror::Error)]
pub enum MiqatError {
    #[error("configuration error")]
    Config(#[from] ConfigError),

    #[error("schedule computation failed")]
    Computation(#[from] ComputationError),

    /// A settings store or other adapter failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Problems with the location selection or the persisted settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown location {0:?}")]
    UnknownLocation(String),

    #[error("persisted settings are malformed")]
    MalformedSettings(#[source] serde_json::Error),

    #[error("invalid location {name:?}: {reason}")]
    InvalidLocation { name: String, reason: &'static str },
}

/// The astronomical engine could not produce a usable day of instants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComputationError {
    /// The sun never reaches the altitude required for this prayer
    /// (typical at high latitudes).
    #[error("no {prayer} instant on {date}")]
    NoSolution { prayer: PrayerName, date: NaiveDate },

    #[error("day schedule for {date} does not hold the six prayer slots in order")]
    MissingSlots { date: NaiveDate },

    #[error("prayer instants on {date} are not strictly increasing")]
    Unordered { date: NaiveDate },

    #[error("date {0} is outside the supported range")]
    DateOutOfRange(NaiveDate),
}
