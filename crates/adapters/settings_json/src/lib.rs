//! # miqat-adapter-settings-json
//!
//! [`SettingsStore`](miqat_app::ports::SettingsStore) backed by a JSON
//! key-value file.
//!
//! ## File layout
//!
//! The file holds one JSON object; the settings live under a single key
//! (`prayerSettings` by default). Other keys are left untouched on save;
//! a file that is not a JSON object is never overwritten.
//! The value may be the settings object itself or a string containing its
//! JSON encoding:
//!
//! ```json
//! { "prayerSettings": "{\"fiqh\":\"shafee\",\"jamatTimes\":{\"Fajr\":\"05:45\"}}" }
//! ```
//!
//! ## Dependency rule
//!
//! Depends on `miqat-app` (for the port trait) and `miqat-domain`.

mod error;
mod store;

pub use error::SettingsError;
pub use store::{DEFAULT_KEY, JsonSettingsStore};
