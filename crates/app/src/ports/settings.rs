//! Settings port — persisted user calculation settings.

use std::future::Future;

use miqat_domain::config::CalculationConfig;
use miqat_domain::error::MiqatError;

/// Key-value persistence of the user's [`CalculationConfig`].
///
/// Implementations return [`CalculationConfig::default`] when nothing has
/// been saved yet.
pub trait SettingsStore: Send + Sync {
    /// Load the current settings.
    fn load(&self) -> impl Future<Output = Result<CalculationConfig, MiqatError>> + Send;

    /// Replace the stored settings.
    fn save(
        &self,
        config: &CalculationConfig,
    ) -> impl Future<Output = Result<(), MiqatError>> + Send;
}
