//! # miqat-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `AstronomicalEngine` — raw prayer instants for a place and civil date
//!   - `SettingsStore` — load & save the user's `CalculationConfig`
//!   - `Clock` — the current instant
//! - Define **driving/inbound** use-cases:
//!   - `ScheduleService` — build a day schedule, classify it, take snapshots
//!   - `refresh` — timer-driven recomputation publishing the latest snapshot
//!   - `countdown` — display-only countdown to the resolved next prayer
//! - Provide the **scheduled-task** handle used by both timers (`task`)
//! - Orchestrate domain objects without knowing *how* astronomy or storage works
//!
//! ## Dependency rule
//! Depends on `miqat-domain` only (plus `tokio` for timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod countdown;
pub mod ports;
pub mod refresh;
pub mod services;
pub mod task;

#[cfg(test)]
mod testing;
