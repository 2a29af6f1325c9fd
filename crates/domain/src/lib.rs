//! # miqat-domain
//!
//! Pure domain model for the miqat prayer schedule system.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps, civil dates
//! - Define **Locations** and the catalog they are selected from
//! - Define the **CalculationConfig** (fiqh, jamat overrides, sunrise window)
//! - Assemble the ordered **DaySchedule** from raw astronomical instants
//!   (Friday substitution, prohibited sunrise window, jamat overrides)
//! - **Classify** a schedule against the current instant (active / passed /
//!   next prayer, day rollover)
//! - Display helpers: 12-hour clock formatting, countdowns
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries (astronomical engine, settings storage, clock) are
//! expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod classify;
pub mod config;
pub mod countdown;
pub mod format;
pub mod jamat;
pub mod location;
pub mod prayer;
pub mod schedule;
