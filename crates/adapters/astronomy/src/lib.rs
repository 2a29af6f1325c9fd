//! # miqat-adapter-astronomy
//!
//! Default [`AstronomicalEngine`](miqat_app::ports::AstronomicalEngine)
//! implementation.
//!
//! ## How it works
//!
//! The sun's declination and the equation of time come from the
//! low-precision formulas of the Astronomical Almanac (good to about a
//! minute between 1950 and 2050). Each prayer is the instant at which the
//! sun crosses a given altitude:
//!
//! | Prayer | Altitude |
//! |--------|----------|
//! | Fajr | minus the method's Fajr angle, before noon |
//! | Sunrise | -0.833° (refraction + semidiameter), before noon |
//! | Dhuhr | solar transit |
//! | Asr | shadow factor 1 or 2 depending on fiqh, after noon |
//! | Maghrib | -0.833°, after noon |
//! | Isha | minus the method's Isha angle, or a fixed delay after Maghrib |
//!
//! Instants are refined over a fixed number of passes so the result is
//! deterministic for identical inputs.
//!
//! ## Dependency rule
//!
//! Depends on `miqat-app` (for the port trait) and `miqat-domain`.

mod engine;
pub mod method;
mod solar;

pub use engine::SolarEngine;
pub use method::{IshaRule, MethodParams};
