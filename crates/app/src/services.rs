//! Application services (use-cases).

pub mod schedule_service;
