//! # miqatd — miqat daemon
//!
//! Composition root that wires the adapters together and keeps the prayer
//! schedule of the selected location up to date.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise logging
//! - Construct the astronomy engine and the settings store (adapters)
//! - Construct the schedule service, injecting the engine via its port trait
//! - Start the refresh and countdown tasks
//! - Log schedule changes and the next prayer
//! - Stop every timer on Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! Schedule logic stays in `miqat-domain` and `miqat-app`; this crate only wires.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;
use tracing_subscriber::EnvFilter;

use miqat_adapter_astronomy::SolarEngine;
use miqat_adapter_settings_json::JsonSettingsStore;
use miqat_app::countdown::{CountdownHandle, CountdownTick};
use miqat_app::ports::SystemClock;
use miqat_app::refresh::{RefreshHandle, RefreshStatus};
use miqat_app::services::schedule_service::{ScheduleService, Snapshot};
use miqat_domain::classify::NextPrayer;
use miqat_domain::format;
use miqat_domain::schedule::DaySchedule;

use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let catalog = config.catalog()?;
    tracing::info!(
        location = %config.location.name,
        locations = catalog.len(),
        settings = %config.settings.path.display(),
        "miqatd starting"
    );

    // Adapters
    let engine = SolarEngine::new();
    let store = Arc::new(
        JsonSettingsStore::new(&config.settings.path).with_key(config.settings.key.as_str()),
    );
    let clock = Arc::new(SystemClock);

    // Services
    let service = Arc::new(ScheduleService::new(catalog, engine));

    // Timers
    let refresh = RefreshHandle::start(
        service,
        store,
        clock.clone(),
        config.location.name.clone(),
        config.intervals(),
    );
    let countdown = CountdownHandle::start(refresh.subscribe(), clock, config.countdown_interval());

    let mut statuses = WatchStream::new(refresh.subscribe());
    let mut ticks = WatchStream::new(countdown.subscribe());
    let mut reporter = Reporter::default();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("failed to listen for shutdown signal")?;
                tracing::info!("shutdown requested");
                break;
            }
            Some(status) = statuses.next() => reporter.status(&status),
            Some(Some(tick)) = ticks.next() => Reporter::tick(&tick),
        }
    }

    refresh.stop().await;
    countdown.stop().await;
    tracing::info!("miqatd stopped");
    Ok(())
}

/// Logs what a display would render, only when it changes.
#[derive(Default)]
struct Reporter {
    schedule: Option<DaySchedule>,
    next: Option<NextPrayer>,
}

impl Reporter {
    fn status(&mut self, status: &RefreshStatus) {
        if let Some(err) = &status.last_error {
            tracing::warn!(error = %err, "schedule refresh failed, keeping previous schedule");
        }
        let Some(snapshot) = &status.snapshot else {
            return;
        };
        self.schedule(snapshot);

        let next = snapshot.next();
        if self.next != Some(next) {
            self.next = Some(next);
            tracing::info!(
                location = snapshot.schedule.location(),
                next = %next.name,
                at = %format::clock_time(next.instant, snapshot.schedule.timezone()),
                "next prayer"
            );
        }
    }

    fn schedule(&mut self, snapshot: &Snapshot) {
        let schedule = &snapshot.schedule;
        let tz = schedule.timezone();
        if self.schedule.as_ref() == Some(schedule) {
            return;
        }
        self.schedule = Some(schedule.clone());

        tracing::info!(
            location = schedule.location(),
            date = %format::long_date(schedule.fajr().instant, tz),
            "schedule"
        );
        for entry in &snapshot.classification.events {
            let event = &entry.event;
            tracing::info!(
                prayer = %event.name,
                time = %format::clock_time(event.instant, tz),
                jamat = ?event.jamat.map(|j| format::clock_time(j, tz)),
                active = entry.is_active,
                passed = entry.is_passed,
                prohibited = event.prohibited,
            );
        }
    }

    fn tick(tick: &CountdownTick) {
        tracing::trace!(next = %tick.next.name, remaining = %tick.remaining, "countdown");
    }
}
