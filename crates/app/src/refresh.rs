//! Timer-driven schedule refresh.
//!
//! A single background task owns the current settings and day schedule:
//! - every classification tick it re-classifies the cached schedule,
//!   rebuilding it first when the civil date has rolled over,
//! - every settings tick it reloads the [`SettingsStore`] and rebuilds when
//!   the settings changed,
//! - a location change (via [`RefreshHandle::set_location`]) rebuilds at once.
//!
//! The latest [`RefreshStatus`] is published through a `watch` channel and is
//! always replaced as a whole. A failed tick keeps the previous snapshot and
//! only records the error.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use miqat_domain::config::CalculationConfig;
use miqat_domain::error::MiqatError;
use miqat_domain::schedule::DaySchedule;
use miqat_domain::time::{self, Timestamp};

use crate::ports::{AstronomicalEngine, Clock, SettingsStore};
use crate::services::schedule_service::{ScheduleService, Snapshot};
use crate::task::TaskHandle;

/// Timer periods of the refresh task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshIntervals {
    /// How often the schedule is re-classified against the clock.
    pub classify: Duration,
    /// How often persisted settings are re-read.
    pub settings: Duration,
}

impl Default for RefreshIntervals {
    fn default() -> Self {
        Self {
            classify: Duration::from_secs(60),
            settings: Duration::from_secs(300),
        }
    }
}

/// What consumers see: the latest valid snapshot and the latest failure.
#[derive(Debug, Clone, Default)]
pub struct RefreshStatus {
    /// `None` until the first successful refresh.
    pub snapshot: Option<Arc<Snapshot>>,
    /// Error of the most recent tick, cleared by the next success.
    pub last_error: Option<Arc<MiqatError>>,
}

/// Handle to a running refresh task.
pub struct RefreshHandle {
    status: watch::Receiver<RefreshStatus>,
    location: watch::Sender<String>,
    task: TaskHandle,
}

impl RefreshHandle {
    /// Start refreshing the schedule of `location`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<E, S, C>(
        service: Arc<ScheduleService<E>>,
        store: Arc<S>,
        clock: Arc<C>,
        location: impl Into<String>,
        intervals: RefreshIntervals,
    ) -> Self
    where
        E: AstronomicalEngine + 'static,
        S: SettingsStore + 'static,
        C: Clock + 'static,
    {
        let (status_tx, status) = watch::channel(RefreshStatus::default());
        let (location, location_rx) = watch::channel(location.into());

        let refresher = Refresher {
            service,
            store,
            clock,
            location: location_rx,
            status: status_tx,
            settings: CalculationConfig::default(),
            schedule: None,
        };
        let task = TaskHandle::spawn("schedule-refresh", refresher.run(intervals));

        Self {
            status,
            location,
            task,
        }
    }

    /// A receiver notified on every published status.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RefreshStatus> {
        self.status.clone()
    }

    /// The most recently published status.
    #[must_use]
    pub fn latest(&self) -> RefreshStatus {
        self.status.borrow().clone()
    }

    /// Switch to another location; the schedule is rebuilt immediately.
    pub fn set_location(&self, name: impl Into<String>) {
        let name = name.into();
        self.location.send_if_modified(|current| {
            if *current == name {
                return false;
            }
            *current = name;
            true
        });
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }

    /// Stop the refresh task and wait for it to be torn down.
    pub async fn stop(self) {
        self.task.stop().await;
    }
}

struct Refresher<E, S, C> {
    service: Arc<ScheduleService<E>>,
    store: Arc<S>,
    clock: Arc<C>,
    location: watch::Receiver<String>,
    status: watch::Sender<RefreshStatus>,
    settings: CalculationConfig,
    schedule: Option<DaySchedule>,
}

impl<E, S, C> Refresher<E, S, C>
where
    E: AstronomicalEngine,
    S: SettingsStore,
    C: Clock,
{
    async fn run(mut self, intervals: RefreshIntervals) {
        let mut classify_tick = tokio::time::interval(intervals.classify);
        classify_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut settings_tick = tokio::time::interval(intervals.settings);
        settings_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Both intervals fire immediately once; the first settings tick loads
        // the settings before anything is built.
        settings_tick.tick().await;
        classify_tick.tick().await;
        self.reload_settings().await;
        self.tick();

        loop {
            tokio::select! {
                _ = classify_tick.tick() => self.tick(),
                _ = settings_tick.tick() => {
                    if self.reload_settings().await {
                        self.schedule = None;
                        self.tick();
                    }
                }
                changed = self.location.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.schedule = None;
                    self.tick();
                }
            }
        }
    }

    /// Reload settings, returning whether they changed.
    async fn reload_settings(&mut self) -> bool {
        match self.store.load().await {
            Ok(settings) if settings == self.settings => false,
            Ok(settings) => {
                tracing::info!(fiqh = ?settings.fiqh, method = ?settings.method, "settings changed");
                self.settings = settings;
                true
            }
            Err(err) => {
                tracing::warn!(error = ?err, "failed to load settings, keeping current ones");
                false
            }
        }
    }

    fn tick(&mut self) {
        let now = self.clock.now();
        let location = self.location.borrow_and_update().clone();

        match self.refresh(&location, now) {
            Ok(snapshot) => {
                let next = snapshot.next();
                tracing::debug!(
                    %location,
                    next = %next.name,
                    at = %next.instant,
                    "schedule classified"
                );
                self.status.send_replace(RefreshStatus {
                    snapshot: Some(Arc::new(snapshot)),
                    last_error: None,
                });
            }
            Err(err) => {
                tracing::warn!(%location, error = ?err, "refresh failed, keeping previous snapshot");
                let err = Arc::new(err);
                self.status.send_modify(|status| status.last_error = Some(err));
            }
        }
    }

    fn refresh(&mut self, location: &str, now: Timestamp) -> Result<Snapshot, MiqatError> {
        let tz = self.service.location(location)?.timezone;
        let today = time::civil_date(now, tz);

        let schedule = match &self.schedule {
            Some(schedule) if schedule.date() == today && schedule.location() == location => {
                schedule.clone()
            }
            _ => {
                let schedule = self.service.build(location, today, &self.settings)?;
                tracing::info!(%location, date = %today, "schedule rebuilt");
                self.schedule = Some(schedule.clone());
                schedule
            }
        };

        self.service.reclassify(schedule, now, &self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use miqat_domain::config::Fiqh;
    use miqat_domain::error::ConfigError;
    use miqat_domain::location::LocationCatalog;
    use miqat_domain::prayer::PrayerName;

    use crate::testing::{FakeEngine, InMemorySettingsStore, ManualClock, karachi_local};

    struct Harness {
        engine: Arc<FakeEngine>,
        service: Arc<ScheduleService<Arc<FakeEngine>>>,
        store: Arc<InMemorySettingsStore>,
        clock: Arc<ManualClock>,
    }

    impl Harness {
        fn new(engine: FakeEngine, now: Timestamp) -> Self {
            let engine = Arc::new(engine);
            Self {
                service: Arc::new(ScheduleService::new(
                    LocationCatalog::pakistan(),
                    engine.clone(),
                )),
                engine,
                store: Arc::new(InMemorySettingsStore::default()),
                clock: Arc::new(ManualClock::at(now)),
            }
        }

        fn start(&self) -> RefreshHandle {
            RefreshHandle::start(
                self.service.clone(),
                self.store.clone(),
                self.clock.clone(),
                "Karachi",
                RefreshIntervals::default(),
            )
        }
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
    }

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 19).unwrap()
    }

    async fn first_snapshot(rx: &mut watch::Receiver<RefreshStatus>) -> Arc<Snapshot> {
        rx.wait_for(|status| status.snapshot.is_some())
            .await
            .unwrap()
            .snapshot
            .clone()
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn should_publish_initial_snapshot() {
        let harness = Harness::new(FakeEngine::default(), karachi_local(monday(), 13, 0, 0));
        let handle = harness.start();
        let mut rx = handle.subscribe();

        let snapshot = first_snapshot(&mut rx).await;
        assert_eq!(snapshot.schedule.location(), "Karachi");
        assert_eq!(snapshot.schedule.date(), monday());
        assert_eq!(snapshot.next().name, PrayerName::Asr);
        assert_eq!(harness.store.loads(), 1);
        assert!(handle.latest().last_error.is_none());

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_reclassify_without_rebuilding_on_each_tick() {
        let harness = Harness::new(FakeEngine::default(), karachi_local(monday(), 13, 0, 0));
        let handle = harness.start();
        let mut rx = handle.subscribe();
        first_snapshot(&mut rx).await;
        assert_eq!(harness.engine.calls(), 1);

        harness.clock.set(karachi_local(monday(), 17, 0, 0));
        rx.changed().await.unwrap();

        let snapshot = handle.latest().snapshot.unwrap();
        assert_eq!(snapshot.next().name, PrayerName::Maghrib);
        assert_eq!(harness.engine.calls(), 1);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_rebuild_when_civil_date_rolls_over() {
        let harness = Harness::new(FakeEngine::default(), karachi_local(monday(), 23, 59, 0));
        let handle = harness.start();
        let mut rx = handle.subscribe();

        let before = first_snapshot(&mut rx).await;
        assert_eq!(before.next().name, PrayerName::Fajr);
        assert_eq!(before.next().instant, karachi_local(tuesday(), 5, 20, 0));

        harness.clock.set(karachi_local(tuesday(), 0, 0, 30));
        rx.changed().await.unwrap();

        let after = handle.latest().snapshot.unwrap();
        assert_eq!(after.schedule.date(), tuesday());
        assert_eq!(after.next().instant, karachi_local(tuesday(), 5, 20, 0));

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_previous_snapshot_when_tick_fails() {
        let harness = Harness::new(
            FakeEngine::failing_on(tuesday()),
            karachi_local(monday(), 13, 0, 0),
        );
        let handle = harness.start();
        let mut rx = handle.subscribe();
        let before = first_snapshot(&mut rx).await;

        harness.clock.set(karachi_local(tuesday(), 1, 0, 0));
        rx.changed().await.unwrap();

        let status = handle.latest();
        assert!(matches!(
            status.last_error.as_deref(),
            Some(MiqatError::Computation(_))
        ));
        assert_eq!(status.snapshot.unwrap(), before);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_rebuild_immediately_on_location_change() {
        let harness = Harness::new(FakeEngine::default(), karachi_local(monday(), 13, 0, 0));
        let handle = harness.start();
        let mut rx = handle.subscribe();
        first_snapshot(&mut rx).await;

        handle.set_location("Lahore");
        let status = rx
            .wait_for(|status| {
                status
                    .snapshot
                    .as_ref()
                    .is_some_and(|s| s.schedule.location() == "Lahore")
            })
            .await
            .unwrap()
            .clone();
        assert!(status.last_error.is_none());

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_report_unknown_location_and_keep_snapshot() {
        let harness = Harness::new(FakeEngine::default(), karachi_local(monday(), 13, 0, 0));
        let handle = harness.start();
        let mut rx = handle.subscribe();
        first_snapshot(&mut rx).await;

        handle.set_location("Atlantis");
        let status = rx
            .wait_for(|status| status.last_error.is_some())
            .await
            .unwrap()
            .clone();
        assert!(matches!(
            status.last_error.as_deref(),
            Some(MiqatError::Config(ConfigError::UnknownLocation(_)))
        ));
        assert_eq!(status.snapshot.unwrap().schedule.location(), "Karachi");

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_apply_changed_settings_on_reload() {
        let harness = Harness::new(FakeEngine::default(), karachi_local(monday(), 9, 0, 0));
        let handle = harness.start();
        let mut rx = handle.subscribe();
        let before = first_snapshot(&mut rx).await;
        let asr = |s: &Snapshot| s.schedule.get(PrayerName::Asr).unwrap().instant;

        harness
            .store
            .save(&CalculationConfig {
                fiqh: Fiqh::Shafee,
                ..CalculationConfig::default()
            })
            .await
            .unwrap();

        let after = rx
            .wait_for(|status| {
                status
                    .snapshot
                    .as_ref()
                    .is_some_and(|s| asr(s) != asr(&before))
            })
            .await
            .unwrap()
            .snapshot
            .clone()
            .unwrap();
        assert!(asr(&after) < asr(&before));
        assert!(harness.store.loads() >= 2);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_default_settings_when_store_fails() {
        let harness = Harness::new(FakeEngine::default(), karachi_local(monday(), 9, 0, 0));
        harness.store.set_failing(true);
        let handle = harness.start();
        let mut rx = handle.subscribe();

        let snapshot = first_snapshot(&mut rx).await;
        assert_eq!(
            snapshot.schedule.get(PrayerName::Asr).unwrap().instant,
            karachi_local(monday(), 16, 55, 0)
        );

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_publishing_once_stopped() {
        let harness = Harness::new(FakeEngine::default(), karachi_local(monday(), 13, 0, 0));
        let handle = harness.start();
        let mut rx = handle.subscribe();
        first_snapshot(&mut rx).await;
        assert!(handle.is_running());

        handle.stop().await;
        assert!(rx.changed().await.is_err());
    }
}
