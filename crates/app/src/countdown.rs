//! Display-only countdown to the next prayer.
//!
//! Reads the next prayer already resolved by the refresh task and recomputes
//! the remaining time on a fast timer. It never builds or classifies.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use miqat_domain::classify::NextPrayer;
use miqat_domain::countdown::Countdown;

use crate::ports::Clock;
use crate::refresh::RefreshStatus;
use crate::task::TaskHandle;

/// One countdown reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    pub next: NextPrayer,
    pub remaining: Countdown,
}

/// Handle to a running countdown task.
pub struct CountdownHandle {
    ticks: watch::Receiver<Option<CountdownTick>>,
    task: TaskHandle,
}

impl CountdownHandle {
    /// Start counting down to whatever next prayer `status` currently holds.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<C>(
        status: watch::Receiver<RefreshStatus>,
        clock: Arc<C>,
        interval: Duration,
    ) -> Self
    where
        C: Clock + 'static,
    {
        let (tx, ticks) = watch::channel(None);
        let task = TaskHandle::spawn("countdown", run(status, clock, interval, tx));
        Self { ticks, task }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<CountdownTick>> {
        self.ticks.clone()
    }

    /// The most recent reading, `None` until a next prayer is known.
    #[must_use]
    pub fn latest(&self) -> Option<CountdownTick> {
        *self.ticks.borrow()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }

    /// Stop the countdown task and wait for it to be torn down.
    pub async fn stop(self) {
        self.task.stop().await;
    }
}

async fn run<C: Clock>(
    status: watch::Receiver<RefreshStatus>,
    clock: Arc<C>,
    interval: Duration,
    tx: watch::Sender<Option<CountdownTick>>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let next = status.borrow().snapshot.as_ref().map(|s| s.next());
        let Some(next) = next else {
            continue;
        };
        let remaining = Countdown::until(next.instant, clock.now());
        tx.send_replace(Some(CountdownTick { next, remaining }));
    }
}
