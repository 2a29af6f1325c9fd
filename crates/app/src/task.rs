//! Scheduled background tasks with a deterministic cancellation handle.

use tokio::task::JoinHandle;

/// Owns a spawned timer task.
///
/// Dropping the handle aborts the task; [`stop`](Self::stop) additionally
/// waits until the task has been torn down, so no timer outlives its owner.
#[derive(Debug)]
pub struct TaskHandle {
    name: &'static str,
    inner: Option<JoinHandle<()>>,
}

impl TaskHandle {
    /// Spawn `future` on the current runtime.
    pub fn spawn<F>(name: &'static str, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::debug!(task = name, "task started");
        Self {
            name,
            inner: Some(tokio::spawn(future)),
        }
    }

    /// Whether the task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Abort the task and wait for it to finish.
    pub async fn stop(mut self) {
        if let Some(handle) = self.inner.take() {
            handle.abort();
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    tracing::warn!(task = self.name, %err, "task ended abnormally");
                }
            }
            tracing::debug!(task = self.name, "task stopped");
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if let Some(handle) = self.inner.take() {
            handle.abort();
            tracing::debug!(task = self.name, "task aborted on drop");
        }
    }
}
