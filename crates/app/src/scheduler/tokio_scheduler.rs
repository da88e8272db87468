//! Tokio-backed scheduler — one task per registration.

use std::sync::Arc;
use std::time::Duration;

use timed_door_domain::id::TimerId;
use tokio::runtime::{Handle, TryCurrentError};

use super::fire;
use crate::ports::scheduler::TimerStatus;
use crate::ports::{FailureReporter, Registration, Scheduler, TimerTarget};

/// Spawns a task that sleeps for the delay, then fires the target.
///
/// `schedule` never waits; the caller may be on any thread, inside or
/// outside the runtime.
pub struct TokioScheduler<R> {
    handle: Handle,
    reporter: Arc<R>,
}

impl<R: FailureReporter + 'static> TokioScheduler<R> {
    /// Spawn timers on the given runtime.
    pub fn new(handle: Handle, reporter: R) -> Self {
        Self {
            handle,
            reporter: Arc::new(reporter),
        }
    }

    /// Spawn timers on the runtime this is called from.
    ///
    /// # Errors
    ///
    /// Returns [`TryCurrentError`] when called outside a tokio runtime.
    pub fn try_current(reporter: R) -> Result<Self, TryCurrentError> {
        Ok(Self::new(Handle::try_current()?, reporter))
    }
}

impl<R: FailureReporter + 'static> Scheduler for TokioScheduler<R> {
    fn schedule(&self, delay: Duration, target: Arc<dyn TimerTarget>) -> Registration {
        let timer_id = TimerId::new();
        let status = TimerStatus::new();
        let task_status = status.clone();
        let reporter = Arc::clone(&self.reporter);

        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if !task_status.begin_fire() {
                tracing::debug!(%timer_id, "timer cancelled before firing");
                return;
            }
            fire(timer_id, target.as_ref(), reporter.as_ref());
        });

        tracing::debug!(%timer_id, delay_ms = delay.as_millis(), "timer scheduled");
        let abort = task.abort_handle();
        Registration::new(timer_id, status).on_cancel(move || abort.abort())
    }
}
