//! Scheduler port — fire a target once after a delay.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use timed_door_domain::error::TimedDoorError;
use timed_door_domain::id::TimerId;

/// Something a scheduler can invoke with no arguments.
///
/// Returning an error does not crash anything: the scheduler hands it to its
/// [`FailureReporter`](super::FailureReporter).
pub trait TimerTarget: Send + Sync {
    /// Called once when the timer this target was registered with fires.
    ///
    /// # Errors
    ///
    /// Whatever the target considers a failure; the scheduler reports it.
    fn on_fired(&self) -> Result<(), TimedDoorError>;
}

/// Fires a [`TimerTarget`] once, no earlier than a given delay, without
/// blocking the caller.
pub trait Scheduler: Send + Sync {
    /// Register `target` to be fired after `delay`.
    ///
    /// The returned [`Registration`] can be used to cancel; dropping it
    /// leaves the timer armed.
    fn schedule(&self, delay: Duration, target: Arc<dyn TimerTarget>) -> Registration;
}

impl<T: Scheduler + ?Sized> Scheduler for Arc<T> {
    fn schedule(&self, delay: Duration, target: Arc<dyn TimerTarget>) -> Registration {
        (**self).schedule(delay, target)
    }
}

const PENDING: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

/// Shared lifecycle flag of one registration: pending, then either fired or
/// cancelled, never both.
#[derive(Debug, Clone, Default)]
pub struct TimerStatus(Arc<AtomicU8>);

impl TimerStatus {
    /// A fresh, pending status.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the right to fire. Returns `false` if the timer was cancelled
    /// or has already fired.
    pub fn begin_fire(&self) -> bool {
        self.transition(FIRED)
    }

    /// Cancel the timer. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&self) -> bool {
        self.transition(CANCELLED)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::Acquire) == PENDING
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire) == CANCELLED
    }

    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.0.load(Ordering::Acquire) == FIRED
    }

    fn transition(&self, to: u8) -> bool {
        self.0
            .compare_exchange(PENDING, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Releases whatever a scheduler holds for a registration once it is
/// cancelled (a task, a queue slot, ...).
pub type CancelHook = Box<dyn Fn() + Send + Sync>;

/// Handle to one scheduled timer.
pub struct Registration {
    id: TimerId,
    status: TimerStatus,
    on_cancel: Option<CancelHook>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("on_cancel", &self.on_cancel.is_some())
            .finish()
    }
}

impl Registration {
    /// Wrap a status the scheduler keeps a clone of.
    #[must_use]
    pub fn new(id: TimerId, status: TimerStatus) -> Self {
        Self {
            id,
            status,
            on_cancel: None,
        }
    }

    /// Run `hook` when a [`cancel`](Self::cancel) call wins against the fire.
    #[must_use]
    pub fn on_cancel(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_cancel = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Cancel the timer if it has not fired yet.
    ///
    /// Returns `true` when this call prevented the fire.
    pub fn cancel(&self) -> bool {
        let cancelled = self.status.cancel();
        if cancelled {
            if let Some(hook) = &self.on_cancel {
                hook();
            }
        }
        cancelled
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status.is_cancelled()
    }

    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.status.has_fired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_pending() {
        let status = TimerStatus::new();
        assert!(status.is_pending());
        assert!(!status.is_cancelled());
        assert!(!status.has_fired());
    }

    #[test]
    fn should_not_fire_after_cancel() {
        let status = TimerStatus::new();
        assert!(status.cancel());
        assert!(!status.begin_fire());
        assert!(status.is_cancelled());
    }

    #[test]
    fn should_not_cancel_after_fire() {
        let status = TimerStatus::new();
        assert!(status.begin_fire());
        assert!(!status.cancel());
        assert!(status.has_fired());
    }

    #[test]
    fn should_fire_only_once() {
        let status = TimerStatus::new();
        assert!(status.begin_fire());
        assert!(!status.begin_fire());
    }

    #[test]
    fn should_share_status_between_registration_and_scheduler() {
        let status = TimerStatus::new();
        let registration = Registration::new(TimerId::new(), status.clone());
        assert!(registration.cancel());
        assert!(!registration.cancel());
        assert!(status.is_cancelled());
        assert!(!registration.is_pending());
    }

    #[test]
    fn should_run_cancel_hook_only_when_cancel_wins() {
        let calls = Arc::new(AtomicU8::new(0));

        let status = TimerStatus::new();
        let hook_calls = Arc::clone(&calls);
        let registration = Registration::new(TimerId::new(), status.clone())
            .on_cancel(move || {
                hook_calls.fetch_add(1, Ordering::SeqCst);
            });
        assert!(status.begin_fire());
        assert!(!registration.cancel());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let hook_calls = Arc::clone(&calls);
        let registration = Registration::new(TimerId::new(), TimerStatus::new())
            .on_cancel(move || {
                hook_calls.fetch_add(1, Ordering::SeqCst);
            });
        assert!(registration.cancel());
        assert!(!registration.cancel());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
