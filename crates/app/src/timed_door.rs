//! Timed door — a door that arms a check every time it is opened.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use timed_door_domain::door::{Door, DoorState};
use timed_door_domain::error::{DoorLeftOpen, TimedDoorError};
use timed_door_domain::id::DoorId;
use timed_door_domain::timeout::Timeout;

use crate::door_timer_adapter::DoorTimerAdapter;
use crate::ports::{Registration, Scheduler, TimerTarget};

/// A door wired to a scheduler.
///
/// Unlocking arms a single timer for the door's timeout; unlocking again
/// replaces it. When the timer fires while the door is still open, the
/// violation goes to the scheduler's failure reporter. Locking only changes
/// what that check will see.
///
/// Dropping the door cancels its pending timer.
pub struct TimedDoor<S> {
    door: Arc<Mutex<Door>>,
    adapter: Arc<DoorTimerAdapter>,
    scheduler: S,
    pending: Mutex<Option<Registration>>,
}

impl<S: Scheduler> TimedDoor<S> {
    /// Create a locked door with a timeout in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`TimedDoorError::InvalidConfiguration`] when
    /// `timeout_secs <= 0`.
    pub fn new(timeout_secs: i64, scheduler: S) -> Result<Self, TimedDoorError> {
        Ok(Self::with_timeout(
            Timeout::from_secs(timeout_secs)?,
            scheduler,
        ))
    }

    /// Create a locked door from an already validated timeout.
    pub fn with_timeout(timeout: Timeout, scheduler: S) -> Self {
        let door = Arc::new(Mutex::new(Door::with_timeout(timeout)));
        let adapter = Arc::new(DoorTimerAdapter::new(&door));
        tracing::debug!(door_id = %adapter.door_id(), %timeout, "door created");
        Self {
            door,
            adapter,
            scheduler,
            pending: Mutex::new(None),
        }
    }

    /// Open the door and (re)arm its timer.
    #[tracing::instrument(skip(self), fields(door_id = %self.id()))]
    pub fn unlock(&self) {
        let delay = {
            let mut door = self.lock_door();
            door.unlock();
            door.timeout().as_duration()
        };

        let mut pending = self.lock_pending();
        if let Some(previous) = pending.take() {
            if previous.cancel() {
                tracing::debug!(timer_id = %previous.id(), "replaced pending timer");
            }
        }
        let target: Arc<dyn TimerTarget> = self.adapter.clone();
        *pending = Some(self.scheduler.schedule(delay, target));
    }
}

impl<S> TimedDoor<S> {
    /// Lock the door. Any armed timer still fires and finds it locked.
    #[tracing::instrument(skip(self), fields(door_id = %self.id()))]
    pub fn lock(&self) {
        self.lock_door().lock();
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock_door().is_open()
    }

    /// Check the door right now.
    ///
    /// # Errors
    ///
    /// Returns [`DoorLeftOpen`] if the door is open.
    pub fn check(&self) -> Result<(), DoorLeftOpen> {
        self.lock_door().check()
    }

    #[must_use]
    pub fn id(&self) -> DoorId {
        self.adapter.door_id()
    }

    #[must_use]
    pub fn timeout(&self) -> Timeout {
        self.lock_door().timeout()
    }

    #[must_use]
    pub fn state(&self) -> DoorState {
        self.lock_door().state()
    }

    /// The adapter this door hands to its scheduler.
    #[must_use]
    pub fn adapter(&self) -> &DoorTimerAdapter {
        &self.adapter
    }

    /// The adapter as a schedulable target, for arming extra checks by hand.
    #[must_use]
    pub fn timer_target(&self) -> Arc<dyn TimerTarget> {
        self.adapter.clone()
    }

    /// Whether a timer armed by [`unlock`](TimedDoor::unlock) has yet to fire.
    #[must_use]
    pub fn has_pending_timer(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .is_some_and(Registration::is_pending)
    }

    fn lock_door(&self) -> MutexGuard<'_, Door> {
        self.door.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<Registration>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> Drop for TimedDoor<S> {
    fn drop(&mut self) {
        let pending = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(registration) = pending {
            registration.cancel();
        }
    }
}
