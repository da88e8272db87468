//! Adapter between a scheduler's generic fire and a door's open check.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use timed_door_domain::door::Door;
use timed_door_domain::error::TimedDoorError;
use timed_door_domain::id::DoorId;

use crate::ports::TimerTarget;

/// Bound to exactly one door for its whole life.
///
/// Holds a [`Weak`] reference: the door owns the adapter, never the other
/// way round, so a timer that outlives its door finds nothing to check.
#[derive(Debug)]
pub struct DoorTimerAdapter {
    door_id: DoorId,
    door: Weak<Mutex<Door>>,
}

impl DoorTimerAdapter {
    pub(crate) fn new(door: &Arc<Mutex<Door>>) -> Self {
        let door_id = door.lock().unwrap_or_else(PoisonError::into_inner).id();
        Self {
            door_id,
            door: Arc::downgrade(door),
        }
    }

    /// The door this adapter checks when fired.
    #[must_use]
    pub fn door_id(&self) -> DoorId {
        self.door_id
    }

    /// Whether the bound door is still alive.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.door.strong_count() > 0
    }
}

impl TimerTarget for DoorTimerAdapter {
    #[tracing::instrument(skip(self), fields(door_id = %self.door_id))]
    fn on_fired(&self) -> Result<(), TimedDoorError> {
        let Some(door) = self.door.upgrade() else {
            tracing::debug!("door dropped before its timer fired");
            return Ok(());
        };
        let door = door.lock().unwrap_or_else(PoisonError::into_inner);
        if door.is_open() {
            door.check()?;
        }
        Ok(())
    }
}
