//! Door — the lockable entity guarded by a timeout.
//!
//! This is the bare state machine. It knows nothing about timers; the
//! `app` crate wraps it so that opening the door also arms a check.

mod state;

pub use state::DoorState;

use chrono::Utc;

use crate::error::{DoorLeftOpen, ValidationError};
use crate::id::DoorId;
use crate::Timestamp;
use crate::timeout::Timeout;

/// A door that starts locked and may be opened and locked at will.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Door {
    id: DoorId,
    state: DoorState,
    timeout: Timeout,
    last_changed: Timestamp,
}

impl Door {
    /// Create a locked door from a raw timeout in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveTimeout`] when `timeout_secs <= 0`.
    pub fn new(timeout_secs: i64) -> Result<Self, ValidationError> {
        Ok(Self::with_timeout(Timeout::from_secs(timeout_secs)?))
    }

    /// Create a locked door from an already validated timeout.
    #[must_use]
    pub fn with_timeout(timeout: Timeout) -> Self {
        Self {
            id: DoorId::new(),
            state: DoorState::Locked,
            timeout,
            last_changed: Utc::now(),
        }
    }

    #[must_use]
    pub fn id(&self) -> DoorId {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> DoorState {
        self.state
    }

    #[must_use]
    pub fn timeout(&self) -> Timeout {
        self.timeout
    }

    /// When the state last flipped. Repeating the current state does not count.
    #[must_use]
    pub fn last_changed(&self) -> Timestamp {
        self.last_changed
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Open the door, whatever its current state.
    pub fn unlock(&mut self) {
        self.transition(DoorState::Open);
    }

    /// Lock the door, whatever its current state.
    pub fn lock(&mut self) {
        self.transition(DoorState::Locked);
    }

    /// Fail with [`DoorLeftOpen`] if the door is open; succeed otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`DoorLeftOpen`] while the door is open.
    pub fn check(&self) -> Result<(), DoorLeftOpen> {
        if self.is_open() {
            return Err(DoorLeftOpen {
                door_id: self.id,
                timeout: self.timeout,
                detected_at: Utc::now(),
            });
        }
        Ok(())
    }

    fn transition(&mut self, next: DoorState) {
        if self.state != next {
            self.state = next;
            self.last_changed = Utc::now();
        }
    }
}
