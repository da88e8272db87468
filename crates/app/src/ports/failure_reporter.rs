//! Failure reporter port — where failed timer callbacks end up.
//!
//! A fired callback runs with no caller to return to, so its outcome is
//! delivered here instead.

use std::fmt;

use timed_door_domain::error::{DoorLeftOpen, TimedDoorError};
use timed_door_domain::id::TimerId;
use timed_door_domain::Timestamp;

/// Why a fired callback failed.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureCause {
    /// The target returned an error.
    Returned(TimedDoorError),
    /// The target panicked; the payload message, if it had one.
    Panicked(String),
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Returned(err) => err.fmt(f),
            Self::Panicked(message) => write!(f, "timer target panicked: {message}"),
        }
    }
}

/// One failed fire.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerFailure {
    pub timer_id: TimerId,
    pub fired_at: Timestamp,
    pub cause: FailureCause,
}

impl TimerFailure {
    /// The door violation behind this failure, if that is what it was.
    #[must_use]
    pub fn as_door_left_open(&self) -> Option<&DoorLeftOpen> {
        match &self.cause {
            FailureCause::Returned(err) => err.as_door_left_open(),
            FailureCause::Panicked(_) => None,
        }
    }
}

/// Receives failures from schedulers.
pub trait FailureReporter: Send + Sync {
    /// Deliver a failure. Must not block and must not fail.
    fn report(&self, failure: TimerFailure);
}

impl<T: FailureReporter + ?Sized> FailureReporter for std::sync::Arc<T> {
    fn report(&self, failure: TimerFailure) {
        (**self).report(failure);
    }
}
