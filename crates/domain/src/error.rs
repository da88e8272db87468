//! Common error types used across the workspace.
//!
//! Each failure class is its own typed error; [`TimedDoorError`] gathers
//! them via `#[from]` so callers can propagate with `?`.

use serde::Serialize;

use crate::id::DoorId;
use crate::Timestamp;
use crate::timeout::Timeout;

/// Top-level error for door operations and fired timer callbacks.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimedDoorError {
    /// A door could not be constructed from the given configuration.
    #[error("invalid configuration")]
    InvalidConfiguration(#[from] ValidationError),

    /// A check found the door still open.
    #[error(transparent)]
    DoorLeftOpen(#[from] DoorLeftOpen),
}

impl TimedDoorError {
    /// The violation carried by this error, if any.
    #[must_use]
    pub fn as_door_left_open(&self) -> Option<&DoorLeftOpen> {
        match self {
            Self::DoorLeftOpen(violation) => Some(violation),
            Self::InvalidConfiguration(_) => None,
        }
    }
}

/// Construction-time validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Timeouts must be strictly positive.
    #[error("timeout must be positive, got {value}")]
    NonPositiveTimeout { value: i64 },
}

/// Raised by a check while the door is open.
///
/// This is data, not a crash: it is returned to a direct caller, or carried
/// on the failure bus when the check ran from a fired timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("door {door_id} left open (timeout {timeout})")]
pub struct DoorLeftOpen {
    /// The door that was found open.
    pub door_id: DoorId,
    /// The timeout configured on that door.
    pub timeout: Timeout,
    /// When the check observed the open state.
    pub detected_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn violation() -> DoorLeftOpen {
        DoorLeftOpen {
            door_id: DoorId::new(),
            timeout: Timeout::from_secs(5).unwrap(),
            detected_at: Utc::now(),
        }
    }

    #[test]
    fn should_display_non_positive_timeout() {
        let err = ValidationError::NonPositiveTimeout { value: -1 };
        assert_eq!(err.to_string(), "timeout must be positive, got -1");
    }

    #[test]
    fn should_convert_validation_error_into_invalid_configuration() {
        let err: TimedDoorError = ValidationError::NonPositiveTimeout { value: 0 }.into();
        assert!(matches!(err, TimedDoorError::InvalidConfiguration(_)));
        assert!(err.as_door_left_open().is_none());
    }

    #[test]
    fn should_expose_violation_when_door_left_open() {
        let v = violation();
        let err: TimedDoorError = v.clone().into();
        assert_eq!(err.as_door_left_open(), Some(&v));
    }

    #[test]
    fn should_mention_door_id_in_violation_message() {
        let v = violation();
        assert!(v.to_string().contains(&v.door_id.to_string()));
        assert!(v.to_string().ends_with("(timeout 5s)"));
    }

    #[test]
    fn should_serialize_violation_to_json() {
        let v = violation();
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["timeout"], 5);
        assert_eq!(json["door_id"], v.door_id.to_string());
    }
}
