//! Door state — whether the door is currently locked or open.

use serde::Serialize;

/// Discrete state of a door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorState {
    #[default]
    Locked,
    Open,
}

impl DoorState {
    /// Whether the door is open.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl std::fmt::Display for DoorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Locked => f.write_str("locked"),
            Self::Open => f.write_str("open"),
        }
    }
}
