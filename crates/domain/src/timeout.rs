//! Timeout — how long a door may stay open.

use std::fmt;
use std::num::NonZeroU64;
use std::time::Duration;

use serde::Serialize;

use crate::error::ValidationError;

/// A strictly positive number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u64")]
pub struct Timeout(NonZeroU64);

impl Timeout {
    /// Validate a raw second count.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveTimeout`] when `secs <= 0`.
    pub fn from_secs(secs: i64) -> Result<Self, ValidationError> {
        u64::try_from(secs)
            .ok()
            .and_then(NonZeroU64::new)
            .map(Self)
            .ok_or(ValidationError::NonPositiveTimeout { value: secs })
    }

    /// The timeout in whole seconds.
    #[must_use]
    pub fn as_secs(self) -> u64 {
        self.0.get()
    }

    /// The timeout as a [`Duration`], ready to hand to a scheduler.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.0.get())
    }
}

impl From<Timeout> for u64 {
    fn from(timeout: Timeout) -> Self {
        timeout.as_secs()
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
