//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `timed-door.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;
use timed_door_domain::error::ValidationError;
use timed_door_domain::timeout::Timeout;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Door settings.
    pub door: DoorConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Door and reporting-channel settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    /// Seconds the door may stay open.
    pub timeout_secs: i64,
    /// Lock the door again after this many seconds; leave it open if unset.
    pub hold_open_secs: Option<u64>,
    /// Capacity of the failure bus.
    pub bus_capacity: usize,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `timed-door.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting values are invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("timed-door.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("TIMED_DOOR_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.door.timeout_secs = secs;
            }
        }
        if let Ok(val) = std::env::var("TIMED_DOOR_HOLD_OPEN_SECS") {
            self.door.hold_open_secs = val.parse().ok();
        }
        if let Ok(val) = std::env::var("TIMED_DOOR_BUS_CAPACITY") {
            if let Ok(capacity) = val.parse() {
                self.door.bus_capacity = capacity;
            }
        }
        if let Ok(val) = std::env::var("TIMED_DOOR_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.timeout()?;
        if self.door.bus_capacity == 0 {
            return Err(ConfigError::Validation(
                "bus capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The validated door timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Timeout`] when `timeout_secs <= 0`.
    pub fn timeout(&self) -> Result<Timeout, ConfigError> {
        Ok(Timeout::from_secs(self.door.timeout_secs)?)
    }

    /// How long to keep the door open before locking it, if at all.
    #[must_use]
    pub fn hold_open(&self) -> Option<Duration> {
        self.door.hold_open_secs.map(Duration::from_secs)
    }
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            hold_open_secs: None,
            bus_capacity: 64,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "timed_doord=info,timed_door_app=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// The configured timeout is not positive.
    #[error("invalid door timeout")]
    Timeout(#[from] ValidationError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
