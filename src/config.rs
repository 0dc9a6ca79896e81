//! Cadence configuration for polling and replay.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Errors raised while loading or validating a [`SyncConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A delay was configured as zero.
    #[error("{0} must be greater than zero")]
    ZeroDelay(&'static str),
}

/// Delays driving the synchronization loop and the replay driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Wait before the next poll while the game is running and rounds arrive.
    pub active_delay: Duration,
    /// Wait before the next poll when nothing new arrived or the poll failed.
    pub idle_delay: Duration,
    /// Wait between replay frames.
    pub frame_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            active_delay: Duration::from_millis(250),
            idle_delay: Duration::from_secs(2),
            frame_delay: Duration::from_millis(50),
        }
    }
}

/// On-disk shape: every delay in milliseconds, every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    active_delay_ms: Option<u64>,
    idle_delay_ms: Option<u64>,
    frame_delay_ms: Option<u64>,
}

impl SyncConfig {
    /// Set the delay between polls while rounds keep arriving.
    #[must_use]
    pub const fn with_active_delay(mut self, delay: Duration) -> Self {
        self.active_delay = delay;
        self
    }

    /// Set the delay between polls when nothing arrived.
    #[must_use]
    pub const fn with_idle_delay(mut self, delay: Duration) -> Self {
        self.idle_delay = delay;
        self
    }

    /// Set the delay between replay frames.
    #[must_use]
    pub const fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }

    /// Reject configurations that would spin without yielding.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDelay`] if a poll delay is zero. A zero
    /// frame delay is allowed and replays as fast as possible.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.active_delay.is_zero() {
            return Err(ConfigError::ZeroDelay("active_delay"));
        }
        if self.idle_delay.is_zero() {
            return Err(ConfigError::ZeroDelay("idle_delay"));
        }
        Ok(())
    }

    /// Parse a JSON configuration, filling missing fields from the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a delay is invalid.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(json)?;
        let defaults = Self::default();
        let config = Self {
            active_delay: file
                .active_delay_ms
                .map_or(defaults.active_delay, Duration::from_millis),
            idle_delay: file
                .idle_delay_ms
                .map_or(defaults.idle_delay, Duration::from_millis),
            frame_delay: file
                .frame_delay_ms
                .map_or(defaults.frame_delay, Duration::from_millis),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
