//! CLI command implementations for Skirmish.

pub(crate) mod replay;
pub(crate) mod sync;
pub(crate) mod validate;

mod output;

use clap::ValueEnum;
use skirmish::{ConfigError, SourceError, SyncConfig, SyncError};
use std::error::Error;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Output format for the `sync` and `replay` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output, one object per line.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<SyncError> for CliError {
    fn from(e: SyncError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<SourceError> for CliError {
    fn from(e: SourceError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// Load the configuration file if one was given, defaults otherwise.
pub(crate) fn load_config(path: Option<&Path>) -> Result<SyncConfig, CliError> {
    match path {
        Some(path) => SyncConfig::load(path)
            .map_err(|e| CliError::new(format!("Failed to load {}: {e}", path.display()))),
        None => Ok(SyncConfig::default()),
    }
}

/// Apply command-line delay overrides on top of the loaded configuration.
pub(crate) fn with_overrides(
    mut config: SyncConfig,
    active_ms: Option<u64>,
    idle_ms: Option<u64>,
    frame_ms: Option<u64>,
) -> Result<SyncConfig, CliError> {
    if let Some(ms) = active_ms {
        config = config.with_active_delay(Duration::from_millis(ms));
    }
    if let Some(ms) = idle_ms {
        config = config.with_idle_delay(Duration::from_millis(ms));
    }
    if let Some(ms) = frame_ms {
        config = config.with_frame_delay(Duration::from_millis(ms));
    }
    config.validate()?;
    Ok(config)
}

/// Load a recording, naming the file in the error.
pub(crate) fn load_recording(path: &Path) -> Result<skirmish::GameReport, CliError> {
    skirmish::source::load_recording(path)
        .map_err(|e| CliError::new(format!("Failed to load {}: {e}", path.display())))
}
