//! Source serving a recorded game, the way the simulation server does.
//!
//! A recording is a whole game stored as one JSON [`GameReport`]: every
//! round's change set plus the final status. Polling it with `since_turn`
//! returns the rounds from that index on, at most `chunk` of them, and the
//! final status only with the batch that reaches the end.

use std::fs;
use std::path::Path;

use async_trait::async_trait;

use super::{ReportSource, SourceError};
use crate::game::GameReport;

/// Load a recording from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid report.
pub fn load_recording(path: &Path) -> Result<GameReport, SourceError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Save a recording as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_recording(path: &Path, game: &GameReport) -> Result<(), SourceError> {
    let json = serde_json::to_string_pretty(game)?;
    fs::write(path, json)?;
    Ok(())
}

/// A source answering polls from a recorded game.
#[derive(Debug, Clone)]
pub struct RecordedSource {
    game: GameReport,
    chunk: usize,
}

impl RecordedSource {
    /// Serve `game`, every remaining round in one batch per poll.
    #[must_use]
    pub fn new(game: GameReport) -> Self {
        Self {
            game,
            chunk: usize::MAX,
        }
    }

    /// Open a recording file.
    ///
    /// # Errors
    ///
    /// Returns an error if the recording cannot be loaded.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        Ok(Self::new(load_recording(path)?))
    }

    /// Serve at most `chunk` rounds per poll (at least one).
    #[must_use]
    pub fn with_chunk(mut self, chunk: usize) -> Self {
        self.chunk = chunk.max(1);
        self
    }

    /// Number of rounds in the recording.
    #[must_use]
    pub fn total_rounds(&self) -> usize {
        self.game.round_count()
    }

    /// The whole recorded game.
    #[must_use]
    pub fn game(&self) -> &GameReport {
        &self.game
    }
}

#[async_trait]
impl ReportSource for RecordedSource {
    async fn fetch(&mut self, since_turn: usize) -> Result<Option<GameReport>, SourceError> {
        Ok(self.game.window(since_turn, self.chunk))
    }
}
