//! Data sources feeding reports to the synchronization loop.
//!
//! The network transport lives outside this crate. It plugs in by
//! implementing [`ReportSource`]; the loop only sees "a report", "nothing
//! new" or "this poll failed".

mod recorded;
mod scripted;

pub use recorded::{RecordedSource, load_recording, save_recording};
pub use scripted::{RequestLog, ScriptedSource};

use async_trait::async_trait;

use crate::game::GameReport;

/// Errors a source may report for one poll.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The transport failed to deliver a response.
    #[error("transport failure: {0}")]
    Transport(String),
    /// Reading a recording failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A report could not be decoded.
    #[error("malformed report: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Something that can be polled for rounds past a given turn.
#[async_trait]
pub trait ReportSource: Send {
    /// Fetch the rounds with index `since_turn` and later.
    ///
    /// `Ok(None)` means the source has nothing past `since_turn` yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the poll failed; the loop treats it like
    /// `Ok(None)` and retries later.
    async fn fetch(&mut self, since_turn: usize) -> Result<Option<GameReport>, SourceError>;
}

#[async_trait]
impl<S: ReportSource + ?Sized> ReportSource for Box<S> {
    async fn fetch(&mut self, since_turn: usize) -> Result<Option<GameReport>, SourceError> {
        (**self).fetch(since_turn).await
    }
}
