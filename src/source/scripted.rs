//! In-memory source answering polls from a script.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ReportSource, SourceError};
use crate::game::GameReport;

#[derive(Debug)]
enum Reply {
    Report(GameReport),
    Nothing,
    Failure(String),
}

/// Shared record of the `since_turn` argument of every poll.
#[derive(Debug, Clone, Default)]
pub struct RequestLog {
    calls: Arc<Mutex<Vec<usize>>>,
}

impl RequestLog {
    /// Arguments of all polls so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().clone()
    }

    /// Number of polls so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, since_turn: usize) {
        self.calls.lock().push(since_turn);
    }
}

/// A source that replies to successive polls with scripted answers.
///
/// Once the script runs out every poll answers "nothing new".
#[derive(Debug, Default)]
pub struct ScriptedSource {
    replies: VecDeque<Reply>,
    latency: Duration,
    log: RequestLog,
}

impl ScriptedSource {
    /// Create a source with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next poll with a report.
    #[must_use]
    pub fn then_report(mut self, report: GameReport) -> Self {
        self.replies.push_back(Reply::Report(report));
        self
    }

    /// Answer the next poll with "nothing new".
    #[must_use]
    pub fn then_nothing(mut self) -> Self {
        self.replies.push_back(Reply::Nothing);
        self
    }

    /// Fail the next poll with a transport error.
    #[must_use]
    pub fn then_failure(mut self, message: impl Into<String>) -> Self {
        self.replies.push_back(Reply::Failure(message.into()));
        self
    }

    /// Take this long to answer every poll.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Handle on the log of polls, usable after the source is moved away.
    #[must_use]
    pub fn request_log(&self) -> RequestLog {
        self.log.clone()
    }
}

#[async_trait]
impl ReportSource for ScriptedSource {
    async fn fetch(&mut self, since_turn: usize) -> Result<Option<GameReport>, SourceError> {
        self.log.record(since_turn);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match self.replies.pop_front() {
            Some(Reply::Report(report)) => Ok(Some(report)),
            Some(Reply::Nothing) | None => Ok(None),
            Some(Reply::Failure(message)) => Err(SourceError::Transport(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameStatus;

    #[tokio::test]
    async fn test_script_order_and_log() {
        let report = GameReport::new(vec![Vec::new()], GameStatus::InProgress);
        let mut source = ScriptedSource::new()
            .then_nothing()
            .then_failure("connection reset")
            .then_report(report.clone());
        let log = source.request_log();

        assert!(source.fetch(0).await.unwrap().is_none());
        let err = source.fetch(0).await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(source.fetch(0).await.unwrap(), Some(report));
        assert!(source.fetch(1).await.unwrap().is_none());

        assert_eq!(log.calls(), vec![0, 0, 0, 1]);
        assert_eq!(log.count(), 4);
    }
}
