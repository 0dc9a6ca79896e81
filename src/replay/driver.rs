//! Timed, cancellable replay.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::Replay;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::game::{Board, HistoryView};
use crate::session::{Session, SessionWriter};

/// How a replay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Every round was shown and the completion callback ran.
    Finished,
    /// The replay was cancelled; the completion callback did not run.
    Cancelled,
}

/// Plays a history back one round per frame.
///
/// Clones share the cancellation slot. A cancelled token is swapped for a
/// fresh one when the replay it stopped returns, so a driver can be reused.
#[derive(Debug, Clone)]
pub struct ReplayDriver {
    frame_delay: Duration,
    cancel: Arc<Mutex<CancellationToken>>,
}

impl ReplayDriver {
    /// Create a driver waiting `frame_delay` after each frame.
    #[must_use]
    pub fn new(frame_delay: Duration) -> Self {
        Self {
            frame_delay,
            cancel: Arc::new(Mutex::new(CancellationToken::new())),
        }
    }

    /// Create a driver using the configured frame delay.
    #[must_use]
    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.frame_delay)
    }

    /// Delay after each frame.
    #[must_use]
    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    /// Token that cancels the running replay, or the next one if none runs.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.lock().clone()
    }

    /// Cancel the running replay before its next frame.
    ///
    /// With no replay running, the next one stops before its first frame.
    pub fn cancel(&self) {
        self.cancel.lock().cancel();
    }

    /// Replay `history` from a reset board.
    ///
    /// After applying round `i` the driver calls `on_frame(i, board)` and
    /// waits the frame delay. Once every round has been shown it calls
    /// `on_done` with the final board. Cancellation is checked between
    /// frames; a cancelled replay shows no further frames and never calls
    /// `on_done`.
    pub async fn replay<F, D>(&self, history: HistoryView, on_frame: F, on_done: D) -> ReplayOutcome
    where
        F: FnMut(usize, &Board),
        D: FnOnce(&Board),
    {
        let cancel = self.cancellation_token();
        let outcome = Self::play(self.frame_delay, &cancel, history, on_frame, on_done).await;
        if cancel.is_cancelled() {
            let mut slot = self.cancel.lock();
            if slot.is_cancelled() {
                *slot = CancellationToken::new();
            }
        }
        outcome
    }

    async fn play<F, D>(
        frame_delay: Duration,
        cancel: &CancellationToken,
        history: HistoryView,
        mut on_frame: F,
        on_done: D,
    ) -> ReplayOutcome
    where
        F: FnMut(usize, &Board),
        D: FnOnce(&Board),
    {
        let mut replay = Replay::new(history);
        info!(rounds = replay.total_rounds(), "replay started");

        loop {
            if cancel.is_cancelled() {
                info!(turn = replay.turn(), "replay cancelled");
                return ReplayOutcome::Cancelled;
            }
            let Some(board) = replay.step() else {
                break;
            };
            let index = board.turn_counter() - 1;
            debug!(round = index, "replay frame");
            on_frame(index, board);

            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!(turn = replay.turn(), "replay cancelled");
                    return ReplayOutcome::Cancelled;
                }
                () = tokio::time::sleep(frame_delay) => {}
            }
        }

        on_done(replay.board());
        info!(turn = replay.turn(), "replay finished");
        ReplayOutcome::Finished
    }
}

/// A replay shown on a live session.
///
/// Holds the session's writer role for its whole run, so the
/// synchronization loop cannot write while frames are being published.
/// Readers of the session see each frame in turn. A cancelled replay
/// restores the live board from the full history.
#[derive(Debug)]
pub struct SessionReplay {
    writer: SessionWriter,
    driver: ReplayDriver,
}

impl SessionReplay {
    /// Take the writer role of `session` for a replay.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::WriterBusy`] if another driver holds the role.
    pub fn new(session: &Session, driver: ReplayDriver) -> SyncResult<Self> {
        let writer = session.try_acquire_writer().ok_or(SyncError::WriterBusy)?;
        Ok(Self { writer, driver })
    }

    /// Token that cancels this replay.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.driver.cancellation_token()
    }

    /// Replay the session's history onto its board, frame by frame.
    ///
    /// The writer role is released when this returns.
    pub async fn run<F>(mut self, mut on_frame: F) -> ReplayOutcome
    where
        F: FnMut(usize, &Board),
    {
        let history = self.writer.history();
        let writer = &mut self.writer;
        let outcome = self
            .driver
            .replay(
                history,
                |index, board| {
                    writer.publish_board(board);
                    on_frame(index, board);
                },
                |_| {},
            )
            .await;

        if outcome == ReplayOutcome::Cancelled {
            self.writer.restore_live_board();
        }
        outcome
    }
}
