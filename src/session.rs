//! Session: one board and one history, one writer at a time.
//!
//! A [`Session`] owns the live [`Board`] and the [`History`] of a game. Any
//! number of readers may hold a `Session` handle; mutation goes through a
//! [`SessionWriter`], of which at most one exists per session. The
//! synchronization loop and the replay driver each take the writer for as
//! long as they run, so the two can never write concurrently.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use tracing::warn;

use crate::game::{Board, GameReport, GameStatus, History, HistoryView, split_report};

/// Board and history, always updated together.
#[derive(Debug, Default)]
struct SessionState {
    board: Board,
    history: History,
}

#[derive(Debug, Default)]
struct Shared {
    state: RwLock<SessionState>,
    writer_held: AtomicBool,
}

/// Handle to a game session. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    shared: Arc<Shared>,
}

impl Session {
    /// Create a session with a reset board and an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the writer role, or `None` if another driver holds it.
    ///
    /// The role is released when the returned writer is dropped.
    #[must_use]
    pub fn try_acquire_writer(&self) -> Option<SessionWriter> {
        self.shared
            .writer_held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(SessionWriter {
            shared: Arc::clone(&self.shared),
        })
    }

    /// Whether some driver currently holds the writer role.
    #[must_use]
    pub fn has_writer(&self) -> bool {
        self.shared.writer_held.load(Ordering::Acquire)
    }

    /// Copy of the board as it is now.
    #[must_use]
    pub fn board(&self) -> Board {
        self.shared.state.read().board.clone()
    }

    /// Read the board in place without copying it.
    #[must_use]
    pub fn with_board<R>(&self, read: impl FnOnce(&Board) -> R) -> R {
        read(&self.shared.state.read().board)
    }

    /// Snapshot of the history as it is now.
    #[must_use]
    pub fn history(&self) -> HistoryView {
        self.shared.state.read().history.view()
    }

    /// Current board status.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.shared.state.read().board.status()
    }

    /// Rounds applied to the board since the last reset.
    #[must_use]
    pub fn turn_counter(&self) -> usize {
        self.shared.state.read().board.turn_counter()
    }
}

/// Outcome of merging one report into a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedBatch {
    /// Rounds contained in the report.
    pub rounds: usize,
    /// Board status after the merge.
    pub status: GameStatus,
    /// Turn counter after the merge.
    pub turn_counter: usize,
}

/// The exclusive right to mutate a session.
///
/// Not clonable. Dropping it releases the role.
#[derive(Debug)]
pub struct SessionWriter {
    shared: Arc<Shared>,
}

impl SessionWriter {
    /// A reader handle on the same session.
    #[must_use]
    pub fn session(&self) -> Session {
        Session {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Split a report into rounds, merge them into the board in one pass and
    /// append them to the history, as a single step.
    ///
    /// A finished game takes no further rounds: on a terminal board the
    /// report is dropped and the result reports zero rounds applied.
    pub fn apply_report(&mut self, report: GameReport) -> AppliedBatch {
        let mut guard = self.shared.state.write();
        let state = &mut *guard;

        if state.board.status().is_terminal() {
            if report.round_count() > 0 {
                warn!(
                    status = %state.board.status(),
                    rounds = report.round_count(),
                    "report dropped, game already finished"
                );
            }
            return AppliedBatch {
                rounds: 0,
                status: state.board.status(),
                turn_counter: state.board.turn_counter(),
            };
        }

        let records = split_report(report);
        state.board.apply_batch(&records);
        let rounds = records.len();
        for record in records {
            state.history.append(record);
        }

        AppliedBatch {
            rounds,
            status: state.board.status(),
            turn_counter: state.board.turn_counter(),
        }
    }

    /// Reset the board and discard the history.
    pub fn reset(&mut self) {
        let mut state = self.shared.state.write();
        state.board.reset();
        state.history = History::new();
    }

    /// Current board status.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.shared.state.read().board.status()
    }

    /// Rounds applied to the board since the last reset.
    #[must_use]
    pub fn turn_counter(&self) -> usize {
        self.shared.state.read().board.turn_counter()
    }

    /// Snapshot of the history.
    #[must_use]
    pub fn history(&self) -> HistoryView {
        self.shared.state.read().history.view()
    }

    /// Show `board` to readers in place of the live board.
    pub(crate) fn publish_board(&mut self, board: &Board) {
        self.shared.state.write().board.clone_from(board);
    }

    /// Rebuild the live board from the full history.
    pub(crate) fn restore_live_board(&mut self) {
        let mut guard = self.shared.state.write();
        let state = &mut *guard;
        state.board.reset();
        state.board.apply_batch(state.history.iter());
    }
}

impl Drop for SessionWriter {
    fn drop(&mut self) {
        self.shared.writer_held.store(false, Ordering::Release);
    }
}
