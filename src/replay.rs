//! Replay of a recorded history.
//!
//! Rounds carry whole cells, so a replay needs nothing but the history:
//! the board at turn N is a reset board with rounds `0..N` applied.
//!
//! # Time Travel
//!
//! - **Forward**: apply the next round
//! - **Backward**: reset and re-apply up to (`turn` - 1)
//! - **Jump to turn N**: re-apply from turn 0 to N (or from the current turn
//!   when moving forward)

mod driver;
mod render;

pub use driver::{ReplayDriver, ReplayOutcome, SessionReplay};
pub use render::render_ascii;

use crate::error::{SyncError, SyncResult};
use crate::game::{Board, HistoryView};

/// Replay state machine over a history snapshot.
///
/// Stepping is synchronous; [`ReplayDriver`] adds the timing and
/// cancellation.
#[derive(Debug, Clone)]
pub struct Replay {
    history: HistoryView,
    board: Board,
}

impl Replay {
    /// Start a replay at turn 0 on a reset board.
    #[must_use]
    pub fn new(history: HistoryView) -> Self {
        Self {
            history,
            board: Board::new(),
        }
    }

    /// Rounds applied so far.
    #[must_use]
    pub fn turn(&self) -> usize {
        self.board.turn_counter()
    }

    /// Number of rounds in the replayed history.
    #[must_use]
    pub fn total_rounds(&self) -> usize {
        self.history.len()
    }

    /// Board at the current turn.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The replayed history.
    #[must_use]
    pub fn history(&self) -> &HistoryView {
        &self.history
    }

    /// Whether every round has been applied.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.turn() >= self.history.len()
    }

    /// Apply the next round; `None` once the replay is finished.
    pub fn step(&mut self) -> Option<&Board> {
        let record = self.history.get(self.turn()).ok()?;
        self.board.apply_round(record);
        Some(&self.board)
    }

    /// Back to turn 0.
    pub fn rewind(&mut self) {
        self.board.reset();
    }

    /// Jump to `turn`, the state after `turn` rounds.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RoundOutOfRange`] if `turn` lies past the end of
    /// the history.
    pub fn seek(&mut self, turn: usize) -> SyncResult<&Board> {
        let len = self.history.len();
        if turn > len {
            return Err(SyncError::RoundOutOfRange {
                requested: turn,
                len,
            });
        }

        if turn < self.turn() {
            self.board.reset();
        }
        let current = self.turn();
        self.board
            .apply_batch(self.history.iter().skip(current).take(turn - current));
        Ok(&self.board)
    }

    /// Go back one round; `None` at turn 0.
    pub fn step_back(&mut self) -> Option<&Board> {
        let target = self.turn().checked_sub(1)?;
        self.seek(target).ok()
    }

    /// Boards after each remaining round, in order.
    pub fn frames(mut self) -> impl Iterator<Item = Board> {
        std::iter::from_fn(move || self.step().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CellContent, GameStatus, History, Position, RoundRecord, Terrain};

    fn history() -> HistoryView {
        let mut history = History::new();
        for i in 0..4 {
            let status = if i == 3 {
                GameStatus::WhiteWins
            } else {
                GameStatus::InProgress
            };
            history.append(RoundRecord::new(
                status,
                vec![CellContent::with_terrain(
                    Position::new(i, i),
                    Terrain::City { level: 1 },
                )],
            ));
        }
        history.view()
    }

    #[test]
    fn test_step_to_end() {
        let mut replay = Replay::new(history());
        let mut turns = Vec::new();
        while let Some(board) = replay.step() {
            turns.push(board.turn_counter());
        }
        assert_eq!(turns, vec![1, 2, 3, 4]);
        assert!(replay.is_finished());
        assert_eq!(replay.board().status(), GameStatus::WhiteWins);
    }

    #[test]
    fn test_seek_matches_stepping() {
        let mut stepped = Replay::new(history());
        stepped.step();
        stepped.step();

        let mut seeking = Replay::new(history());
        seeking.seek(4).unwrap();
        let board = seeking.seek(2).unwrap().clone();
        assert_eq!(&board, stepped.board());

        assert_eq!(seeking.step_back().unwrap().turn_counter(), 1);
        seeking.rewind();
        assert_eq!(seeking.board(), &Board::new());
        assert!(seeking.step_back().is_none());
    }

    #[test]
    fn test_seek_past_end() {
        let mut replay = Replay::new(history());
        assert_eq!(
            replay.seek(5).unwrap_err(),
            SyncError::RoundOutOfRange {
                requested: 5,
                len: 4
            }
        );
        assert_eq!(replay.turn(), 0);
    }

    #[test]
    fn test_frames_are_deterministic() {
        let first: Vec<Board> = Replay::new(history()).frames().collect();
        let second: Vec<Board> = Replay::new(history()).frames().collect();
        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
    }
}
