//! Board/history invariants - sanity checks that detect bugs.
//!
//! These should never trigger for a board and history kept by a session.
//! A violation means the merge logic or a driver broke the single-writer
//! discipline.

use crate::game::{Board, History, Position};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check a board against the history it was built from.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(board: &Board, history: &History) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    // Every cell describes its own position
    for (index, cell) in board.cells().iter().enumerate() {
        let expected = Position::from_index(index);
        if cell.position != expected {
            violations.push(InvariantViolation {
                message: format!(
                    "Cell {index} holds content for {:?}, expected {expected:?}",
                    cell.position
                ),
            });
        }
    }

    // Turn counter and history advance together
    if board.turn_counter() != history.len() {
        violations.push(InvariantViolation {
            message: format!(
                "Turn counter {} does not match history length {}",
                board.turn_counter(),
                history.len()
            ),
        });
    }

    // Only the final round may carry a terminal status
    let last = history.len().saturating_sub(1);
    for (round, record) in history.iter().enumerate() {
        if round != last && record.status.is_terminal() {
            violations.push(InvariantViolation {
                message: format!(
                    "Round {round} is {} but round {} follows it",
                    record.status,
                    round + 1
                ),
            });
        }
    }

    if board.status() != history.last_status() {
        violations.push(InvariantViolation {
            message: format!(
                "Board status {} differs from last recorded status {}",
                board.status(),
                history.last_status()
            ),
        });
    }

    // The board equals a round-by-round replay of the history
    let mut replayed = Board::new();
    for record in history.iter() {
        replayed.apply_round(record);
    }
    if let Some(position) = Position::all().find(|&p| replayed.get(p) != board.get(p)) {
        violations.push(InvariantViolation {
            message: format!("Cell {position:?} diverges from a sequential replay of the history"),
        });
    }

    violations
}
