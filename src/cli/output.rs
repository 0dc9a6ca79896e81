//! Output formatting utilities for CLI.

use serde::Serialize;
use skirmish::game::{Board, GameStatus, PlayerIdentity};
use std::fmt::Write as _;

/// Units and soldiers of one side.
#[derive(Debug, Clone, Copy, Serialize)]
pub(super) struct JsonSide {
    /// Units on the board.
    pub(super) units: usize,
    /// Soldiers across all units.
    pub(super) soldiers: u64,
}

/// JSON-serializable board summary.
#[derive(Debug, Clone, Copy, Serialize)]
pub(super) struct JsonBoard {
    /// Rounds applied.
    pub(super) turn: usize,
    /// Status after the last applied round.
    pub(super) status: GameStatus,
    /// Black side.
    pub(super) black: JsonSide,
    /// White side.
    pub(super) white: JsonSide,
}

impl JsonBoard {
    /// Summarize a board.
    pub(super) fn from_board(board: &Board) -> Self {
        let side = |identity| JsonSide {
            units: board.count_units(identity),
            soldiers: board.count_soldiers(identity),
        };
        Self {
            turn: board.turn_counter(),
            status: board.status(),
            black: side(PlayerIdentity::Black),
            white: side(PlayerIdentity::White),
        }
    }
}

/// One replay frame.
#[derive(Debug, Clone, Copy, Serialize)]
pub(super) struct JsonFrame {
    /// Index of the round just applied.
    pub(super) round: usize,
    /// Board after the round.
    pub(super) board: JsonBoard,
}

/// How a command run ended.
#[derive(Debug, Clone, Copy, Serialize)]
pub(super) struct JsonOutcome {
    /// `terminated`, `finished` or `cancelled`.
    pub(super) outcome: &'static str,
    /// Rounds in the recording.
    pub(super) total_rounds: usize,
    /// Board when the command ended.
    pub(super) board: JsonBoard,
}

/// One-line summary of a board.
pub(super) fn format_summary(board: &Board) -> String {
    let mut line = format!("turn {:>4}  {:<11}", board.turn_counter(), board.status());
    for side in PlayerIdentity::ALL {
        let _ = write!(
            line,
            "  {side}: {} units/{} soldiers",
            board.count_units(side),
            board.count_soldiers(side)
        );
    }
    line
}

/// Final result block for the text format.
pub(super) fn format_text(outcome: &str, total_rounds: usize, board: &Board) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Result: {outcome}");
    let _ = writeln!(output, "  Rounds: {}/{total_rounds}", board.turn_counter());
    let _ = writeln!(output, "  Status: {}", board.status());
    if let Some(winner) = board.status().winner() {
        let _ = writeln!(output, "  Winner: {winner}");
    }
    output
}
