//! Recording validation command implementation.

use super::CliError;
use serde_json::Value;
use skirmish::game::{
    Board, GameReport, GameStatus, HEIGHT, History, PlayerIdentity, WIDTH, check_invariants,
    split_report,
};
use std::fs;
use std::path::Path;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or breaks an
/// invariant.
pub(crate) fn execute(recording: &Path) -> Result<(), CliError> {
    let json = fs::read_to_string(recording)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", recording.display())))?;
    let raw: Value = serde_json::from_str(&json)
        .map_err(|e| CliError::new(format!("Failed to parse {}: {e}", recording.display())))?;

    println!("Validating: {}", recording.display());
    println!();

    // Decoding rejects off-board cells, so count them on the raw JSON first
    let off_board = count_off_board(&raw);
    print_check("Positions inside the board", off_board == 0);
    if off_board > 0 {
        return Err(CliError::new(format!(
            "Recording has {off_board} cells outside the board"
        )));
    }

    let game: GameReport = serde_json::from_value(raw)
        .map_err(|e| CliError::new(format!("Failed to load {}: {e}", recording.display())))?;

    let status_ok = status_is_carried(&game);
    print_check("Final status carried by a round", status_ok);

    let records = split_report(game);
    let mut board = Board::new();
    let mut history = History::new();
    for record in records {
        board.apply_round(&record);
        history.append(record);
    }

    let mut batched = Board::new();
    batched.apply_batch(history.iter());
    let batch_ok = batched == board;
    print_check("Batch merge matches round-by-round", batch_ok);

    let violations = check_invariants(&board, &history);
    print_check("Board and history invariants", violations.is_empty());
    for violation in &violations {
        println!("    - {}", violation.message);
    }

    println!();
    println!("Summary:");
    println!("  Rounds:       {}", history.len());
    println!("  Final status: {}", board.status());
    for side in PlayerIdentity::ALL {
        println!(
            "  {side:<12}  {} units, {} soldiers",
            board.count_units(side),
            board.count_soldiers(side)
        );
    }

    if !status_ok || !batch_ok || !violations.is_empty() {
        return Err(CliError::new(format!(
            "Recording is inconsistent ({} invariant violations)",
            violations.len()
        )));
    }

    println!();
    println!("Validation successful!");

    Ok(())
}

/// Count cells in `logs` whose position is missing or off the board.
fn count_off_board(raw: &Value) -> usize {
    let on_board = |cell: &Value| {
        let coord = |axis: &str, limit: usize| {
            cell.get("position")
                .and_then(|position| position.get(axis))
                .and_then(Value::as_i64)
                .and_then(|v| usize::try_from(v).ok())
                .is_some_and(|v| v < limit)
        };
        coord("x", WIDTH) && coord("y", HEIGHT)
    };

    raw.get("logs")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_array)
        .flatten()
        .filter(|&cell| !on_board(cell))
        .count()
}

/// A terminal status reaches the board only through a round, so a finished
/// game with no rounds would never be shown as finished.
fn status_is_carried(game: &GameReport) -> bool {
    game.status == GameStatus::InProgress || game.round_count() > 0
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
