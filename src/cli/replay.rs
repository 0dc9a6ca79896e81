//! Replay command implementation.

use super::output::{JsonBoard, JsonFrame, JsonOutcome, format_summary, format_text};
use super::{CliError, OutputFormat};
use skirmish::game::Board;
use skirmish::replay::render_ascii;
use skirmish::{ReplayDriver, ReplayOutcome, Session, SessionReplay, SyncConfig, SyncError};
use std::path::Path;
use tracing::warn;

/// Execute the replay command.
///
/// Ctrl-C cancels the replay between frames.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded.
pub(crate) async fn execute(
    recording: &Path,
    config: SyncConfig,
    format: OutputFormat,
    show_board: bool,
) -> Result<(), CliError> {
    let game = super::load_recording(recording)?;
    let total_rounds = game.round_count();

    let session = Session::new();
    session
        .try_acquire_writer()
        .ok_or(SyncError::WriterBusy)?
        .apply_report(game);

    let replay = SessionReplay::new(&session, ReplayDriver::from_config(&config))?;
    let cancel = replay.cancellation_token();
    let run = replay.run(|round, board| print_frame(format, show_board, round, board));
    tokio::pin!(run);

    let outcome = tokio::select! {
        outcome = &mut run => outcome,
        result = tokio::signal::ctrl_c() => {
            result?;
            cancel.cancel();
            run.await
        }
    };

    let outcome = match outcome {
        ReplayOutcome::Finished => "finished",
        ReplayOutcome::Cancelled => "cancelled",
    };
    let board = session.board();

    match format {
        OutputFormat::Text => print!("{}", format_text(outcome, total_rounds, &board)),
        OutputFormat::Json => {
            let result = JsonOutcome {
                outcome,
                total_rounds,
                board: JsonBoard::from_board(&board),
            };
            println!("{}", serde_json::to_string(&result)?);
        }
    }

    Ok(())
}

fn print_frame(format: OutputFormat, show_board: bool, round: usize, board: &Board) {
    match format {
        OutputFormat::Text if show_board => println!("{}", render_ascii(board)),
        OutputFormat::Text => println!("{}", format_summary(board)),
        OutputFormat::Json => {
            let frame = JsonFrame {
                round,
                board: JsonBoard::from_board(board),
            };
            match serde_json::to_string(&frame) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(round, error = %e, "failed to encode frame"),
            }
        }
    }
}
