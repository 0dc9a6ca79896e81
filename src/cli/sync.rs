//! Sync command implementation.

use super::output::{JsonBoard, JsonOutcome, format_text};
use super::{CliError, OutputFormat};
use skirmish::replay::render_ascii;
use skirmish::{LoopExit, RecordedSource, Session, SyncConfig, Synchronizer};
use std::path::Path;

/// Execute the sync command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or the loop cannot
/// start.
pub(crate) async fn execute(
    recording: &Path,
    chunk: Option<usize>,
    config: SyncConfig,
    format: OutputFormat,
    show_board: bool,
) -> Result<(), CliError> {
    let mut source = RecordedSource::new(super::load_recording(recording)?);
    if let Some(chunk) = chunk {
        source = source.with_chunk(chunk);
    }
    let total_rounds = source.total_rounds();

    let session = Session::new();
    let mut synchronizer = Synchronizer::new(session.clone(), config);
    synchronizer.start(source)?;

    let exit = tokio::select! {
        exit = synchronizer.wait_terminated() => exit,
        result = tokio::signal::ctrl_c() => {
            result?;
            Some(LoopExit::Cancelled)
        }
    };
    synchronizer.stop().await;

    let outcome = match exit {
        Some(LoopExit::Terminated) => "terminated",
        Some(LoopExit::Cancelled) | None => "cancelled",
    };
    let board = session.board();

    match format {
        OutputFormat::Text => {
            print!("{}", format_text(outcome, total_rounds, &board));
            if show_board {
                println!();
                print!("{}", render_ascii(&board));
            }
        }
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
