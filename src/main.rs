//! Skirmish CLI - synchronize, replay and validate recorded games.

// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Skirmish - game-state synchronization and replay
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); `RUST_LOG` wins
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON file with delay settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Synchronize a session against a recorded game until it ends
    Sync {
        /// Recording file (JSON game report)
        #[arg(required = true)]
        recording: PathBuf,

        /// Rounds served per poll (default: all remaining)
        #[arg(long)]
        chunk: Option<usize>,

        /// Delay between polls while rounds arrive, in milliseconds
        #[arg(long)]
        active_ms: Option<u64>,

        /// Delay between polls when nothing arrives, in milliseconds
        #[arg(long)]
        idle_ms: Option<u64>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Draw the final board (text output only)
        #[arg(long)]
        board: bool,
    },

    /// Replay a recorded game frame by frame
    Replay {
        /// Recording file (JSON game report)
        #[arg(required = true)]
        recording: PathBuf,

        /// Delay between frames in milliseconds
        #[arg(long)]
        frame_ms: Option<u64>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Draw the board on every frame (text output only)
        #[arg(long)]
        board: bool,
    },

    /// Check a recording against the board/history invariants
    Validate {
        /// Recording file (JSON game report)
        #[arg(required = true)]
        recording: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn dispatch(args: Args) -> Result<(), cli::CliError> {
    let config = cli::load_config(args.config.as_deref())?;

    match args.command {
        Commands::Sync {
            recording,
            chunk,
            active_ms,
            idle_ms,
            format,
            board,
        } => {
            let config = cli::with_overrides(config, active_ms, idle_ms, None)?;
            cli::sync::execute(&recording, chunk, config, format, board).await
        }

        Commands::Replay {
            recording,
            frame_ms,
            format,
            board,
        } => {
            let config = cli::with_overrides(config, None, None, frame_ms)?;
            cli::replay::execute(&recording, config, format, board).await
        }

        Commands::Validate { recording } => cli::validate::execute(&recording),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(dispatch(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
