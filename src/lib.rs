// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Skirmish: incremental game-state synchronization and replay for a
//! two-player grid strategy game.
//!
//! A simulation server plays the game and answers polls with batches of
//! per-round change sets. This crate keeps a local copy of the board in
//! step with the server and can replay a finished game round by round.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │  Synchronizer        │   │  SessionReplay       │
//! │  (poll, apply, wait) │   │  (frame, wait)       │
//! └──────────┬───────────┘   └──────────┬───────────┘
//!            │   one SessionWriter at a time
//! ┌──────────┴──────────────────────────┴───────────┐
//! │  Session: Board + History                        │
//! └──────────────────────────────────────────────────┘
//!            ▲
//!            │  GameReport batches
//! ┌──────────┴───────────┐
//! │  ReportSource        │
//! └──────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod replay;
pub mod session;
pub mod source;
pub mod sync;

pub use config::{ConfigError, SyncConfig};
pub use error::{SyncError, SyncResult};

// Re-export key game types at crate root for convenience
pub use game::{Board, CellContent, GameReport, GameStatus, History, Position, RoundRecord};
pub use replay::{Replay, ReplayDriver, ReplayOutcome, SessionReplay};
pub use session::{Session, SessionWriter};
pub use source::{RecordedSource, ReportSource, ScriptedSource, SourceError};
pub use sync::{LoopExit, SyncPhase, Synchronizer};
