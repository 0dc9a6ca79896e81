//! Game model for the synchronization core.
//!
//! - Positions on the fixed 10x10 board
//! - Cell contents (terrain, cities, military units)
//! - Reports from the server and the round records they split into
//! - The spatial board and the round history
//! - Invariant checks tying the board to its history

mod board;
mod cell;
mod history;
mod invariants;
mod position;
mod report;
mod status;

pub use board::Board;
pub use cell::{CellContent, Direction, MilitaryUnit, PlayerIdentity, Terrain, TileType};
pub use history::{History, HistoryView};
pub use invariants::{InvariantViolation, check_invariants};
pub use position::{CELL_COUNT, HEIGHT, Position, WIDTH};
pub use report::{GameReport, RoundRecord, split_report, split_report_ref};
pub use status::GameStatus;
