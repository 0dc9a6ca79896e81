//! Error types for the synchronization core.

/// Errors raised by the board, history and session layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// A history index past the last recorded round was requested.
    #[error("round {requested} out of range (history holds {len} rounds)")]
    RoundOutOfRange {
        /// Requested round index.
        requested: usize,
        /// Number of rounds in the history.
        len: usize,
    },
    /// A cell change referenced a position outside the board.
    #[error("position ({x}, {y}) is outside the board")]
    PositionOutOfBounds {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
    },
    /// Another driver already holds the session's writer role.
    #[error("another driver already holds the session writer")]
    WriterBusy,
}

/// Result type for core operations.
pub type SyncResult<T> = Result<T, SyncError>;
