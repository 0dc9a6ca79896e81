//! Append-only log of round records.

use std::sync::Arc;

use crate::error::{SyncError, SyncResult};
use crate::game::{GameStatus, RoundRecord};

/// Ordered log of every round seen since the game started.
///
/// Index `i` holds round `i`. Records are frozen once appended: they are
/// moved in, kept behind `Arc`, and only ever handed out by shared reference.
#[derive(Debug, Clone, Default)]
pub struct History {
    records: Vec<Arc<RoundRecord>>,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a round to the end of the log.
    pub fn append(&mut self, record: RoundRecord) {
        self.records.push(Arc::new(record));
    }

    /// Record of the given round.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RoundOutOfRange`] if `round_id >= len()`.
    pub fn get(&self, round_id: usize) -> SyncResult<&RoundRecord> {
        lookup(&self.records, round_id)
    }

    /// Number of recorded rounds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no round has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over rounds in order.
    pub fn iter(&self) -> impl Iterator<Item = &RoundRecord> {
        self.records.iter().map(Arc::as_ref)
    }

    /// Status of the latest round, in-progress if there is none.
    #[must_use]
    pub fn last_status(&self) -> GameStatus {
        self.records.last().map_or(GameStatus::InProgress, |r| r.status)
    }

    /// Immutable snapshot of the log as it is now.
    #[must_use]
    pub fn view(&self) -> HistoryView {
        HistoryView {
            records: self.records.as_slice().into(),
        }
    }
}

/// Read-only snapshot of a [`History`].
///
/// Cheap to clone; later appends to the history do not show up here.
#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    records: Arc<[Arc<RoundRecord>]>,
}

impl HistoryView {
    /// Record of the given round.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RoundOutOfRange`] if `round_id >= len()`.
    pub fn get(&self, round_id: usize) -> SyncResult<&RoundRecord> {
        lookup(&self.records, round_id)
    }

    /// Number of rounds in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over rounds in order.
    pub fn iter(&self) -> impl Iterator<Item = &RoundRecord> {
        self.records.iter().map(Arc::as_ref)
    }

    /// Status of the latest round, in-progress if there is none.
    #[must_use]
    pub fn last_status(&self) -> GameStatus {
        self.records.last().map_or(GameStatus::InProgress, |r| r.status)
    }
}

impl From<&History> for HistoryView {
    fn from(history: &History) -> Self {
        history.view()
    }
}

fn lookup(records: &[Arc<RoundRecord>], round_id: usize) -> SyncResult<&RoundRecord> {
    records
        .get(round_id)
        .map(Arc::as_ref)
        .ok_or(SyncError::RoundOutOfRange {
            requested: round_id,
            len: records.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CellContent, Position, Terrain};

    fn record(status: GameStatus, x: usize) -> RoundRecord {
        RoundRecord::new(
            status,
            vec![CellContent::with_terrain(Position::new(x, 0), Terrain::Fort)],
        )
    }

    #[test]
    fn test_append_and_get() {
        let mut history = History::new();
        assert!(history.is_empty());
        history.append(record(GameStatus::InProgress, 0));
        history.append(record(GameStatus::Draw, 1));

        assert_eq!(history.len(), 2);
        assert_eq!(history.get(1).unwrap().status, GameStatus::Draw);
        assert_eq!(history.last_status(), GameStatus::Draw);
    }

    #[test]
    fn test_get_out_of_range() {
        let mut history = History::new();
        history.append(record(GameStatus::InProgress, 0));
        assert_eq!(
            history.get(1).unwrap_err(),
            SyncError::RoundOutOfRange {
                requested: 1,
                len: 1
            }
        );
        assert!(History::new().get(0).is_err());
    }

    #[test]
    fn test_views_share_records_with_history() {
        let mut history = History::new();
        history.append(record(GameStatus::InProgress, 3));
        let first = history.view();
        let second = first.clone();

        // Snapshots point at the stored records instead of copying them
        let stored = history.get(0).unwrap();
        assert!(std::ptr::eq(first.get(0).unwrap(), stored));
        assert!(std::ptr::eq(second.get(0).unwrap(), stored));
        assert!(std::ptr::eq(history.view().get(0).unwrap(), stored));
    }

    #[test]
    fn test_view_is_a_snapshot() {
        let mut history = History::new();
        history.append(record(GameStatus::InProgress, 0));
        let view = history.view();

        history.append(record(GameStatus::InProgress, 1));
        assert_eq!(view.len(), 1);
        assert_eq!(history.len(), 2);
        assert!(view.get(1).is_err());
        assert_eq!(view.iter().count(), 1);
    }

    #[test]
    fn test_empty_last_status() {
        assert_eq!(History::new().last_status(), GameStatus::InProgress);
        assert_eq!(HistoryView::default().last_status(), GameStatus::InProgress);
    }
}
