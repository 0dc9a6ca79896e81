//! Server reports and the per-round records they split into.

use serde::{Deserialize, Serialize};

use crate::game::{CellContent, GameStatus};

/// Cells changed during exactly one round, with the status as of that round.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Status after the round.
    pub status: GameStatus,
    /// Changed cells, in application order.
    pub changes: Vec<CellContent>,
}

impl RoundRecord {
    /// Create a record.
    #[must_use]
    pub fn new(status: GameStatus, changes: Vec<CellContent>) -> Self {
        Self { status, changes }
    }
}

/// A batch of consecutive rounds as delivered by a data source.
///
/// `logs[i]` is the change set of the i-th round in the batch. `status`
/// belongs to the last round only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameReport {
    /// Per-round change sets.
    pub logs: Vec<Vec<CellContent>>,
    /// Status after the last round of the batch.
    pub status: GameStatus,
}

impl GameReport {
    /// Create a report.
    #[must_use]
    pub fn new(logs: Vec<Vec<CellContent>>, status: GameStatus) -> Self {
        Self { logs, status }
    }

    /// Number of rounds in the batch.
    #[must_use]
    pub fn round_count(&self) -> usize {
        self.logs.len()
    }

    /// Whether the batch carries no rounds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Cut the rounds starting at `since_turn` into a batch of at most
    /// `max_rounds` rounds, the way a server answers a poll.
    ///
    /// The final status is carried only if the batch reaches the last round;
    /// otherwise the batch is still in progress. Returns `None` when nothing
    /// lies past `since_turn`.
    #[must_use]
    pub fn window(&self, since_turn: usize, max_rounds: usize) -> Option<Self> {
        let remaining = self.logs.get(since_turn..)?;
        if remaining.is_empty() {
            return None;
        }

        let take = remaining.len().min(max_rounds.max(1));
        let status = if take == remaining.len() {
            self.status
        } else {
            GameStatus::InProgress
        };

        Some(Self {
            logs: remaining[..take].to_vec(),
            status,
        })
    }
}

/// Split a batched report into one record per round.
///
/// Every record but the last is `InProgress`; the last carries the report's
/// status. An empty report yields no records.
#[must_use]
pub fn split_report(report: GameReport) -> Vec<RoundRecord> {
    let last = report.logs.len().saturating_sub(1);
    report
        .logs
        .into_iter()
        .enumerate()
        .map(|(i, changes)| {
            let status = if i == last {
                report.status
            } else {
                GameStatus::InProgress
            };
            RoundRecord { status, changes }
        })
        .collect()
}

/// Like [`split_report`], cloning the change sets out of a borrowed report.
#[must_use]
pub fn split_report_ref(report: &GameReport) -> Vec<RoundRecord> {
    split_report(report.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Position, Terrain};

    fn change(x: usize, y: usize) -> Vec<CellContent> {
        vec![CellContent::with_terrain(Position::new(x, y), Terrain::Fort)]
    }

    #[test]
    fn test_split_status_only_on_last_round() {
        let report = GameReport::new(vec![change(0, 0), change(1, 1), change(2, 2)], GameStatus::BlackWins);
        let records = split_report(report);
        let statuses: Vec<_> = records.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![GameStatus::InProgress, GameStatus::InProgress, GameStatus::BlackWins]
        );
        assert_eq!(records[1].changes, change(1, 1));
    }

    #[test]
    fn test_split_empty_report() {
        assert!(split_report(GameReport::default()).is_empty());
        assert!(split_report(GameReport::new(Vec::new(), GameStatus::Draw)).is_empty());
    }

    #[test]
    fn test_split_single_round() {
        let records = split_report_ref(&GameReport::new(vec![change(3, 3)], GameStatus::WhiteWins));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, GameStatus::WhiteWins);
    }

    #[test]
    fn test_window_chunks_and_status() {
        let game = GameReport::new(
            vec![change(0, 0), change(1, 1), change(2, 2)],
            GameStatus::Draw,
        );

        let first = game.window(0, 2).unwrap();
        assert_eq!(first.round_count(), 2);
        assert_eq!(first.status, GameStatus::InProgress);

        let rest = game.window(2, 2).unwrap();
        assert_eq!(rest.round_count(), 1);
        assert_eq!(rest.status, GameStatus::Draw);

        assert!(game.window(3, 2).is_none());
        assert!(game.window(7, 2).is_none());

        // A zero chunk still makes progress
        assert_eq!(game.window(0, 0).unwrap().round_count(), 1);
    }

    #[test]
    fn test_report_decodes_client_shape() {
        let json = r#"{
            "logs": [
                [{"position": {"x": 2, "y": 3}, "tileType": "CITY", "cityLevel": 1}],
                [{"position": {"x": 2, "y": 3}, "tileType": "MOUNTAIN"}]
            ],
            "status": "IN_PROGRESS"
        }"#;
        let report: GameReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.round_count(), 2);
        assert_eq!(report.logs[1][0].terrain, Terrain::Mountain);
    }
}
