#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use skirmish::game::{
    Board, CellContent, GameReport, GameStatus, History, Position, Terrain, check_invariants,
    split_report,
};

/// One changed cell, coordinates folded onto the board.
#[derive(Arbitrary, Debug)]
struct Change {
    x: u8,
    y: u8,
    /// 0 empty, 1 mountain, 2 fort, anything else a city.
    terrain: u8,
}

/// Structured input: a few batches of rounds.
#[derive(Arbitrary, Debug)]
struct BatchInput {
    batches: Vec<Vec<Vec<Change>>>,
    /// Final status selector for the last batch.
    ending: u8,
}

fn cell(change: &Change) -> CellContent {
    let position = Position::new(usize::from(change.x) % 10, usize::from(change.y) % 10);
    let terrain = match change.terrain {
        0 => Terrain::Empty,
        1 => Terrain::Mountain,
        2 => Terrain::Fort,
        level => Terrain::City {
            level: u32::from(level),
        },
    };
    CellContent::with_terrain(position, terrain)
}

fuzz_target!(|input: BatchInput| {
    // Cap inputs to keep iterations fast
    let batch_count = input.batches.len().min(16);
    let ending = match input.ending % 4 {
        0 => GameStatus::InProgress,
        1 => GameStatus::BlackWins,
        2 => GameStatus::WhiteWins,
        _ => GameStatus::Draw,
    };

    let mut batched = Board::new();
    let mut sequential = Board::new();
    let mut history = History::new();

    for (i, batch) in input.batches.iter().take(batch_count).enumerate() {
        let status = if i + 1 == batch_count {
            ending
        } else {
            GameStatus::InProgress
        };
        let logs = batch
            .iter()
            .take(64)
            .map(|round| round.iter().take(128).map(cell).collect())
            .collect();
        let records = split_report(GameReport::new(logs, status));

        batched.apply_batch(&records);
        for record in records {
            sequential.apply_round(&record);
            history.append(record);
        }

        assert_eq!(batched, sequential, "batch merge diverged from sequential apply");
    }

    let violations = check_invariants(&batched, &history);
    assert!(violations.is_empty(), "Invariants violated: {violations:?}");
});
