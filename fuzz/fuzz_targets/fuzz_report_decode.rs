#![no_main]

use libfuzzer_sys::fuzz_target;
use skirmish::game::{Board, GameReport, split_report};

fuzz_target!(|data: &[u8]| {
    // Decoding must reject, never panic, and never admit an off-board cell
    let Ok(report) = serde_json::from_slice::<GameReport>(data) else {
        return;
    };

    let rounds = report.round_count();
    let records = split_report(report);
    assert_eq!(records.len(), rounds);

    let mut board = Board::new();
    board.apply_batch(&records);
    assert_eq!(board.turn_counter(), rounds);

    // Whatever decodes re-encodes and decodes to the same value
    let encoded = serde_json::to_vec(&GameReport {
        logs: records.into_iter().map(|record| record.changes).collect(),
        status: board.status(),
    })
    .unwrap_or_default();
    if let Ok(again) = serde_json::from_slice::<GameReport>(&encoded) {
        assert_eq!(again.round_count(), rounds);
    }
});
