//! ASCII renderer for terminal viewing.

use std::fmt::Write as _;

use crate::game::{Board, CellContent, PlayerIdentity, Terrain, WIDTH};

/// Render a board to plain ASCII.
///
/// Output format:
/// ```text
/// Turn 42  IN_PROGRESS
/// +---------------------+
/// | . . M . C . . . . . |
/// | . . M . . b . . F . |
/// +---------------------+
///
/// Legend: M=Mountain  F=Fort  C=City  b/w=Black/White unit
/// black: 3 units, 120 soldiers
/// white: 2 units, 90 soldiers
/// ```
#[must_use]
pub fn render_ascii(board: &Board) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Turn {}  {}", board.turn_counter(), board.status());
    render_grid(&mut output, board);
    output.push_str("\nLegend: M=Mountain  F=Fort  C=City  b/w=Black/White unit\n");

    for side in PlayerIdentity::ALL {
        let _ = writeln!(
            output,
            "{side}: {} units, {} soldiers",
            board.count_units(side),
            board.count_soldiers(side)
        );
    }

    output
}

fn render_grid(output: &mut String, board: &Board) {
    let border = format!("+{}+\n", "-".repeat(WIDTH * 2 + 1));

    output.push_str(&border);
    for row in board.rows() {
        output.push_str("| ");
        for cell in row {
            output.push(cell_symbol(cell));
            output.push(' ');
        }
        output.push_str("|\n");
    }
    output.push_str(&border);
}

/// A unit hides the terrain below it.
fn cell_symbol(cell: &CellContent) -> char {
    match (cell.owner(), cell.terrain) {
        (Some(PlayerIdentity::Black), _) => 'b',
        (Some(PlayerIdentity::White), _) => 'w',
        (None, Terrain::Empty) => '.',
        (None, Terrain::Mountain) => 'M',
        (None, Terrain::Fort) => 'F',
        (None, Terrain::City { .. }) => 'C',
    }
}
