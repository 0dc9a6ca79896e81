//! The spatial board.

use crate::game::{CELL_COUNT, CellContent, GameStatus, PlayerIdentity, Position, RoundRecord, WIDTH};

/// A fixed-size grid of cell contents plus the latest status and turn count.
///
/// Every cell always holds content; a reset board is empty ground everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Cells stored in row-major order.
    cells: Vec<CellContent>,
    /// Status as of the last applied round.
    status: GameStatus,
    /// Rounds applied since the last reset.
    turn_counter: usize,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a reset board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: Position::all().map(CellContent::empty).collect(),
            status: GameStatus::InProgress,
            turn_counter: 0,
        }
    }

    /// Reset every cell to empty ground, the status to in-progress and the
    /// turn counter to zero.
    pub fn reset(&mut self) {
        for (index, cell) in self.cells.iter_mut().enumerate() {
            *cell = CellContent::empty(Position::from_index(index));
        }
        self.status = GameStatus::InProgress;
        self.turn_counter = 0;
    }

    /// Status as of the last applied round.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Number of rounds applied since the last reset.
    #[must_use]
    pub const fn turn_counter(&self) -> usize {
        self.turn_counter
    }

    /// All cells in row-major order.
    #[must_use]
    #[inline]
    pub fn cells(&self) -> &[CellContent] {
        &self.cells
    }

    /// Content of one cell.
    #[must_use]
    #[inline]
    pub fn get(&self, position: Position) -> &CellContent {
        &self.cells[position.index()]
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[CellContent]> {
        self.cells.chunks(WIDTH)
    }

    /// Apply one round: overwrite each changed cell in order, take the
    /// round's status and count the turn.
    pub fn apply_round(&mut self, record: &RoundRecord) {
        for change in &record.changes {
            self.cells[change.position.index()] = *change;
        }
        self.status = record.status;
        self.turn_counter += 1;
    }

    /// Apply several consecutive rounds in one merge pass.
    ///
    /// Equivalent to calling [`Board::apply_round`] on each record in order.
    /// Changes are first collected into an overlay where the last write per
    /// cell wins across the whole batch, then copied onto the board once.
    /// An empty batch leaves the board untouched.
    pub fn apply_batch<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a RoundRecord>,
    {
        let mut overlay: [Option<&'a CellContent>; CELL_COUNT] = [None; CELL_COUNT];
        let mut last_status = None;
        let mut applied = 0;

        for record in records {
            for change in &record.changes {
                overlay[change.position.index()] = Some(change);
            }
            last_status = Some(record.status);
            applied += 1;
        }

        let Some(status) = last_status else {
            return;
        };

        for (cell, change) in self.cells.iter_mut().zip(overlay) {
            if let Some(change) = change {
                *cell = *change;
            }
        }
        self.status = status;
        self.turn_counter += applied;
    }

    /// Cells holding a unit of the given side.
    pub fn units_of(&self, side: PlayerIdentity) -> impl Iterator<Item = &CellContent> {
        self.cells.iter().filter(move |cell| cell.owner() == Some(side))
    }

    /// Count units of a side.
    #[must_use]
    pub fn count_units(&self, side: PlayerIdentity) -> usize {
        self.units_of(side).count()
    }

    /// Sum soldiers across all units of a side.
    #[must_use]
    pub fn count_soldiers(&self, side: PlayerIdentity) -> u64 {
        self.units_of(side)
            .filter_map(|cell| cell.military_unit)
            .map(|unit| u64::from(unit.soldiers))
            .sum()
    }
}
