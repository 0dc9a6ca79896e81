//! Board coordinates.

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::error::SyncError;

/// Width of the board in cells.
pub const WIDTH: usize = 10;

/// Height of the board in cells.
pub const HEIGHT: usize = 10;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = WIDTH * HEIGHT;

/// A cell coordinate, always inside the board.
///
/// Out-of-range coordinates are unrepresentable: [`Position::new`] panics,
/// [`Position::try_new`] returns `None`, and deserialization fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    x: u8,
    y: u8,
}

impl Position {
    /// Create a position.
    ///
    /// # Panics
    ///
    /// Panics if `x >= WIDTH` or `y >= HEIGHT`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(x: usize, y: usize) -> Self {
        assert!(x < WIDTH && y < HEIGHT, "position outside the board");
        Self {
            x: x as u8,
            y: y as u8,
        }
    }

    /// Create a position, or `None` if it lies outside the board.
    #[must_use]
    pub const fn try_new(x: usize, y: usize) -> Option<Self> {
        if x < WIDTH && y < HEIGHT {
            Some(Self::new(x, y))
        } else {
            None
        }
    }

    /// Create a position from signed wire coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::PositionOutOfBounds`] if either coordinate is
    /// negative or past the board edge.
    pub fn from_signed(x: i64, y: i64) -> Result<Self, SyncError> {
        usize::try_from(x)
            .ok()
            .zip(usize::try_from(y).ok())
            .and_then(|(x, y)| Self::try_new(x, y))
            .ok_or(SyncError::PositionOutOfBounds { x, y })
    }

    /// Column.
    #[must_use]
    pub const fn x(self) -> usize {
        self.x as usize
    }

    /// Row.
    #[must_use]
    pub const fn y(self) -> usize {
        self.y as usize
    }

    /// Row-major index into a board's cell storage.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.y() * WIDTH + self.x()
    }

    /// Inverse of [`Position::index`].
    #[must_use]
    pub(crate) const fn from_index(index: usize) -> Self {
        Self::new(index % WIDTH, index / WIDTH)
    }

    /// Iterate over every position in row-major order.
    pub fn all() -> impl Iterator<Item = Self> + Clone {
        (0..CELL_COUNT).map(Self::from_index)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Wire {
            x: i64,
            y: i64,
        }

        let wire = Wire::deserialize(deserializer)?;
        Self::from_signed(wire.x, wire.y).map_err(de::Error::custom)
    }
}
