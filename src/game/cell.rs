//! Cell contents: terrain and the military unit standing on it.

use serde::{Deserialize, Serialize};

use crate::game::Position;

/// One of the two sides of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerIdentity {
    /// The black side.
    Black,
    /// The white side.
    White,
}

impl PlayerIdentity {
    /// Both sides, black first.
    pub const ALL: [Self; 2] = [Self::Black, Self::White];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

impl std::fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Black => "black",
            Self::White => "white",
        })
    }
}

/// Facing of a military unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Towards increasing x.
    East,
    /// Towards decreasing y.
    North,
    /// Towards decreasing x.
    West,
    /// Towards increasing y.
    South,
}

/// A unit occupying a cell.
///
/// Morale and leadership ranges belong to the game rules and are not checked
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilitaryUnit {
    /// Owning side.
    #[serde(alias = "playerIdentity")]
    pub identity: PlayerIdentity,
    /// Stable unit id.
    pub id: u32,
    /// Facing.
    pub direction: Direction,
    /// Number of soldiers in the unit.
    #[serde(rename = "numberOfSoldiers")]
    pub soldiers: u32,
    /// Morale.
    pub morale: i32,
    /// Leadership.
    pub leadership: i32,
}

/// Kind of terrain, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileType {
    /// Open ground.
    Empty,
    /// Mountain.
    Mountain,
    /// Fort.
    Fort,
    /// City.
    City,
}

/// Terrain of a cell. Only cities carry a level.
///
/// Serialized as the `tileType` tag plus `cityLevel` for cities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "tileType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Terrain {
    /// Open ground.
    #[default]
    Empty,
    /// Mountain.
    Mountain,
    /// Fort.
    Fort,
    /// City of the given level.
    City {
        /// City level.
        #[serde(rename = "cityLevel")]
        level: u32,
    },
}

impl Terrain {
    /// The tile type without payload.
    #[must_use]
    pub const fn tile_type(self) -> TileType {
        match self {
            Self::Empty => TileType::Empty,
            Self::Mountain => TileType::Mountain,
            Self::Fort => TileType::Fort,
            Self::City { .. } => TileType::City,
        }
    }

    /// City level, `None` for anything but a city.
    #[must_use]
    pub const fn city_level(self) -> Option<u32> {
        match self {
            Self::City { level } => Some(level),
            _ => None,
        }
    }
}

/// Complete state of one cell at the moment it last changed.
///
/// Changes carry whole cells, never deltas: applying one replaces the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellContent {
    /// Where the cell is.
    pub position: Position,
    /// Terrain of the cell.
    #[serde(flatten)]
    pub terrain: Terrain,
    /// Unit standing on the cell, if any.
    #[serde(
        rename = "milUnit",
        alias = "militaryUnit",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub military_unit: Option<MilitaryUnit>,
}

impl CellContent {
    /// Default content: empty ground, no unit.
    #[must_use]
    pub const fn empty(position: Position) -> Self {
        Self {
            position,
            terrain: Terrain::Empty,
            military_unit: None,
        }
    }

    /// Cell with the given terrain and no unit.
    #[must_use]
    pub const fn with_terrain(position: Position, terrain: Terrain) -> Self {
        Self {
            position,
            terrain,
            military_unit: None,
        }
    }

    /// Place a unit on this cell.
    #[must_use]
    pub const fn occupied_by(mut self, unit: MilitaryUnit) -> Self {
        self.military_unit = Some(unit);
        self
    }

    /// The tile type of this cell.
    #[must_use]
    pub const fn tile_type(&self) -> TileType {
        self.terrain.tile_type()
    }

    /// Side owning the unit on this cell, if any.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerIdentity> {
        self.military_unit.map(|unit| unit.identity)
    }
}
