//! Game status.

use serde::{Deserialize, Serialize};

use crate::game::PlayerIdentity;

/// Status of a game as of some round.
///
/// `InProgress` is the only non-terminal status. A game moves from it to
/// exactly one terminal status and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// Rounds are still being played.
    #[default]
    InProgress,
    /// Black won.
    BlackWins,
    /// White won.
    WhiteWins,
    /// Nobody won.
    Draw,
}

impl GameStatus {
    /// Whether no further rounds can follow this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// The winning side, if the game ended with a winner.
    #[must_use]
    pub const fn winner(self) -> Option<PlayerIdentity> {
        match self {
            Self::BlackWins => Some(PlayerIdentity::Black),
            Self::WhiteWins => Some(PlayerIdentity::White),
            Self::InProgress | Self::Draw => None,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::InProgress => "IN_PROGRESS",
            Self::BlackWins => "BLACK_WINS",
            Self::WhiteWins => "WHITE_WINS",
            Self::Draw => "DRAW",
        };
        f.pad(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal() {
        assert!(!GameStatus::InProgress.is_terminal());
        assert!(GameStatus::BlackWins.is_terminal());
        assert!(GameStatus::WhiteWins.is_terminal());
        assert!(GameStatus::Draw.is_terminal());
    }

    #[test]
    fn test_winner() {
        assert_eq!(GameStatus::BlackWins.winner(), Some(PlayerIdentity::Black));
        assert_eq!(GameStatus::WhiteWins.winner(), Some(PlayerIdentity::White));
        assert_eq!(GameStatus::Draw.winner(), None);
    }

    #[test]
    fn test_wire_names_match_display() {
        for status in [
            GameStatus::InProgress,
            GameStatus::BlackWins,
            GameStatus::WhiteWins,
            GameStatus::Draw,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }
}
