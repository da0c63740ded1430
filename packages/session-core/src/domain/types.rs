//! Core session types: Player, ChallengeKind

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::domain::DomainError;

/// One of the two racers. Serialized as its numeric id (1 or 2).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    /// Numeric id as shown to players (1 or 2).
    #[inline]
    pub const fn id(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    /// Zero-based slot for per-player arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    #[inline]
    pub const fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = DomainError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            other => Err(DomainError::validation_other(format!(
                "player id must be 1 or 2, got {other}"
            ))),
        }
    }
}

impl From<Player> for u8 {
    fn from(p: Player) -> Self {
        p.id()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.id())
    }
}

/// The closed set of mini-challenges a round can be played with.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    /// Color/word matching.
    Stroop,
    /// Spatial grid memory.
    SpeedGrid,
    /// True/false arithmetic.
    Equation,
    /// Press on go, hold off on no-go.
    GoNoGo,
}

impl ChallengeKind {
    /// Canonical order; also the order of quota tables and tutorial missions.
    pub const ALL: [ChallengeKind; 4] = [
        ChallengeKind::Stroop,
        ChallengeKind::SpeedGrid,
        ChallengeKind::Equation,
        ChallengeKind::GoNoGo,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            ChallengeKind::Stroop => 0,
            ChallengeKind::SpeedGrid => 1,
            ChallengeKind::Equation => 2,
            ChallengeKind::GoNoGo => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ChallengeKind::Stroop => "Stroop",
            ChallengeKind::SpeedGrid => "Speed Grid",
            ChallengeKind::Equation => "Equation",
            ChallengeKind::GoNoGo => "Go/No-Go",
        }
    }
}

impl fmt::Display for ChallengeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
