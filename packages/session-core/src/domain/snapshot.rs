//! Read-only, serializable views handed to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::domain::rules::{PLAYERS, TUTORIAL_MISSIONS};
use crate::domain::schedule::ScheduledRound;
use crate::domain::scoring::ScoreEntry;
use crate::domain::state::SessionPhase;
use crate::domain::tutorial::{TutorialMachine, TutorialStep};
use crate::domain::types::{ChallengeKind, Player};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorialSnapshot {
    pub mission: u8,
    pub missions: u8,
    pub step: TutorialStep,
    pub retry_count: u32,
    pub challenge: ChallengeKind,
    pub player: Player,
    pub tutorial_round: u8,
}

impl TutorialSnapshot {
    /// Mission progress from `machine`; player and challenge from the active
    /// tutorial round so they match the session's current turn.
    pub fn new(machine: &TutorialMachine, round: ScheduledRound) -> Self {
        Self {
            mission: machine.mission(),
            missions: TUTORIAL_MISSIONS,
            step: machine.step(),
            retry_count: machine.retry_count(),
            challenge: round.challenge,
            player: round.player,
            tutorial_round: round.round_no,
        }
    }
}

/// Everything a screen needs to render the session at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    /// Display names (entered name or "Player N").
    pub names: [String; PLAYERS],
    pub round_number: u8,
    pub schedule_len: u8,
    pub rounds_completed: usize,
    pub current_turn: Option<Player>,
    pub current_challenge: Option<ChallengeKind>,
    pub is_game_over: bool,
    pub totals: [f64; PLAYERS],
    pub entries: Vec<ScoreEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutorial: Option<TutorialSnapshot>,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
