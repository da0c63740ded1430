use serde::{Deserialize, Serialize};

use crate::domain::scoring::{ScoreEntry, ScoreLedger};
use crate::domain::types::Player;

/// Overall session progression.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Names may be entered; nothing scheduled yet.
    NotStarted,
    /// Guided walkthrough running; scores are never recorded.
    Tutorial,
    /// Tutorial finished or skipped; waiting for the main session.
    TutorialComplete,
    /// Scored rounds being played.
    MainInProgress,
    /// All rounds played or ended early.
    MainOver,
}

impl SessionPhase {
    #[inline]
    pub fn is_main(self) -> bool {
        matches!(self, SessionPhase::MainInProgress | SessionPhase::MainOver)
    }

    #[inline]
    pub fn is_pre_main(self) -> bool {
        matches!(
            self,
            SessionPhase::NotStarted | SessionPhase::Tutorial | SessionPhase::TutorialComplete
        )
    }
}

/// Display names; owned by the caller's flow, kept beside the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerNames {
    names: [String; 2],
}

impl PlayerNames {
    pub fn set(&mut self, player: Player, name: impl Into<String>) {
        self.names[player.index()] = name.into().trim().to_string();
    }

    /// Raw entered name (may be empty).
    pub fn get(&self, player: Player) -> &str {
        &self.names[player.index()]
    }

    /// Entered name, or "Player N" when none was given.
    pub fn display_name(&self, player: Player) -> String {
        let name = self.get(player);
        if name.is_empty() {
            player.to_string()
        } else {
            name.to_string()
        }
    }

    pub fn clear(&mut self) {
        self.names = Default::default();
    }
}

/// Mutable session container; owned and mutated only by `Session`.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// Player whose round is active.
    /// - Some(player) from main-session start on, kept on the last round once over
    /// - None before the main session
    pub current_turn: Option<Player>,
    /// 1-based main-session round; never exceeds the schedule length.
    pub round_number: u8,
    /// 1-based round within the fixed tutorial sequence.
    pub tutorial_round: u8,
    pub ledger: ScoreLedger,
    /// Ledger length when the current main session started; entries from
    /// here on belong to it.
    pub session_start: usize,
    pub names: PlayerNames,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::NotStarted,
            current_turn: None,
            round_number: 1,
            tutorial_round: 1,
            ledger: ScoreLedger::new(),
            session_start: 0,
            names: PlayerNames::default(),
        }
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::MainOver
    }

    /// Entries recorded since the current main session started.
    pub fn session_entries(&self) -> &[ScoreEntry] {
        self.ledger
            .entries()
            .get(self.session_start..)
            .unwrap_or_default()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
