//! Guided four-mission walkthrough that precedes the scored session.
//!
//! Each mission teaches one challenge to one player:
//! `Preview -> Sandbox(Trying) -> Sandbox(Complete)`, then either retry the
//! sandbox or advance. Advancing past the last mission completes the
//! tutorial. Nothing here touches scores.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::rules::TUTORIAL_MISSIONS;
use crate::domain::types::{ChallengeKind, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SandboxPhase {
    Trying,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "sandbox", rename_all = "snake_case")]
pub enum TutorialStep {
    /// Explainer for the mission's challenge.
    Preview,
    /// Interactive try of the challenge.
    Sandbox(SandboxPhase),
}

/// Result of advancing from a completed sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialProgress {
    /// Moved on to this 1-based mission's preview.
    NextMission(u8),
    /// The last mission was done; the tutorial is over.
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorialMachine {
    mission: u8,
    step: TutorialStep,
    /// Bumped on every retry so the presentation layer can remount the challenge.
    retry_count: u32,
    completed: bool,
}

impl Default for TutorialMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TutorialMachine {
    pub fn new() -> Self {
        Self {
            mission: 1,
            step: TutorialStep::Preview,
            retry_count: 0,
            completed: false,
        }
    }

    #[inline]
    pub fn mission(&self) -> u8 {
        self.mission
    }

    #[inline]
    pub fn step(&self) -> TutorialStep {
        self.step
    }

    #[inline]
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn is_last_mission(&self) -> bool {
        self.mission == TUTORIAL_MISSIONS
    }

    /// Challenge taught by the current mission.
    pub fn challenge(&self) -> ChallengeKind {
        // mission stays within 1..=TUTORIAL_MISSIONS
        ChallengeKind::ALL[(self.mission - 1) as usize]
    }

    /// Player who tries the current mission: odd missions go to player 1.
    pub fn player(&self) -> Player {
        if self.mission % 2 == 1 {
            Player::One
        } else {
            Player::Two
        }
    }

    /// Stable identity of the current sandbox attempt.
    pub fn sandbox_key(&self) -> (u8, u32) {
        (self.mission, self.retry_count)
    }

    /// Preview -> Sandbox(Trying).
    pub fn try_it(&mut self) -> bool {
        if self.completed || self.step != TutorialStep::Preview {
            return false;
        }
        self.step = TutorialStep::Sandbox(SandboxPhase::Trying);
        true
    }

    /// The sandbox challenge reported completion: Trying -> Complete.
    pub fn sandbox_finished(&mut self) -> bool {
        if self.completed || self.step != TutorialStep::Sandbox(SandboxPhase::Trying) {
            return false;
        }
        self.step = TutorialStep::Sandbox(SandboxPhase::Complete);
        true
    }

    /// Complete -> Trying on the same mission.
    pub fn retry(&mut self) -> bool {
        if self.completed || self.step != TutorialStep::Sandbox(SandboxPhase::Complete) {
            return false;
        }
        self.step = TutorialStep::Sandbox(SandboxPhase::Trying);
        self.retry_count += 1;
        debug!(mission = self.mission, retry = self.retry_count, "tutorial retry");
        true
    }

    /// Complete -> next mission's Preview, or tutorial completion after the last.
    pub fn advance(&mut self) -> Option<TutorialProgress> {
        if self.completed || self.step != TutorialStep::Sandbox(SandboxPhase::Complete) {
            return None;
        }
        if self.is_last_mission() {
            self.completed = true;
            return Some(TutorialProgress::Completed);
        }
        self.mission += 1;
        self.step = TutorialStep::Preview;
        self.retry_count = 0;
        Some(TutorialProgress::NextMission(self.mission))
    }

    /// Jump to a mission's preview when the scripted tutorial rounds move on.
    pub(crate) fn enter_mission(&mut self, mission: u8) -> bool {
        if self.completed
            || mission == self.mission
            || !(1..=TUTORIAL_MISSIONS).contains(&mission)
        {
            return false;
        }
        self.mission = mission;
        self.step = TutorialStep::Preview;
        self.retry_count = 0;
        true
    }

    /// Available from any state.
    pub fn skip(&mut self) {
        self.completed = true;
    }
}
