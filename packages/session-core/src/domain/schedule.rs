//! A session's full round plan: turn order plus challenge assignment.

use rand::Rng;
use serde::Serialize;

use crate::config::schedule::ScheduleConfig;
use crate::domain::challenge_assignment::{assign_challenges, ChallengeAssignment};
use crate::domain::turn_order::{generate_turn_order, TurnOrder};
use crate::domain::types::{ChallengeKind, Player};
use crate::errors::domain::DomainError;

/// One scheduled round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduledRound {
    pub round_no: u8,
    pub player: Player,
    pub challenge: ChallengeKind,
}

/// Immutable plan covering every round; replaced wholesale per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    turn_order: TurnOrder,
    challenges: ChallengeAssignment,
}

impl Schedule {
    /// Roll a fresh main-session schedule.
    pub fn generate<R: Rng>(config: &ScheduleConfig, rng: &mut R) -> Result<Self, DomainError> {
        config.validate()?;
        let turn_order = generate_turn_order(config, rng);
        let challenges = assign_challenges(&turn_order, &config.quotas, rng)?;
        Ok(Self {
            turn_order,
            challenges,
        })
    }

    /// The fixed, non-random tutorial schedule.
    pub fn tutorial() -> Self {
        Self {
            turn_order: TurnOrder::tutorial(),
            challenges: ChallengeAssignment::tutorial(),
        }
    }

    #[inline]
    pub fn turn_order(&self) -> &TurnOrder {
        &self.turn_order
    }

    #[inline]
    pub fn challenges(&self) -> &ChallengeAssignment {
        &self.challenges
    }

    /// Number of rounds; the two halves always have equal length.
    #[inline]
    pub fn len(&self) -> u8 {
        self.turn_order.len() as u8
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turn_order.is_empty()
    }

    pub fn round(&self, round_no: u8) -> Option<ScheduledRound> {
        Some(ScheduledRound {
            round_no,
            player: self.turn_order.player_for_round(round_no)?,
            challenge: self.challenges.challenge_for_round(round_no)?,
        })
    }

    pub fn rounds(&self) -> impl Iterator<Item = ScheduledRound> + '_ {
        (1..=self.len()).filter_map(|n| self.round(n))
    }
}
