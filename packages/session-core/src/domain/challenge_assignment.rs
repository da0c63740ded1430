//! Round-by-round challenge assignment.
//!
//! Greedy randomized construction over the turn order: each round draws
//! uniformly from the acting player's remaining quota, skipping the previous
//! round's challenge whenever another candidate exists. No backtracking.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::config::schedule::QuotaTable;
use crate::domain::rules::{PLAYERS, TUTORIAL_CHALLENGES};
use crate::domain::turn_order::TurnOrder;
use crate::domain::types::{ChallengeKind, Player};
use crate::errors::domain::{DomainError, ValidationKind};

/// Round-indexed challenge kinds, in lockstep with a `TurnOrder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChallengeAssignment(Vec<ChallengeKind>);

impl ChallengeAssignment {
    /// The fixed tutorial sequence (each challenge once per player).
    pub fn tutorial() -> Self {
        Self(TUTORIAL_CHALLENGES.to_vec())
    }

    #[inline]
    pub fn as_slice(&self) -> &[ChallengeKind] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Challenge for a 1-based round number.
    #[inline]
    pub fn challenge_for_round(&self, round_no: u8) -> Option<ChallengeKind> {
        let idx = (round_no as usize).checked_sub(1)?;
        self.0.get(idx).copied()
    }

    /// Per-kind round counts for one player, in `ChallengeKind::ALL` order.
    pub fn counts_for(&self, turn_order: &TurnOrder, player: Player) -> [u8; 4] {
        let mut counts = [0u8; 4];
        for (&p, &kind) in turn_order.as_slice().iter().zip(&self.0) {
            if p == player {
                counts[kind.index()] += 1;
            }
        }
        counts
    }
}

/// Kinds a player still owes rounds of.
pub fn remaining_quota(counts: &[u8; 4], quotas: &QuotaTable) -> Vec<ChallengeKind> {
    ChallengeKind::ALL
        .into_iter()
        .filter(|&kind| counts[kind.index()] < quotas.get(kind))
        .collect()
}

/// Candidate kinds for the next round.
///
/// The previous round's kind is dropped unless it is the only one left, in
/// which case the repeat is unavoidable and allowed.
pub fn candidates_for(
    counts: &[u8; 4],
    quotas: &QuotaTable,
    previous: Option<ChallengeKind>,
) -> Vec<ChallengeKind> {
    let remaining = remaining_quota(counts, quotas);
    let without_previous: Vec<ChallengeKind> = remaining
        .iter()
        .copied()
        .filter(|&kind| Some(kind) != previous)
        .collect();

    if without_previous.is_empty() {
        remaining
    } else {
        without_previous
    }
}

/// Assign a challenge to every round of `turn_order`.
///
/// Never fails for a balanced turn order and a quota table summing to the
/// per-player round count; `QuotaExhausted` signals inconsistent input.
pub fn assign_challenges<R: Rng>(
    turn_order: &TurnOrder,
    quotas: &QuotaTable,
    rng: &mut R,
) -> Result<ChallengeAssignment, DomainError> {
    let mut counts = [[0u8; 4]; PLAYERS];
    let mut assigned: Vec<ChallengeKind> = Vec::with_capacity(turn_order.len());

    for (idx, &player) in turn_order.as_slice().iter().enumerate() {
        let player_counts = &mut counts[player.index()];
        let candidates = candidates_for(player_counts, quotas, assigned.last().copied());

        let Some(&chosen) = candidates.choose(rng) else {
            return Err(DomainError::validation(
                ValidationKind::QuotaExhausted,
                format!("{player} has no challenge quota left at round {}", idx + 1),
            ));
        };

        player_counts[chosen.index()] += 1;
        assigned.push(chosen);
    }

    debug!(rounds = assigned.len(), "challenge assignment complete");
    Ok(ChallengeAssignment(assigned))
}
