//! Main-session turn order: who plays each round.
//!
//! Orders are produced by rejection sampling over uniformly shuffled
//! permutations of a balanced multiset. Sampling is bounded; when no valid
//! permutation turns up within `max_shuffle_attempts`, the strictly
//! alternating order is used, which satisfies every streak limit >= 1.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::schedule::ScheduleConfig;
use crate::domain::rules::TUTORIAL_TURN_ORDER;
use crate::domain::types::Player;
use crate::errors::domain::{DomainError, ValidationKind};

/// Round-indexed sequence of acting players. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TurnOrder(Vec<Player>);

impl TurnOrder {
    /// Accept a caller-built order after checking balance and streak length.
    pub fn validated(players: Vec<Player>, max_same_in_row: u8) -> Result<Self, DomainError> {
        let ones = players.iter().filter(|&&p| p == Player::One).count();
        if players.len() % 2 != 0 || ones * 2 != players.len() {
            return Err(DomainError::validation(
                ValidationKind::UnbalancedTurnOrder,
                format!(
                    "turn order of {} rounds has {ones} rounds for player 1",
                    players.len()
                ),
            ));
        }
        if !is_valid_turn_order(&players, max_same_in_row) {
            return Err(DomainError::validation(
                ValidationKind::InvalidStreakLimit,
                format!(
                    "turn order has a run of {} (limit {max_same_in_row})",
                    longest_streak(&players)
                ),
            ));
        }
        Ok(Self(players))
    }

    /// 1, 2, 1, 2, ... for `rounds` rounds.
    pub fn alternating(rounds: u8) -> Self {
        Self(
            (0..rounds)
                .map(|i| if i % 2 == 0 { Player::One } else { Player::Two })
                .collect(),
        )
    }

    /// The fixed tutorial order.
    pub fn tutorial() -> Self {
        Self(TUTORIAL_TURN_ORDER.to_vec())
    }

    #[inline]
    pub fn as_slice(&self) -> &[Player] {
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

    /// Acting player for a 1-based round number.
    #[inline]
    pub fn player_for_round(&self, round_no: u8) -> Option<Player> {
        let idx = (round_no as usize).checked_sub(1)?;
        self.0.get(idx).copied()
    }

    pub fn rounds_for(&self, player: Player) -> usize {
        self.0.iter().filter(|&&p| p == player).count()
    }
}

/// Length of the longest run of identical consecutive players.
pub fn longest_streak(sequence: &[Player]) -> usize {
    let mut longest = 0usize;
    let mut current = 0usize;
    let mut streak_player: Option<Player> = None;

    for &p in sequence {
        if streak_player == Some(p) {
            current += 1;
        } else {
            streak_player = Some(p);
            current = 1;
        }
        longest = longest.max(current);
    }
    longest
}

/// Streak check used to accept or reject a shuffled order.
pub fn is_valid_turn_order(sequence: &[Player], max_same_in_row: u8) -> bool {
    longest_streak(sequence) <= max_same_in_row as usize
}

/// In-place Fisher-Yates shuffle.
fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Sample a valid order, returning it with the 1-based attempt that produced it.
fn sample_turn_order<R: Rng>(config: &ScheduleConfig, rng: &mut R) -> Option<(TurnOrder, u32)> {
    let per_player = config.rounds_per_player() as usize;
    let mut base = vec![Player::One; per_player];
    base.extend(vec![Player::Two; per_player]);

    for attempt in 1..=config.max_shuffle_attempts {
        let mut candidate = base.clone();
        shuffle(&mut candidate, rng);
        if is_valid_turn_order(&candidate, config.max_same_in_row) {
            return Some((TurnOrder(candidate), attempt));
        }
    }
    None
}

/// Generate a balanced turn order with no run longer than `max_same_in_row`.
///
/// Always returns a valid order for a validated config.
pub fn generate_turn_order<R: Rng>(config: &ScheduleConfig, rng: &mut R) -> TurnOrder {
    match sample_turn_order(config, rng) {
        Some((order, attempts)) => {
            debug!(attempts, rounds = order.len(), "turn order accepted");
            order
        }
        None => {
            warn!(
                attempts = config.max_shuffle_attempts,
                "no valid shuffled turn order found; using alternating order"
            );
            TurnOrder::alternating(config.rounds)
        }
    }
}
