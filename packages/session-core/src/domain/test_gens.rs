// Proptest generators for session domain types.

use proptest::prelude::*;

use crate::config::schedule::{QuotaTable, ScheduleConfig};
use crate::domain::session::RoundOutcome;
use crate::domain::turn_order::TurnOrder;
use crate::domain::types::Player;

pub fn seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}

pub fn player() -> impl Strategy<Value = Player> {
    prop_oneof![Just(Player::One), Just(Player::Two)]
}

/// Quota table whose entries sum to `per_player`, built by scattering
/// `per_player` units across the four kinds.
pub fn quota_table(per_player: u8) -> impl Strategy<Value = QuotaTable> {
    prop::collection::vec(0usize..4, per_player as usize).prop_map(|slots| {
        let mut quotas = [0u8; 4];
        for slot in slots {
            quotas[slot] += 1;
        }
        QuotaTable(quotas)
    })
}

/// Valid config: even round count, streak limit >= 1, matching quotas.
pub fn schedule_config() -> impl Strategy<Value = ScheduleConfig> {
    (1u8..=12, 1u8..=4)
        .prop_flat_map(|(per_player, streak)| {
            (Just(per_player), Just(streak), quota_table(per_player))
        })
        .prop_map(|(per_player, max_same_in_row, quotas)| ScheduleConfig {
            rounds: per_player * 2,
            max_same_in_row,
            max_shuffle_attempts: 2_000,
            quotas,
        })
}

/// Caller-built balanced order plus a quota table of the same size.
///
/// The order goes through `TurnOrder::validated`, so it covers shapes the
/// shuffling generator rarely lands on (long forced runs at the tail, orders
/// that open with the second player).
pub fn balanced_turn_order() -> impl Strategy<Value = (TurnOrder, QuotaTable)> {
    (1u8..=12, 1u8..=4)
        .prop_flat_map(|(per_player, max_same_in_row)| {
            (
                Just(per_player),
                Just(max_same_in_row),
                prop::collection::vec(any::<bool>(), per_player as usize * 2),
                quota_table(per_player),
            )
        })
        .prop_map(|(per_player, max_same_in_row, bits, quotas)| {
            let players = balanced_players(per_player, max_same_in_row, &bits);
            let order = TurnOrder::validated(players, max_same_in_row)
                .expect("every pick leaves a completable order");
            (order, quotas)
        })
}

/// Pick players one round at a time, taking the player `bits` prefers when
/// the rest of the order can still be finished within the streak limit.
fn balanced_players(per_player: u8, max_same_in_row: u8, bits: &[bool]) -> Vec<Player> {
    let max = usize::from(max_same_in_row);
    let mut remaining = [usize::from(per_player); 2];
    let mut players: Vec<Player> = Vec::with_capacity(bits.len());
    let mut streak = 0usize;

    for &bit in bits {
        let run_if = |p: Player| {
            if players.last() == Some(&p) {
                streak + 1
            } else {
                1
            }
        };
        let fits = |p: Player| {
            let (mine, theirs) = (remaining[p.index()], remaining[p.other().index()]);
            if mine == 0 {
                return false;
            }
            let run = run_if(p);
            let left = mine - 1;
            run <= max && left <= (max - run) + max * theirs && theirs <= max * (left + 1)
        };

        let preferred = if bit { Player::One } else { Player::Two };
        let Some(pick) = [preferred, preferred.other()].into_iter().find(|&p| fits(p)) else {
            break;
        };
        streak = run_if(pick);
        remaining[pick.index()] -= 1;
        players.push(pick);
    }
    players
}

/// Realistic round outcome: elapsed 150ms..5s, penalty 0..3s in half-second steps.
pub fn round_outcome() -> impl Strategy<Value = RoundOutcome> {
    (150.0f64..5_000.0, 0u8..=6)
        .prop_map(|(elapsed_ms, halves)| RoundOutcome::new(elapsed_ms, f64::from(halves) * 0.5))
}

/// (player, base_time, penalty) triples for direct ledger tests.
pub fn ledger_records(max: usize) -> impl Strategy<Value = Vec<(Player, f64, f64)>> {
    prop::collection::vec((player(), 0.0f64..10.0, 0.0f64..5.0), 0..=max)
}
