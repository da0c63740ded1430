//! Property tests for the session state machine.
//!
//! Properties tested:
//! - A full session records exactly one entry per scheduled round, in order
//! - Totals equal the sum of entries and only scheduled players score
//! - Ending early at any round keeps exactly the rounds already played
//! - Arbitrary reports after game over never change the ledger

use proptest::prelude::*;

use crate::config::schedule::ScheduleConfig;
use crate::domain::session::{RoundOutcome, Session};
use crate::domain::state::SessionPhase;
use crate::domain::types::Player;
use crate::domain::{test_gens, test_prelude};

fn started(config: ScheduleConfig, seed: u64) -> Session {
    let mut s = Session::seeded(config, seed).unwrap();
    s.skip_tutorial();
    s.start_main_session().unwrap();
    s
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: one entry per round, for the scheduled player
    #[test]
    fn prop_full_session_follows_schedule(
        config in test_gens::schedule_config(),
        seed in test_gens::seed(),
        outcomes in prop::collection::vec(test_gens::round_outcome(), 24),
    ) {
        let rounds = config.rounds;
        let mut s = started(config, seed);
        let schedule = s.schedule().unwrap().clone();

        for outcome in outcomes.iter().take(rounds as usize) {
            prop_assert!(!s.is_game_over());
            prop_assert!(!s.on_round_complete(*outcome).is_ignored());
        }

        prop_assert!(s.is_game_over());
        prop_assert_eq!(s.entries().len(), rounds as usize);
        prop_assert_eq!(s.round_number(), rounds);
        for (i, entry) in s.entries().iter().enumerate() {
            let round = i as u8 + 1;
            prop_assert_eq!(entry.round_number, round);
            prop_assert_eq!(Some(entry.player), schedule.turn_order().player_for_round(round));
        }
        for player in Player::ALL {
            let summed: f64 = s.ledger().entries_for(player).map(|e| e.total_time).sum();
            prop_assert!((s.total_for(player) - summed).abs() < 1e-9);
        }
    }

    /// Property: ending early keeps exactly the completed rounds
    #[test]
    fn prop_end_early_keeps_completed_rounds(
        seed in test_gens::seed(),
        played in 0usize..20,
        outcome in test_gens::round_outcome(),
    ) {
        let mut s = started(ScheduleConfig::default(), seed);
        for _ in 0..played {
            s.on_round_complete(outcome);
        }
        let totals = s.ledger().totals();

        prop_assert!(s.end_early());
        prop_assert_eq!(s.phase(), SessionPhase::MainOver);
        prop_assert_eq!(s.entries().len(), played);
        prop_assert_eq!(s.round_number() as usize, played + 1);
        prop_assert_eq!(s.ledger().totals(), totals);
    }

    /// Property: nothing after game over reaches the ledger
    #[test]
    fn prop_reports_after_game_over_are_no_ops(
        seed in test_gens::seed(),
        late in prop::collection::vec((test_gens::player(), 0.0f64..10.0, 0.0f64..5.0), 1..10),
    ) {
        let mut s = started(ScheduleConfig::default(), seed);
        while !s.is_game_over() {
            s.on_round_complete(RoundOutcome::new(900.0, 0.5));
        }
        let entries = s.entries().to_vec();
        let totals = s.ledger().totals();

        for (player, base, penalty) in late {
            prop_assert!(s.complete_round(player, base, penalty).is_ignored());
        }
        prop_assert_eq!(s.entries(), entries.as_slice());
        prop_assert_eq!(s.ledger().totals(), totals);
        prop_assert_eq!(s.round_number(), 20);
    }

    /// Property: out-of-turn reports never record or advance
    #[test]
    fn prop_out_of_turn_never_advances(
        seed in test_gens::seed(),
        played in 0usize..19,
    ) {
        let mut s = started(ScheduleConfig::default(), seed);
        for _ in 0..played {
            s.on_round_complete(RoundOutcome::new(500.0, 0.0));
        }
        let up = s.current_turn().unwrap();
        let round = s.round_number();

        prop_assert!(s.complete_round(up.other(), 1.0, 0.0).is_ignored());
        prop_assert_eq!(s.round_number(), round);
        prop_assert_eq!(s.current_turn(), Some(up));
        prop_assert_eq!(s.entries().len(), played);
    }
}
