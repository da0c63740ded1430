use serde::{Deserialize, Serialize};

use crate::domain::rules::PLAYERS;
use crate::domain::types::Player;

/// One completed main-session round. Times are seconds; lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub round_number: u8,
    pub player: Player,
    pub base_time: f64,
    pub penalty: f64,
    pub total_time: f64,
}

/// Append-only log of completed rounds with running per-player totals.
///
/// Phase gating (tutorial, game over) is the session machine's job; the
/// ledger records whatever it is handed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreLedger {
    entries: Vec<ScoreEntry>,
    totals: [f64; PLAYERS],
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and add `base_time + penalty` to the player's total.
    pub fn record(
        &mut self,
        player: Player,
        round_number: u8,
        base_time: f64,
        penalty: f64,
    ) -> ScoreEntry {
        let entry = ScoreEntry {
            round_number,
            player,
            base_time,
            penalty,
            total_time: base_time + penalty,
        };
        self.totals[player.index()] += entry.total_time;
        self.entries.push(entry);
        entry
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.totals = [0.0; PLAYERS];
    }

    #[inline]
    pub fn total_for(&self, player: Player) -> f64 {
        self.totals[player.index()]
    }

    #[inline]
    pub fn totals(&self) -> [f64; PLAYERS] {
        self.totals
    }

    pub fn grand_total(&self) -> f64 {
        self.totals.iter().sum()
    }

    #[inline]
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn entries_for(&self, player: Player) -> impl Iterator<Item = &ScoreEntry> + '_ {
        self.entries.iter().filter(move |e| e.player == player)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
