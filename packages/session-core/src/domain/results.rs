//! End-of-session standings: winner and per-challenge comparison.

use serde::{Deserialize, Serialize};

use crate::domain::challenge_assignment::ChallengeAssignment;
use crate::domain::rules::PLAYERS;
use crate::domain::scoring::ScoreEntry;
use crate::domain::types::{ChallengeKind, Player};

/// How the two players compared on one challenge kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChallengeBreakdown {
    pub challenge: ChallengeKind,
    /// Summed total time per player, seconds.
    pub times: [f64; PLAYERS],
    /// Rounds recorded per player.
    pub rounds: [u8; PLAYERS],
    /// Lower summed time; `None` on a tie or with no data.
    pub faster: Option<Player>,
    /// How much faster the faster player was, as a percentage of the slower time.
    pub percent_faster: Option<f64>,
}

impl ChallengeBreakdown {
    pub fn has_data(&self) -> bool {
        self.rounds.iter().any(|&n| n > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResults {
    pub totals: [f64; PLAYERS],
    /// Lower total time wins; `None` on an exact tie.
    pub winner: Option<Player>,
    pub breakdown: Vec<ChallengeBreakdown>,
}

impl SessionResults {
    /// Tally one session's entries, mapping each entry's round to its
    /// scheduled challenge. Totals cover only `entries`.
    pub fn from_entries(entries: &[ScoreEntry], challenges: &ChallengeAssignment) -> Self {
        let mut totals = [0f64; PLAYERS];
        let mut times = [[0f64; PLAYERS]; 4];
        let mut rounds = [[0u8; PLAYERS]; 4];

        for entry in entries {
            totals[entry.player.index()] += entry.total_time;
            let Some(kind) = challenges.challenge_for_round(entry.round_number) else {
                continue;
            };
            times[kind.index()][entry.player.index()] += entry.total_time;
            rounds[kind.index()][entry.player.index()] += 1;
        }

        let breakdown = ChallengeKind::ALL
            .into_iter()
            .map(|challenge| {
                let t = times[challenge.index()];
                let n = rounds[challenge.index()];
                let (faster, percent_faster) = if n.iter().all(|&c| c == 0) {
                    (None, None)
                } else {
                    compare(t)
                };
                ChallengeBreakdown {
                    challenge,
                    times: t,
                    rounds: n,
                    faster,
                    percent_faster,
                }
            })
            .collect();

        Self {
            totals,
            winner: lower_time(totals),
            breakdown,
        }
    }

    #[inline]
    pub fn is_tie(&self) -> bool {
        self.winner.is_none()
    }

    pub fn for_challenge(&self, challenge: ChallengeKind) -> Option<&ChallengeBreakdown> {
        self.breakdown.iter().find(|b| b.challenge == challenge)
    }
}

fn lower_time(times: [f64; PLAYERS]) -> Option<Player> {
    let [one, two] = times;
    if one < two {
        Some(Player::One)
    } else if two < one {
        Some(Player::Two)
    } else {
        None
    }
}

fn compare(times: [f64; PLAYERS]) -> (Option<Player>, Option<f64>) {
    let Some(faster) = lower_time(times) else {
        return (None, None);
    };
    let fast = times[faster.index()];
    let slow = times[faster.other().index()];
    let pct = if slow > 0.0 {
        (slow - fast) / slow * 100.0
    } else {
        0.0
    };
    (Some(faster), Some(pct))
}
