//! Metrics collection and output for simulated sessions.

use serde::Serialize;
use session_core::domain::results::ChallengeBreakdown;
use session_core::{ChallengeKind, ScheduleConfig};

use crate::simulator::SessionRun;

/// Complete session metrics for output.
#[derive(Debug, Clone, Serialize)]
pub struct SessionMetrics {
    pub session_id: u32,
    pub schedule_seed: u64,
    pub outcome_seed: u64,
    pub timestamp: String,
    pub config: ScheduleConfig,
    pub result: SessionResultMetrics,
    pub rounds: Vec<RoundMetrics>,
    pub breakdown: Vec<ChallengeBreakdown>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResultMetrics {
    pub totals: [f64; 2],
    /// 1 or 2; absent on a tie.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<u8>,
    pub rounds_completed: usize,
    pub ended_early: bool,
    pub tutorial_retries: u32,
    pub turns_started: u32,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundMetrics {
    pub round_no: u8,
    pub player: u8,
    pub challenge: ChallengeKind,
    pub base_time: f64,
    pub penalty: f64,
    pub total_time: f64,
}

/// Build metrics from a finished run.
pub fn build_session_metrics(
    session_id: u32,
    config: &ScheduleConfig,
    run: &SessionRun,
    duration_ms: f64,
) -> SessionMetrics {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));

    let rounds = run
        .entries
        .iter()
        .filter_map(|entry| {
            let round = run.schedule.round(entry.round_number)?;
            Some(RoundMetrics {
                round_no: entry.round_number,
                player: entry.player.id(),
                challenge: round.challenge,
                base_time: entry.base_time,
                penalty: entry.penalty,
                total_time: entry.total_time,
            })
        })
        .collect();

    SessionMetrics {
        session_id,
        schedule_seed: run.schedule_seed,
        outcome_seed: run.outcome_seed,
        timestamp,
        config: config.clone(),
        result: SessionResultMetrics {
            totals: run.results.totals,
            winner: run.results.winner.map(|p| p.id()),
            rounds_completed: run.rounds_completed(),
            ended_early: run.ended_early,
            tutorial_retries: run.tutorial_retries,
            turns_started: run.turns_started,
            duration_ms,
        },
        rounds,
        breakdown: run.results.breakdown.clone(),
    }
}

/// CSV summary row for quick analysis.
#[derive(Debug, Serialize)]
pub struct CsvSummaryRow {
    pub session_id: u32,
    pub schedule_seed: u64,
    /// 0 on a tie.
    pub winner: u8,
    pub player1_total: f64,
    pub player2_total: f64,
    pub rounds_completed: usize,
    pub ended_early: bool,
}

impl From<&SessionMetrics> for CsvSummaryRow {
    fn from(metrics: &SessionMetrics) -> Self {
        CsvSummaryRow {
            session_id: metrics.session_id,
            schedule_seed: metrics.schedule_seed,
            winner: metrics.result.winner.unwrap_or(0),
            player1_total: metrics.result.totals[0],
            player2_total: metrics.result.totals[1],
            rounds_completed: metrics.result.rounds_completed,
            ended_early: metrics.result.ended_early,
        }
    }
}
