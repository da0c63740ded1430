use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::domain::rules::{
    MAX_ROUNDS, MAX_SAME_IN_ROW, MAX_TURN_ORDER_ATTEMPTS, PER_PLAYER_QUOTAS,
};
use crate::domain::types::ChallengeKind;
use crate::errors::domain::{DomainError, ValidationKind};

/// Per-player round count for each challenge kind, in `ChallengeKind::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaTable(pub [u8; 4]);

impl QuotaTable {
    #[inline]
    pub fn get(&self, kind: ChallengeKind) -> u8 {
        self.0[kind.index()]
    }

    pub fn sum(&self) -> u16 {
        self.0.iter().map(|&q| q as u16).sum()
    }
}

impl Default for QuotaTable {
    fn default() -> Self {
        Self(PER_PLAYER_QUOTAS)
    }
}

impl FromStr for QuotaTable {
    type Err = ConfigError;

    /// Parses `"stroop,speedgrid,equation,gonogo"` counts, e.g. `"2,3,3,2"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != ChallengeKind::ALL.len() {
            return Err(ConfigError::env(format!(
                "quota table needs {} comma-separated counts, got '{s}'",
                ChallengeKind::ALL.len()
            )));
        }
        let mut quotas = [0u8; 4];
        for (slot, part) in quotas.iter_mut().zip(parts) {
            *slot = part
                .parse()
                .map_err(|_| ConfigError::env(format!("invalid quota count '{part}'")))?;
        }
        Ok(Self(quotas))
    }
}

/// Knobs for main-session schedule generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Total rounds in a main session; split evenly between the players.
    pub rounds: u8,
    /// Longest allowed run of consecutive rounds for the same player.
    pub max_same_in_row: u8,
    /// Shuffle attempts before falling back to strict alternation.
    pub max_shuffle_attempts: u32,
    pub quotas: QuotaTable,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            rounds: MAX_ROUNDS,
            max_same_in_row: MAX_SAME_IN_ROW,
            max_shuffle_attempts: MAX_TURN_ORDER_ATTEMPTS,
            quotas: QuotaTable::default(),
        }
    }
}

impl ScheduleConfig {
    #[inline]
    pub fn rounds_per_player(&self) -> u8 {
        self.rounds / 2
    }

    /// Check that the generators can always produce a total schedule.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.rounds == 0 || self.rounds % 2 != 0 {
            return Err(DomainError::validation(
                ValidationKind::InvalidRoundCount,
                format!("rounds must be a positive even number, got {}", self.rounds),
            ));
        }
        if self.max_same_in_row == 0 {
            return Err(DomainError::validation(
                ValidationKind::InvalidStreakLimit,
                "max_same_in_row must be at least 1",
            ));
        }
        if self.max_shuffle_attempts == 0 {
            return Err(DomainError::validation(
                ValidationKind::InvalidAttemptLimit,
                "max_shuffle_attempts must be at least 1",
            ));
        }
        let per_player = self.rounds_per_player() as u16;
        if self.quotas.sum() != per_player {
            return Err(DomainError::validation(
                ValidationKind::QuotaMismatch,
                format!(
                    "quota table sums to {} but each player plays {per_player} rounds",
                    self.quotas.sum()
                ),
            ));
        }
        Ok(())
    }

    /// Build from `NEURORACE_*` environment variables, defaulting each knob.
    ///
    /// - `NEURORACE_ROUNDS`
    /// - `NEURORACE_MAX_SAME_IN_ROW`
    /// - `NEURORACE_MAX_SHUFFLE_ATTEMPTS`
    /// - `NEURORACE_QUOTAS` (e.g. `2,3,3,2`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            rounds: parse_var("NEURORACE_ROUNDS")?.unwrap_or(defaults.rounds),
            max_same_in_row: parse_var("NEURORACE_MAX_SAME_IN_ROW")?
                .unwrap_or(defaults.max_same_in_row),
            max_shuffle_attempts: parse_var("NEURORACE_MAX_SHUFFLE_ATTEMPTS")?
                .unwrap_or(defaults.max_shuffle_attempts),
            quotas: match optional_var("NEURORACE_QUOTAS") {
                Some(raw) => raw.parse()?,
                None => defaults.quotas,
            },
        };
        config.validate()?;
        Ok(config)
    }
}

/// Read an environment variable, treating unset and blank the same.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match optional_var(name) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::env(format!("{name} has invalid value '{raw}'"))),
        None => Ok(None),
    }
}
