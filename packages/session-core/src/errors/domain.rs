//! Domain-level error type.
//!
//! Protocol violations (completing a round after game over, acting out of
//! turn, calling into the wrong phase) are NOT errors: the session machine
//! ignores them and reports an `IgnoreReason`. `DomainError` is reserved for
//! inputs that can never produce a valid schedule.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Validation failure kinds (extend as needed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// Round count is zero or odd, so it cannot be split evenly.
    InvalidRoundCount,
    /// Streak limit must be at least 1.
    InvalidStreakLimit,
    /// Shuffle attempt bound must be at least 1.
    InvalidAttemptLimit,
    /// Quota table does not sum to the per-player round count.
    QuotaMismatch,
    /// No challenge left in a player's quota while rounds remain.
    QuotaExhausted,
    /// Turn order does not hold the expected number of rounds per player.
    UnbalancedTurnOrder,
    Other,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input or configuration that violates a scheduling rule
    Validation(ValidationKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn validation_other(detail: impl Into<String>) -> Self {
        Self::Validation(ValidationKind::Other, detail.into())
    }

    pub fn kind(&self) -> ValidationKind {
        match self {
            DomainError::Validation(kind, _) => *kind,
        }
    }
}
