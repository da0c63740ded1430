#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! Session scheduler and scoring state machine for two-player reaction races.

pub mod config;
pub mod domain;
pub mod errors;


// Re-exports for public API
pub use config::schedule::{QuotaTable, ScheduleConfig};
pub use config::ConfigError;
pub use domain::results::SessionResults;
pub use domain::scoring::{ScoreEntry, ScoreLedger};
pub use domain::session::{IgnoreReason, RoundCompletion, RoundOutcome, Session};
pub use domain::state::SessionPhase;
pub use domain::tutorial::TutorialMachine;
pub use domain::types::{ChallengeKind, Player};
pub use errors::DomainError;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
