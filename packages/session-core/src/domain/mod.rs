//! Domain layer: scheduling, scoring and the session state machines.

pub mod challenge_assignment;
pub mod results;
pub mod rules;
pub mod schedule;
pub mod scoring;
pub mod seed_derivation;
pub mod session;
pub mod session_transition;
pub mod snapshot;
pub mod state;
pub mod tutorial;
pub mod turn_order;
pub mod types;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_props_session;
#[cfg(test)]
mod tests_session;

// Re-exports for ergonomics
pub use challenge_assignment::{assign_challenges, ChallengeAssignment};
pub use schedule::{Schedule, ScheduledRound};
pub use seed_derivation::{derive_outcome_seed, derive_schedule_seed};
pub use session_transition::{derive_session_transitions, SessionTransition, SessionView};
pub use snapshot::{SessionSnapshot, TutorialSnapshot};
pub use turn_order::{generate_turn_order, is_valid_turn_order, TurnOrder};
pub use types::{ChallengeKind, Player};
