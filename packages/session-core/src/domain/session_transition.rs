use crate::domain::state::SessionPhase;
use crate::domain::types::Player;

/// The slice of session state that transitions are derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub turn: Option<Player>,
    /// Main round, or tutorial round while in the tutorial.
    pub round_number: u8,
    pub rounds_completed: usize,
    pub schedule_len: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTransition {
    /// Edge-triggered: a new round started for this player.
    TurnStarted { player: Player, round_number: u8 },

    /// Edge-triggered: entered the tutorial.
    TutorialStarted,

    /// Edge-triggered: tutorial finished or skipped.
    TutorialFinished,

    /// Edge-triggered: scored play began (fresh schedule).
    MainSessionStarted,

    /// Edge-triggered: scored play ended.
    SessionEnded { completed_all_rounds: bool },
}

/// Derive transitions from before/after views of the session.
pub fn derive_session_transitions(
    before: &SessionView,
    after: &SessionView,
) -> Vec<SessionTransition> {
    let mut transitions = Vec::new();

    // 1. Phase edges
    if before.phase != SessionPhase::Tutorial && after.phase == SessionPhase::Tutorial {
        transitions.push(SessionTransition::TutorialStarted);
    }
    if before.phase != SessionPhase::TutorialComplete
        && after.phase == SessionPhase::TutorialComplete
    {
        transitions.push(SessionTransition::TutorialFinished);
    }

    // A rematch goes MainOver -> MainInProgress; a restart from round > 1
    // without leaving the phase also counts.
    let main_restarted = after.phase == SessionPhase::MainInProgress
        && (before.phase != SessionPhase::MainInProgress
            || (after.round_number == 1 && before.round_number > 1));
    if main_restarted {
        transitions.push(SessionTransition::MainSessionStarted);
    }

    // 2. Turn change: any new (phase, round) with someone to act.
    if let Some(player) = after.turn {
        if before.turn != after.turn
            || before.round_number != after.round_number
            || before.phase != after.phase
        {
            transitions.push(SessionTransition::TurnStarted {
                player,
                round_number: after.round_number,
            });
        }
    }

    // 3. Session end
    if before.phase != SessionPhase::MainOver && after.phase == SessionPhase::MainOver {
        transitions.push(SessionTransition::SessionEnded {
            completed_all_rounds: after.rounds_completed >= after.schedule_len as usize,
        });
    }

    transitions
}
