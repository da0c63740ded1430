//! In-memory session simulator.
//!
//! Plays whole sessions through the public `Session` API with reaction times
//! drawn per challenge kind, so schedules, scoring and end-of-session results
//! can be checked in bulk without a presentation layer.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use session_core::domain::schedule::Schedule;
use session_core::domain::seed_derivation::{derive_outcome_seed, derive_schedule_seed};
use session_core::domain::session_transition::{derive_session_transitions, SessionTransition};
use session_core::domain::tutorial::TutorialProgress;
use session_core::{
    ChallengeKind, DomainError, RoundCompletion, RoundOutcome, ScheduleConfig, ScoreEntry,
    Session, SessionPhase, SessionResults,
};
use tracing::debug;

/// Chance that a simulated sandbox gets retried once before advancing.
const TUTORIAL_RETRY_CHANCE: f64 = 0.25;
/// Chance of a wrong or late response in a round.
const PENALTY_CHANCE: f64 = 0.15;
const PENALTY_SECONDS: f64 = 1.0;

/// Plausible reaction window per challenge, in milliseconds.
pub fn reaction_window_ms(kind: ChallengeKind) -> (f64, f64) {
    match kind {
        ChallengeKind::Stroop => (600.0, 1_400.0),
        ChallengeKind::SpeedGrid => (900.0, 2_200.0),
        ChallengeKind::Equation => (1_200.0, 2_800.0),
        ChallengeKind::GoNoGo => (350.0, 900.0),
    }
}

/// Draw one round's outcome for `kind`.
pub fn simulate_outcome<R: Rng>(kind: ChallengeKind, rng: &mut R) -> RoundOutcome {
    let (lo, hi) = reaction_window_ms(kind);
    let elapsed_ms = rng.random_range(lo..hi);
    let penalty = if rng.random_bool(PENALTY_CHANCE) {
        PENALTY_SECONDS
    } else {
        0.0
    };
    RoundOutcome::new(elapsed_ms, penalty)
}

/// Result of simulating one session.
#[derive(Debug, Clone)]
pub struct SessionRun {
    pub schedule_seed: u64,
    pub outcome_seed: u64,
    pub schedule: Schedule,
    pub entries: Vec<ScoreEntry>,
    pub results: SessionResults,
    pub ended_early: bool,
    pub tutorial_retries: u32,
    /// Turn banners the presentation layer would have shown.
    pub turns_started: u32,
}

impl SessionRun {
    #[inline]
    pub fn rounds_completed(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug)]
pub enum SimulatorError {
    /// Schedule configuration or generation failed
    Domain(DomainError),
    /// The session stopped accepting rounds before it was over
    Stalled { phase: SessionPhase, round: u8 },
    /// No schedule after starting the main session
    MissingSchedule,
}

impl std::fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulatorError::Domain(err) => write!(f, "Domain error: {err}"),
            SimulatorError::Stalled { phase, round } => {
                write!(f, "Session stalled in {phase:?} at round {round}")
            }
            SimulatorError::MissingSchedule => write!(f, "Main session has no schedule"),
        }
    }
}

impl std::error::Error for SimulatorError {}

impl From<DomainError> for SimulatorError {
    fn from(err: DomainError) -> Self {
        SimulatorError::Domain(err)
    }
}

/// One session's worth of simulation inputs.
pub struct Simulator {
    session: Session,
    outcome_rng: ChaCha8Rng,
    schedule_seed: u64,
    outcome_seed: u64,
    walk_tutorial: bool,
    early_stop_at: Option<u8>,
    turns_started: u32,
}

impl Simulator {
    /// Build the simulator for session `session_no` of a run seeded with `base_seed`.
    pub fn new(
        config: ScheduleConfig,
        base_seed: u64,
        session_no: u32,
    ) -> Result<Self, SimulatorError> {
        let schedule_seed = derive_schedule_seed(base_seed, session_no);
        let outcome_seed = derive_outcome_seed(base_seed, session_no);
        Ok(Self {
            session: Session::seeded(config, schedule_seed)?,
            outcome_rng: ChaCha8Rng::seed_from_u64(outcome_seed),
            schedule_seed,
            outcome_seed,
            walk_tutorial: false,
            early_stop_at: None,
            turns_started: 0,
        })
    }

    pub fn with_tutorial(mut self, walk_tutorial: bool) -> Self {
        self.walk_tutorial = walk_tutorial;
        self
    }

    /// Forfeit when this round comes up instead of playing it.
    pub fn with_early_stop(mut self, round: Option<u8>) -> Self {
        self.early_stop_at = round;
        self
    }

    /// Play the session to the end and collect its results.
    pub fn simulate_session(mut self) -> Result<SessionRun, SimulatorError> {
        let tutorial_retries = if self.walk_tutorial {
            self.walk_tutorial_missions()
        } else {
            self.session.skip_tutorial();
            0
        };

        self.observe(|session| session.start_main_session())?;

        let mut ended_early = false;
        while !self.session.is_game_over() {
            if self.early_stop_at == Some(self.session.round_number()) {
                self.observe(|session| Ok::<_, DomainError>(session.end_early()))?;
                ended_early = true;
                break;
            }
            self.play_round()?;
        }

        let schedule = self
            .session
            .schedule()
            .cloned()
            .ok_or(SimulatorError::MissingSchedule)?;
        let results = self
            .session
            .results()
            .ok_or(SimulatorError::MissingSchedule)?;

        Ok(SessionRun {
            schedule_seed: self.schedule_seed,
            outcome_seed: self.outcome_seed,
            schedule,
            entries: self.session.session_entries().to_vec(),
            results,
            ended_early,
            tutorial_retries,
            turns_started: self.turns_started,
        })
    }

    /// Walk every tutorial mission, sometimes retrying the sandbox.
    fn walk_tutorial_missions(&mut self) -> u32 {
        self.session.start_tutorial();
        let mut retries = 0;

        while self.session.phase() == SessionPhase::Tutorial {
            self.session.tutorial_try_it();
            self.session.on_tutorial_round_complete();
            if self.outcome_rng.random_bool(TUTORIAL_RETRY_CHANCE) && self.session.tutorial_retry()
            {
                retries += 1;
                self.session.on_tutorial_round_complete();
            }
            match self.session.tutorial_advance() {
                Some(TutorialProgress::NextMission(mission)) => debug!(mission, "next mission"),
                Some(TutorialProgress::Completed) => debug!(retries, "tutorial walked"),
                // The machine refused to advance; skip rather than spin.
                None => {
                    self.session.skip_tutorial();
                }
            }
        }
        retries
    }

    fn play_round(&mut self) -> Result<(), SimulatorError> {
        let phase = self.session.phase();
        let round = self.session.round_number();
        let kind = self
            .session
            .current_challenge()
            .ok_or(SimulatorError::Stalled { phase, round })?;
        let outcome = simulate_outcome(kind, &mut self.outcome_rng);

        let completion =
            self.observe(|session| Ok::<_, DomainError>(session.on_round_complete(outcome)))?;
        if let RoundCompletion::Ignored(reason) = completion {
            debug!(?reason, round, "round rejected");
            return Err(SimulatorError::Stalled { phase, round });
        }
        Ok(())
    }

    /// Run `op` and count the turn banners it would raise.
    fn observe<T>(
        &mut self,
        op: impl FnOnce(&mut Session) -> Result<T, DomainError>,
    ) -> Result<T, SimulatorError> {
        let before = self.session.view();
        let out = op(&mut self.session)?;
        for transition in derive_session_transitions(&before, &self.session.view()) {
            if let SessionTransition::TurnStarted { .. } = transition {
                self.turns_started += 1;
            }
            debug!(?transition, "transition");
        }
        Ok(out)
    }
}
