//! Session state machine: tutorial progression and main-session lifecycle.
//!
//! `Session` is the single owner of all mutable session state. Every
//! operation takes `&mut self` and runs to completion. Calls that arrive in
//! the wrong phase, out of turn, or after game over are no-ops: they report
//! an [`IgnoreReason`] (logged at debug) and never touch the ledger.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::schedule::ScheduleConfig;
use crate::domain::results::SessionResults;
use crate::domain::rules::{mission_round, round_mission, TUTORIAL_ROUNDS};
use crate::domain::schedule::{Schedule, ScheduledRound};
use crate::domain::scoring::{ScoreEntry, ScoreLedger};
use crate::domain::session_transition::SessionView;
use crate::domain::snapshot::{SessionSnapshot, TutorialSnapshot};
use crate::domain::state::{PlayerNames, SessionPhase, SessionState};
use crate::domain::tutorial::{TutorialMachine, TutorialProgress};
use crate::domain::types::{ChallengeKind, Player};
use crate::errors::domain::DomainError;

/// Completion report from the active challenge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Time from stimulus to valid response, in milliseconds.
    pub elapsed_ms: f64,
    /// Seconds added for wrong or late responses.
    pub penalty_seconds: f64,
}

impl RoundOutcome {
    pub fn new(elapsed_ms: f64, penalty_seconds: f64) -> Self {
        Self {
            elapsed_ms,
            penalty_seconds,
        }
    }

    #[inline]
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_ms / 1000.0
    }
}

/// Why a call was dropped without effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The operation is not meaningful in this phase.
    WrongPhase(SessionPhase),
    /// The main session already ended.
    GameOver,
    /// A round was reported for the player who is not up.
    OutOfTurn { expected: Player, got: Player },
}

/// What `complete_round` did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundCompletion {
    /// Score recorded; the next round is up.
    Advanced {
        entry: ScoreEntry,
        next_round: u8,
        next_turn: Player,
    },
    /// Score recorded for the last round; the session is over.
    Finished { entry: ScoreEntry },
    /// Tutorial round done; no score recorded.
    TutorialAdvanced { tutorial_round: u8 },
    /// Last tutorial round done; the tutorial is complete.
    TutorialFinished,
    Ignored(IgnoreReason),
}

impl RoundCompletion {
    pub fn is_ignored(&self) -> bool {
        matches!(self, RoundCompletion::Ignored(_))
    }

    pub fn entry(&self) -> Option<&ScoreEntry> {
        match self {
            RoundCompletion::Advanced { entry, .. } | RoundCompletion::Finished { entry } => {
                Some(entry)
            }
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Session<R: Rng = ChaCha8Rng> {
    config: ScheduleConfig,
    rng: R,
    state: SessionState,
    main_schedule: Option<Schedule>,
    tutorial_schedule: Schedule,
    tutorial: Option<TutorialMachine>,
    /// Main sessions rolled so far (including rematches).
    sessions_started: u32,
}

impl Session<ChaCha8Rng> {
    /// Reproducible session: every schedule is derived from `seed`.
    pub fn seeded(config: ScheduleConfig, seed: u64) -> Result<Self, DomainError> {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Session seeded from the thread-local entropy source.
    pub fn from_entropy(config: ScheduleConfig) -> Result<Self, DomainError> {
        Self::new(config, ChaCha8Rng::from_rng(&mut rand::rng()))
    }
}

impl<R: Rng> Session<R> {
    /// Build a session around an injected random source.
    pub fn new(config: ScheduleConfig, rng: R) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            state: SessionState::new(),
            main_schedule: None,
            tutorial_schedule: Schedule::tutorial(),
            tutorial: None,
            sessions_started: 0,
        })
    }

    // ---------------------------------------------------------------------
    // Presentation entry points
    // ---------------------------------------------------------------------

    pub fn set_player_name(&mut self, player: Player, name: impl Into<String>) {
        self.state.names.set(player, name);
    }

    /// Clear scores and round counters and enter the tutorial at mission 1.
    pub fn start_tutorial(&mut self) {
        self.state.ledger.clear();
        self.state.session_start = 0;
        self.state.round_number = 1;
        self.state.tutorial_round = 1;
        self.state.current_turn = None;
        self.tutorial = Some(TutorialMachine::new());
        self.state.phase = SessionPhase::Tutorial;
        info!("tutorial started");
    }

    /// Jump straight to "tutorial finished". Only before the main session.
    pub fn skip_tutorial(&mut self) -> bool {
        if !self.state.phase.is_pre_main() {
            self.ignored("skip_tutorial", IgnoreReason::WrongPhase(self.state.phase));
            return false;
        }
        if let Some(tutorial) = self.tutorial.as_mut() {
            tutorial.skip();
        }
        self.finish_tutorial();
        true
    }

    /// Roll a fresh schedule and begin scored play at round 1.
    ///
    /// Keeps the ledger; use [`Session::rematch`] or
    /// [`Session::start_new_game`] for a clean slate.
    pub fn start_main_session(&mut self) -> Result<(), DomainError> {
        let schedule = Schedule::generate(&self.config, &mut self.rng)?;
        let first_turn = schedule.round(1).map(|r| r.player);

        self.main_schedule = Some(schedule);
        self.tutorial = None;
        self.state.session_start = self.state.ledger.len();
        self.state.round_number = 1;
        self.state.current_turn = first_turn;
        self.state.phase = SessionPhase::MainInProgress;
        self.sessions_started += 1;

        info!(
            session = self.sessions_started,
            rounds = self.schedule_len(),
            first_turn = ?first_turn,
            "main session started"
        );
        Ok(())
    }

    /// Same players again: clear scores, keep names, new schedule.
    pub fn rematch(&mut self) -> Result<(), DomainError> {
        self.state.ledger.clear();
        self.start_main_session()
    }

    /// Full reset, names included.
    pub fn start_new_game(&mut self) {
        self.state = SessionState::new();
        self.main_schedule = None;
        self.tutorial = None;
        info!("new game");
    }

    /// Player-initiated forfeit. Recorded rounds stay as they are.
    pub fn end_early(&mut self) -> bool {
        if self.state.phase != SessionPhase::MainInProgress {
            self.ignored("end_early", IgnoreReason::WrongPhase(self.state.phase));
            return false;
        }
        self.state.phase = SessionPhase::MainOver;
        info!(
            rounds_completed = self.rounds_completed(),
            "main session ended early"
        );
        true
    }

    // ---------------------------------------------------------------------
    // Challenge-runner entry points
    // ---------------------------------------------------------------------

    /// Report from the active challenge for whoever's turn it is.
    pub fn on_round_complete(&mut self, outcome: RoundOutcome) -> RoundCompletion {
        let Some(player) = self.current_turn() else {
            let reason = if self.state.is_game_over() {
                IgnoreReason::GameOver
            } else {
                IgnoreReason::WrongPhase(self.state.phase)
            };
            self.ignored("on_round_complete", reason);
            return RoundCompletion::Ignored(reason);
        };
        self.complete_round(player, outcome.elapsed_seconds(), outcome.penalty_seconds)
    }

    /// A tutorial sandbox challenge finished (carries no score).
    pub fn on_tutorial_round_complete(&mut self) -> bool {
        if self.state.phase != SessionPhase::Tutorial {
            self.ignored(
                "on_tutorial_round_complete",
                IgnoreReason::WrongPhase(self.state.phase),
            );
            return false;
        }
        self.tutorial_in_progress()
            .is_some_and(|tutorial| tutorial.sandbox_finished())
    }

    /// Finish the active round for `player` with times in seconds.
    pub fn complete_round(
        &mut self,
        player: Player,
        base_time: f64,
        penalty: f64,
    ) -> RoundCompletion {
        match self.state.phase {
            SessionPhase::MainInProgress => self.complete_main_round(player, base_time, penalty),
            SessionPhase::Tutorial => self.complete_tutorial_round(player),
            SessionPhase::MainOver => {
                self.ignored("complete_round", IgnoreReason::GameOver);
                RoundCompletion::Ignored(IgnoreReason::GameOver)
            }
            phase => {
                let reason = IgnoreReason::WrongPhase(phase);
                self.ignored("complete_round", reason);
                RoundCompletion::Ignored(reason)
            }
        }
    }

    fn complete_main_round(
        &mut self,
        player: Player,
        base_time: f64,
        penalty: f64,
    ) -> RoundCompletion {
        let expected = self.state.current_turn;
        let schedule_len = self.schedule_len();
        if expected != Some(player) {
            let reason = match expected {
                Some(expected) => IgnoreReason::OutOfTurn {
                    expected,
                    got: player,
                },
                None => IgnoreReason::WrongPhase(self.state.phase),
            };
            self.ignored("complete_round", reason);
            return RoundCompletion::Ignored(reason);
        }

        let round = self.state.round_number;
        let entry = self.state.ledger.record(player, round, base_time, penalty);
        debug!(
            round,
            player = player.id(),
            total_time = entry.total_time,
            "round recorded"
        );

        let next_round = round.saturating_add(1);
        let next_turn = self
            .main_schedule
            .as_ref()
            .and_then(|s| s.turn_order().player_for_round(next_round));

        match next_turn {
            Some(next_turn) if next_round <= schedule_len => {
                self.state.round_number = next_round;
                self.state.current_turn = Some(next_turn);
                RoundCompletion::Advanced {
                    entry,
                    next_round,
                    next_turn,
                }
            }
            _ => {
                // Stay on the last valid round and turn.
                self.state.phase = SessionPhase::MainOver;
                info!(
                    totals = ?self.state.ledger.totals(),
                    "main session complete"
                );
                RoundCompletion::Finished { entry }
            }
        }
    }

    fn complete_tutorial_round(&mut self, player: Player) -> RoundCompletion {
        let round = self.state.tutorial_round;
        let Some(expected) = self.tutorial_schedule.turn_order().player_for_round(round) else {
            let reason = IgnoreReason::WrongPhase(self.state.phase);
            self.ignored("complete_round", reason);
            return RoundCompletion::Ignored(reason);
        };
        if expected != player {
            let reason = IgnoreReason::OutOfTurn {
                expected,
                got: player,
            };
            self.ignored("complete_round", reason);
            return RoundCompletion::Ignored(reason);
        }

        if round >= TUTORIAL_ROUNDS {
            self.finish_tutorial();
            return RoundCompletion::TutorialFinished;
        }
        self.state.tutorial_round = round + 1;
        if let (Some(mission), Some(tutorial)) =
            (round_mission(self.state.tutorial_round), self.tutorial.as_mut())
        {
            tutorial.enter_mission(mission);
        }
        RoundCompletion::TutorialAdvanced {
            tutorial_round: self.state.tutorial_round,
        }
    }

    // ---------------------------------------------------------------------
    // Tutorial mission controls
    // ---------------------------------------------------------------------

    /// Leave the mission preview for the sandbox.
    pub fn tutorial_try_it(&mut self) -> bool {
        self.tutorial_in_progress()
            .is_some_and(|tutorial| tutorial.try_it())
    }

    /// Play the current mission's sandbox again.
    pub fn tutorial_retry(&mut self) -> bool {
        self.tutorial_in_progress()
            .is_some_and(|tutorial| tutorial.retry())
    }

    /// Move to the next mission, or finish the tutorial after the last one.
    pub fn tutorial_advance(&mut self) -> Option<TutorialProgress> {
        let progress = self.tutorial_in_progress()?.advance()?;
        match progress {
            TutorialProgress::NextMission(mission) => {
                if let Some(round) = mission_round(mission) {
                    self.state.tutorial_round = round;
                }
            }
            TutorialProgress::Completed => self.finish_tutorial(),
        }
        Some(progress)
    }

    fn tutorial_in_progress(&mut self) -> Option<&mut TutorialMachine> {
        if self.state.phase != SessionPhase::Tutorial {
            return None;
        }
        self.tutorial.as_mut()
    }

    fn finish_tutorial(&mut self) {
        self.state.phase = SessionPhase::TutorialComplete;
        self.state.current_turn = None;
        info!("tutorial complete");
    }

    fn ignored(&self, op: &'static str, reason: IgnoreReason) {
        debug!(op, ?reason, phase = ?self.state.phase, "call ignored");
    }

    // ---------------------------------------------------------------------
    // Read accessors
    // ---------------------------------------------------------------------

    #[inline]
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    #[inline]
    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn is_tutorial_complete(&self) -> bool {
        self.state.phase == SessionPhase::TutorialComplete
    }

    /// Player who acts next: the scripted tutorial round's player during the
    /// tutorial (mission moves keep that round in step), the main turn while
    /// the session runs. `None` once the session is over.
    pub fn current_turn(&self) -> Option<Player> {
        match self.state.phase {
            SessionPhase::Tutorial => self
                .tutorial_schedule
                .turn_order()
                .player_for_round(self.state.tutorial_round),
            SessionPhase::MainInProgress => self.state.current_turn,
            _ => None,
        }
    }

    /// Turn of the last active main round, kept after game over.
    #[inline]
    pub fn last_turn(&self) -> Option<Player> {
        self.state.current_turn
    }

    /// 1-based main-session round.
    #[inline]
    pub fn round_number(&self) -> u8 {
        self.state.round_number
    }

    /// 1-based round within the fixed tutorial sequence.
    #[inline]
    pub fn tutorial_round(&self) -> u8 {
        self.state.tutorial_round
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        self.main_schedule.as_ref()
    }

    pub fn schedule_len(&self) -> u8 {
        self.main_schedule
            .as_ref()
            .map_or(self.config.rounds, Schedule::len)
    }

    pub fn current_round(&self) -> Option<ScheduledRound> {
        match self.state.phase {
            SessionPhase::Tutorial => self.tutorial_schedule.round(self.state.tutorial_round),
            SessionPhase::MainInProgress | SessionPhase::MainOver => self
                .main_schedule
                .as_ref()?
                .round(self.state.round_number),
            _ => None,
        }
    }

    pub fn current_challenge(&self) -> Option<ChallengeKind> {
        self.current_round().map(|r| r.challenge)
    }

    #[inline]
    pub fn ledger(&self) -> &ScoreLedger {
        &self.state.ledger
    }

    #[inline]
    pub fn total_for(&self, player: Player) -> f64 {
        self.state.ledger.total_for(player)
    }

    #[inline]
    pub fn entries(&self) -> &[ScoreEntry] {
        self.state.ledger.entries()
    }

    /// Entries recorded in the current main session.
    #[inline]
    pub fn session_entries(&self) -> &[ScoreEntry] {
        self.state.session_entries()
    }

    /// Rounds completed in the current main session; earlier sessions kept in
    /// the ledger do not count.
    #[inline]
    pub fn rounds_completed(&self) -> usize {
        self.state.session_entries().len()
    }

    #[inline]
    pub fn names(&self) -> &PlayerNames {
        &self.state.names
    }

    pub fn display_name(&self, player: Player) -> String {
        self.state.names.display_name(player)
    }

    pub fn tutorial(&self) -> Option<&TutorialMachine> {
        self.tutorial.as_ref()
    }

    #[inline]
    pub fn sessions_started(&self) -> u32 {
        self.sessions_started
    }

    /// Winner and per-challenge breakdown for the current main session.
    pub fn results(&self) -> Option<SessionResults> {
        let schedule = self.main_schedule.as_ref()?;
        Some(SessionResults::from_entries(
            self.state.session_entries(),
            schedule.challenges(),
        ))
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.state.phase,
            turn: self.current_turn(),
            round_number: match self.state.phase {
                SessionPhase::Tutorial => self.state.tutorial_round,
                _ => self.state.round_number,
            },
            rounds_completed: self.rounds_completed(),
            schedule_len: self.schedule_len(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let tutorial = match (self.state.phase, self.tutorial.as_ref(), self.current_round()) {
            (SessionPhase::Tutorial, Some(machine), Some(round)) => {
                Some(TutorialSnapshot::new(machine, round))
            }
            _ => None,
        };
        SessionSnapshot {
            phase: self.state.phase,
            names: Player::ALL.map(|p| self.display_name(p)),
            round_number: self.state.round_number,
            schedule_len: self.schedule_len(),
            rounds_completed: self.rounds_completed(),
            current_turn: self.current_turn(),
            current_challenge: self.current_challenge(),
            is_game_over: self.is_game_over(),
            totals: self.state.ledger.totals(),
            entries: self.state.ledger.entries().to_vec(),
            tutorial,
        }
    }
}
