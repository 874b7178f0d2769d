//! Round state machine
//!
//! `Idle → Setup → Playing → {LevelComplete → Setup, GameOver}`
//!
//! Every input (drops, drags, menu actions) and every timed job goes through
//! `&mut GameEngine`, and time only moves inside [`GameEngine::update`].

use std::time::Duration;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::level::populate_level;
use super::schedule::{Job, Scheduler, TaskHandle};
use super::state::{Cue, GameEvent, GamePhase, RoundState, Target, Token};
use crate::error::Result;
use crate::highscores::{self, HighScoreStore};
use crate::tuning::Tuning;

/// What happened to a dropped token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Dropped on its target; both are gone
    Matched { target: u32, level_complete: bool },
    /// Nearest target in range has another colour; token stays where dropped
    WrongColor { target: u32 },
    /// No target in range; token stays where dropped
    NoTarget,
    /// Unknown token, or no level in play
    Ignored,
}

/// Read-only view for renderers and HUDs
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub points: u32,
    pub level: u32,
    pub time_remaining: u32,
    pub high_score: u32,
    pub phase: GamePhase,
    pub tokens: Vec<Token>,
    pub targets: Vec<Target>,
}

pub struct GameEngine<S: HighScoreStore> {
    state: RoundState,
    tuning: Tuning,
    store: S,
    rng: Pcg32,
    scheduler: Scheduler,
    /// Total time fed to `update`; the scheduler clock is this rounded to ms
    elapsed_ns: u128,
    countdown: Option<TaskHandle>,
    /// Success cue and level advance of a won level
    pending: Vec<TaskHandle>,
    events: Vec<GameEvent>,
}

impl<S: HighScoreStore> GameEngine<S> {
    /// Engine with default tuning
    pub fn new(store: S, seed: u64) -> Self {
        Self::build(Tuning::default(), store, seed)
    }

    pub fn with_tuning(tuning: Tuning, store: S, seed: u64) -> Result<Self> {
        tuning.validate()?;
        Ok(Self::build(tuning, store, seed))
    }

    fn build(tuning: Tuning, store: S, seed: u64) -> Self {
        Self {
            state: RoundState::new(),
            tuning,
            store,
            rng: Pcg32::seed_from_u64(seed),
            scheduler: Scheduler::new(),
            elapsed_ns: 0,
            countdown: None,
            pending: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Virtual time in milliseconds since the engine was created
    pub fn clock_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn high_score(&self) -> u32 {
        self.store.get()
    }

    /// Explicit player reset to 0
    pub fn reset_high_score(&mut self) {
        highscores::reset(&mut self.store);
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            points: self.state.points,
            level: self.state.level,
            time_remaining: self.state.time_remaining,
            high_score: self.store.get(),
            phase: self.state.phase,
            tokens: self.state.tokens.clone(),
            targets: self.state.targets.clone(),
        }
    }

    // === Round lifecycle ===

    /// Start (or restart) a round from level 1
    pub fn start_round(&mut self) {
        self.cancel_jobs();
        self.state.reset(self.tuning.initial_time_secs);
        log::info!("Round started");
        self.prepare_level(self.tuning.initial_time_secs);
    }

    /// Populate the current level, reset its clock and start playing
    pub fn setup_level(&mut self) {
        let time = self.tuning.level_time(self.state.level);
        self.prepare_level(time);
    }

    fn prepare_level(&mut self, time_secs: u32) {
        self.cancel_pending();
        self.set_phase(GamePhase::Setup);
        populate_level(&mut self.state, &self.tuning, &mut self.rng);
        self.state.correct_placements = 0;
        self.state.time_remaining = time_secs;
        self.events.push(GameEvent::LevelStarted {
            level: self.state.level,
            time_secs,
        });
        self.set_phase(GamePhase::Playing);
        self.start_countdown();
    }

    /// One second of countdown. Ends the round when the clock hits zero.
    pub fn countdown_tick(&mut self) {
        if self.state.phase != GamePhase::Playing {
            return;
        }
        self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
        if self.state.time_remaining == 0 {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        self.stop_countdown();
        self.set_phase(GamePhase::GameOver);
        log::info!(
            "Time is up on level {} with {} points",
            self.state.level,
            self.state.points
        );
        self.events.push(GameEvent::cue(Cue::Fail));
        self.record_high_score();
    }

    /// Move on after a won level
    pub fn advance_level(&mut self) {
        if self.state.phase != GamePhase::LevelComplete {
            log::debug!("Ignoring level advance in {:?}", self.state.phase);
            return;
        }
        self.cancel_pending();
        self.state.level += 1;
        self.state.points += self.state.level;
        self.state.correct_placements = 0;
        self.record_high_score();
        self.setup_level();
    }

    /// Leave the round (back to menu). Pending jobs are dropped.
    pub fn abandon(&mut self) {
        self.cancel_jobs();
        self.state.clear_board();
        self.state.correct_placements = 0;
        self.set_phase(GamePhase::Idle);
        log::info!("Round abandoned");
    }

    // === Input ===

    /// Drag update. Returns false if the token is unknown or play is stopped.
    pub fn move_token(&mut self, token_id: u32, pos: Vec2) -> bool {
        if self.state.phase != GamePhase::Playing {
            return false;
        }
        match self.state.token_mut(token_id) {
            Some(token) => {
                token.pos = pos;
                true
            }
            None => false,
        }
    }

    /// Drag end. The nearest target within the capture radius decides the
    /// outcome; equal distances go to the lower target id.
    pub fn attempt_placement(&mut self, token_id: u32, pos: Vec2) -> Placement {
        if self.state.phase != GamePhase::Playing {
            return Placement::Ignored;
        }
        let Some(token) = self.state.token_mut(token_id) else {
            return Placement::Ignored;
        };
        token.pos = pos;
        let color = token.color;

        let radius = self.tuning.capture_radius;
        let nearest = self
            .state
            .targets
            .iter()
            .map(|t| (t, t.pos.distance(pos)))
            .filter(|(_, d)| *d < radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(t, _)| (t.id, t.color));

        let Some((target_id, target_color)) = nearest else {
            log::debug!("Token {} dropped with no target in range", token_id);
            return Placement::NoTarget;
        };
        if target_color != color {
            log::debug!("Token {} dropped on wrong target {}", token_id, target_id);
            return Placement::WrongColor { target: target_id };
        }

        self.state.remove_pair(token_id, target_id);
        self.events.push(GameEvent::Matched {
            token: token_id,
            target: target_id,
            pos,
        });
        self.events.push(GameEvent::Haptic);
        self.events.push(GameEvent::cue(Cue::Plop));
        self.state.correct_placements += 1;
        log::debug!(
            "Matched token {} ({}/{})",
            token_id,
            self.state.correct_placements,
            self.state.level
        );

        let level_complete = self.state.is_level_won();
        if level_complete {
            self.complete_level();
        }
        Placement::Matched {
            target: target_id,
            level_complete,
        }
    }

    fn complete_level(&mut self) {
        self.stop_countdown();
        self.set_phase(GamePhase::LevelComplete);
        log::info!(
            "Level {} cleared with {}s left",
            self.state.level,
            self.state.time_remaining
        );
        let success = self
            .scheduler
            .schedule_once(self.tuning.success_cue_delay_ms, Job::SuccessCue);
        let advance = self
            .scheduler
            .schedule_once(self.tuning.advance_delay_ms, Job::AdvanceLevel);
        self.pending = vec![success, advance];
    }

    // === Time ===

    /// Advance virtual time, running due jobs one at a time.
    /// Sub-millisecond remainders carry over to the next call.
    pub fn update(&mut self, dt: Duration) {
        self.elapsed_ns = self.elapsed_ns.saturating_add(dt.as_nanos());
        let rounded_ms = self.elapsed_ns.saturating_add(500_000) / 1_000_000;
        let until = u64::try_from(rounded_ms).unwrap_or(u64::MAX);
        while let Some((_, job)) = self.scheduler.pop_due(until) {
            self.run_job(job);
        }
        self.scheduler.advance_to(until);
    }

    fn run_job(&mut self, job: Job) {
        log::trace!("t={}ms {:?}", self.scheduler.now_ms(), job);
        match job {
            Job::CountdownTick => self.countdown_tick(),
            Job::SuccessCue => {
                if self.state.phase == GamePhase::LevelComplete {
                    self.events.push(GameEvent::cue(Cue::Success));
                }
            }
            Job::AdvanceLevel => self.advance_level(),
        }
    }

    fn start_countdown(&mut self) {
        self.stop_countdown();
        self.countdown = Some(
            self.scheduler
                .schedule_repeating(self.tuning.tick_interval_ms, Job::CountdownTick),
        );
    }

    fn stop_countdown(&mut self) {
        if let Some(handle) = self.countdown.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn cancel_pending(&mut self) {
        for handle in std::mem::take(&mut self.pending) {
            self.scheduler.cancel(handle);
        }
    }

    fn cancel_jobs(&mut self) {
        self.scheduler.cancel_all();
        self.countdown = None;
        self.pending.clear();
    }

    fn record_high_score(&mut self) {
        if highscores::record_level(&mut self.store, self.state.level) {
            self.events.push(GameEvent::NewHighScore(self.state.level));
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.state.phase != phase {
            log::debug!("Phase {:?} -> {:?}", self.state.phase, phase);
            self.state.phase = phase;
            self.events.push(GameEvent::PhaseChanged(phase));
        }
    }
}
