use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Simulation, TickOutcome};

/// Fixed simulation step. Gameplay constants are tuned for this rate, so the
/// session steps at 60 Hz no matter how fast the display refreshes.
pub const TICK: Duration = Duration::from_micros(16_667);

/// After a long stall (window dragged, debugger, ...) we run at most this many
/// catch-up ticks instead of fast-forwarding the whole gap.
const MAX_CATCHUP_TICKS: u32 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Stopped,
    Playing,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Start,
    TogglePause,
    Restart,
    Lost,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEffect {
    None,
    ResetSim,
    RecordScore,
}

impl Phase {
    /// Pure transition function for the session state machine.
    ///
    /// Side-effects (resetting the simulation, persisting a score) are
    /// reported via [`PhaseEffect`] so the transitions stay deterministic and
    /// directly testable.
    pub fn handle(self, event: PhaseEvent) -> (Phase, PhaseEffect) {
        match (self, event) {
            (Phase::Stopped, PhaseEvent::Start) | (Phase::GameOver, PhaseEvent::Start) => {
                (Phase::Playing, PhaseEffect::ResetSim)
            }

            (Phase::Playing, PhaseEvent::TogglePause) => (Phase::Paused, PhaseEffect::None),
            (Phase::Paused, PhaseEvent::TogglePause) => (Phase::Playing, PhaseEffect::None),

            (Phase::Playing, PhaseEvent::Lost) => (Phase::GameOver, PhaseEffect::RecordScore),

            (_, PhaseEvent::Restart) => (Phase::Playing, PhaseEffect::ResetSim),
            (_, PhaseEvent::Stop) => (Phase::Stopped, PhaseEffect::None),

            // Ignore irrelevant events in the current phase.
            (phase, _) => (phase, PhaseEffect::None),
        }
    }

    pub fn is_playing(self) -> bool {
        self == Phase::Playing
    }

    pub fn is_paused(self) -> bool {
        self == Phase::Paused
    }

    pub fn is_over(self) -> bool {
        self == Phase::GameOver
    }
}

/// Reported by [`Session::advance`] when a run just ended, so the caller can
/// persist the final score. Scores are never written mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    None,
    GameOver { score: u32 },
}

/// One mounted game: a simulation plus the phase machine and the fixed-step
/// accumulator that drives it.
#[derive(Debug)]
pub struct Session<S: Simulation> {
    sim: S,
    phase: Phase,
    tick_interval: Duration,
    tick_elapsed: Duration,
    high_score: u32,
}

impl<S: Simulation> Session<S> {
    pub fn new(sim: S) -> Self {
        Self::with_tick_interval(sim, TICK)
    }

    pub fn with_tick_interval(sim: S, tick_interval: Duration) -> Self {
        Self {
            sim,
            phase: Phase::Stopped,
            tick_interval,
            tick_elapsed: Duration::ZERO,
            high_score: 0,
        }
    }

    pub fn sim(&self) -> &S {
        &self.sim
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.sim.score()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Seed the session-local high score (normally from the save store).
    pub fn set_high_score(&mut self, high_score: u32) {
        self.high_score = high_score;
    }

    pub fn start(&mut self) {
        self.transition(PhaseEvent::Start);
    }

    pub fn toggle_pause(&mut self) {
        self.transition(PhaseEvent::TogglePause);
    }

    pub fn restart(&mut self) {
        self.transition(PhaseEvent::Restart);
    }

    pub fn stop(&mut self) {
        self.transition(PhaseEvent::Stop);
    }

    /// Swap in a previously saved simulation. The session wakes up paused so
    /// the player resumes deliberately.
    pub fn restore(&mut self, sim: S) {
        self.sim = sim;
        self.phase = Phase::Paused;
        self.tick_elapsed = Duration::ZERO;
    }

    /// Apply a mapped input action. Ignored unless the session is playing.
    pub fn apply(&mut self, action: S::Action) {
        if self.phase.is_playing() {
            self.sim.apply(action);
        }
    }

    /// Accumulate `dt` and run the fixed ticks it covers.
    ///
    /// Only advances while playing; a tick that loses the run flips the phase
    /// to game over, folds the score into the high score, and reports it.
    pub fn advance(&mut self, dt: Duration) -> SessionEvent {
        if !self.phase.is_playing() {
            return SessionEvent::None;
        }

        let backlog_cap = self.tick_interval.saturating_mul(MAX_CATCHUP_TICKS);
        self.tick_elapsed = self.tick_elapsed.saturating_add(dt).min(backlog_cap);

        while self.tick_elapsed >= self.tick_interval {
            self.tick_elapsed -= self.tick_interval;
            if self.sim.tick() == TickOutcome::Lost {
                let score = self.sim.score();
                self.transition(PhaseEvent::Lost);
                self.tick_elapsed = Duration::ZERO;
                return SessionEvent::GameOver { score };
            }
        }

        SessionEvent::None
    }

    fn transition(&mut self, event: PhaseEvent) {
        let (next, effect) = self.phase.handle(event);
        self.phase = next;
        match effect {
            PhaseEffect::None => {}
            PhaseEffect::ResetSim => {
                self.sim.reset();
                self.tick_elapsed = Duration::ZERO;
            }
            PhaseEffect::RecordScore => {
                self.high_score = self.high_score.max(self.sim.score());
            }
        }
    }
}
