//! Countdown engine.
//!
//! Decrements a fixed granularity per accepted tick. The tick that would
//! take the remaining time to zero or below clamps it to zero, cancels the
//! schedule and completes the countdown. Completion is terminal until the
//! countdown is reconfigured or reset.
//!
//! ## State Transitions
//!
//! ```text
//! Unset -> Configured -> Running -> (Paused -> Running)* -> Completed
//! any -> Unset (reset)
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::preset::Preset;
use super::scheduler::{TickHandle, TickScheduler};
use crate::events::Event;
use crate::format::format_countdown;

/// Default tick granularity in milliseconds.
pub const COUNTDOWN_TICK_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Unset,
    Configured,
    Running,
    Paused,
    Completed,
}

/// Displayable countdown state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownSnapshot {
    pub state: CountdownState,
    pub remaining_ms: u64,
    pub duration_ms: u64,
    pub progress: f64,
    pub completed: bool,
    pub display: String,
}

#[derive(Debug)]
pub struct CountdownEngine {
    tick_ms: u64,
    state: CountdownState,
    duration_ms: u64,
    remaining_ms: u64,
    /// Held exactly while `state == Running`.
    tick: Option<TickHandle>,
}

impl CountdownEngine {
    pub fn new(tick_ms: u64) -> Self {
        Self {
            tick_ms: tick_ms.max(1),
            state: CountdownState::Unset,
            duration_ms: 0,
            remaining_ms: 0,
            tick: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.state == CountdownState::Completed
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    pub fn tick_handle(&self) -> Option<TickHandle> {
        self.tick
    }

    /// 0.0 .. 1.0 fraction of the duration already counted down.
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    pub fn snapshot(&self) -> CountdownSnapshot {
        CountdownSnapshot {
            state: self.state,
            remaining_ms: self.remaining_ms,
            duration_ms: self.duration_ms,
            progress: self.progress(),
            completed: self.is_completed(),
            display: format_countdown(self.remaining_ms),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set the duration. Only accepted while nothing is loaded (unset or
    /// completed); a zero duration is rejected.
    pub fn configure(&mut self, minutes: u32, seconds: u32) -> Option<Event> {
        if !matches!(self.state, CountdownState::Unset | CountdownState::Completed) {
            return None;
        }
        let duration_ms = (u64::from(minutes) * 60 + u64::from(seconds)) * 1000;
        if duration_ms == 0 {
            return None;
        }
        self.duration_ms = duration_ms;
        self.remaining_ms = duration_ms;
        self.state = CountdownState::Configured;
        tracing::debug!(duration_ms, "countdown configured");
        Some(Event::CountdownConfigured {
            duration_ms,
            at: Utc::now(),
        })
    }

    pub fn apply_preset(&mut self, preset: Preset) -> Option<Event> {
        self.configure(preset.minutes(), preset.seconds())
    }

    pub fn start(&mut self, scheduler: &mut dyn TickScheduler) -> Option<Event> {
        if !matches!(self.state, CountdownState::Configured | CountdownState::Paused) {
            return None;
        }
        self.tick = Some(scheduler.schedule_repeating(self.tick_ms));
        self.state = CountdownState::Running;
        tracing::debug!(remaining_ms = self.remaining_ms, "countdown started");
        Some(Event::CountdownStarted {
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self, scheduler: &mut dyn TickScheduler) -> Option<Event> {
        if self.state != CountdownState::Running {
            return None;
        }
        if let Some(handle) = self.tick.take() {
            scheduler.cancel(handle);
        }
        self.state = CountdownState::Paused;
        tracing::debug!(remaining_ms = self.remaining_ms, "countdown paused");
        Some(Event::CountdownPaused {
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        })
    }

    /// Start when stopped, pause when running.
    pub fn toggle(&mut self, scheduler: &mut dyn TickScheduler) -> Option<Event> {
        if self.is_running() {
            self.pause(scheduler)
        } else {
            self.start(scheduler)
        }
    }

    pub fn reset(&mut self, scheduler: &mut dyn TickScheduler) -> Option<Event> {
        if let Some(handle) = self.tick.take() {
            scheduler.cancel(handle);
        }
        self.state = CountdownState::Unset;
        self.duration_ms = 0;
        self.remaining_ms = 0;
        tracing::debug!("countdown reset");
        Some(Event::CountdownReset { at: Utc::now() })
    }

    /// Deliver one scheduler firing. Returns `CountdownCompleted` on the
    /// tick that reaches zero, `CountdownTick` otherwise.
    pub fn tick(&mut self, handle: TickHandle, scheduler: &mut dyn TickScheduler) -> Option<Event> {
        if self.tick != Some(handle) {
            return None;
        }
        if self.remaining_ms <= self.tick_ms {
            self.remaining_ms = 0;
            self.tick = None;
            scheduler.cancel(handle);
            self.state = CountdownState::Completed;
            tracing::debug!(duration_ms = self.duration_ms, "countdown completed");
            return Some(Event::CountdownCompleted {
                duration_ms: self.duration_ms,
                at: Utc::now(),
            });
        }
        self.remaining_ms -= self.tick_ms;
        Some(Event::CountdownTick {
            remaining_ms: self.remaining_ms,
            progress: self.progress(),
        })
    }
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new(COUNTDOWN_TICK_MS)
    }
}
