//! Stopwatch engine.
//!
//! Counts up while running by adding a fixed granularity per accepted tick.
//! Time is never derived from wall-clock deltas, so any interleaving of
//! start and pause yields `elapsed == ticks * granularity`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> ... -> Idle (reset)
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::laps::{Lap, LapBook, LapChart};
use super::scheduler::{TickHandle, TickScheduler};
use crate::events::Event;
use crate::format::format_stopwatch;

/// Default tick granularity in milliseconds.
pub const STOPWATCH_TICK_MS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopwatchState {
    Idle,
    Running,
    Paused,
}

/// Displayable stopwatch state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopwatchSnapshot {
    pub state: StopwatchState,
    pub elapsed_ms: u64,
    pub display: String,
    /// Newest first.
    pub laps: Vec<Lap>,
    pub average_lap_ms: f64,
}

#[derive(Debug)]
pub struct StopwatchEngine {
    tick_ms: u64,
    elapsed_ms: u64,
    last_lap_mark_ms: u64,
    laps: LapBook,
    /// Held exactly while running.
    tick: Option<TickHandle>,
}

impl StopwatchEngine {
    pub fn new(tick_ms: u64) -> Self {
        Self {
            tick_ms: tick_ms.max(1),
            elapsed_ms: 0,
            last_lap_mark_ms: 0,
            laps: LapBook::new(),
            tick: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> StopwatchState {
        if self.tick.is_some() {
            StopwatchState::Running
        } else if self.elapsed_ms == 0 {
            StopwatchState::Idle
        } else {
            StopwatchState::Paused
        }
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_some()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    pub fn tick_handle(&self) -> Option<TickHandle> {
        self.tick
    }

    pub fn laps(&self) -> &LapBook {
        &self.laps
    }

    pub fn chart(&self) -> LapChart {
        LapChart::from_laps(self.laps.chronological())
    }

    pub fn snapshot(&self) -> StopwatchSnapshot {
        StopwatchSnapshot {
            state: self.state(),
            elapsed_ms: self.elapsed_ms,
            display: format_stopwatch(self.elapsed_ms),
            laps: self.laps.recent_first(),
            average_lap_ms: self.laps.average_ms(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, scheduler: &mut dyn TickScheduler) -> Option<Event> {
        if self.tick.is_some() {
            return None;
        }
        let fresh = self.elapsed_ms == 0;
        if fresh {
            self.laps.clear();
            self.last_lap_mark_ms = 0;
        }
        self.tick = Some(scheduler.schedule_repeating(self.tick_ms));
        tracing::debug!(elapsed_ms = self.elapsed_ms, fresh, "stopwatch started");
        Some(Event::StopwatchStarted {
            elapsed_ms: self.elapsed_ms,
            fresh,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self, scheduler: &mut dyn TickScheduler) -> Option<Event> {
        let handle = self.tick.take()?;
        scheduler.cancel(handle);
        tracing::debug!(elapsed_ms = self.elapsed_ms, "stopwatch paused");
        Some(Event::StopwatchPaused {
            elapsed_ms: self.elapsed_ms,
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

    /// Back to zero. Lap history stays visible until the next fresh start.
    pub fn reset(&mut self, scheduler: &mut dyn TickScheduler) -> Option<Event> {
        if let Some(handle) = self.tick.take() {
            scheduler.cancel(handle);
        }
        self.elapsed_ms = 0;
        self.last_lap_mark_ms = 0;
        tracing::debug!("stopwatch reset");
        Some(Event::StopwatchReset { at: Utc::now() })
    }

    pub fn lap(&mut self) -> Option<Event> {
        if self.tick.is_none() {
            return None;
        }
        let split_ms = self.elapsed_ms - self.last_lap_mark_ms;
        self.last_lap_mark_ms = self.elapsed_ms;
        let lap = self.laps.record(split_ms);
        tracing::debug!(id = lap.id, split_ms, class = ?lap.class, "lap recorded");
        Some(Event::LapRecorded {
            lap,
            lap_count: self.laps.len(),
            at: Utc::now(),
        })
    }

    /// Deliver one scheduler firing. Handles other than the one this engine
    /// holds are ignored.
    pub fn tick(&mut self, handle: TickHandle) -> Option<Event> {
        if self.tick != Some(handle) {
            return None;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(self.tick_ms);
        Some(Event::StopwatchTick {
            elapsed_ms: self.elapsed_ms,
        })
    }
}

impl Default for StopwatchEngine {
    fn default() -> Self {
        Self::new(STOPWATCH_TICK_MS)
    }
}
