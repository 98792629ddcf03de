use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shell::Mode;
use crate::timer::Lap;

/// Every state change in the system produces an Event.
/// The shell fans events out to subscribers; tick events are the only ones
/// without a timestamp since they fire at display rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    StopwatchStarted {
        elapsed_ms: u64,
        /// True when the run started from zero and cleared lap history.
        fresh: bool,
        at: DateTime<Utc>,
    },
    StopwatchPaused {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    StopwatchReset {
        at: DateTime<Utc>,
    },
    StopwatchTick {
        elapsed_ms: u64,
    },
    LapRecorded {
        lap: Lap,
        lap_count: usize,
        at: DateTime<Utc>,
    },
    CountdownConfigured {
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownStarted {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownTick {
        remaining_ms: u64,
        progress: f64,
    },
    CountdownCompleted {
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownReset {
        at: DateTime<Utc>,
    },
    ModeSwitched {
        mode: Mode,
        at: DateTime<Utc>,
    },
    /// The aggregated "is anything running" signal flipped.
    ActivityChanged {
        active: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Tick events repeat at display rate and are not worth a cue or a log line.
    pub fn is_tick(&self) -> bool {
        matches!(self, Event::StopwatchTick { .. } | Event::CountdownTick { .. })
    }
}
