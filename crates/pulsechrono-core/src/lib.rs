//! # PulseChrono Core Library
//!
//! Timing logic behind the PulseChrono stopwatch/countdown. Every front end
//! (the `pulsechrono` CLI, or any GUI) drives the same engines.
//!
//! ## Architecture
//!
//! - **Engines**: tick-count state machines. They never read the wall clock;
//!   they hold at most one repeating tick from a [`TickScheduler`] and add or
//!   subtract a fixed granularity per firing
//! - **Laps**: split recording, fastest/slowest classification, averages and
//!   chart data
//! - **Shell**: routes [`Intent`]s to the selected engine, fans [`Event`]s out
//!   to observers and fires audio cues
//! - **Intents**: pluggable text-to-intent classification and a simulated
//!   voice phrase source
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`StopwatchEngine`]: count-up engine with lap tracking
//! - [`CountdownEngine`]: count-down engine with terminal completion
//! - [`ChronoShell`]: host shell over both engines
//! - [`Config`]: Application configuration management

pub mod audio;
pub mod error;
pub mod events;
pub mod format;
pub mod intent;
pub mod shell;
pub mod storage;
pub mod timer;
pub mod voice;

pub use audio::{AudioCue, Cue, RecordingCue, Silent};
pub use error::{ConfigError, CoreError, CueError};
pub use events::Event;
pub use format::{format_countdown, format_stopwatch};
pub use intent::{Intent, IntentClassifier, KeywordClassifier};
pub use shell::{ChronoShell, Mode, ShellSnapshot};
pub use storage::Config;
pub use timer::{
    CountdownEngine, CountdownSnapshot, CountdownState, IntervalScheduler, Lap, LapBook, LapChart,
    LapClass, ManualScheduler, Preset, StopwatchEngine, StopwatchSnapshot, StopwatchState,
    TickHandle, TickScheduler,
};
pub use voice::{PhraseSource, RandomPhrases, ScriptedPhrases};
