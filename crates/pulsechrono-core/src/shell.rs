//! Host shell.
//!
//! Owns one stopwatch and one countdown, remembers which of the two is
//! selected, and routes intents to it. The shell never touches engine
//! internals: it calls engine commands, forwards scheduler firings, and
//! derives a single "is anything running" flag for ambient effects.
//!
//! ## Usage
//!
//! ```ignore
//! let mut clock = ManualScheduler::new();
//! let mut shell = ChronoShell::new(10, 1000);
//! shell.subscribe(|event| println!("{event:?}"));
//! shell.dispatch(Intent::Start, &mut clock);
//! clock.advance(5_000, |h, c| { shell.on_tick(h, c); });
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::audio::{AudioCue, Cue, Silent};
use crate::events::Event;
use crate::intent::Intent;
use crate::storage::Config;
use crate::timer::{
    CountdownEngine, CountdownSnapshot, StopwatchEngine, StopwatchSnapshot, TickHandle,
    TickScheduler,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Stopwatch,
    Countdown,
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stopwatch" => Ok(Mode::Stopwatch),
            "countdown" | "timer" => Ok(Mode::Countdown),
            _ => Err(format!("unknown mode: {s}")),
        }
    }
}

/// Everything a presentation layer needs to draw both engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellSnapshot {
    pub mode: Mode,
    pub active: bool,
    pub stopwatch: StopwatchSnapshot,
    pub countdown: CountdownSnapshot,
}

type Observer = Box<dyn FnMut(&Event)>;

pub struct ChronoShell {
    mode: Mode,
    stopwatch: StopwatchEngine,
    countdown: CountdownEngine,
    cues: Box<dyn AudioCue>,
    observers: Vec<Observer>,
    active: bool,
}

impl ChronoShell {
    pub fn new(stopwatch_tick_ms: u64, countdown_tick_ms: u64) -> Self {
        Self {
            mode: Mode::default(),
            stopwatch: StopwatchEngine::new(stopwatch_tick_ms),
            countdown: CountdownEngine::new(countdown_tick_ms),
            cues: Box::new(Silent),
            observers: Vec::new(),
            active: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.stopwatch.tick_ms, config.countdown.tick_ms)
    }

    /// Replace the audio collaborator.
    pub fn with_cues(mut self, cues: impl AudioCue + 'static) -> Self {
        self.cues = Box::new(cues);
        self
    }

    /// Register an observer. Observers see every event, ticks included, in
    /// the order they happen.
    pub fn subscribe(&mut self, observer: impl FnMut(&Event) + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn stopwatch(&self) -> &StopwatchEngine {
        &self.stopwatch
    }

    pub fn countdown(&self) -> &CountdownEngine {
        &self.countdown
    }

    pub fn snapshot(&self) -> ShellSnapshot {
        ShellSnapshot {
            mode: self.mode,
            active: self.active,
            stopwatch: self.stopwatch.snapshot(),
            countdown: self.countdown.snapshot(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Route an intent to the selected engine. Returns `None` when the
    /// intent does not apply; nothing is played or emitted in that case.
    pub fn dispatch(&mut self, intent: Intent, scheduler: &mut dyn TickScheduler) -> Option<Event> {
        let event = match (intent, self.mode) {
            (Intent::Switch { mode }, _) => self.switch(mode, scheduler),
            (Intent::Start, Mode::Stopwatch) => self.stopwatch.start(scheduler),
            (Intent::Pause, Mode::Stopwatch) => self.stopwatch.pause(scheduler),
            (Intent::Toggle, Mode::Stopwatch) => self.stopwatch.toggle(scheduler),
            (Intent::Lap, Mode::Stopwatch) => self.stopwatch.lap(),
            (Intent::Reset, Mode::Stopwatch) => self.stopwatch.reset(scheduler),
            (Intent::Start, Mode::Countdown) => self.countdown.start(scheduler),
            (Intent::Pause, Mode::Countdown) => self.countdown.pause(scheduler),
            (Intent::Toggle, Mode::Countdown) => self.countdown.toggle(scheduler),
            (Intent::Reset, Mode::Countdown) => self.countdown.reset(scheduler),
            (Intent::Configure { minutes, seconds }, Mode::Countdown) => {
                self.countdown.configure(minutes, seconds)
            }
            (Intent::Preset { preset }, Mode::Countdown) => self.countdown.apply_preset(preset),
            (intent, mode) => {
                tracing::debug!(?intent, ?mode, "intent ignored");
                None
            }
        };

        if let Some(ref event) = event {
            self.play(Cue::Click);
            self.emit(event);
        }
        self.sync_activity();
        event
    }

    /// Forward a scheduler firing. Only the engine holding `handle` reacts.
    pub fn on_tick(&mut self, handle: TickHandle, scheduler: &mut dyn TickScheduler) -> Option<Event> {
        let event = match self.stopwatch.tick(handle) {
            Some(event) => Some(event),
            None => self.countdown.tick(handle, scheduler),
        };

        if let Some(ref event) = event {
            if matches!(event, Event::CountdownCompleted { .. }) {
                self.play(Cue::Complete);
            }
            self.emit(event);
        }
        self.sync_activity();
        event
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Leaving an engine pauses it; only the selected engine may run.
    fn switch(&mut self, mode: Mode, scheduler: &mut dyn TickScheduler) -> Option<Event> {
        if mode == self.mode {
            return None;
        }
        let paused = match self.mode {
            Mode::Stopwatch => self.stopwatch.pause(scheduler),
            Mode::Countdown => self.countdown.pause(scheduler),
        };
        if let Some(ref event) = paused {
            self.emit(event);
        }
        self.mode = mode;
        tracing::debug!(?mode, "mode switched");
        Some(Event::ModeSwitched {
            mode,
            at: Utc::now(),
        })
    }

    fn sync_activity(&mut self) {
        let active = self.stopwatch.is_running() || self.countdown.is_running();
        if active != self.active {
            self.active = active;
            self.emit(&Event::ActivityChanged {
                active,
                at: Utc::now(),
            });
        }
    }

    fn play(&mut self, cue: Cue) {
        if let Err(e) = self.cues.play(cue) {
            tracing::warn!(?cue, error = %e, "audio cue failed");
        }
    }

    fn emit(&mut self, event: &Event) {
        if !event.is_tick() {
            tracing::debug!(?event, "event");
        }
        for observer in self.observers.iter_mut() {
            observer(event);
        }
    }
}

impl Default for ChronoShell {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::audio::RecordingCue;
    use crate::error::CueError;
    use crate::timer::{CountdownState, ManualScheduler, Preset, StopwatchState};

    struct Broken;

    impl AudioCue for Broken {
        fn play(&mut self, _cue: Cue) -> Result<(), CueError> {
            Err(CueError::Unavailable("no device".into()))
        }
    }

    fn advance(shell: &mut ChronoShell, clock: &mut ManualScheduler, ms: u64) {
        clock.advance(ms, |h, c| {
            shell.on_tick(h, c);
        });
    }

    #[test]
    fn intents_go_to_selected_engine() {
        let mut clock = ManualScheduler::new();
        let mut shell = ChronoShell::default();

        shell.dispatch(Intent::Start, &mut clock);
        advance(&mut shell, &mut clock, 1000);
        assert_eq!(shell.stopwatch().elapsed_ms(), 1000);
        assert_eq!(shell.countdown().state(), CountdownState::Unset);
    }

    #[test]
    fn inapplicable_intents_are_ignored() {
        let mut clock = ManualScheduler::new();
        let mut shell = ChronoShell::default();
        assert!(shell
            .dispatch(Intent::Preset { preset: Preset::Hiit }, &mut clock)
            .is_none());

        shell.dispatch(Intent::Switch { mode: Mode::Countdown }, &mut clock);
        assert!(shell.dispatch(Intent::Lap, &mut clock).is_none());
        assert!(shell.dispatch(Intent::Start, &mut clock).is_none());
    }

    #[test]
    fn switching_pauses_outgoing_engine() {
        let mut clock = ManualScheduler::new();
        let mut shell = ChronoShell::default();
        shell.dispatch(Intent::Start, &mut clock);
        advance(&mut shell, &mut clock, 500);

        assert!(shell
            .dispatch(Intent::Switch { mode: Mode::Countdown }, &mut clock)
            .is_some());
        assert_eq!(shell.stopwatch().state(), StopwatchState::Paused);
        assert_eq!(clock.pending(), 0);
        assert!(!shell.is_active());

        assert!(shell
            .dispatch(Intent::Switch { mode: Mode::Countdown }, &mut clock)
            .is_none());
    }

    #[test]
    fn activity_flag_follows_running_engines() {
        let mut clock = ManualScheduler::new();
        let mut shell = ChronoShell::default();
        let flips = Rc::new(RefCell::new(Vec::new()));
        let sink = flips.clone();
        shell.subscribe(move |e| {
            if let Event::ActivityChanged { active, .. } = e {
                sink.borrow_mut().push(*active);
            }
        });

        shell.dispatch(Intent::Switch { mode: Mode::Countdown }, &mut clock);
        shell.dispatch(Intent::Configure { minutes: 0, seconds: 2 }, &mut clock);
        shell.dispatch(Intent::Toggle, &mut clock);
        assert!(shell.is_active());
        advance(&mut shell, &mut clock, 5000);
        assert!(!shell.is_active());

        assert_eq!(*flips.borrow(), vec![true, false]);
    }

    #[test]
    fn cues_for_intents_and_completion() {
        let mut clock = ManualScheduler::new();
        let cues = RecordingCue::new();
        let mut shell = ChronoShell::default().with_cues(cues.clone());

        shell.dispatch(Intent::Switch { mode: Mode::Countdown }, &mut clock);
        shell.dispatch(Intent::Configure { minutes: 0, seconds: 1 }, &mut clock);
        shell.dispatch(Intent::Start, &mut clock);
        shell.dispatch(Intent::Lap, &mut clock);
        advance(&mut shell, &mut clock, 3000);

        assert_eq!(
            cues.played(),
            vec![Cue::Click, Cue::Click, Cue::Click, Cue::Complete]
        );
    }

    #[test]
    fn failing_cues_do_not_affect_timing() {
        let mut clock = ManualScheduler::new();
        let mut shell = ChronoShell::default().with_cues(Broken);
        assert!(shell.dispatch(Intent::Start, &mut clock).is_some());
        advance(&mut shell, &mut clock, 200);
        assert!(shell.dispatch(Intent::Lap, &mut clock).is_some());
        assert_eq!(shell.stopwatch().laps().len(), 1);
        assert_eq!(shell.stopwatch().elapsed_ms(), 200);
    }

    #[test]
    fn mode_parses_timer_alias() {
        assert_eq!("timer".parse::<Mode>(), Ok(Mode::Countdown));
        assert_eq!("Stopwatch".parse::<Mode>(), Ok(Mode::Stopwatch));
        assert!("clock".parse::<Mode>().is_err());
    }
}
