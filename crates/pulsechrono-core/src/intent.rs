//! Control intents and free-text classification.
//!
//! Buttons, the CLI prompt and the simulated voice layer all produce an
//! [`Intent`]. Text goes through an [`IntentClassifier`]; the shipped
//! [`KeywordClassifier`] matches whole words so that "stopwatch" is never
//! read as "stop".

use serde::{Deserialize, Serialize};

use crate::shell::Mode;
use crate::timer::Preset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    Start,
    Pause,
    /// Start/stop button: start when stopped, pause when running.
    Toggle,
    Lap,
    Reset,
    Configure { minutes: u32, seconds: u32 },
    Preset { preset: Preset },
    Switch { mode: Mode },
}

/// Maps a phrase to an intent. `None` when nothing matches.
pub trait IntentClassifier {
    fn classify(&self, text: &str) -> Option<Intent>;
}

/// Keyword classifier.
///
/// Checked in priority order: start, stop/pause, lap, reset, preset names,
/// then mode switches. The first match wins, so "start timer" starts the
/// selected engine rather than switching to the countdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Option<Intent> {
        let words = words(text);
        let has = |keys: &[&str]| words.iter().any(|w| keys.contains(&w.as_str()));

        if has(&["start", "resume"]) {
            Some(Intent::Start)
        } else if has(&["stop", "pause"]) {
            Some(Intent::Pause)
        } else if has(&["lap", "split"]) {
            Some(Intent::Lap)
        } else if has(&["reset", "clear"]) {
            Some(Intent::Reset)
        } else if has(&["hiit"]) {
            Some(Intent::Preset { preset: Preset::Hiit })
        } else if has(&["tabata"]) {
            Some(Intent::Preset { preset: Preset::Tabata })
        } else if has(&["pomodoro"]) {
            Some(Intent::Preset { preset: Preset::Pomodoro })
        } else if has(&["break"]) {
            Some(Intent::Preset { preset: Preset::ShortBreak })
        } else if has(&["timer", "countdown"]) {
            Some(Intent::Switch { mode: Mode::Countdown })
        } else if has(&["stopwatch"]) {
            Some(Intent::Switch { mode: Mode::Stopwatch })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Option<Intent> {
        KeywordClassifier::new().classify(text)
    }

    #[test]
    fn basic_commands() {
        assert_eq!(classify("Start"), Some(Intent::Start));
        assert_eq!(classify("please PAUSE"), Some(Intent::Pause));
        assert_eq!(classify("Stop"), Some(Intent::Pause));
        assert_eq!(classify("Lap"), Some(Intent::Lap));
        assert_eq!(classify("reset it"), Some(Intent::Reset));
    }

    #[test]
    fn start_wins_over_mode_words() {
        assert_eq!(classify("Start timer"), Some(Intent::Start));
        assert_eq!(classify("Start stopwatch"), Some(Intent::Start));
    }

    #[test]
    fn go_to_mode_switches() {
        assert_eq!(
            classify("go to stopwatch"),
            Some(Intent::Switch { mode: Mode::Stopwatch })
        );
        assert_eq!(
            classify("Go to the timer"),
            Some(Intent::Switch { mode: Mode::Countdown })
        );
        assert_eq!(classify("resume"), Some(Intent::Start));
    }

    #[test]
    fn stopwatch_is_not_stop() {
        assert_eq!(
            classify("Switch to stopwatch"),
            Some(Intent::Switch { mode: Mode::Stopwatch })
        );
        assert_eq!(
            classify("Switch to timer"),
            Some(Intent::Switch { mode: Mode::Countdown })
        );
    }

    #[test]
    fn presets() {
        assert_eq!(
            classify("let's do tabata"),
            Some(Intent::Preset { preset: Preset::Tabata })
        );
        assert_eq!(
            classify("short break please"),
            Some(Intent::Preset { preset: Preset::ShortBreak })
        );
    }

    #[test]
    fn unknown_and_empty() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("Listening..."), None);
        assert_eq!(classify("lapis lazuli"), None);
    }

    #[test]
    fn intent_json_shape() {
        let json = serde_json::to_value(Intent::Preset { preset: Preset::ShortBreak }).unwrap();
        assert_eq!(json["intent"], "preset");
        assert_eq!(json["preset"], "short_break");
    }
}
