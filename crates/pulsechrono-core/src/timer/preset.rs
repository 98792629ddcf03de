use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named countdown durations. Applying one is the same as calling
/// `configure(minutes, seconds)` with its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Hiit,
    Tabata,
    Pomodoro,
    ShortBreak,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Hiit,
        Preset::Tabata,
        Preset::Pomodoro,
        Preset::ShortBreak,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Hiit => "HIIT",
            Preset::Tabata => "Tabata",
            Preset::Pomodoro => "Pomodoro",
            Preset::ShortBreak => "Short Break",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::Hiit => "High Intensity Interval Training",
            Preset::Tabata => "20s work, 10s rest x8",
            Preset::Pomodoro => "Focus session",
            Preset::ShortBreak => "Quick rest",
        }
    }

    pub fn minutes(self) -> u32 {
        match self {
            Preset::Hiit | Preset::Tabata => 4,
            Preset::Pomodoro => 25,
            Preset::ShortBreak => 5,
        }
    }

    pub fn seconds(self) -> u32 {
        0
    }

    pub fn duration_ms(self) -> u64 {
        (u64::from(self.minutes()) * 60 + u64::from(self.seconds())) * 1000
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "hiit" => Ok(Preset::Hiit),
            "tabata" => Ok(Preset::Tabata),
            "pomodoro" => Ok(Preset::Pomodoro),
            "shortbreak" | "break" => Ok(Preset::ShortBreak),
            _ => Err(format!("unknown preset: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(Preset::Hiit.duration_ms(), 240_000);
        assert_eq!(Preset::Pomodoro.duration_ms(), 1_500_000);
        assert_eq!(Preset::ShortBreak.duration_ms(), 300_000);
    }

    #[test]
    fn parse_accepts_display_and_snake_names() {
        assert_eq!("short_break".parse::<Preset>(), Ok(Preset::ShortBreak));
        assert_eq!("Short Break".parse::<Preset>(), Ok(Preset::ShortBreak));
        assert_eq!("HIIT".parse::<Preset>(), Ok(Preset::Hiit));
        assert!("lunch".parse::<Preset>().is_err());
    }
}
