//! Lap bookkeeping and aggregation.
//!
//! A new lap is classified once, against the laps recorded before it:
//! strictly below every prior split makes it the fastest, strictly above
//! every prior split makes it the slowest. Taking a label demotes the
//! previous holder. Nothing is labelled retroactively, so the first lap of
//! a run stays `Normal` even if it later turns out to be the extreme.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LapClass {
    Normal,
    Fastest,
    Slowest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lap {
    pub id: u64,
    /// Time since the previous lap mark (or since start for the first lap).
    pub split_ms: u64,
    pub class: LapClass,
}

/// Classify `split_ms` against the laps recorded before it.
pub fn classify_split(prior: &[Lap], split_ms: u64) -> LapClass {
    let min = prior.iter().map(|l| l.split_ms).min();
    let max = prior.iter().map(|l| l.split_ms).max();
    match (min, max) {
        (Some(min), _) if split_ms < min => LapClass::Fastest,
        (_, Some(max)) if split_ms > max => LapClass::Slowest,
        _ => LapClass::Normal,
    }
}

/// Arithmetic mean of all splits in milliseconds; `0.0` when empty.
pub fn average_ms(laps: &[Lap]) -> f64 {
    if laps.is_empty() {
        return 0.0;
    }
    let total: u64 = laps.iter().map(|l| l.split_ms).sum();
    total as f64 / laps.len() as f64
}

/// Ordered lap history owned by a stopwatch.
///
/// Stored chronologically. Ids keep increasing across [`LapBook::clear`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LapBook {
    laps: Vec<Lap>,
    next_id: u64,
}

impl LapBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lap with the given split and reclassify the book.
    pub fn record(&mut self, split_ms: u64) -> Lap {
        let class = classify_split(&self.laps, split_ms);
        if class != LapClass::Normal {
            for lap in self.laps.iter_mut().filter(|l| l.class == class) {
                lap.class = LapClass::Normal;
            }
        }

        self.next_id += 1;
        let lap = Lap {
            id: self.next_id,
            split_ms,
            class,
        };
        self.laps.push(lap.clone());
        lap
    }

    pub fn clear(&mut self) {
        self.laps.clear();
    }

    /// Laps in the order they were recorded.
    pub fn chronological(&self) -> &[Lap] {
        &self.laps
    }

    /// Laps newest first, the order a lap list is displayed in.
    pub fn recent_first(&self) -> Vec<Lap> {
        self.laps.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.laps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.laps.is_empty()
    }

    pub fn fastest(&self) -> Option<&Lap> {
        self.laps.iter().find(|l| l.class == LapClass::Fastest)
    }

    pub fn slowest(&self) -> Option<&Lap> {
        self.laps.iter().find(|l| l.class == LapClass::Slowest)
    }

    pub fn average_ms(&self) -> f64 {
        average_ms(&self.laps)
    }
}

/// One bar of the lap-duration chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    pub seconds: f64,
    pub class: LapClass,
}

/// Chart data: bars in chronological order plus the average reference line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapChart {
    pub bars: Vec<ChartBar>,
    pub average_secs: f64,
}

impl LapChart {
    /// Build from laps in recording order.
    pub fn from_laps(laps: &[Lap]) -> Self {
        let bars = laps
            .iter()
            .enumerate()
            .map(|(i, lap)| ChartBar {
                label: format!("Lap {}", i + 1),
                seconds: lap.split_ms as f64 / 1000.0,
                class: lap.class,
            })
            .collect();
        Self {
            bars,
            average_secs: average_ms(laps) / 1000.0,
        }
    }
}
