mod countdown;
mod laps;
mod preset;
mod scheduler;
mod stopwatch;

pub use countdown::{CountdownEngine, CountdownSnapshot, CountdownState, COUNTDOWN_TICK_MS};
pub use laps::{average_ms, classify_split, ChartBar, Lap, LapBook, LapChart, LapClass};
pub use preset::Preset;
pub use scheduler::{IntervalScheduler, ManualScheduler, TickHandle, TickScheduler};
pub use stopwatch::{StopwatchEngine, StopwatchSnapshot, StopwatchState, STOPWATCH_TICK_MS};
