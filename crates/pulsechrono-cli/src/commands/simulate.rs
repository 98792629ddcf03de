//! Deterministic runs on the virtual clock.
//!
//! These never read the config file: engines use their default tick
//! granularity so the output is reproducible. The virtual clock is walked
//! one firing at a time, so simulated time is capped at
//! [`MAX_SIMULATED_MS`].

use clap::Subcommand;
use pulsechrono_core::{
    CountdownEngine, Event, LapChart, ManualScheduler, Preset, StopwatchEngine,
};
use serde_json::json;

/// Longest run either simulation accepts (24 hours).
pub const MAX_SIMULATED_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Subcommand)]
pub enum SimulateAction {
    /// Run the stopwatch, marking a lap after each split, then pause
    Stopwatch {
        /// Lap splits in milliseconds, comma separated (e.g. 5000,4000,11000)
        #[arg(long, value_delimiter = ',', required = true)]
        splits: Vec<u64>,
        /// Include lap chart data
        #[arg(long)]
        chart: bool,
    },
    /// Run a countdown until it completes
    Countdown {
        #[arg(long, default_value_t = 0)]
        minutes: u32,
        #[arg(long, default_value_t = 0)]
        seconds: u32,
        /// Use a preset instead of --minutes/--seconds
        #[arg(long)]
        preset: Option<Preset>,
    },
}

pub fn run(action: SimulateAction) -> Result<(), Box<dyn std::error::Error>> {
    let output = match action {
        SimulateAction::Stopwatch { splits, chart } => simulate_stopwatch(&splits, chart)?,
        SimulateAction::Countdown {
            minutes,
            seconds,
            preset,
        } => simulate_countdown(minutes, seconds, preset)?,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn simulate_stopwatch(
    splits: &[u64],
    chart: bool,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let total = splits
        .iter()
        .try_fold(0u64, |acc, &s| acc.checked_add(s))
        .unwrap_or(u64::MAX);
    if total > MAX_SIMULATED_MS {
        return Err(format!("splits add up to more than {MAX_SIMULATED_MS} ms").into());
    }

    let mut clock = ManualScheduler::new();
    let mut sw = StopwatchEngine::default();

    sw.start(&mut clock);
    for &split in splits {
        clock.advance(split, |h, _| {
            sw.tick(h);
        });
        sw.lap();
    }
    sw.pause(&mut clock);

    let mut output = json!({ "stopwatch": sw.snapshot() });
    if chart {
        output["chart"] = json!(LapChart::from_laps(sw.laps().chronological()));
    }
    Ok(output)
}

fn simulate_countdown(
    minutes: u32,
    seconds: u32,
    preset: Option<Preset>,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let mut clock = ManualScheduler::new();
    let mut cd = CountdownEngine::default();

    let configured = match preset {
        Some(preset) => cd.apply_preset(preset),
        None => cd.configure(minutes, seconds),
    };
    if configured.is_none() {
        return Err("countdown duration must be greater than zero".into());
    }
    if cd.duration_ms() > MAX_SIMULATED_MS {
        return Err(format!("countdown duration must be at most {MAX_SIMULATED_MS} ms").into());
    }

    cd.start(&mut clock);
    let mut ticks = 0u64;
    let mut completions = 0u64;
    // One extra tick of slack shows nothing fires after completion.
    let horizon = cd.duration_ms() + 2 * cd.tick_ms();
    clock.advance(horizon, |h, c| match cd.tick(h, c) {
        Some(Event::CountdownCompleted { .. }) => completions += 1,
        Some(_) => ticks += 1,
        None => {}
    });

    Ok(json!({
        "ticks": ticks,
        "completions": completions,
        "countdown": cd.snapshot(),
    }))
}
