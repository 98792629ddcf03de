//! Interactive session on the real clock.
//!
//! Each stdin line is turned into an intent and dispatched to the shell.
//! Scheduler firings arrive over the `IntervalScheduler` channel; the
//! simulated voice layer is a pair of timers (listen, then process).

use std::io::Write;
use std::time::Duration;

use clap::Args;
use pulsechrono_core::{
    format_countdown, format_stopwatch, AudioCue, ChronoShell, Config, Cue, CueError, Event,
    Intent, IntentClassifier, IntervalScheduler, KeywordClassifier, Mode, PhraseSource,
    RandomPhrases, ShellSnapshot,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

#[derive(Args)]
pub struct RunArgs {
    /// Engine selected at startup
    #[arg(long, default_value = "stopwatch")]
    mode: Mode,
    /// Print events and snapshots as JSON lines
    #[arg(long)]
    json: bool,
}

const HELP: &str = "commands: start | pause | toggle | lap | reset | set <min> [sec] | \
hiit | tabata | pomodoro | break | timer | stopwatch | voice | status | help | quit";

/// Rings the terminal bell on stderr.
struct TerminalBell;

impl AudioCue for TerminalBell {
    fn play(&mut self, _cue: Cue) -> Result<(), CueError> {
        let mut err = std::io::stderr();
        err.write_all(b"\x07")?;
        err.flush()?;
        Ok(())
    }
}

enum VoiceStage {
    Listening,
    Heard(String),
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session(config, args))
}

async fn session(config: Config, args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut scheduler, mut ticks) = IntervalScheduler::new();
    let mut shell = ChronoShell::from_config(&config);
    if config.audio.enabled {
        shell = shell.with_cues(TerminalBell);
    }

    let json = args.json;
    shell.subscribe(move |event| {
        if !event.is_tick() {
            print_event(event, json);
        }
    });

    if args.mode != Mode::Stopwatch {
        shell.dispatch(Intent::Switch { mode: args.mode }, &mut scheduler);
    }

    let classifier = KeywordClassifier::new();
    let mut phrases = RandomPhrases::thread_local();
    let mut voice: Option<(Instant, VoiceStage)> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if !json {
        println!("{HELP}");
    }

    loop {
        let voice_deadline = voice.as_ref().map(|(at, _)| *at);
        tokio::select! {
            Some(handle) = ticks.recv() => {
                shell.on_tick(handle, &mut scheduler);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let text = line.trim();
                match text.to_ascii_lowercase().as_str() {
                    "" => {}
                    "quit" | "exit" | "q" => break,
                    "help" | "?" => println!("{HELP}"),
                    "status" => print_snapshot(&shell.snapshot(), json)?,
                    "voice" => {
                        if !config.voice.enabled {
                            println!("voice input is disabled (voice.enabled = false)");
                        } else if voice.take().is_some() {
                            println!("voice: off");
                        } else {
                            println!("voice: {}", pulsechrono_core::voice::LISTENING);
                            let at = Instant::now() + Duration::from_millis(config.voice.listen_delay_ms);
                            voice = Some((at, VoiceStage::Listening));
                        }
                    }
                    _ => match parse_command(text, &classifier) {
                        Some(intent) => {
                            if shell.dispatch(intent, &mut scheduler).is_none() {
                                println!("(ignored)");
                            }
                        }
                        None => println!("unrecognized: {text}"),
                    },
                }
            }
            _ = sleep_until_opt(voice_deadline) => {
                voice = match voice.take() {
                    Some((_, VoiceStage::Listening)) => match phrases.next_phrase() {
                        Some(phrase) => {
                            println!("voice heard: {phrase}");
                            let at = Instant::now() + Duration::from_millis(config.voice.process_delay_ms);
                            Some((at, VoiceStage::Heard(phrase)))
                        }
                        None => None,
                    },
                    Some((_, VoiceStage::Heard(phrase))) => {
                        match classifier.classify(&phrase) {
                            Some(intent) => {
                                shell.dispatch(intent, &mut scheduler);
                            }
                            None => tracing::info!(%phrase, "voice phrase not understood"),
                        }
                        None
                    }
                    None => None,
                };
            }
        }
    }

    Ok(())
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Typed commands understood beyond the keyword classifier.
fn parse_command(text: &str, classifier: &impl IntentClassifier) -> Option<Intent> {
    let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    match words.first().map(String::as_str) {
        Some("toggle") => Some(Intent::Toggle),
        Some("set") | Some("configure") => {
            let minutes = words.get(1)?.parse().ok()?;
            let seconds = match words.get(2) {
                Some(s) => s.parse().ok()?,
                None => 0,
            };
            Some(Intent::Configure { minutes, seconds })
        }
        _ => classifier.classify(text),
    }
}

fn describe(event: &Event) -> String {
    match event {
        Event::StopwatchStarted { elapsed_ms, fresh, .. } => {
            if *fresh {
                "stopwatch started".to_string()
            } else {
                format!("stopwatch resumed at {}", format_stopwatch(*elapsed_ms))
            }
        }
        Event::StopwatchPaused { elapsed_ms, .. } => {
            format!("stopwatch paused at {}", format_stopwatch(*elapsed_ms))
        }
        Event::StopwatchReset { .. } => "stopwatch reset".to_string(),
        Event::StopwatchTick { elapsed_ms } => format_stopwatch(*elapsed_ms),
        Event::LapRecorded { lap, lap_count, .. } => format!(
            "lap {lap_count}: {} ({:?})",
            format_stopwatch(lap.split_ms),
            lap.class
        )
        .to_lowercase(),
        Event::CountdownConfigured { duration_ms, .. } => {
            format!("countdown set to {}", format_countdown(*duration_ms))
        }
        Event::CountdownStarted { remaining_ms, .. } => {
            format!("countdown running, {} left", format_countdown(*remaining_ms))
        }
        Event::CountdownPaused { remaining_ms, .. } => {
            format!("countdown paused, {} left", format_countdown(*remaining_ms))
        }
        Event::CountdownTick { remaining_ms, .. } => format_countdown(*remaining_ms),
        Event::CountdownCompleted { .. } => "countdown complete".to_string(),
        Event::CountdownReset { .. } => "countdown reset".to_string(),
        Event::ModeSwitched { mode, .. } => format!("mode: {mode:?}").to_lowercase(),
        Event::ActivityChanged { active: true, .. } => "active".to_string(),
        Event::ActivityChanged { active: false, .. } => "idle".to_string(),
    }
}

fn print_event(event: &Event, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "failed to encode event"),
        }
    } else {
        println!("{}", describe(event));
    }
}

fn print_snapshot(snapshot: &ShellSnapshot, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(snapshot)?);
        return Ok(());
    }

    println!("mode: {:?}", snapshot.mode);
    println!(
        "stopwatch: {} ({:?})",
        snapshot.stopwatch.display, snapshot.stopwatch.state
    );
    for (i, lap) in snapshot.stopwatch.laps.iter().enumerate() {
        let number = snapshot.stopwatch.laps.len() - i;
        println!(
            "  lap {number:>2}  {}  {:?}",
            format_stopwatch(lap.split_ms),
            lap.class
        );
    }
    if !snapshot.stopwatch.laps.is_empty() {
        println!(
            "  average  {}",
            format_stopwatch(snapshot.stopwatch.average_lap_ms.round() as u64)
        );
    }
    println!(
        "countdown: {} ({:?}, {:.0}%)",
        snapshot.countdown.display,
        snapshot.countdown.state,
        snapshot.countdown.progress * 100.0
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsechrono_core::Preset;

    #[test]
    fn parse_set_command() {
        let c = KeywordClassifier::new();
        assert_eq!(
            parse_command("set 1 30", &c),
            Some(Intent::Configure { minutes: 1, seconds: 30 })
        );
        assert_eq!(
            parse_command("configure 5", &c),
            Some(Intent::Configure { minutes: 5, seconds: 0 })
        );
        assert_eq!(parse_command("set x", &c), None);
    }

    #[test]
    fn parse_falls_back_to_classifier() {
        let c = KeywordClassifier::new();
        assert_eq!(parse_command("Toggle", &c), Some(Intent::Toggle));
        assert_eq!(parse_command("lap", &c), Some(Intent::Lap));
        assert_eq!(
            parse_command("pomodoro", &c),
            Some(Intent::Preset { preset: Preset::Pomodoro })
        );
        assert_eq!(parse_command("hello", &c), None);
    }

    #[test]
    fn describe_lap() {
        let mut shell = ChronoShell::default();
        let mut clock = pulsechrono_core::ManualScheduler::new();
        shell.dispatch(Intent::Start, &mut clock);
        clock.advance(1_230, |h, c| {
            shell.on_tick(h, c);
        });
        let event = shell.dispatch(Intent::Lap, &mut clock).unwrap();
        assert_eq!(describe(&event), "lap 1: 00:01.23 (normal)");
    }
}
