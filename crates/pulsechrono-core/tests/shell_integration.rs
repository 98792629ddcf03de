//! Integration tests for the host shell driven by text commands.

use std::cell::RefCell;
use std::rc::Rc;

use pulsechrono_core::{
    ChronoShell, Event, IntentClassifier, KeywordClassifier, LapClass, ManualScheduler, Mode,
    PhraseSource, ScriptedPhrases,
};

fn say(shell: &mut ChronoShell, clock: &mut ManualScheduler, phrase: &str) -> Option<Event> {
    let intent = KeywordClassifier::new().classify(phrase)?;
    shell.dispatch(intent, clock)
}

fn wait(shell: &mut ChronoShell, clock: &mut ManualScheduler, ms: u64) {
    clock.advance(ms, |h, c| {
        shell.on_tick(h, c);
    });
}

#[test]
fn test_spoken_stopwatch_session() {
    let mut clock = ManualScheduler::new();
    let mut shell = ChronoShell::default();

    say(&mut shell, &mut clock, "Start stopwatch");
    wait(&mut shell, &mut clock, 5_000);
    say(&mut shell, &mut clock, "Lap");
    wait(&mut shell, &mut clock, 4_000);
    say(&mut shell, &mut clock, "lap");
    wait(&mut shell, &mut clock, 11_000);
    say(&mut shell, &mut clock, "LAP");
    say(&mut shell, &mut clock, "Stop");

    let snap = shell.snapshot();
    assert!(!snap.active);
    assert_eq!(snap.stopwatch.elapsed_ms, 20_000);
    let laps: Vec<(u64, LapClass)> = snap
        .stopwatch
        .laps
        .iter()
        .map(|l| (l.split_ms, l.class))
        .collect();
    assert_eq!(
        laps,
        vec![
            (11_000, LapClass::Slowest),
            (4_000, LapClass::Fastest),
            (5_000, LapClass::Normal),
        ]
    );
}

#[test]
fn test_spoken_countdown_session() {
    let mut clock = ManualScheduler::new();
    let mut shell = ChronoShell::default();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    shell.subscribe(move |e| {
        if !e.is_tick() {
            sink.borrow_mut().push(e.clone());
        }
    });

    let mut phrases = ScriptedPhrases::new(["Switch to timer", "tabata", "start"]);
    while let Some(phrase) = phrases.next_phrase() {
        say(&mut shell, &mut clock, &phrase);
    }
    assert_eq!(shell.mode(), Mode::Countdown);
    assert!(shell.is_active());

    wait(&mut shell, &mut clock, 5 * 60_000);

    let snap = shell.snapshot();
    assert!(snap.countdown.completed);
    assert_eq!(snap.countdown.remaining_ms, 0);

    let completions = events
        .borrow()
        .iter()
        .filter(|e| matches!(e, Event::CountdownCompleted { .. }))
        .count();
    assert_eq!(completions, 1);
    assert!(matches!(
        events.borrow().last(),
        Some(Event::ActivityChanged { active: false, .. })
    ));
}

#[test]
fn test_unrecognized_phrase_changes_nothing() {
    let mut clock = ManualScheduler::new();
    let mut shell = ChronoShell::default();
    assert!(say(&mut shell, &mut clock, "Listening...").is_none());
    assert_eq!(clock.pending(), 0);
    assert_eq!(shell.stopwatch().elapsed_ms(), 0);
}

#[test]
fn test_snapshot_serializes_for_presentation() {
    let shell = ChronoShell::default();
    let json = serde_json::to_value(shell.snapshot()).unwrap();
    assert_eq!(json["mode"], "stopwatch");
    assert_eq!(json["active"], false);
    assert_eq!(json["stopwatch"]["display"], "00:00.00");
    assert_eq!(json["countdown"]["state"], "unset");
}
