//! Integration tests for the countdown engine.

use pulsechrono_core::{CountdownEngine, CountdownState, Event, ManualScheduler, Preset};

#[test]
fn test_ninety_seconds_to_completion() {
    let mut clock = ManualScheduler::new();
    let mut cd = CountdownEngine::default();
    cd.configure(1, 30);
    assert_eq!(cd.remaining_ms(), 90_000);
    assert_eq!(cd.progress(), 0.0);
    cd.start(&mut clock);

    let mut completions = 0;
    let mut progress = vec![cd.progress()];
    let mut remaining = vec![cd.remaining_ms()];
    clock.advance(120_000, |h, c| {
        match cd.tick(h, c) {
            Some(Event::CountdownCompleted { duration_ms, .. }) => {
                assert_eq!(duration_ms, 90_000);
                completions += 1;
            }
            Some(Event::CountdownTick { .. }) => {}
            other => panic!("Unexpected tick result {other:?}"),
        }
        progress.push(cd.progress());
        remaining.push(cd.remaining_ms());
    });

    assert_eq!(completions, 1);
    assert_eq!(cd.state(), CountdownState::Completed);
    assert_eq!(clock.pending(), 0);
    assert_eq!(*progress.last().unwrap(), 1.0);
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert!(progress.iter().all(|p| (0.0..=1.0).contains(p)));
    assert!(remaining.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(remaining.len(), 91);
}

#[test]
fn test_pause_resume_does_not_lose_ticks() {
    let mut clock = ManualScheduler::new();
    let mut cd = CountdownEngine::default();
    cd.configure(0, 10);

    for _ in 0..4 {
        cd.start(&mut clock);
        clock.advance(2_500, |h, c| {
            cd.tick(h, c);
        });
        cd.pause(&mut clock);
    }

    // Two whole ticks per 2.5 s run.
    assert_eq!(cd.remaining_ms(), 2_000);
    assert_eq!(cd.state(), CountdownState::Paused);
}

#[test]
fn test_preset_is_configure_shortcut() {
    let mut a = CountdownEngine::default();
    let mut b = CountdownEngine::default();
    a.apply_preset(Preset::Pomodoro);
    b.configure(25, 0);
    assert_eq!(a.duration_ms(), b.duration_ms());
    assert_eq!(a.state(), b.state());
}

#[test]
fn test_reset_from_every_state() {
    let mut clock = ManualScheduler::new();
    let mut cd = CountdownEngine::default();

    let check = |cd: &CountdownEngine, clock: &ManualScheduler| {
        assert_eq!(cd.state(), CountdownState::Unset);
        assert_eq!(cd.remaining_ms(), 0);
        assert_eq!(cd.duration_ms(), 0);
        assert!(!cd.is_completed());
        assert_eq!(clock.pending(), 0);
    };

    cd.reset(&mut clock);
    check(&cd, &clock);

    cd.configure(0, 5);
    cd.reset(&mut clock);
    check(&cd, &clock);

    cd.configure(0, 5);
    cd.start(&mut clock);
    cd.reset(&mut clock);
    check(&cd, &clock);

    cd.configure(0, 1);
    cd.start(&mut clock);
    clock.advance(1_000, |h, c| {
        cd.tick(h, c);
    });
    assert!(cd.is_completed());
    cd.reset(&mut clock);
    cd.reset(&mut clock);
    check(&cd, &clock);
}

#[test]
fn test_snapshot_json() {
    let mut cd = CountdownEngine::default();
    cd.configure(4, 0);
    let json = serde_json::to_value(cd.snapshot()).unwrap();
    assert_eq!(json["state"], "configured");
    assert_eq!(json["display"], "04:00");
    assert_eq!(json["remaining_ms"], 240_000);
}
