//! Integration tests for region timing
//!
//! Wall-clock scenarios use generous upper bounds for scheduler jitter.

use std::thread;
use std::time::Duration;
use timetree::clock::ManualClock;
use timetree::{Ratio, TimeUnit, Timer, TimerConfig, TimerError, TimerRegistry, Totals};

#[test]
fn test_single_region_wall_clock() {
    let mut timer = TimerRegistry::new();
    timer.start_recording("total").unwrap();
    thread::sleep(Duration::from_millis(10));
    let acc = timer.stop_recording("total").unwrap();

    assert_eq!(acc.call_count, 1);
    assert_eq!(acc.unit, TimeUnit::Milliseconds);
    assert!(
        (8..=50).contains(&acc.total),
        "unexpected duration: {}ms",
        acc.total
    );

    let totals = timer.totals("total", TimeUnit::Milliseconds).unwrap();
    assert_eq!(totals.call_count, 1);
    assert!((8.0..=50.0).contains(&totals.duration));
}

#[test]
fn test_nested_regions_wall_clock() {
    let mut timer = TimerRegistry::new();
    timer.start_recording("outer").unwrap();
    thread::sleep(Duration::from_millis(2));
    timer.start_child("inner", "outer").unwrap();
    thread::sleep(Duration::from_millis(5));
    timer.stop_recording("inner").unwrap();
    timer.stop_recording("outer").unwrap();

    let report = timer.report("outer", true).unwrap();
    assert_eq!(report.lines.len(), 2);
    assert_eq!(report.lines[0].name, "outer");
    assert_eq!(report.lines[0].depth, 0);

    let inner = report.line("inner").unwrap();
    assert_eq!(inner.depth, 1);
    match inner.ratio {
        Some(Ratio::Value(ratio)) => assert!(ratio <= 1.0, "ratio {} > 1", ratio),
        other => panic!("expected a ratio, got {:?}", other),
    }

    let text = report.to_string();
    assert!(text.starts_with("Report {outer} in the recorder"));
    assert!(text.contains("\n|----outer: 1 call(s), average "));
    assert!(text.contains("\n     |----inner: 1 call(s), average "));
}

#[test]
fn test_never_started_region_is_not_started() {
    let mut timer = TimerRegistry::new();
    timer.start_recording("a").unwrap();
    timer.stop_recording("a").unwrap();
    assert_eq!(
        timer.stop_recording("a").unwrap_err(),
        TimerError::NotStarted {
            name: "a".to_string()
        }
    );
}

#[test]
fn test_unknown_names_are_not_found() {
    let mut timer = TimerRegistry::new();
    let not_found = |result: Result<(), TimerError>| {
        matches!(result, Err(TimerError::NotFound { ref name }) if name == "ghost")
    };

    assert!(not_found(timer.report("ghost", true).map(|_| ())));
    assert!(not_found(timer.reset("ghost")));
    assert!(not_found(timer.erase("ghost")));
    assert!(not_found(timer.stop_recording("ghost").map(|_| ())));
    assert!(not_found(timer.totals("ghost", TimeUnit::Seconds).map(|_| ())));
    assert!(matches!(
        timer.start_child("child", "ghost"),
        Err(TimerError::NotFound { .. })
    ));
    // Failed operations never create regions
    assert!(timer.is_empty());
}

#[test]
fn test_erase_cascades_to_children() {
    let mut timer = TimerRegistry::with_clock(ManualClock::new());
    timer.start_recording("a").unwrap();
    timer.start_child("b", "a").unwrap();
    timer.start_child("c", "a").unwrap();
    timer.start_recording("z").unwrap();

    timer.erase("a").unwrap();
    for name in ["a", "b", "c"] {
        assert!(!timer.contains(name));
        assert!(matches!(
            timer.report(name, false),
            Err(TimerError::NotFound { .. })
        ));
    }
    assert!(timer.contains("z"));
    assert!(timer.nodes().is_consistent());

    let names: Vec<_> = timer
        .report_all()
        .lines
        .iter()
        .map(|line| line.name.clone())
        .collect();
    assert_eq!(names, vec!["z"]);
}

#[test]
fn test_reset_all_zeroes_durations_keeps_counts() {
    let clock = ManualClock::new();
    let mut timer = TimerRegistry::with_clock(clock.clone());
    timer.start_recording("a").unwrap();
    for _ in 0..3 {
        timer.start_child("b", "a").unwrap();
        clock.advance(Duration::from_millis(5));
        timer.stop_recording("b").unwrap();
    }
    timer.stop_recording("a").unwrap();
    timer.start_recording("pending").unwrap();

    timer.reset_all();

    let a = timer.totals("a", TimeUnit::Milliseconds).unwrap();
    let b = timer.totals("b", TimeUnit::Milliseconds).unwrap();
    assert_eq!((a.call_count, a.duration), (1, 0.0));
    assert_eq!((b.call_count, b.duration), (3, 0.0));
    assert_eq!(
        timer.totals("pending", TimeUnit::Milliseconds).unwrap(),
        Totals::NOT_MEASURED
    );
}

#[test]
fn test_redeclare_under_different_parent_conflicts() {
    let mut timer = TimerRegistry::new();
    timer.start_recording("x").unwrap();
    timer.start_recording("y").unwrap();

    let err = timer.start_child("x", "y").unwrap_err();
    assert!(matches!(err, TimerError::NameConflict { ref name, .. } if name == "x"));

    let report = timer.report_all();
    assert_eq!(report.line("x").unwrap().depth, 0);
    assert_eq!(report.line("y").unwrap().depth, 0);
    assert_eq!(timer.report("y", true).unwrap().lines.len(), 1);
}

#[test]
fn test_unit_conversion_is_chronological() {
    let clock = ManualClock::new();
    let mut timer = TimerRegistry::with_clock(clock.clone());
    timer
        .start_recording_with_unit("job", TimeUnit::Milliseconds)
        .unwrap();
    clock.advance(Duration::from_millis(123_000));
    timer.stop_recording("job").unwrap();

    let in_ms = timer.totals("job", TimeUnit::Milliseconds).unwrap();
    let in_s = timer.totals("job", TimeUnit::Seconds).unwrap();
    let in_m = timer.totals("job", TimeUnit::Minutes).unwrap();
    assert_eq!(in_ms.duration, 123_000.0);
    assert_eq!(in_s.duration, 123.0);
    assert_eq!(in_m.duration, 123_000.0 / 60_000.0);
    assert_ne!(in_m.duration, 123_000.0 / 1_000_000.0);
}

#[test]
fn test_report_all_renders_every_region_once() {
    let clock = ManualClock::new();
    let mut timer = TimerRegistry::with_clock(clock.clone());
    timer.start_recording("load").unwrap();
    timer.start_child("read", "load").unwrap();
    timer.start_child("decode", "load").unwrap();
    timer.start_child("inflate", "decode").unwrap();
    timer.start_recording("save").unwrap();
    clock.advance(Duration::from_millis(10));
    for name in ["inflate", "decode", "read", "load", "save"] {
        timer.stop_recording(name).unwrap();
    }

    let report = timer.report_all();
    let mut names: Vec<_> = report.lines.iter().map(|l| l.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["decode", "inflate", "load", "read", "save"]);
    assert_eq!(report.line("inflate").unwrap().depth, 2);

    let text = report.to_string();
    assert!(text.starts_with("Report {all} in the recorder (-1 means recorder not stopped):\n"));
    assert!(text.contains("          |----inflate: 1 call(s), average 10ms, ratio 1.0000"));
}

#[test]
fn test_unstopped_parent_renders_sentinel() {
    let clock = ManualClock::new();
    let mut timer = TimerRegistry::with_clock(clock.clone());
    timer.start_recording("outer").unwrap();
    timer.start_child("inner", "outer").unwrap();
    clock.advance(Duration::from_millis(1));
    timer.stop_recording("inner").unwrap();

    let text = timer.report_all().to_string();
    assert!(text.contains("|----outer: 1 call(s), average -1ms\n"));
    assert!(text.contains("|----inner: 1 call(s), average 1ms, ratio N/A"));
}

#[test]
fn test_config_controls_report_layout() {
    let config = TimerConfig::from_toml_str(
        "[report]\nindent_width = 2\nratio_precision = 1\n",
    )
    .unwrap();
    let clock = ManualClock::new();
    let mut timer = Timer::with_clock(&config, clock.clone());
    timer.start_recording("a").unwrap();
    timer.start_child("b", "a").unwrap();
    clock.advance(Duration::from_millis(4));
    timer.stop_recording("b").unwrap();
    clock.advance(Duration::from_millis(4));
    timer.stop_recording("a").unwrap();

    let text = timer.report_all().to_string();
    assert!(text.contains("\n  |----b: 1 call(s), average 4ms, ratio 0.5\n"));
}

#[test]
fn test_disabled_config_never_records() {
    let mut timer = Timer::new(&TimerConfig::disabled());
    timer.start_recording("a").unwrap();
    thread::sleep(Duration::from_millis(1));
    assert_eq!(timer.stop_recording("a").unwrap().call_count, 0);
    assert!(timer.report_all().is_empty());
}
