//! Integration tests for driving a full session through the public API.

use std::collections::HashSet;
use std::thread;

use croquis_core::{
    AdvanceReason, Event, ImageEntry, ImageLibrary, ManualTime, Session, SessionStatus,
    TimerConfig, TimerPreset,
};

fn library(names: &[&str]) -> ImageLibrary {
    let mut lib = ImageLibrary::new();
    lib.add(names.iter().enumerate().map(|(i, name)| ImageEntry {
        id: format!("img-{i}"),
        name: (*name).to_string(),
        size_bytes: 1_000 + i as u64,
        modified_ms: 0,
    }));
    lib
}

#[test]
fn test_full_cycle_with_irregular_ticks() {
    let time = ManualTime::at(1_000_000);
    let lib = library(&["a.png", "b.png", "c.png"]);
    let mut session =
        Session::seeded(time.clone(), Some(99), TimerConfig::preset(TimerPreset::Seconds30));

    let started = session.start(lib.ids()).unwrap();
    assert!(matches!(started, Event::SessionStarted { total: 3, duration_ms: 30_000, .. }));

    // Irregular host ticks: only absolute time matters.
    let mut seen = HashSet::new();
    seen.insert(session.current_item().cloned().unwrap());
    let mut expirations = 0;
    for gap in [90, 130, 7_000, 22_900, 50, 29_990, 15, 100, 31_000] {
        time.advance(gap);
        if let Some(Event::ItemAdvanced { reason, item, .. }) = session.tick() {
            assert_eq!(reason, AdvanceReason::Expired);
            seen.insert(item);
            expirations += 1;
        }
    }
    assert_eq!(expirations, 3);
    assert_eq!(seen.len(), 3);
    assert_eq!(session.queue().cycle_count(), 1);
    assert_eq!(session.snapshot().position, Some(1));
}

#[test]
fn test_pause_resume_round_trip_through_session() {
    let time = ManualTime::at(0);
    let mut session = Session::seeded(time.clone(), Some(3), TimerConfig::custom(Some(1)));
    session.start(["x", "y"]).unwrap();

    time.set(400);
    assert!(session.tick().is_none());
    session.pause();

    time.set(2_000);
    session.resume();
    time.set(2_300);
    assert!(session.tick().is_none());
    assert_eq!(session.clock().elapsed_ms(), 700);
    assert_eq!(session.snapshot().remaining_ms, 300);
}

#[test]
fn test_restart_after_finish() {
    let time = ManualTime::at(0);
    let mut session = Session::seeded(time.clone(), None, TimerConfig::default());
    session.start(["a", "b"]).unwrap();
    session.next();
    session.next();
    let stopped = session.stop().unwrap();
    assert!(matches!(
        stopped,
        Event::SessionStopped { items_shown: 3, cycles_completed: 1, .. }
    ));

    session.start(["c"]).unwrap();
    assert_eq!(session.status(), SessionStatus::Running);
    assert_eq!(session.queue().cycle_count(), 0);
    assert_eq!(session.current_item().map(String::as_str), Some("c"));
}

#[test]
fn test_empty_library_does_not_disturb_running_session() {
    let time = ManualTime::at(0);
    let mut session = Session::seeded(time.clone(), Some(5), TimerConfig::default());
    session.start(["a", "b"]).unwrap();
    let before = session.snapshot();

    assert!(session.start(ImageLibrary::new().ids()).is_err());
    let after = session.snapshot();
    assert_eq!(after.status, SessionStatus::Running);
    assert_eq!(after.item, before.item);
}

#[test]
fn test_shared_session_serializes_ticker_and_input() {
    let time = ManualTime::at(0);
    let shared =
        Session::seeded(time.clone(), Some(11), TimerConfig::preset(TimerPreset::Seconds30))
            .into_shared();
    shared.lock().unwrap().start(["a", "b", "c", "d"]).unwrap();

    let ticker = {
        let shared = shared.clone();
        let time = time.clone();
        thread::spawn(move || {
            let mut expired = 0;
            for _ in 0..100 {
                time.advance(3_000);
                if shared.lock().unwrap().tick().is_some() {
                    expired += 1;
                }
            }
            expired
        })
    };
    let input = {
        let shared = shared.clone();
        thread::spawn(move || {
            for _ in 0..20 {
                shared.lock().unwrap().previous();
            }
        })
    };

    input.join().unwrap();
    let expired = ticker.join().unwrap();
    assert!(expired > 0);

    let session = shared.lock().unwrap();
    let snap = session.snapshot();
    assert_eq!(snap.total, 4);
    assert!(snap.position.is_some_and(|p| (1..=4).contains(&p)));
    assert!(snap.elapsed_ms <= snap.duration_ms);
}
