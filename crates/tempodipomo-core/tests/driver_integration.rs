//! Integration tests for the timer driver.
//!
//! These tests drive a spawned timer through its handle and a manual clock,
//! and check the events a front end would see.

use std::time::Duration;

use tempodipomo_core::timer::{self, IntervalClock, ManualClock, SessionType, TimerSettings, TimerState};
use tempodipomo_core::{CoreError, Event};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::broadcast::Receiver;

async fn next_event(rx: &mut Receiver<Event>) -> Event {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

fn display_parts(ev: &Event) -> (SessionType, u64, u64) {
    match ev {
        Event::DisplayUpdate {
            session,
            minutes,
            seconds,
            ..
        } => (*session, *minutes, *seconds),
        other => panic!("Expected DisplayUpdate, got {other:?}"),
    }
}

#[tokio::test]
async fn test_first_tick_after_start() {
    let (clock, ticker) = ManualClock::pair();
    let (handle, _task) = timer::spawn(TimerSettings::default(), clock);
    let mut rx = handle.subscribe().await.unwrap();

    assert!(handle.start().await.unwrap());
    ticker.tick();

    let ev = next_event(&mut rx).await;
    assert_eq!(display_parts(&ev), (SessionType::Work, 24, 59));
    assert_eq!(ev.to_string(), "🍅 Work 24:59");
}

#[tokio::test]
async fn test_work_session_runs_to_completion() {
    let (clock, ticker) = ManualClock::pair();
    let settings = TimerSettings::new(5, 1).unwrap();
    let (handle, _task) = timer::spawn(settings, clock);
    let mut rx = handle.subscribe().await.unwrap();

    handle.start().await.unwrap();

    // One tick at a time so the receiver never lags behind.
    for remaining in (1..5 * 60).rev() {
        ticker.tick();
        let ev = next_event(&mut rx).await;
        assert_eq!(display_parts(&ev), (SessionType::Work, remaining / 60, remaining % 60));
    }
    ticker.tick();
    match next_event(&mut rx).await {
        Event::SessionComplete { title, message, .. } => {
            assert_eq!(title, "Work session complete!");
            assert_eq!(message, "Time for a break!");
        }
        other => panic!("Expected SessionComplete, got {other:?}"),
    }
    assert_eq!(display_parts(&next_event(&mut rx).await), (SessionType::Break, 1, 0));

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.state, TimerState::Idle);
    assert_eq!(snap.session, SessionType::Break);
    assert_eq!(snap.time_left_secs, 60);
}

#[tokio::test]
async fn test_break_completion_needs_explicit_start() {
    let (clock, ticker) = ManualClock::pair();
    let settings = TimerSettings::new(5, 1).unwrap();
    let (handle, _task) = timer::spawn(settings, clock);

    handle.start().await.unwrap();
    ticker.advance(5 * 60);
    // Extra ticks after completion must not start the break.
    ticker.advance(10);
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.state, TimerState::Idle);
    assert_eq!(snap.time_left_secs, 60);

    let mut rx = handle.subscribe().await.unwrap();
    handle.start().await.unwrap();
    ticker.advance(60);
    let mut last = None;
    while last.is_none() {
        if let Event::SessionComplete { title, .. } = next_event(&mut rx).await {
            last = Some(title);
        }
    }
    assert_eq!(last.as_deref(), Some("Break session complete!"));
    assert_eq!(display_parts(&next_event(&mut rx).await), (SessionType::Work, 5, 0));
}

#[tokio::test]
async fn test_pause_freezes_countdown() {
    let (clock, ticker) = ManualClock::pair();
    let (handle, _task) = timer::spawn(TimerSettings::default(), clock);
    let mut rx = handle.subscribe().await.unwrap();

    handle.start().await.unwrap();
    ticker.tick();
    next_event(&mut rx).await;

    assert!(handle.toggle_pause().await.unwrap());
    ticker.advance(5);
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.state, TimerState::Paused);
    assert_eq!(snap.time_left_secs, 25 * 60 - 1);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    assert!(!handle.toggle_pause().await.unwrap());
    ticker.tick();
    assert_eq!(display_parts(&next_event(&mut rx).await), (SessionType::Work, 24, 58));
}

#[tokio::test]
async fn test_pause_while_idle_changes_nothing() {
    let (clock, _ticker) = ManualClock::pair();
    let (handle, _task) = timer::spawn(TimerSettings::default(), clock);
    let mut rx = handle.subscribe().await.unwrap();

    assert!(!handle.toggle_pause().await.unwrap());
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.state, TimerState::Idle);
    assert_eq!(snap.time_left_secs, 25 * 60);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_pause_after_completion_reports_idle() {
    let (clock, ticker) = ManualClock::pair();
    let (handle, _task) = timer::spawn(TimerSettings::new(5, 1).unwrap(), clock);

    handle.start().await.unwrap();
    ticker.advance(5 * 60);
    // The completing ticks are applied before the toggle reaches the driver.
    assert_eq!(handle.pause_or_resume().await.unwrap(), TimerState::Idle);
    assert!(!handle.toggle_pause().await.unwrap());
    assert_eq!(handle.snapshot().await.unwrap().session, SessionType::Break);
}

#[tokio::test]
async fn test_reconfigure_with_same_values_restarts_session() {
    let (clock, ticker) = ManualClock::pair();
    let (handle, _task) = timer::spawn(TimerSettings::default(), clock);
    let mut rx = handle.subscribe().await.unwrap();

    handle.start().await.unwrap();
    for _ in 0..60 {
        ticker.tick();
        next_event(&mut rx).await;
    }
    assert_eq!(handle.snapshot().await.unwrap().time_left_secs, 24 * 60);

    handle.reconfigure(25, 5).await.unwrap();
    assert_eq!(display_parts(&next_event(&mut rx).await), (SessionType::Work, 25, 0));
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.time_left_secs, 25 * 60);
    assert_eq!(snap.state, TimerState::Active);
}

#[tokio::test]
async fn test_ticks_before_start_are_dropped() {
    let (clock, ticker) = ManualClock::pair();
    let (handle, _task) = timer::spawn(TimerSettings::default(), clock);
    let mut rx = handle.subscribe().await.unwrap();

    ticker.advance(3);
    handle.start().await.unwrap();
    assert_eq!(handle.snapshot().await.unwrap().time_left_secs, 25 * 60);

    ticker.tick();
    assert_eq!(display_parts(&next_event(&mut rx).await), (SessionType::Work, 24, 59));
}

#[tokio::test]
async fn test_reset_stops_ticking() {
    let (clock, ticker) = ManualClock::pair();
    let (handle, _task) = timer::spawn(TimerSettings::default(), clock);
    let mut rx = handle.subscribe().await.unwrap();

    handle.start().await.unwrap();
    ticker.advance(2);
    next_event(&mut rx).await;
    next_event(&mut rx).await;

    handle.reset().await.unwrap();
    assert_eq!(display_parts(&next_event(&mut rx).await), (SessionType::Work, 25, 0));

    ticker.advance(2);
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.state, TimerState::Idle);
    assert_eq!(snap.time_left_secs, 25 * 60);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_reconfigure_rejects_out_of_range() {
    let (clock, _ticker) = ManualClock::pair();
    let (handle, _task) = timer::spawn(TimerSettings::default(), clock);

    let err = handle.reconfigure(200, 5).await.unwrap_err();
    assert!(err.is_invalid_config());
    let err = handle.reconfigure_input("abc", "5").await.unwrap_err();
    assert!(err.is_invalid_config());

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.work_minutes, 25);
    assert_eq!(snap.time_left_secs, 25 * 60);
}

#[tokio::test]
async fn test_reconfigure_while_running_restarts_session() {
    let (clock, ticker) = ManualClock::pair();
    let (handle, _task) = timer::spawn(TimerSettings::default(), clock);
    let mut rx = handle.subscribe().await.unwrap();

    handle.start().await.unwrap();
    ticker.tick();
    next_event(&mut rx).await;

    handle.reconfigure(10, 5).await.unwrap();
    assert_eq!(display_parts(&next_event(&mut rx).await), (SessionType::Work, 10, 0));
    assert_eq!(handle.snapshot().await.unwrap().state, TimerState::Active);

    ticker.tick();
    assert_eq!(display_parts(&next_event(&mut rx).await), (SessionType::Work, 9, 59));
}

#[tokio::test]
async fn test_concurrent_starts_begin_one_countdown() {
    let (clock, ticker) = ManualClock::pair();
    let (handle, _task) = timer::spawn(TimerSettings::default(), clock);
    let mut rx = handle.subscribe().await.unwrap();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let h = handle.clone();
        tasks.push(tokio::spawn(async move { h.start().await.unwrap() }));
    }
    let mut began = 0;
    for t in tasks {
        if t.await.unwrap() {
            began += 1;
        }
    }
    assert_eq!(began, 1);

    ticker.tick();
    assert_eq!(display_parts(&next_event(&mut rx).await), (SessionType::Work, 24, 59));
    assert_eq!(handle.snapshot().await.unwrap().time_left_secs, 25 * 60 - 1);
}

#[tokio::test]
async fn test_quit_ends_event_stream() {
    let (clock, ticker) = ManualClock::pair();
    let (handle, task) = timer::spawn(TimerSettings::default(), clock);
    let mut rx = handle.subscribe().await.unwrap();

    handle.start().await.unwrap();
    handle.quit().await;
    task.await.unwrap();

    assert!(!ticker.tick());
    assert!(matches!(rx.recv().await, Err(RecvError::Closed)));
    assert!(matches!(handle.snapshot().await, Err(CoreError::TimerStopped)));
}

#[tokio::test(start_paused = true)]
async fn test_interval_clock_drives_countdown() {
    let (handle, _task) = timer::spawn(TimerSettings::default(), IntervalClock::new());
    let mut rx = handle.subscribe().await.unwrap();

    handle.start().await.unwrap();
    let begin = tokio::time::Instant::now();
    assert_eq!(display_parts(&next_event(&mut rx).await), (SessionType::Work, 24, 59));
    assert_eq!(display_parts(&next_event(&mut rx).await), (SessionType::Work, 24, 58));
    assert_eq!(begin.elapsed(), Duration::from_secs(2));
}
