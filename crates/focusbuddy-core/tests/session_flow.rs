//! Integration tests for the foreground/background session flow.
//!
//! Drives a full Pomodoro cycle through the public API against a SQLite
//! store on disk, including reloads between phases.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use focusbuddy_core::background::{self, BackgroundHandle};
use focusbuddy_core::notify::RecordingNotifier;
use focusbuddy_core::storage::kv;
use focusbuddy_core::timer::ManualClock;
use focusbuddy_core::{
    BackgroundService, Event, Foreground, KvStore, Ledger, NotificationKind, SessionPhase,
    Settings, SqliteStore,
};

fn quick_settings() -> Settings {
    Settings {
        focus_duration: 2,
        short_break_duration: 1,
        long_break_duration: 3,
        sessions_before_long_break: 2,
        blocked_sites: vec!["youtube.com".into(), "reddit.com".into()],
    }
}

async fn background_for(
    store: Arc<dyn KvStore>,
    notifier: Arc<RecordingNotifier>,
) -> BackgroundHandle {
    let service = BackgroundService::load(store, notifier).await.unwrap();
    background::spawn(service, None).0
}

async fn run_until_phase_end(fg: &mut Foreground, clock: &ManualClock) -> Vec<Event> {
    fg.start().await.unwrap();
    let mut events = Vec::new();
    while fg.is_running() {
        clock.advance(Duration::seconds(1));
        events.extend(fg.tick().await.unwrap());
    }
    events
}

#[tokio::test]
async fn test_full_cycle_with_long_break() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KvStore> = Arc::new(SqliteStore::open_at(&dir.path().join("kv.db")).unwrap());
    let notifier = Arc::new(RecordingNotifier::new());
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()));
    kv::save(&*store, "settings", &quick_settings()).await.unwrap();

    let bg = background_for(store.clone(), notifier.clone()).await;
    let (mut fg, _) = Foreground::load(store.clone(), notifier.clone(), bg.clone(), clock.clone())
        .await
        .unwrap();

    // Focus 1 -> short break -> focus 2 -> long break.
    run_until_phase_end(&mut fg, &clock).await;
    assert_eq!(fg.state().remaining_seconds, 1);
    run_until_phase_end(&mut fg, &clock).await;
    assert_eq!(fg.state().phase(), SessionPhase::FocusPaused);
    run_until_phase_end(&mut fg, &clock).await;
    assert_eq!(fg.state().remaining_seconds, 3);
    assert_eq!(fg.state().session_count, 2);
    assert_eq!(fg.state().total_sessions, 2);

    assert_eq!(
        notifier.kinds(),
        vec![
            NotificationKind::SessionComplete,
            NotificationKind::BreakOver,
            NotificationKind::SessionComplete,
        ]
    );

    let ledger = Ledger::new(store.clone(), notifier.clone());
    assert_eq!(ledger.streak().await.unwrap().current_count, 1);
    assert_eq!(ledger.badges().await.unwrap().total_focus_sessions, 2);
}

#[tokio::test]
async fn test_reload_mid_focus_then_finish() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kv.db");
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()));
    let notifier = Arc::new(RecordingNotifier::new());

    let settings = Settings {
        focus_duration: 20,
        short_break_duration: 5,
        ..quick_settings()
    };

    {
        let store: Arc<dyn KvStore> = Arc::new(SqliteStore::open_at(&path).unwrap());
        kv::save(&*store, "settings", &settings).await.unwrap();
        let bg = background_for(store.clone(), notifier.clone()).await;
        let (mut fg, _) = Foreground::load(store, notifier.clone(), bg, clock.clone())
            .await
            .unwrap();
        fg.start().await.unwrap();
        for _ in 0..15 {
            clock.advance(Duration::seconds(1));
            fg.tick().await.unwrap();
        }
        assert_eq!(fg.view().display, "0:05");
    }

    // Reopened ten seconds later: the 5 remaining seconds are gone.
    clock.advance(Duration::seconds(10));
    let store: Arc<dyn KvStore> = Arc::new(SqliteStore::open_at(&path).unwrap());
    let bg = background_for(store.clone(), notifier.clone()).await;
    let (fg, events) = Foreground::load(store, notifier.clone(), bg.clone(), clock.clone())
        .await
        .unwrap();

    assert!(matches!(
        events.first(),
        Some(Event::Restored {
            elapsed_seconds: 10,
            remaining_seconds: 0,
            ..
        })
    ));
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::FocusCompleted { total_sessions: 1, .. })));
    assert_eq!(fg.state().phase(), SessionPhase::BreakPaused);
    assert_eq!(fg.state().remaining_seconds, 5);
    assert!(!bg.session_active().await.unwrap());
}

#[tokio::test]
async fn test_blocking_follows_session() {
    let store: Arc<dyn KvStore> = Arc::new(SqliteStore::open_memory().unwrap());
    let notifier = Arc::new(RecordingNotifier::new());
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()));
    let bg = background_for(store.clone(), notifier.clone()).await;
    let (mut fg, _) = Foreground::load(store, notifier.clone(), bg.clone(), clock)
        .await
        .unwrap();

    assert!(!bg.navigate("https://www.reddit.com/").await.unwrap().is_blocked());
    fg.start().await.unwrap();
    assert!(bg.navigate("https://www.reddit.com/").await.unwrap().is_blocked());
    fg.pause().await.unwrap();
    assert!(!bg.navigate("https://www.reddit.com/").await.unwrap().is_blocked());

    assert_eq!(notifier.kinds(), vec![NotificationKind::SiteBlocked]);
}

#[tokio::test]
async fn test_streak_across_days() {
    let store: Arc<dyn KvStore> = Arc::new(SqliteStore::open_memory().unwrap());
    let notifier = Arc::new(RecordingNotifier::new());
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()));
    kv::save(&*store, "settings", &quick_settings()).await.unwrap();
    let bg = background_for(store.clone(), notifier.clone()).await;
    let (mut fg, _) = Foreground::load(store.clone(), notifier.clone(), bg, clock.clone())
        .await
        .unwrap();

    let mut streak_events = 0;
    for _ in 0..3 {
        let events = run_until_phase_end(&mut fg, &clock).await;
        streak_events += events
            .iter()
            .filter(|e| matches!(e, Event::StreakUpdated { .. }))
            .count();
        run_until_phase_end(&mut fg, &clock).await;
    }
    // Three sessions on one day count once.
    assert_eq!(streak_events, 1);

    clock.advance(Duration::days(1));
    run_until_phase_end(&mut fg, &clock).await;
    let ledger = Ledger::new(store, notifier);
    let streak = ledger.streak().await.unwrap();
    assert_eq!(streak.current_count, 2);
    assert_eq!(streak.longest_count, 2);
}
