//! Foreground controller.
//!
//! Wraps a [`SessionMachine`] with everything around it: restoring and
//! persisting the timer snapshot, telling the background context when a
//! session starts or ends, and the side effects of a finished focus
//! phase (streak, badges, productivity log, notifications).
//!
//! The snapshot is written on every state change and every tick, so a
//! reload loses at most one second.

use std::sync::Arc;

use crate::background::{BackgroundHandle, Request};
use crate::error::Result;
use crate::events::Event;
use crate::gamification::Ledger;
use crate::notes::{Note, NoteLog};
use crate::notify::{deliver, Notification, Notifier};
use crate::productivity;
use crate::settings::Settings;
use crate::storage::keys;
use crate::storage::kv::{self, KvStore};
use crate::timer::{Clock, SessionMachine, TimerState, TimerView};

pub struct Foreground {
    machine: SessionMachine,
    settings: Settings,
    store: Arc<dyn KvStore>,
    notifier: Arc<dyn Notifier>,
    background: BackgroundHandle,
    clock: Arc<dyn Clock>,
    ledger: Ledger,
    notes: NoteLog,
}

impl Foreground {
    /// Restore the foreground from the store.
    ///
    /// Without a stored snapshot the timer starts as a fresh paused focus
    /// phase, picking up the counters from their standalone keys. A
    /// snapshot that was running loses the wall-clock time since it was
    /// written; if that finishes the phase, its end is handled once here.
    /// A session still running afterwards is re-announced to the
    /// background, whose flag does not survive a restart.
    pub async fn load(
        store: Arc<dyn KvStore>,
        notifier: Arc<dyn Notifier>,
        background: BackgroundHandle,
        clock: Arc<dyn Clock>,
    ) -> Result<(Self, Vec<Event>)> {
        let settings: Settings = kv::load_or_default(&*store, keys::SETTINGS).await?;
        let now = clock.now();

        let state = match kv::load::<TimerState, _>(&*store, keys::TIMER_STATE).await? {
            Some(state) => state,
            None => {
                let mut state = TimerState::initial(&settings, now);
                state.total_sessions = kv::load_or_default(&*store, keys::TOTAL_SESSIONS).await?;
                state.session_count = kv::load_or_default(&*store, keys::SESSION_COUNT).await?;
                state
            }
        };

        let mut foreground = Self {
            machine: SessionMachine::from_state(state),
            settings,
            ledger: Ledger::new(store.clone(), notifier.clone()),
            notes: NoteLog::new(store.clone()),
            store,
            notifier,
            background,
            clock,
        };

        let restored = foreground.machine.restore(&foreground.settings, now);
        let events = foreground.follow_up(restored).await?;

        if foreground.machine.is_running() {
            foreground.background.send(Request::StartSession).await?;
        }
        foreground.persist().await?;
        Ok((foreground, events))
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        self.machine.state()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn view(&self) -> TimerView {
        self.machine.view(&self.settings)
    }

    pub fn is_running(&self) -> bool {
        self.machine.is_running()
    }

    pub fn background(&self) -> &BackgroundHandle {
        &self.background
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub async fn start(&mut self) -> Result<Vec<Event>> {
        let Some(event) = self.machine.start(self.clock.now()) else {
            return Ok(Vec::new());
        };
        self.background.send(Request::StartSession).await?;
        self.persist().await?;
        Ok(vec![event])
    }

    pub async fn pause(&mut self) -> Result<Vec<Event>> {
        let Some(event) = self.machine.pause(self.clock.now()) else {
            return Ok(Vec::new());
        };
        self.background.send(Request::EndSession).await?;
        self.persist().await?;
        Ok(vec![event])
    }

    /// Start when paused, pause when running.
    pub async fn toggle(&mut self) -> Result<Vec<Event>> {
        if self.machine.is_running() {
            self.pause().await
        } else {
            self.start().await
        }
    }

    /// Stop and refill the current phase. The session always ends.
    pub async fn reset(&mut self) -> Result<Vec<Event>> {
        let event = self.machine.reset(&self.settings, self.clock.now());
        self.background.send(Request::EndSession).await?;
        self.persist().await?;
        Ok(vec![event])
    }

    /// One-second tick. Finishing a phase leaves the timer paused on the
    /// next phase; the background session flag is left as it was.
    pub async fn tick(&mut self) -> Result<Vec<Event>> {
        let now = self.clock.now();
        let ended = self.machine.tick(&self.settings, now);
        let events = self.follow_up(ended).await?;
        self.persist().await?;
        Ok(events)
    }

    /// Store new settings, push the blocklist to the background and, if
    /// paused, refill the current phase with the new duration.
    pub async fn save_settings(&mut self, settings: Settings) -> Result<()> {
        kv::save(&*self.store, keys::SETTINGS, &settings).await?;
        self.background
            .send(Request::UpdateBlockedSites {
                sites: settings.blocked_sites.clone(),
            })
            .await?;
        self.machine.apply_settings(&settings);
        self.settings = settings;
        self.persist().await?;
        tracing::info!("settings saved");
        Ok(())
    }

    /// Attach a note to the session in progress.
    pub async fn add_note(&self, text: &str) -> Result<Note> {
        let session_number = self.machine.state().total_sessions + 1;
        self.notes.add(text, session_number, self.clock.now()).await
    }

    // ── Internal ─────────────────────────────────────────────────────

    async fn persist(&self) -> Result<()> {
        let state = self.machine.state();
        kv::save(&*self.store, keys::TIMER_STATE, state).await?;
        kv::save(&*self.store, keys::TOTAL_SESSIONS, &state.total_sessions).await?;
        kv::save(&*self.store, keys::SESSION_COUNT, &state.session_count).await?;
        Ok(())
    }

    /// Run phase-end side effects for each machine event, returning the
    /// events together with any they caused.
    async fn follow_up(&self, events: impl IntoIterator<Item = Event>) -> Result<Vec<Event>> {
        let mut out = Vec::new();
        for event in events {
            match &event {
                Event::FocusCompleted {
                    total_sessions, at, ..
                } => {
                    let (total_sessions, at) = (*total_sessions, *at);
                    out.push(event);
                    self.on_focus_completed(total_sessions, at, &mut out).await?;
                }
                Event::BreakCompleted { .. } => {
                    out.push(event);
                    deliver(&*self.notifier, Notification::break_over());
                }
                _ => out.push(event),
            }
        }
        Ok(out)
    }

    async fn on_focus_completed(
        &self,
        total_sessions: u64,
        at: chrono::DateTime<chrono::Utc>,
        out: &mut Vec<Event>,
    ) -> Result<()> {
        deliver(&*self.notifier, Notification::session_complete());

        let today = self.clock.today();
        let update = self.ledger.record_focus_completion(total_sessions, today).await?;
        if update.streak_changed {
            out.push(Event::StreakUpdated {
                current: update.streak.current_count,
                longest: update.streak.longest_count,
                at,
            });
        }
        if !update.unlocked.is_empty() {
            out.push(Event::AchievementsUnlocked {
                achievements: update.unlocked,
                at,
            });
        }

        // Partial minutes count as a whole one.
        let minutes = self.settings.focus_duration.div_ceil(60);
        productivity::record_focus(&*self.store, today, minutes).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    use crate::background::{self, BackgroundService};
    use crate::notify::{NotificationKind, RecordingNotifier};
    use crate::storage::MemoryStore;
    use crate::timer::{ManualClock, SessionPhase};

    struct Harness {
        store: Arc<MemoryStore>,
        notifier: Arc<RecordingNotifier>,
        clock: Arc<ManualClock>,
        background: BackgroundHandle,
    }

    impl Harness {
        async fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            let notifier = Arc::new(RecordingNotifier::new());
            let clock = Arc::new(ManualClock::new(
                Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap(),
            ));
            let service = BackgroundService::load(store.clone(), notifier.clone())
                .await
                .unwrap();
            let (background, _task) = background::spawn(service, None);
            Self {
                store,
                notifier,
                clock,
                background,
            }
        }

        async fn with_settings(settings: Settings) -> Self {
            let harness = Self::new().await;
            kv::save(&*harness.store, keys::SETTINGS, &settings).await.unwrap();
            harness
        }

        async fn load(&self) -> (Foreground, Vec<Event>) {
            Foreground::load(
                self.store.clone(),
                self.notifier.clone(),
                self.background.clone(),
                self.clock.clone(),
            )
            .await
            .unwrap()
        }
    }

    fn short_settings() -> Settings {
        Settings {
            focus_duration: 3,
            short_break_duration: 2,
            long_break_duration: 4,
            sessions_before_long_break: 2,
            blocked_sites: vec!["youtube.com".into()],
        }
    }

    #[tokio::test]
    async fn fresh_load_is_paused_focus() {
        let harness = Harness::new().await;
        let (fg, events) = harness.load().await;
        assert_eq!(fg.view().display, "25:00");
        assert_eq!(fg.state().phase(), SessionPhase::FocusPaused);
        assert!(matches!(events.as_slice(), [Event::Restored { .. }]));
        assert!(!harness.background.session_active().await.unwrap());
    }

    #[tokio::test]
    async fn start_and_pause_drive_session_flag() {
        let harness = Harness::new().await;
        let (mut fg, _) = harness.load().await;

        assert_eq!(fg.start().await.unwrap().len(), 1);
        assert!(harness.background.session_active().await.unwrap());
        assert!(fg.start().await.unwrap().is_empty());

        fg.pause().await.unwrap();
        assert!(!harness.background.session_active().await.unwrap());

        fg.toggle().await.unwrap();
        assert!(fg.is_running());
        fg.reset().await.unwrap();
        assert!(!fg.is_running());
        assert!(!harness.background.session_active().await.unwrap());
    }

    #[tokio::test]
    async fn completed_focus_runs_side_effects() {
        let harness = Harness::with_settings(short_settings()).await;
        let (mut fg, _) = harness.load().await;
        fg.start().await.unwrap();

        let mut events = Vec::new();
        for _ in 0..3 {
            harness.clock.advance(Duration::seconds(1));
            events.extend(fg.tick().await.unwrap());
        }

        assert!(matches!(
            events.as_slice(),
            [
                Event::FocusCompleted {
                    total_sessions: 1,
                    session_count: 1,
                    break_seconds: 2,
                    ..
                },
                Event::StreakUpdated { current: 1, .. },
            ]
        ));
        assert_eq!(fg.state().phase(), SessionPhase::BreakPaused);
        assert_eq!(
            harness.notifier.kinds(),
            vec![NotificationKind::SessionComplete]
        );
        // Phase end does not end the background session.
        assert!(harness.background.session_active().await.unwrap());

        let total: u64 = kv::load_or_default(&*harness.store, keys::TOTAL_SESSIONS).await.unwrap();
        assert_eq!(total, 1);
        let week = productivity::weekly(&*harness.store, harness.clock.today()).await.unwrap();
        assert_eq!(week.last().map(|d| d.sessions), Some(1));
        assert_eq!(week.last().map(|d| d.minutes), Some(1));
    }

    #[tokio::test]
    async fn break_end_notifies_and_refills_focus() {
        let harness = Harness::with_settings(short_settings()).await;
        let (mut fg, _) = harness.load().await;
        fg.start().await.unwrap();
        for _ in 0..3 {
            fg.tick().await.unwrap();
        }
        harness.notifier.clear();

        fg.start().await.unwrap();
        let mut events = Vec::new();
        for _ in 0..2 {
            events.extend(fg.tick().await.unwrap());
        }
        assert!(matches!(
            events.as_slice(),
            [Event::BreakCompleted { focus_seconds: 3, .. }]
        ));
        assert_eq!(harness.notifier.kinds(), vec![NotificationKind::BreakOver]);
        assert_eq!(fg.state().phase(), SessionPhase::FocusPaused);
    }

    #[tokio::test]
    async fn reload_subtracts_elapsed_running_time() {
        let harness = Harness::new().await;
        let (mut fg, _) = harness.load().await;
        fg.start().await.unwrap();
        drop(fg);

        harness.clock.advance(Duration::seconds(90));
        let (fg, events) = harness.load().await;
        assert_eq!(fg.state().remaining_seconds, 25 * 60 - 90);
        assert!(fg.is_running());
        assert!(matches!(
            events.as_slice(),
            [Event::Restored {
                elapsed_seconds: 90,
                ..
            }]
        ));
        assert!(harness.background.session_active().await.unwrap());
    }

    #[tokio::test]
    async fn reload_past_phase_end_fires_once() {
        let harness = Harness::with_settings(short_settings()).await;
        let (mut fg, _) = harness.load().await;
        fg.start().await.unwrap();
        drop(fg);

        harness.clock.advance(Duration::hours(3));
        let (fg, events) = harness.load().await;
        let completions = events
            .iter()
            .filter(|e| matches!(e, Event::FocusCompleted { .. }))
            .count();
        assert_eq!(completions, 1);
        assert_eq!(fg.state().total_sessions, 1);
        assert_eq!(fg.state().remaining_seconds, 2);
        assert!(!fg.is_running());
    }

    #[tokio::test]
    async fn paused_snapshot_keeps_remaining_time() {
        let harness = Harness::new().await;
        let (mut fg, _) = harness.load().await;
        fg.start().await.unwrap();
        harness.clock.advance(Duration::seconds(1));
        fg.tick().await.unwrap();
        fg.pause().await.unwrap();
        drop(fg);

        harness.clock.advance(Duration::hours(1));
        let (fg, _) = harness.load().await;
        assert_eq!(fg.state().remaining_seconds, 25 * 60 - 1);
        assert!(!fg.is_running());
    }

    #[tokio::test]
    async fn saved_settings_reach_blocker_and_timer() {
        let harness = Harness::new().await;
        let (mut fg, _) = harness.load().await;
        fg.start().await.unwrap();

        fg.save_settings(short_settings()).await.unwrap();
        assert_eq!(fg.state().remaining_seconds, 25 * 60);
        assert!(!harness
            .background
            .navigate("https://reddit.com")
            .await
            .unwrap()
            .is_blocked());
        assert!(harness
            .background
            .navigate("https://youtube.com")
            .await
            .unwrap()
            .is_blocked());

        fg.pause().await.unwrap();
        fg.save_settings(short_settings()).await.unwrap();
        assert_eq!(fg.state().remaining_seconds, 3);
    }

    #[tokio::test]
    async fn note_is_tagged_with_current_session() {
        let harness = Harness::with_settings(short_settings()).await;
        let (mut fg, _) = harness.load().await;
        assert_eq!(fg.add_note("first").await.unwrap().session_number, 1);

        fg.start().await.unwrap();
        for _ in 0..3 {
            fg.tick().await.unwrap();
        }
        assert_eq!(fg.add_note("second").await.unwrap().session_number, 2);
    }
}
