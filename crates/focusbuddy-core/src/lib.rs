//! # FocusBuddy Core Library
//!
//! This library provides the core logic for the FocusBuddy focus timer.
//! Everything runs headless; the CLI binary is a thin layer over it.
//!
//! ## Architecture
//!
//! - **Timer**: A Pomodoro state machine advanced by one-second ticks, with
//!   wall-clock recovery when a stored snapshot is reloaded
//! - **Foreground / Background**: Two contexts sharing one key-value store.
//!   The foreground owns the timer; the background owns the session flag,
//!   the site blocklist and the idle and daily alerts. They talk only
//!   through [`background::Request`] messages
//! - **Storage**: An async key-value trait with SQLite and in-memory
//!   backends, plus TOML-based application configuration
//! - **Gamification**: Daily streak and session-count badges
//!
//! ## Key Components
//!
//! - [`SessionMachine`]: Core timer state machine
//! - [`Foreground`]: Timer controller with persistence and side effects
//! - [`BackgroundService`]: Session flag, blocking and alert policy
//! - [`KvStore`]: Persistence seam shared by both contexts
//! - [`AppConfig`]: Application configuration management

pub mod background;
pub mod error;
pub mod events;
pub mod foreground;
pub mod gamification;
pub mod notes;
pub mod notify;
pub mod preferences;
pub mod productivity;
pub mod settings;
pub mod storage;
pub mod tasks;
pub mod timer;

pub use background::{BackgroundHandle, BackgroundService, Request, Response, SiteBlocker, Verdict};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use foreground::Foreground;
pub use gamification::{Achievement, BadgeRecord, Ledger, Level, StreakRecord};
pub use notes::{IndexedNote, Note, NoteLog};
pub use notify::{LogNotifier, Notification, NotificationKind, Notifier};
pub use productivity::ProductivityDay;
pub use settings::Settings;
pub use storage::{AppConfig, KvStore, MemoryStore, SqliteStore};
pub use tasks::{Task, TaskList};
pub use timer::{Clock, SessionMachine, SessionPhase, SystemClock, TimerState, TimerView};
