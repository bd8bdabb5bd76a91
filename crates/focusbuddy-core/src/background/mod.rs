//! Background context: session flag, site blocking, idle and daily alerts.

pub mod blocker;
pub mod messages;
pub mod policy;
mod runtime;
mod service;

pub use blocker::{SiteBlocker, Verdict, BLOCKED_PAGE};
pub use messages::{Request, Response};
pub use policy::{idle_alert, DailyReminder, IdleDetector, IdleState, DAILY_REMINDER_ALARM};
pub use runtime::{spawn, spawn_with_clock, BackgroundHandle};
pub use service::BackgroundService;
