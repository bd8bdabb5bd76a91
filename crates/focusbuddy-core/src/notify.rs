//! User-facing notifications.
//!
//! Both contexts raise notifications through a [`Notifier`]. Delivery is
//! best effort: a failing notifier is logged and otherwise ignored.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gamification::Achievement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    IdleAlert,
    SiteBlocked,
    DailyCheckIn,
    SessionComplete,
    BreakOver,
    AchievementUnlocked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    fn new(kind: NotificationKind, title: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn idle_alert() -> Self {
        Self::new(
            NotificationKind::IdleAlert,
            "FocusBuddy Alert",
            "You've been idle during a focus session!",
        )
    }

    pub fn site_blocked() -> Self {
        Self::new(
            NotificationKind::SiteBlocked,
            "FocusBuddy Blocked",
            "This site is blocked during focus sessions",
        )
    }

    pub fn daily_check_in() -> Self {
        Self::new(
            NotificationKind::DailyCheckIn,
            "Daily Focus Check-in",
            "Ready to crush your goals today? Start a focus session!",
        )
    }

    pub fn session_complete() -> Self {
        Self::new(
            NotificationKind::SessionComplete,
            "Focus session complete!",
            "Time for a break",
        )
    }

    pub fn break_over() -> Self {
        Self::new(
            NotificationKind::BreakOver,
            "Break over!",
            "Ready for another focus session?",
        )
    }

    /// One notification naming every achievement unlocked by a single update.
    pub fn achievements_unlocked(unlocked: &[Achievement]) -> Self {
        let names: Vec<&str> = unlocked.iter().map(|a| a.name()).collect();
        Self::new(
            NotificationKind::AchievementUnlocked,
            "Achievement Unlocked!",
            format!("You earned: {}", names.join(", ")),
        )
    }
}

/// Sink for notifications. Implementations decide how they reach the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<()>;
}

/// Deliver a notification, logging and swallowing delivery failures.
pub fn deliver(notifier: &dyn Notifier, notification: Notification) {
    tracing::debug!(kind = ?notification.kind, title = %notification.title, "notify");
    if let Err(e) = notifier.notify(&notification) {
        tracing::warn!(kind = ?notification.kind, error = %e, "notification delivery failed");
    }
}

/// Writes notifications to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<()> {
        tracing::info!(title = %notification.title, message = %notification.message, "notification");
        Ok(())
    }
}

/// Keeps every notification in memory. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications delivered so far, oldest first.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Kinds delivered so far, oldest first.
    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.sent().into_iter().map(|n| n.kind).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.clear();
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Result<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    struct Broken;

    impl Notifier for Broken {
        fn notify(&self, _notification: &Notification) -> Result<()> {
            Err(CoreError::Io(std::io::Error::other("no display")))
        }
    }

    #[test]
    fn achievement_message_lists_all_names() {
        let n = Notification::achievements_unlocked(&[
            Achievement::HalfCentury,
            Achievement::Decathlete,
        ]);
        assert_eq!(n.title, "Achievement Unlocked!");
        assert_eq!(n.message, "You earned: Half Century, Decathlete");
    }

    #[test]
    fn delivery_failure_is_swallowed() {
        deliver(&Broken, Notification::break_over());
    }

    #[test]
    fn recording_notifier_keeps_order() {
        let rec = RecordingNotifier::new();
        deliver(&rec, Notification::session_complete());
        deliver(&rec, Notification::idle_alert());
        assert_eq!(
            rec.kinds(),
            vec![NotificationKind::SessionComplete, NotificationKind::IdleAlert]
        );
        rec.clear();
        assert!(rec.sent().is_empty());
    }
}
