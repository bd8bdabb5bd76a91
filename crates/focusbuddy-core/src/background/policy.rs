//! Idle alerts and the daily check-in schedule.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::Notification;

pub const DEFAULT_IDLE_THRESHOLD_SECS: u64 = 60;
pub const DAILY_REMINDER_ALARM: &str = "dailyReminder";
pub const DAILY_REMINDER_PERIOD_MINUTES: i64 = 1440;

/// Host-reported user activity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdleState {
    Active,
    Idle,
    Locked,
}

/// Alert decision for an idle-state transition.
///
/// Every transition into `Idle` while a session is active raises an alert;
/// there is no suppression of repeats.
pub fn idle_alert(state: IdleState, session_active: bool) -> Option<Notification> {
    (state == IdleState::Idle && session_active).then(Notification::idle_alert)
}

/// Turns activity timestamps into idle-state transitions.
///
/// The host reports activity; `poll` is called periodically and reports
/// `Idle` once when the threshold is crossed. The next activity reports
/// `Active` again.
#[derive(Debug, Clone)]
pub struct IdleDetector {
    threshold: Duration,
    last_activity: DateTime<Utc>,
    state: IdleState,
}

impl IdleDetector {
    pub fn new(threshold_secs: u64, now: DateTime<Utc>) -> Self {
        Self {
            threshold: Duration::seconds(threshold_secs.min(u64::from(u32::MAX)) as i64),
            last_activity: now,
            state: IdleState::Active,
        }
    }

    pub fn state(&self) -> IdleState {
        self.state
    }

    pub fn record_activity(&mut self, now: DateTime<Utc>) -> Option<IdleState> {
        self.last_activity = now;
        if self.state == IdleState::Active {
            return None;
        }
        self.state = IdleState::Active;
        Some(IdleState::Active)
    }

    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<IdleState> {
        if self.state == IdleState::Active && now - self.last_activity >= self.threshold {
            self.state = IdleState::Idle;
            return Some(IdleState::Idle);
        }
        None
    }
}

/// Fixed-period alarm anchored to a local wall-clock hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyReminder {
    hour: u32,
}

impl Default for DailyReminder {
    fn default() -> Self {
        Self { hour: 8 }
    }
}

impl DailyReminder {
    /// `hour` is clamped to 0..=23.
    pub fn at_hour(hour: u32) -> Self {
        Self { hour: hour.min(23) }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn period() -> Duration {
        Duration::minutes(DAILY_REMINDER_PERIOD_MINUTES)
    }

    /// First firing: today at the anchor hour, or tomorrow's if `now` is
    /// already past it.
    pub fn first_fire<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        let anchor = NaiveTime::from_hms_opt(self.hour, 0, 0).unwrap_or_default();
        let today = self.resolve(now, now.date_naive().and_time(anchor));
        if *now > today {
            let tomorrow = now.date_naive().succ_opt().unwrap_or(now.date_naive());
            self.resolve(now, tomorrow.and_time(anchor))
        } else {
            today
        }
    }

    /// Subsequent firings are a fixed period apart, in absolute time.
    pub fn next_after<Tz: TimeZone>(&self, fired: &DateTime<Tz>) -> DateTime<Tz> {
        fired.clone() + Self::period()
    }

    /// The next firing strictly after `now`. Periods missed while the host
    /// was suspended collapse into the one that just fired.
    pub fn next_due<Tz: TimeZone>(&self, fired: &DateTime<Tz>, now: &DateTime<Tz>) -> DateTime<Tz> {
        let mut next = self.next_after(fired);
        while next <= *now {
            next = self.next_after(&next);
        }
        next
    }

    fn resolve<Tz: TimeZone>(&self, now: &DateTime<Tz>, local: chrono::NaiveDateTime) -> DateTime<Tz> {
        let tz = now.timezone();
        tz.from_local_datetime(&local)
            .earliest()
            // The anchor fell into a DST gap; shift past it.
            .or_else(|| tz.from_local_datetime(&(local + Duration::hours(1))).earliest())
            .unwrap_or_else(|| tz.from_utc_datetime(&local))
    }
}
