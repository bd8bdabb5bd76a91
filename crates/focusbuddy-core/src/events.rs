use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gamification::Achievement;
use crate::timer::SessionPhase;

/// Every state change in the foreground produces an Event.
/// The CLI prints them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        is_focus_phase: bool,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        is_focus_phase: bool,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    /// A focus phase ran out; counters were bumped and a break is next.
    FocusCompleted {
        total_sessions: u64,
        session_count: u64,
        break_seconds: u64,
        at: DateTime<Utc>,
    },
    /// A break ran out; a focus phase is next.
    BreakCompleted {
        focus_seconds: u64,
        at: DateTime<Utc>,
    },
    /// State was restored from a stored snapshot.
    Restored {
        phase: SessionPhase,
        elapsed_seconds: u64,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    StreakUpdated {
        current: u32,
        longest: u32,
        at: DateTime<Utc>,
    },
    AchievementsUnlocked {
        achievements: Vec<Achievement>,
        at: DateTime<Utc>,
    },
}
