//! Persisted key names. The namespace is flat and shared by both contexts.

pub const BLOCKED_SITES: &str = "blockedSites";
pub const SETTINGS: &str = "settings";
pub const TIMER_STATE: &str = "timerState";
pub const TOTAL_SESSIONS: &str = "totalSessions";
pub const SESSION_COUNT: &str = "sessionCount";
pub const DARK_MODE: &str = "darkMode";
pub const STREAK: &str = "streak";
pub const BADGES: &str = "badges";
pub const TASKS: &str = "tasks";
pub const NOTES: &str = "notes";
pub const PRODUCTIVITY_DATA: &str = "productivityData";
