//! User timer settings.
//!
//! Durations are stored in seconds but entered in whole minutes. The record
//! lives under the `settings` key and is read by the session machine (phase
//! durations) and the background service (blocklist).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_BLOCKED_SITES: [&str; 5] = [
    "facebook.com",
    "instagram.com",
    "twitter.com",
    "youtube.com",
    "reddit.com",
];

/// Keys accepted by [`Settings::apply`].
pub const SETTING_KEYS: [&str; 5] = [
    "focusDuration",
    "shortBreak",
    "longBreak",
    "sessionsBeforeLongBreak",
    "blockedSites",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Focus phase length in seconds.
    #[serde(default = "default_focus_duration")]
    pub focus_duration: u64,
    #[serde(default = "default_short_break", alias = "shortBreak")]
    pub short_break_duration: u64,
    #[serde(default = "default_long_break", alias = "longBreak")]
    pub long_break_duration: u64,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
    #[serde(default = "default_blocked_sites")]
    pub blocked_sites: Vec<String>,
}

fn default_focus_duration() -> u64 {
    25 * 60
}
fn default_short_break() -> u64 {
    5 * 60
}
fn default_long_break() -> u64 {
    15 * 60
}
fn default_sessions_before_long_break() -> u32 {
    4
}
fn default_blocked_sites() -> Vec<String> {
    DEFAULT_BLOCKED_SITES.iter().map(|s| s.to_string()).collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_duration: default_focus_duration(),
            short_break_duration: default_short_break(),
            long_break_duration: default_long_break(),
            sessions_before_long_break: default_sessions_before_long_break(),
            blocked_sites: default_blocked_sites(),
        }
    }
}

impl Settings {
    /// Break length that follows the `session_count`-th completed focus phase.
    ///
    /// Every `sessions_before_long_break`-th break is long. A count of zero
    /// also selects the long break, matching the reset rule for a break
    /// phase entered before any session completed.
    pub fn break_duration(&self, session_count: u64) -> u64 {
        let every = u64::from(self.sessions_before_long_break.max(1));
        if session_count % every == 0 {
            self.long_break_duration
        } else {
            self.short_break_duration
        }
    }

    /// Full length of the given phase.
    pub fn phase_duration(&self, is_focus_phase: bool, session_count: u64) -> u64 {
        if is_focus_phase {
            self.focus_duration
        } else {
            self.break_duration(session_count)
        }
    }

    /// Build settings from raw form input: minutes for the durations and a
    /// comma-separated blocklist.
    ///
    /// # Errors
    ///
    /// Rejects non-numeric or zero durations and a long-break interval
    /// below one.
    pub fn from_input(
        focus_min: &str,
        short_break_min: &str,
        long_break_min: &str,
        sessions_before_long_break: &str,
        blocked_sites: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            focus_duration: parse_minutes("focusDuration", focus_min)?,
            short_break_duration: parse_minutes("shortBreak", short_break_min)?,
            long_break_duration: parse_minutes("longBreak", long_break_min)?,
            sessions_before_long_break: parse_interval(sessions_before_long_break)?,
            blocked_sites: parse_site_list(blocked_sites),
        })
    }

    /// Update a single field from raw input. See [`SETTING_KEYS`].
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ValidationError> {
        match key {
            "focusDuration" => self.focus_duration = parse_minutes(key, value)?,
            "shortBreak" => self.short_break_duration = parse_minutes(key, value)?,
            "longBreak" => self.long_break_duration = parse_minutes(key, value)?,
            "sessionsBeforeLongBreak" => self.sessions_before_long_break = parse_interval(value)?,
            "blockedSites" => self.blocked_sites = parse_site_list(value),
            _ => {
                return Err(ValidationError::InvalidValue {
                    field: key.to_string(),
                    message: format!("unknown setting, expected one of {}", SETTING_KEYS.join(", ")),
                })
            }
        }
        Ok(())
    }

    /// Render a single field the way it is entered (minutes, comma list).
    pub fn display_value(&self, key: &str) -> Option<String> {
        Some(match key {
            "focusDuration" => (self.focus_duration / 60).to_string(),
            "shortBreak" => (self.short_break_duration / 60).to_string(),
            "longBreak" => (self.long_break_duration / 60).to_string(),
            "sessionsBeforeLongBreak" => self.sessions_before_long_break.to_string(),
            "blockedSites" => self.blocked_sites.join(", "),
            _ => return None,
        })
    }
}

/// Split a comma-separated blocklist, trimming entries and dropping blanks.
pub fn parse_site_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|site| !site.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_minutes(field: &str, raw: &str) -> Result<u64, ValidationError> {
    let minutes: u64 = raw.trim().parse().map_err(|_| ValidationError::InvalidValue {
        field: field.to_string(),
        message: format!("'{raw}' is not a whole number of minutes"),
    })?;
    if minutes == 0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "duration must be at least one minute".into(),
        });
    }
    minutes
        .checked_mul(60)
        .ok_or_else(|| ValidationError::InvalidValue {
            field: field.to_string(),
            message: "duration is too large".into(),
        })
}

fn parse_interval(raw: &str) -> Result<u32, ValidationError> {
    let field = "sessionsBeforeLongBreak";
    let n: u32 = raw.trim().parse().map_err(|_| ValidationError::InvalidValue {
        field: field.to_string(),
        message: format!("'{raw}' is not a whole number"),
    })?;
    if n == 0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "must be at least 1".into(),
        });
    }
    Ok(n)
}
