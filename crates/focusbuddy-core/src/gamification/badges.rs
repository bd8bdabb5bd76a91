//! Levels and achievements derived from the total number of focus sessions.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    #[default]
    Newbie,
    Starter,
    Achiever,
    #[serde(rename = "Focus Master", alias = "FocusMaster")]
    FocusMaster,
}

impl Level {
    /// Level for a session total. Recomputed from scratch on every update.
    pub fn for_sessions(total: u64) -> Self {
        match total {
            30.. => Level::FocusMaster,
            10.. => Level::Achiever,
            1.. => Level::Starter,
            0 => Level::Newbie,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Newbie => "Newbie",
            Level::Starter => "Starter",
            Level::Achiever => "Achiever",
            Level::FocusMaster => "Focus Master",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Achievement {
    #[serde(rename = "Centurion")]
    Centurion,
    #[serde(rename = "Half Century")]
    HalfCentury,
    #[serde(rename = "Decathlete")]
    Decathlete,
}

impl Achievement {
    /// Highest threshold first; unlock notifications list names in this order.
    pub const ALL: [Achievement; 3] = [
        Achievement::Centurion,
        Achievement::HalfCentury,
        Achievement::Decathlete,
    ];

    pub fn threshold(self) -> u64 {
        match self {
            Achievement::Centurion => 100,
            Achievement::HalfCentury => 50,
            Achievement::Decathlete => 10,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Achievement::Centurion => "Centurion",
            Achievement::HalfCentury => "Half Century",
            Achievement::Decathlete => "Decathlete",
        }
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stored under `badges`.
///
/// Achievements are kept as plain names so that an unrecognised entry in
/// storage survives a round trip instead of discarding the whole record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeRecord {
    #[serde(default, alias = "focusSessions")]
    pub total_focus_sessions: u64,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub achievements: Vec<String>,
}

impl BadgeRecord {
    pub fn has(&self, achievement: Achievement) -> bool {
        self.achievements.iter().any(|a| a == achievement.name())
    }

    /// Set the running total, unlock any newly crossed thresholds and
    /// recompute the level. Returns the achievements unlocked by this call.
    ///
    /// Achievements are never removed, even if `total` is lower than a
    /// previously recorded value.
    pub fn apply_total(&mut self, total: u64) -> Vec<Achievement> {
        self.total_focus_sessions = total;

        let unlocked: Vec<Achievement> = Achievement::ALL
            .into_iter()
            .filter(|a| total >= a.threshold() && !self.has(*a))
            .collect();
        self.achievements
            .extend(unlocked.iter().map(|a| a.name().to_string()));

        self.level = Level::for_sessions(total);
        unlocked
    }
}
