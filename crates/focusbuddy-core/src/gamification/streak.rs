//! Daily focus streak.
//!
//! A streak counts consecutive calendar days with at least one completed
//! focus session. The record changes at most once per day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakRecord {
    #[serde(default)]
    pub last_completion_date: Option<NaiveDate>,
    #[serde(default)]
    pub current_count: u32,
    #[serde(default)]
    pub longest_count: u32,
}

impl StreakRecord {
    /// Register a focus completion on `today`.
    ///
    /// Returns `false` (and changes nothing) when today is already counted.
    /// Continues the streak when the last completion was yesterday, and
    /// restarts it at 1 after any gap or on the first completion ever.
    pub fn record_completion(&mut self, today: NaiveDate) -> bool {
        if self.last_completion_date == Some(today) {
            return false;
        }

        let continues = match (self.last_completion_date, today.pred_opt()) {
            (Some(last), Some(yesterday)) => last == yesterday,
            _ => false,
        };
        self.current_count = if continues {
            self.current_count.saturating_add(1)
        } else {
            1
        };
        self.longest_count = self.longest_count.max(self.current_count);
        self.last_completion_date = Some(today);
        true
    }
}
