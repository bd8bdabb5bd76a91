//! Streak and badge bookkeeping driven by focus-session completions.

mod badges;
mod streak;

pub use badges::{Achievement, BadgeRecord, Level};
pub use streak::StreakRecord;

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::Result;
use crate::notify::{deliver, Notification, Notifier};
use crate::storage::keys;
use crate::storage::kv::{self, KvStore};

/// What a single completion changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerUpdate {
    pub streak: StreakRecord,
    /// `false` when today had already been counted.
    pub streak_changed: bool,
    pub badges: BadgeRecord,
    pub unlocked: Vec<Achievement>,
}

/// Reads and writes the `streak` and `badges` records.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn KvStore>,
    notifier: Arc<dyn Notifier>,
}

impl Ledger {
    pub fn new(store: Arc<dyn KvStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Register one completed focus session. `total_sessions` is the running
    /// total after the completion; `today` is the local calendar date.
    pub async fn record_focus_completion(
        &self,
        total_sessions: u64,
        today: NaiveDate,
    ) -> Result<LedgerUpdate> {
        let (streak, streak_changed) = self.update_streak(today).await?;
        let (badges, unlocked) = self.update_badges(total_sessions).await?;
        Ok(LedgerUpdate {
            streak,
            streak_changed,
            badges,
            unlocked,
        })
    }

    /// Read-modify-write of the streak record. Idempotent per calendar day.
    pub async fn update_streak(&self, today: NaiveDate) -> Result<(StreakRecord, bool)> {
        let mut streak: StreakRecord = kv::load_or_default(&*self.store, keys::STREAK).await?;
        if !streak.record_completion(today) {
            tracing::debug!(%today, "streak already counted today");
            return Ok((streak, false));
        }
        kv::save(&*self.store, keys::STREAK, &streak).await?;
        tracing::info!(
            current = streak.current_count,
            longest = streak.longest_count,
            "streak updated"
        );
        Ok((streak, true))
    }

    /// Read-modify-write of the badge record, notifying once for all
    /// achievements unlocked by this update.
    pub async fn update_badges(&self, total_sessions: u64) -> Result<(BadgeRecord, Vec<Achievement>)> {
        let mut badges: BadgeRecord = kv::load_or_default(&*self.store, keys::BADGES).await?;
        let unlocked = badges.apply_total(total_sessions);
        kv::save(&*self.store, keys::BADGES, &badges).await?;

        if !unlocked.is_empty() {
            tracing::info!(?unlocked, level = %badges.level, "achievements unlocked");
            deliver(&*self.notifier, Notification::achievements_unlocked(&unlocked));
        }
        Ok((badges, unlocked))
    }

    pub async fn streak(&self) -> Result<StreakRecord> {
        kv::load_or_default(&*self.store, keys::STREAK).await
    }

    pub async fn badges(&self) -> Result<BadgeRecord> {
        kv::load_or_default(&*self.store, keys::BADGES).await
    }
}
