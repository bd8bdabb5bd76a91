//! Rolling seven-day productivity log, stored under `productivityData`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::keys;
use crate::storage::kv::{self, KvStore};

/// Number of calendar days kept, today included.
pub const WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductivityDay {
    pub day: NaiveDate,
    pub sessions: u32,
    pub minutes: u64,
}

impl ProductivityDay {
    /// Short weekday label, e.g. `Mon`.
    pub fn label(&self) -> String {
        self.day.weekday().to_string()
    }
}

/// Add one completed focus session of `minutes` to `today` and drop days
/// that fell out of the window. Returns the updated log, oldest first.
pub async fn record_focus<S: KvStore + ?Sized>(
    store: &S,
    today: NaiveDate,
    minutes: u64,
) -> Result<Vec<ProductivityDay>> {
    let mut days: Vec<ProductivityDay> = kv::load_or_default(store, keys::PRODUCTIVITY_DATA).await?;

    match days.iter_mut().find(|d| d.day == today) {
        Some(entry) => {
            entry.sessions = entry.sessions.saturating_add(1);
            entry.minutes = entry.minutes.saturating_add(minutes);
        }
        None => days.push(ProductivityDay {
            day: today,
            sessions: 1,
            minutes,
        }),
    }

    days.retain(|d| (today - d.day).num_days() < WINDOW_DAYS && d.day <= today);
    days.sort_by_key(|d| d.day);
    kv::save(store, keys::PRODUCTIVITY_DATA, &days).await?;
    Ok(days)
}

/// The last seven days ending at `today`, oldest first, with empty days
/// filled in as zero.
pub async fn weekly<S: KvStore + ?Sized>(store: &S, today: NaiveDate) -> Result<Vec<ProductivityDay>> {
    let stored: Vec<ProductivityDay> = kv::load_or_default(store, keys::PRODUCTIVITY_DATA).await?;
    Ok((0..WINDOW_DAYS)
        .rev()
        .filter_map(|back| today.checked_sub_days(chrono::Days::new(back as u64)))
        .map(|day| {
            stored
                .iter()
                .find(|d| d.day == day)
                .cloned()
                .unwrap_or(ProductivityDay {
                    day,
                    sessions: 0,
                    minutes: 0,
                })
        })
        .collect())
}
