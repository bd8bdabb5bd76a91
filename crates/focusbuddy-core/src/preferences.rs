//! Small UI preferences and the motivational quote pool.

use rand::seq::SliceRandom;

use crate::error::Result;
use crate::storage::keys;
use crate::storage::kv::{self, KvStore};

pub const QUOTES: [&str; 10] = [
    "The secret of getting ahead is getting started.",
    "Focus on being productive instead of busy.",
    "You don't have to be great to start, but you have to start to be great.",
    "Concentrate all your thoughts upon the work at hand.",
    "The successful warrior is the average man, with laser-like focus.",
    "Productivity is never an accident. It's always the result of commitment to excellence.",
    "The way to get started is to quit talking and begin doing.",
    "Your focus determines your reality.",
    "The more you use your brain, the more brain you will have to use.",
    "The future depends on what you do today.",
];

/// Pick a quote uniformly at random.
pub fn random_quote() -> &'static str {
    QUOTES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(QUOTES[0])
}

/// Stored theme preference, `None` when the user never chose one.
pub async fn dark_mode<S: KvStore + ?Sized>(store: &S) -> Result<Option<bool>> {
    kv::load(store, keys::DARK_MODE).await
}

pub async fn set_dark_mode<S: KvStore + ?Sized>(store: &S, enabled: bool) -> Result<()> {
    kv::save(store, keys::DARK_MODE, &enabled).await
}

/// Flip the theme and return the new value. An unset preference counts as light.
pub async fn toggle_dark_mode<S: KvStore + ?Sized>(store: &S) -> Result<bool> {
    let enabled = !dark_mode(store).await?.unwrap_or(false);
    set_dark_mode(store, enabled).await?;
    Ok(enabled)
}
