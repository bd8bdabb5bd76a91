//! Navigation filter for distracting sites.
//!
//! Matching is a plain substring test against the URL's hostname, so
//! `youtube.com` also catches `music.youtube.com` and `notyoutube.com`.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;
use crate::settings::DEFAULT_BLOCKED_SITES;
use crate::storage::keys;
use crate::storage::kv::{self, KvStore};

/// Local page a blocked navigation is redirected to.
pub const BLOCKED_PAGE: &str = "blocked.html";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Allow,
    Block { redirect_to: String, matched: String },
}

impl Verdict {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Verdict::Block { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteBlocker {
    sites: Vec<String>,
}

impl SiteBlocker {
    pub fn new<I, S>(sites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut blocker = Self::default();
        blocker.replace(sites);
        blocker
    }

    /// Blocklist persisted under `blockedSites`, or the default list when
    /// none was stored.
    pub async fn load<S: KvStore + ?Sized>(store: &S) -> Result<Self> {
        let stored: Option<Vec<String>> = kv::load(store, keys::BLOCKED_SITES).await?;
        Ok(match stored {
            Some(sites) => Self::new(sites),
            None => Self::new(DEFAULT_BLOCKED_SITES),
        })
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    /// Swap in a new blocklist. Entries are trimmed and lowercased; blank
    /// entries are dropped since they would match every host.
    pub fn replace<I, S>(&mut self, sites: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sites = sites
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
    }

    /// First blocklist entry contained in `host`, if any.
    pub fn matching_entry(&self, host: &str) -> Option<&str> {
        self.sites
            .iter()
            .find(|site| host.contains(site.as_str()))
            .map(String::as_str)
    }

    /// Decide a navigation. Everything is allowed while no session is
    /// active, as are URLs without a hostname or that fail to parse.
    pub fn evaluate(&self, url: &str, session_active: bool) -> Verdict {
        if !session_active {
            return Verdict::Allow;
        }
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(url, error = %e, "unparseable navigation target, allowing");
                return Verdict::Allow;
            }
        };
        let Some(host) = parsed.host_str() else {
            return Verdict::Allow;
        };
        match self.matching_entry(host) {
            Some(site) => Verdict::Block {
                redirect_to: BLOCKED_PAGE.to_string(),
                matched: site.to_string(),
            },
            None => Verdict::Allow,
        }
    }
}
