//! Long-lived background context.
//!
//! Owns the session-active flag and the blocklist. It learns about the
//! foreground only through [`Request`] messages; the flag follows
//! `startSession` / `endSession`, not the timer phase.

use std::sync::Arc;

use super::blocker::{SiteBlocker, Verdict};
use super::messages::{Request, Response};
use super::policy::{idle_alert, IdleState, DAILY_REMINDER_ALARM};
use crate::error::Result;
use crate::notify::{deliver, Notification, Notifier};
use crate::storage::keys;
use crate::storage::kv::{self, KvStore};

pub struct BackgroundService {
    active: bool,
    blocker: SiteBlocker,
    store: Arc<dyn KvStore>,
    notifier: Arc<dyn Notifier>,
}

impl BackgroundService {
    /// Start with the session inactive and the blocklist read from
    /// `blockedSites`, or the default list when none was stored.
    pub async fn load(store: Arc<dyn KvStore>, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let blocker = SiteBlocker::load(&*store).await?;
        tracing::debug!(sites = blocker.sites().len(), "background service loaded");
        Ok(Self {
            active: false,
            blocker,
            store,
            notifier,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn blocker(&self) -> &SiteBlocker {
        &self.blocker
    }

    /// Handle one foreground message. Only status queries produce a reply.
    pub async fn handle(&mut self, request: Request) -> Result<Option<Response>> {
        match request {
            Request::StartSession => {
                self.active = true;
                tracing::debug!("session active");
                Ok(None)
            }
            Request::EndSession => {
                self.active = false;
                tracing::debug!("session inactive");
                Ok(None)
            }
            Request::GetSessionStatus => Ok(Some(Response::SessionStatus {
                active: self.active,
            })),
            Request::GetTimerState { timer, is_focus } => {
                Ok(Some(Response::TimerState { timer, is_focus }))
            }
            Request::UpdateBlockedSites { sites } => {
                self.blocker.replace(&sites);
                kv::save(&*self.store, keys::BLOCKED_SITES, self.blocker.sites()).await?;
                tracing::info!(sites = ?self.blocker.sites(), "blocklist updated");
                Ok(None)
            }
        }
    }

    /// Evaluate a navigation; a block also raises a notification.
    pub fn on_navigate(&self, url: &str) -> Verdict {
        let verdict = self.blocker.evaluate(url, self.active);
        if let Verdict::Block { matched, .. } = &verdict {
            tracing::info!(url, matched = %matched, "navigation blocked");
            deliver(&*self.notifier, Notification::site_blocked());
        }
        verdict
    }

    /// React to a host idle-state change. Returns whether an alert was raised.
    pub fn on_idle_state(&self, state: IdleState) -> bool {
        match idle_alert(state, self.active) {
            Some(notification) => {
                deliver(&*self.notifier, notification);
                true
            }
            None => false,
        }
    }

    /// React to a named alarm. Returns whether it was recognised.
    pub fn on_alarm(&self, name: &str) -> bool {
        if name == DAILY_REMINDER_ALARM {
            deliver(&*self.notifier, Notification::daily_check_in());
            true
        } else {
            tracing::debug!(name, "ignoring unknown alarm");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NotificationKind, RecordingNotifier};
    use crate::settings::DEFAULT_BLOCKED_SITES;
    use crate::storage::MemoryStore;

    async fn service() -> (BackgroundService, Arc<MemoryStore>, Arc<RecordingNotifier>) {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let service = BackgroundService::load(store.clone(), notifier.clone())
            .await
            .unwrap();
        (service, store, notifier)
    }

    #[tokio::test]
    async fn starts_inactive_with_default_blocklist() {
        let (service, _, _) = service().await;
        assert!(!service.is_active());
        assert_eq!(service.blocker().sites().len(), DEFAULT_BLOCKED_SITES.len());
    }

    #[tokio::test]
    async fn start_and_end_toggle_flag() {
        let (mut service, _, _) = service().await;
        assert_eq!(service.handle(Request::StartSession).await.unwrap(), None);
        assert_eq!(
            service.handle(Request::GetSessionStatus).await.unwrap(),
            Some(Response::SessionStatus { active: true })
        );
        service.handle(Request::EndSession).await.unwrap();
        assert!(!service.is_active());
    }

    #[tokio::test]
    async fn timer_state_is_echoed() {
        let (mut service, store, _) = service().await;
        let reply = service
            .handle(Request::GetTimerState {
                timer: 90,
                is_focus: true,
            })
            .await
            .unwrap();
        assert_eq!(
            reply,
            Some(Response::TimerState {
                timer: 90,
                is_focus: true
            })
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn blocklist_update_persists_and_applies() {
        let (mut service, store, notifier) = service().await;
        service
            .handle(Request::UpdateBlockedSites {
                sites: vec!["news.ycombinator.com".into()],
            })
            .await
            .unwrap();
        assert_eq!(
            store.get(keys::BLOCKED_SITES).await.unwrap(),
            Some(serde_json::json!(["news.ycombinator.com"]))
        );

        service.handle(Request::StartSession).await.unwrap();
        assert!(service.on_navigate("https://news.ycombinator.com/item?id=1").is_blocked());
        assert!(!service.on_navigate("https://youtube.com").is_blocked());
        assert_eq!(notifier.kinds(), vec![NotificationKind::SiteBlocked]);

        let reloaded = BackgroundService::load(store.clone(), notifier.clone())
            .await
            .unwrap();
        assert_eq!(reloaded.blocker().sites(), ["news.ycombinator.com"]);
    }

    #[tokio::test]
    async fn idle_alert_refires_on_every_transition() {
        let (mut service, _, notifier) = service().await;
        assert!(!service.on_idle_state(IdleState::Idle));

        service.handle(Request::StartSession).await.unwrap();
        assert!(service.on_idle_state(IdleState::Idle));
        assert!(!service.on_idle_state(IdleState::Active));
        assert!(service.on_idle_state(IdleState::Idle));
        assert_eq!(
            notifier.kinds(),
            vec![NotificationKind::IdleAlert, NotificationKind::IdleAlert]
        );
    }

    #[tokio::test]
    async fn daily_alarm_ignores_session_state() {
        let (service, _, notifier) = service().await;
        assert!(service.on_alarm(DAILY_REMINDER_ALARM));
        assert!(!service.on_alarm("somethingElse"));
        assert_eq!(notifier.kinds(), vec![NotificationKind::DailyCheckIn]);
    }
}
