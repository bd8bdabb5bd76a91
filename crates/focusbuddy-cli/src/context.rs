//! Wiring shared by the commands: store, notifier and the two contexts.

use std::sync::Arc;

use focusbuddy_core::background::{self, BackgroundHandle, DailyReminder};
use focusbuddy_core::error::{ConfigError, Result};
use focusbuddy_core::storage::StorageBackend;
use focusbuddy_core::{
    AppConfig, BackgroundService, Event, Foreground, KvStore, LogNotifier, Notification,
    Notifier, SqliteStore, SystemClock,
};

/// Prints notifications to stderr so stdout stays machine-readable.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: &Notification) -> Result<()> {
        eprintln!("[{}] {}", notification.title, notification.message);
        Ok(())
    }
}

pub struct Context {
    pub config: AppConfig,
    pub store: Arc<dyn KvStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl Context {
    pub fn open(config: AppConfig) -> Result<Self> {
        let store: Arc<dyn KvStore> = match config.storage.backend {
            StorageBackend::Sqlite => Arc::new(SqliteStore::open()?),
            StorageBackend::Memory => {
                return Err(ConfigError::InvalidValue {
                    key: "storage.backend".into(),
                    message: "the memory backend forgets everything between commands".into(),
                }
                .into())
            }
        };
        let notifier: Arc<dyn Notifier> = if config.notifications.enabled {
            Arc::new(TerminalNotifier)
        } else {
            Arc::new(LogNotifier)
        };
        Ok(Self {
            config,
            store,
            notifier,
        })
    }

    /// Spawn the background service for this process. The daily reminder
    /// only makes sense for long-running commands.
    pub async fn background(&self, with_reminder: bool) -> Result<BackgroundHandle> {
        let service = BackgroundService::load(self.store.clone(), self.notifier.clone()).await?;
        let reminder = with_reminder
            .then(|| DailyReminder::at_hour(self.config.policy.daily_reminder_hour));
        Ok(background::spawn(service, reminder).0)
    }

    /// Restore the foreground against a background spawned for it.
    pub async fn foreground(&self, with_reminder: bool) -> Result<(Foreground, Vec<Event>)> {
        let bg = self.background(with_reminder).await?;
        Foreground::load(
            self.store.clone(),
            self.notifier.clone(),
            bg,
            Arc::new(SystemClock),
        )
        .await
    }
}
