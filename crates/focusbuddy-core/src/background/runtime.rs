//! Runs a [`BackgroundService`] on its own task.
//!
//! The foreground talks to it through a [`BackgroundHandle`]: every call
//! is a message on an mpsc channel, answered over a oneshot. The task also
//! owns the daily reminder timer.

use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::blocker::Verdict;
use super::messages::{Request, Response};
use super::policy::{DailyReminder, IdleState, DAILY_REMINDER_ALARM};
use super::service::BackgroundService;
use crate::error::{CoreError, Result};
use crate::timer::{Clock, SystemClock};

const CHANNEL_CAPACITY: usize = 64;

enum Envelope {
    Message {
        request: Request,
        reply: oneshot::Sender<Result<Option<Response>>>,
    },
    Navigate {
        url: String,
        reply: oneshot::Sender<Verdict>,
    },
    Idle(IdleState),
    Alarm(String),
}

/// Cloneable sender side of the background task.
#[derive(Clone)]
pub struct BackgroundHandle {
    tx: mpsc::Sender<Envelope>,
}

impl BackgroundHandle {
    /// Deliver a protocol message and wait for its reply, if any.
    pub async fn send(&self, request: Request) -> Result<Option<Response>> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope::Message { request, reply })
            .await
            .map_err(|_| CoreError::ChannelClosed)?;
        rx.await.map_err(|_| CoreError::ChannelClosed)?
    }

    pub async fn session_active(&self) -> Result<bool> {
        match self.send(Request::GetSessionStatus).await? {
            Some(Response::SessionStatus { active }) => Ok(active),
            _ => Ok(false),
        }
    }

    pub async fn navigate(&self, url: impl Into<String>) -> Result<Verdict> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope::Navigate {
                url: url.into(),
                reply,
            })
            .await
            .map_err(|_| CoreError::ChannelClosed)?;
        rx.await.map_err(|_| CoreError::ChannelClosed)
    }

    pub async fn idle_state_changed(&self, state: IdleState) -> Result<()> {
        self.tx
            .send(Envelope::Idle(state))
            .await
            .map_err(|_| CoreError::ChannelClosed)
    }

    pub async fn fire_alarm(&self, name: impl Into<String>) -> Result<()> {
        self.tx
            .send(Envelope::Alarm(name.into()))
            .await
            .map_err(|_| CoreError::ChannelClosed)
    }
}

/// Spawn the background loop. It exits once every handle is dropped and
/// hands the service back through the join handle.
///
/// With a `reminder`, the daily check-in alarm fires at its local anchor
/// hour and then every 24 hours.
pub fn spawn(
    service: BackgroundService,
    reminder: Option<DailyReminder>,
) -> (BackgroundHandle, JoinHandle<BackgroundService>) {
    spawn_with_clock(service, reminder, Arc::new(SystemClock))
}

/// Like [`spawn`], reading wall-clock time for the reminder from `clock`.
pub fn spawn_with_clock(
    service: BackgroundService,
    reminder: Option<DailyReminder>,
    clock: Arc<dyn Clock>,
) -> (BackgroundHandle, JoinHandle<BackgroundService>) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let task = tokio::spawn(run(service, rx, reminder, clock));
    (BackgroundHandle { tx }, task)
}

async fn run(
    mut service: BackgroundService,
    mut rx: mpsc::Receiver<Envelope>,
    reminder: Option<DailyReminder>,
    clock: Arc<dyn Clock>,
) -> BackgroundService {
    let now = || clock.now().with_timezone(&Local);
    let mut next_fire: Option<DateTime<Local>> = reminder.map(|r| r.first_fire(&now()));
    if let Some(at) = next_fire {
        tracing::debug!(%at, "daily reminder scheduled");
    }

    loop {
        let sleep_for = next_fire
            .and_then(|at| (at - now()).to_std().ok())
            .unwrap_or_default();

        tokio::select! {
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                dispatch(&mut service, envelope).await;
            }
            _ = tokio::time::sleep(sleep_for), if next_fire.is_some() => {
                service.on_alarm(DAILY_REMINDER_ALARM);
                next_fire = match (reminder, next_fire) {
                    (Some(r), Some(fired)) => Some(r.next_due(&fired, &now())),
                    _ => None,
                };
                if let Some(at) = next_fire {
                    tracing::debug!(%at, "daily reminder re-armed");
                }
            }
        }
    }

    tracing::debug!("background loop stopped");
    service
}

async fn dispatch(service: &mut BackgroundService, envelope: Envelope) {
    match envelope {
        Envelope::Message { request, reply } => {
            let result = service.handle(request).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "background request failed");
            }
            let _ = reply.send(result);
        }
        Envelope::Navigate { url, reply } => {
            let _ = reply.send(service.on_navigate(&url));
        }
        Envelope::Idle(state) => {
            service.on_idle_state(state);
        }
        Envelope::Alarm(name) => {
            service.on_alarm(&name);
        }
    }
}
