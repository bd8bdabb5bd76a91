//! Session state machine.
//!
//! The machine is `is_running × is_focus_phase` plus a one-second countdown
//! and two counters. It does not own a thread or interval: the caller calls
//! `tick()` once per second while running and persists the snapshot after
//! each call.
//!
//! ## State Transitions
//!
//! ```text
//! FocusPaused  --start-->  FocusRunning  --tick to 0-->  BreakPaused
//! BreakPaused  --start-->  BreakRunning  --tick to 0-->  FocusPaused
//! *Running     --pause-->  *Paused
//! any          --reset-->  same phase, paused, full duration
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut machine = SessionMachine::new(&settings, clock.now());
//! machine.start(clock.now());
//! // Once per second:
//! if let Some(event) = machine.tick(&settings, clock.now()) { /* phase ended */ }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::settings::Settings;

/// The four observable states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    FocusRunning,
    FocusPaused,
    BreakRunning,
    BreakPaused,
}

impl SessionPhase {
    pub fn is_focus(self) -> bool {
        matches!(self, SessionPhase::FocusRunning | SessionPhase::FocusPaused)
    }

    pub fn is_running(self) -> bool {
        matches!(self, SessionPhase::FocusRunning | SessionPhase::BreakRunning)
    }
}

/// Persisted timer snapshot, stored under `timerState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub remaining_seconds: u64,
    #[serde(default = "default_true")]
    pub is_focus_phase: bool,
    #[serde(default)]
    pub is_running: bool,
    #[serde(default)]
    pub session_count: u64,
    #[serde(default)]
    pub total_sessions: u64,
    /// Wall-clock time of the last update to `remaining_seconds`.
    pub last_timestamp: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl TimerState {
    /// Fresh state: focus phase, paused, full focus duration.
    pub fn initial(settings: &Settings, now: DateTime<Utc>) -> Self {
        Self {
            remaining_seconds: settings.focus_duration,
            is_focus_phase: true,
            is_running: false,
            session_count: 0,
            total_sessions: 0,
            last_timestamp: now,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match (self.is_focus_phase, self.is_running) {
            (true, true) => SessionPhase::FocusRunning,
            (true, false) => SessionPhase::FocusPaused,
            (false, true) => SessionPhase::BreakRunning,
            (false, false) => SessionPhase::BreakPaused,
        }
    }
}

/// Display-ready view of the timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerView {
    pub phase: SessionPhase,
    /// `MM:SS`
    pub display: String,
    pub status: String,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    /// 0.0 .. 100.0 elapsed within the current phase.
    pub progress_pct: f64,
    pub session_count: u64,
    pub total_sessions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMachine {
    state: TimerState,
}

impl SessionMachine {
    pub fn new(settings: &Settings, now: DateTime<Utc>) -> Self {
        Self {
            state: TimerState::initial(settings, now),
        }
    }

    /// Wrap a stored snapshot as-is. Call [`SessionMachine::restore`]
    /// afterwards to account for time spent while nothing was ticking.
    pub fn from_state(state: TimerState) -> Self {
        Self { state }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.state.remaining_seconds
    }

    /// Full length of the current phase under `settings`.
    pub fn phase_total(&self, settings: &Settings) -> u64 {
        settings.phase_duration(self.state.is_focus_phase, self.state.session_count)
    }

    pub fn view(&self, settings: &Settings) -> TimerView {
        let total = self.phase_total(settings);
        let remaining = self.state.remaining_seconds;
        let progress_pct = if total == 0 {
            0.0
        } else {
            ((1.0 - remaining as f64 / total as f64) * 100.0).clamp(0.0, 100.0)
        };
        let status = if self.state.is_focus_phase {
            let every = u64::from(settings.sessions_before_long_break.max(1));
            format!(
                "Focus Session ({}/{})",
                self.state.session_count % every + 1,
                every
            )
        } else {
            "Break Time".to_string()
        };

        TimerView {
            phase: self.phase(),
            display: format!("{}:{:02}", remaining / 60, remaining % 60),
            status,
            remaining_seconds: remaining,
            total_seconds: total,
            progress_pct,
            session_count: self.state.session_count,
            total_sessions: self.state.total_sessions,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down. Returns `None` when already running.
    pub fn start(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state.is_running {
            return None;
        }
        self.state.is_running = true;
        self.state.last_timestamp = now;
        tracing::debug!(phase = ?self.phase(), remaining = self.state.remaining_seconds, "timer started");
        Some(Event::TimerStarted {
            is_focus_phase: self.state.is_focus_phase,
            remaining_seconds: self.state.remaining_seconds,
            at: now,
        })
    }

    /// Stop counting down, keeping the remaining time. Returns `None` when
    /// already paused.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.is_running = false;
        self.state.last_timestamp = now;
        tracing::debug!(remaining = self.state.remaining_seconds, "timer paused");
        Some(Event::TimerPaused {
            remaining_seconds: self.state.remaining_seconds,
            at: now,
        })
    }

    /// Stop and restore the full duration of the current phase.
    pub fn reset(&mut self, settings: &Settings, now: DateTime<Utc>) -> Event {
        self.state.is_running = false;
        self.state.remaining_seconds = self.phase_total(settings);
        self.state.last_timestamp = now;
        tracing::debug!(phase = ?self.phase(), remaining = self.state.remaining_seconds, "timer reset");
        Event::TimerReset {
            is_focus_phase: self.state.is_focus_phase,
            remaining_seconds: self.state.remaining_seconds,
            at: now,
        }
    }

    /// Re-derive the remaining time after settings changed. Only applies
    /// while paused; a running countdown keeps its current value.
    pub fn apply_settings(&mut self, settings: &Settings) {
        if !self.state.is_running {
            self.state.remaining_seconds = self.phase_total(settings);
        }
    }

    /// Advance the countdown by one second. Returns the phase-end event
    /// when the countdown reaches zero. Does nothing while paused.
    pub fn tick(&mut self, settings: &Settings, now: DateTime<Utc>) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        self.state.last_timestamp = now;
        if self.state.remaining_seconds == 0 {
            return Some(self.end_phase(settings, now));
        }
        None
    }

    /// Account for wall-clock time that passed while nothing was ticking.
    ///
    /// A running snapshot loses the elapsed whole seconds. If that exhausts
    /// the phase, exactly one phase end is processed, no matter how many
    /// further phases would have fit in the gap. A paused snapshot keeps its
    /// remaining time.
    ///
    /// Returns the `Restored` event and, if the phase ran out, the phase-end
    /// event after it.
    pub fn restore(&mut self, settings: &Settings, now: DateTime<Utc>) -> Vec<Event> {
        let elapsed = if self.state.is_running {
            u64::try_from((now - self.state.last_timestamp).num_seconds()).unwrap_or(0)
        } else {
            0
        };
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(elapsed);
        self.state.last_timestamp = now;

        let mut events = vec![Event::Restored {
            phase: self.phase(),
            elapsed_seconds: elapsed,
            remaining_seconds: self.state.remaining_seconds,
            at: now,
        }];
        if self.state.remaining_seconds == 0 {
            events.push(self.end_phase(settings, now));
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn end_phase(&mut self, settings: &Settings, now: DateTime<Utc>) -> Event {
        self.state.is_running = false;
        self.state.last_timestamp = now;

        if self.state.is_focus_phase {
            self.state.total_sessions += 1;
            self.state.session_count += 1;
            self.state.is_focus_phase = false;
            self.state.remaining_seconds = settings.break_duration(self.state.session_count);
            tracing::info!(
                total_sessions = self.state.total_sessions,
                break_seconds = self.state.remaining_seconds,
                "focus phase complete"
            );
            Event::FocusCompleted {
                total_sessions: self.state.total_sessions,
                session_count: self.state.session_count,
                break_seconds: self.state.remaining_seconds,
                at: now,
            }
        } else {
            self.state.is_focus_phase = true;
            self.state.remaining_seconds = settings.focus_duration;
            tracing::info!("break complete");
            Event::BreakCompleted {
                focus_seconds: self.state.remaining_seconds,
                at: now,
            }
        }
    }
}
