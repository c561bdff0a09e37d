//! Session timer state machine.
//!
//! The engine has no threads and no clock of its own. Each call to `tick()`
//! stands for one elapsed second; the driver decides when that happens.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Active <--toggle_pause--> Paused
//! Active --tick at 00:01--> Idle (next session loaded, not started)
//! any --reset--> Idle (work session)
//! ```
//!
//! ## Usage
//!
//! ```
//! use tempodipomo_core::timer::{SessionTimer, TimerSettings};
//!
//! let mut timer = SessionTimer::new(TimerSettings::default());
//! timer.start();
//! let events = timer.tick();
//! assert_eq!(events[0].to_string(), "🍅 Work 24:59");
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::session::{SessionType, TimerSettings};
use crate::error::ConfigError;
use crate::events::Event;

const ONE_SECOND: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Not counting down. A fresh or finished session is loaded.
    Idle,
    Active,
    /// Counting is suspended; ticks are ignored until resumed.
    Paused,
}

/// Read-only view of the timer, for status queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: TimerState,
    pub session: SessionType,
    pub time_left_secs: u64,
    pub work_minutes: u64,
    pub break_minutes: u64,
}

/// Core countdown engine.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    settings: TimerSettings,
    state: TimerState,
    session: SessionType,
    time_left: Duration,
}

impl SessionTimer {
    /// Create an idle timer with a full work session loaded.
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            settings,
            state: TimerState::Idle,
            session: SessionType::Work,
            time_left: settings.work_duration(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// True from Start until the session completes or is reset.
    pub fn is_running(&self) -> bool {
        self.state != TimerState::Idle
    }

    pub fn is_paused(&self) -> bool {
        self.state == TimerState::Paused
    }

    pub fn session(&self) -> SessionType {
        self.session
    }

    pub fn time_left(&self) -> Duration {
        self.time_left
    }

    pub fn settings(&self) -> TimerSettings {
        self.settings
    }

    pub fn work_duration(&self) -> Duration {
        self.settings.work_duration()
    }

    pub fn break_duration(&self) -> Duration {
        self.settings.break_duration()
    }

    /// The display event for the current state, without changing anything.
    pub fn display(&self) -> Event {
        Event::display_update(self.session, self.time_left)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            session: self.session,
            time_left_secs: self.time_left.as_secs(),
            work_minutes: self.settings.work_minutes(),
            break_minutes: self.settings.break_minutes(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down the loaded session.
    ///
    /// Returns `false` (and changes nothing) if a countdown is already
    /// in progress, paused or not.
    pub fn start(&mut self) -> bool {
        if self.state != TimerState::Idle {
            return false;
        }
        self.state = TimerState::Active;
        tracing::info!(session = %self.session, secs = self.time_left.as_secs(), "timer started");
        true
    }

    /// Flip between Active and Paused and return the new paused flag.
    ///
    /// Idle timers stay idle and report `false`.
    pub fn toggle_pause(&mut self) -> bool {
        self.state = match self.state {
            TimerState::Active => TimerState::Paused,
            TimerState::Paused => TimerState::Active,
            TimerState::Idle => return false,
        };
        tracing::debug!(paused = self.is_paused(), "pause toggled");
        self.is_paused()
    }

    /// Stop and load a full work session.
    pub fn reset(&mut self) -> Vec<Event> {
        self.state = TimerState::Idle;
        self.session = SessionType::Work;
        self.time_left = self.settings.work_duration();
        tracing::info!("timer reset");
        vec![self.display()]
    }

    /// Account for one elapsed second.
    ///
    /// Does nothing unless Active. The last second completes the session
    /// instead of displaying 00:00.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.state != TimerState::Active {
            return Vec::new();
        }
        if self.time_left <= ONE_SECOND {
            return self.complete_session();
        }
        self.time_left -= ONE_SECOND;
        tracing::trace!(secs = self.time_left.as_secs(), "tick");
        vec![self.display()]
    }

    /// Apply new durations.
    ///
    /// The loaded session restarts from its configured length, even
    /// mid-countdown. The one exception is a change that only touches the
    /// other session's length: that is deferred until the other session
    /// is next loaded.
    pub fn reconfigure(&mut self, settings: TimerSettings) -> Vec<Event> {
        let previous = self.settings;
        self.settings = settings;
        tracing::info!(
            work_minutes = settings.work_minutes(),
            break_minutes = settings.break_minutes(),
            "timer reconfigured"
        );
        let loaded = self.session;
        if settings != previous && settings.duration_for(loaded) == previous.duration_for(loaded) {
            return Vec::new();
        }
        self.time_left = settings.duration_for(loaded);
        vec![self.display()]
    }

    /// Validate and apply minute counts. Nothing changes on error.
    pub fn reconfigure_minutes(
        &mut self,
        work_minutes: i64,
        break_minutes: i64,
    ) -> Result<Vec<Event>, ConfigError> {
        let settings = TimerSettings::new(work_minutes, break_minutes).inspect_err(|e| {
            tracing::warn!(work_minutes, break_minutes, "rejected timer config: {e}");
        })?;
        Ok(self.reconfigure(settings))
    }

    /// Validate and apply raw text input. Nothing changes on error.
    pub fn reconfigure_input(&mut self, work: &str, brk: &str) -> Result<Vec<Event>, ConfigError> {
        let settings = TimerSettings::parse(work, brk).inspect_err(|e| {
            tracing::warn!(work, brk, "rejected timer config: {e}");
        })?;
        Ok(self.reconfigure(settings))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_session(&mut self) -> Vec<Event> {
        let finished = self.session;
        self.state = TimerState::Idle;
        self.session = finished.next();
        self.time_left = self.settings.duration_for(self.session);
        tracing::info!(finished = %finished, next = %self.session, "session complete");
        vec![Event::session_complete(finished), self.display()]
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}
