use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const MIN_WORK_MINUTES: u64 = 5;
pub const MAX_WORK_MINUTES: u64 = 120;
pub const MIN_BREAK_MINUTES: u64 = 1;
pub const MAX_BREAK_MINUTES: u64 = 60;

pub const DEFAULT_WORK_MINUTES: u64 = 25;
pub const DEFAULT_BREAK_MINUTES: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Work,
    Break,
}

impl SessionType {
    /// Label shown next to the countdown.
    pub fn label(self) -> &'static str {
        match self {
            SessionType::Work => "Work",
            SessionType::Break => "Break",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SessionType::Work => SessionType::Break,
            SessionType::Break => SessionType::Work,
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated work/break lengths in whole minutes.
///
/// The only way to obtain one is through [`TimerSettings::new`] or
/// [`TimerSettings::parse`], so every value in circulation is within bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerSettings {
    work_minutes: u64,
    break_minutes: u64,
}

impl TimerSettings {
    /// Validate a pair of minute counts.
    ///
    /// Accepts work in 5..=120 and break in 1..=60; anything else,
    /// negative values included, is `InvalidConfig`.
    pub fn new(work_minutes: i64, break_minutes: i64) -> Result<Self, ConfigError> {
        let work = u64::try_from(work_minutes).ok();
        let brk = u64::try_from(break_minutes).ok();
        match (work, brk) {
            (Some(w), Some(b))
                if (MIN_WORK_MINUTES..=MAX_WORK_MINUTES).contains(&w)
                    && (MIN_BREAK_MINUTES..=MAX_BREAK_MINUTES).contains(&b) =>
            {
                Ok(Self {
                    work_minutes: w,
                    break_minutes: b,
                })
            }
            _ => Err(ConfigError::invalid(work_minutes, break_minutes)),
        }
    }

    /// Validate raw text as typed by the user.
    pub fn parse(work: &str, brk: &str) -> Result<Self, ConfigError> {
        match (work.trim().parse::<i64>(), brk.trim().parse::<i64>()) {
            (Ok(w), Ok(b)) => Self::new(w, b),
            _ => Err(ConfigError::invalid(work, brk)),
        }
    }

    pub fn work_minutes(&self) -> u64 {
        self.work_minutes
    }

    pub fn break_minutes(&self) -> u64 {
        self.break_minutes
    }

    pub fn work_duration(&self) -> Duration {
        Duration::from_secs(self.work_minutes * 60)
    }

    pub fn break_duration(&self) -> Duration {
        Duration::from_secs(self.break_minutes * 60)
    }

    pub fn duration_for(&self, session: SessionType) -> Duration {
        match session {
            SessionType::Work => self.work_duration(),
            SessionType::Break => self.break_duration(),
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}
