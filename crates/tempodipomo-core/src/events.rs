use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::SessionType;

/// Everything the timer tells the outside world.
/// The presentation layer subscribes to these and renders them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Remaining time in the current session changed or needs redrawing.
    DisplayUpdate {
        session: SessionType,
        minutes: u64,
        seconds: u64,
        at: DateTime<Utc>,
    },
    /// A session ran down to zero. Carries the notification text.
    SessionComplete {
        title: String,
        message: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn display_update(session: SessionType, time_left: Duration) -> Self {
        let total = time_left.as_secs();
        Event::DisplayUpdate {
            session,
            minutes: total / 60,
            seconds: total % 60,
            at: Utc::now(),
        }
    }

    pub fn session_complete(finished: SessionType) -> Self {
        let (title, message) = match finished {
            SessionType::Work => ("Work session complete!", "Time for a break!"),
            SessionType::Break => ("Break session complete!", "Time to work!"),
        };
        Event::SessionComplete {
            title: title.into(),
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::DisplayUpdate { at, .. } | Event::SessionComplete { at, .. } => *at,
        }
    }
}

/// `🍅 Work 24:59` for display updates, `title: message` for completions.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::DisplayUpdate {
                session,
                minutes,
                seconds,
                ..
            } => write!(f, "🍅 {} {:02}:{:02}", session.label(), minutes, seconds),
            Event::SessionComplete { title, message, .. } => write!(f, "{title}: {message}"),
        }
    }
}
