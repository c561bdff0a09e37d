//! # TempoDiPomo Core Library
//!
//! The session timer behind TempoDiPomo: alternating work and break
//! countdowns with start, pause, reset and reconfigure controls. Front ends
//! send commands and render the events that come back; nothing in this
//! crate draws or notifies on its own.
//!
//! ## Architecture
//!
//! - **Session Timer**: A pure state machine advanced one second per
//!   `tick()` call
//! - **Clock**: The tick source, a tokio interval in production or a
//!   hand-driven clock in tests
//! - **Driver**: A single task owning the timer; commands and ticks are
//!   queued through it so they never race
//! - **Storage**: TOML-based configuration of the default durations
//!
//! ## Key Components
//!
//! - [`SessionTimer`]: Core timer state machine
//! - [`TimerHandle`]: Command surface of a spawned driver
//! - [`Event`]: Display updates and completion notices
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError};
pub use events::Event;
pub use storage::Config;
pub use timer::{
    Clock, IntervalClock, ManualClock, ManualTicker, SessionTimer, SessionType, Snapshot,
    TimerHandle, TimerSettings, TimerState,
};
