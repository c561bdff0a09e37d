mod clock;
mod driver;
mod engine;
mod session;

pub use clock::{Clock, IntervalClock, ManualClock, ManualTicker, TICK_PERIOD};
pub use driver::{spawn, TimerHandle};
pub use engine::{SessionTimer, Snapshot, TimerState};
pub use session::{
    SessionType, TimerSettings, DEFAULT_BREAK_MINUTES, DEFAULT_WORK_MINUTES, MAX_BREAK_MINUTES,
    MAX_WORK_MINUTES, MIN_BREAK_MINUTES, MIN_WORK_MINUTES,
};
