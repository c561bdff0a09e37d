//! One-second tick sources for the timer driver.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A periodic tick source the driver waits on while a session is running.
pub trait Clock: Send + 'static {
    /// Resolve when the next tick is due.
    fn tick(&mut self) -> impl Future<Output = ()> + Send;

    /// Restart the cadence so the next tick lands one period from now.
    fn reset(&mut self);
}

/// Wall-clock ticks from a tokio interval.
///
/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct IntervalClock {
    interval: Interval,
}

impl IntervalClock {
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        let mut interval = time::interval_at(Instant::now() + period, period);
        // No catch-up bursts after a stall.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

impl Default for IntervalClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for IntervalClock {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }

    fn reset(&mut self) {
        self.interval.reset();
    }
}

/// Clock driven by hand through a paired [`ManualTicker`].
///
/// Ticks sent while the timer is idle are discarded on the next start.
#[derive(Debug)]
pub struct ManualClock {
    rx: mpsc::UnboundedReceiver<()>,
}

/// Sending half of a [`ManualClock`].
#[derive(Debug, Clone)]
pub struct ManualTicker {
    tx: mpsc::UnboundedSender<()>,
}

impl ManualClock {
    pub fn pair() -> (ManualClock, ManualTicker) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ManualClock { rx }, ManualTicker { tx })
    }
}

impl ManualTicker {
    /// Release one tick. Returns `false` once the clock has been dropped.
    pub fn tick(&self) -> bool {
        self.tx.send(()).is_ok()
    }

    /// Release `n` ticks.
    pub fn advance(&self, n: usize) -> bool {
        (0..n).all(|_| self.tick())
    }
}

impl Clock for ManualClock {
    async fn tick(&mut self) {
        if self.rx.recv().await.is_none() {
            // No ticker left: no more time will pass.
            std::future::pending::<()>().await;
        }
    }

    fn reset(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}
