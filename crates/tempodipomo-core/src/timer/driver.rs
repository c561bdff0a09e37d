//! Single-consumer driver that owns the [`SessionTimer`].
//!
//! Commands from any number of [`TimerHandle`]s and ticks from the
//! [`Clock`] are handled one at a time by a single task, so the state
//! machine never sees concurrent mutation. Output events go out on a
//! broadcast channel.
//!
//! The clock is only polled while a session is running. That is the tick
//! loop: it starts with `start`, keeps going through pauses (the engine
//! ignores those ticks), and ends when the session completes, is reset,
//! or the driver quits.

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use super::clock::Clock;
use super::engine::{SessionTimer, Snapshot, TimerState};
use super::session::TimerSettings;
use crate::error::{ConfigError, CoreError, Result};
use crate::events::Event;

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

enum ConfigRequest {
    Minutes { work: i64, brk: i64 },
    Input { work: String, brk: String },
}

enum Command {
    Start(oneshot::Sender<bool>),
    TogglePause(oneshot::Sender<TimerState>),
    Reset(oneshot::Sender<()>),
    Reconfigure {
        request: ConfigRequest,
        reply: oneshot::Sender<Result<(), ConfigError>>,
    },
    Snapshot(oneshot::Sender<Snapshot>),
    Subscribe(oneshot::Sender<broadcast::Receiver<Event>>),
    Quit,
}

/// Start a driver for a fresh timer on the current tokio runtime.
///
/// The join handle resolves once the driver has quit or every handle has
/// been dropped.
pub fn spawn<C: Clock>(settings: TimerSettings, clock: C) -> (TimerHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let (events, _) = broadcast::channel(EVENT_BUFFER);
    let driver = Driver {
        timer: SessionTimer::new(settings),
        clock,
        commands: rx,
        events,
    };
    let task = tokio::spawn(driver.run());
    (TimerHandle { commands: tx }, task)
}

struct Driver<C> {
    timer: SessionTimer,
    clock: C,
    commands: mpsc::Receiver<Command>,
    events: broadcast::Sender<Event>,
}

impl<C: Clock> Driver<C> {
    async fn run(mut self) {
        tracing::debug!("timer driver started");
        loop {
            let running = self.timer.is_running();
            tokio::select! {
                // Ticks first, so a tick released before a command is applied before it.
                biased;
                _ = self.clock.tick(), if running => {
                    let events = self.timer.tick();
                    self.publish(events);
                }
                cmd = self.commands.recv() => match cmd {
                    Some(Command::Quit) | None => break,
                    Some(cmd) => self.handle(cmd),
                },
            }
        }
        tracing::info!("timer driver stopped");
    }

    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Start(reply) => {
                let began = self.timer.start();
                if began {
                    self.clock.reset();
                }
                let _ = reply.send(began);
            }
            Command::TogglePause(reply) => {
                self.timer.toggle_pause();
                let _ = reply.send(self.timer.state());
            }
            Command::Reset(reply) => {
                let events = self.timer.reset();
                self.publish(events);
                let _ = reply.send(());
            }
            Command::Reconfigure { request, reply } => {
                let result = match request {
                    ConfigRequest::Minutes { work, brk } => self.timer.reconfigure_minutes(work, brk),
                    ConfigRequest::Input { work, brk } => self.timer.reconfigure_input(&work, &brk),
                };
                let result = result.map(|events| self.publish(events));
                let _ = reply.send(result);
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.timer.snapshot());
            }
            Command::Subscribe(reply) => {
                let _ = reply.send(self.events.subscribe());
            }
            Command::Quit => {}
        }
    }

    fn publish(&self, events: Vec<Event>) {
        for event in events {
            // No subscribers is not an error.
            let _ = self.events.send(event);
        }
    }
}

/// Cloneable handle for issuing commands to a running driver.
///
/// Every method fails with [`CoreError::TimerStopped`] once the driver
/// has quit, except [`TimerHandle::quit`] itself.
#[derive(Clone)]
pub struct TimerHandle {
    commands: mpsc::Sender<Command>,
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

impl TimerHandle {
    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .await
            .map_err(|_| CoreError::TimerStopped)?;
        rx.await.map_err(|_| CoreError::TimerStopped)
    }

    /// Start the loaded session. Returns `false` if one was already running.
    pub async fn start(&self) -> Result<bool> {
        self.request(Command::Start).await
    }

    /// Pause or resume. Returns the new paused state.
    pub async fn toggle_pause(&self) -> Result<bool> {
        Ok(self.pause_or_resume().await? == TimerState::Paused)
    }

    /// Pause or resume, returning the run state right after the toggle.
    ///
    /// An idle timer is left alone and reports [`TimerState::Idle`].
    pub async fn pause_or_resume(&self) -> Result<TimerState> {
        self.request(Command::TogglePause).await
    }

    pub async fn reset(&self) -> Result<()> {
        self.request(Command::Reset).await
    }

    /// Set work and break lengths in minutes.
    pub async fn reconfigure(&self, work_minutes: i64, break_minutes: i64) -> Result<()> {
        let request = ConfigRequest::Minutes {
            work: work_minutes,
            brk: break_minutes,
        };
        let result = self
            .request(|reply| Command::Reconfigure { request, reply })
            .await?;
        Ok(result?)
    }

    /// Set work and break lengths from unparsed text.
    pub async fn reconfigure_input(&self, work: &str, brk: &str) -> Result<()> {
        let request = ConfigRequest::Input {
            work: work.to_string(),
            brk: brk.to_string(),
        };
        let result = self
            .request(|reply| Command::Reconfigure { request, reply })
            .await?;
        Ok(result?)
    }

    pub async fn snapshot(&self) -> Result<Snapshot> {
        self.request(Command::Snapshot).await
    }

    /// Receive every event published after this call.
    pub async fn subscribe(&self) -> Result<broadcast::Receiver<Event>> {
        self.request(Command::Subscribe).await
    }

    /// Stop the driver. No events are published afterwards.
    pub async fn quit(&self) {
        let _ = self.commands.send(Command::Quit).await;
    }

    pub fn is_stopped(&self) -> bool {
        self.commands.is_closed()
    }
}
