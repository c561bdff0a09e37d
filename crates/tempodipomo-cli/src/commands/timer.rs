use std::io::Write;
use std::time::Duration;

use clap::Args;
use tempodipomo_core::timer::{self, IntervalClock, TimerHandle, TimerSettings, TimerState};
use tempodipomo_core::{Config, CoreError, Event};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

const HELP: &str = "commands: start (s), pause (p), reset (r), config <work> <break> (c), status, help, quit (q)";

#[derive(Args)]
pub struct TimerArgs {
    /// Work session length in minutes (5-120); defaults to the config file
    #[arg(long)]
    work: Option<i64>,
    /// Break session length in minutes (1-60); defaults to the config file
    #[arg(long = "break")]
    break_minutes: Option<i64>,
}

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Start,
    TogglePause,
    Reset,
    Configure { work: String, brk: String },
    Status,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Input::Empty;
    };
    match cmd.to_ascii_lowercase().as_str() {
        "start" | "s" => Input::Start,
        "pause" | "resume" | "p" => Input::TogglePause,
        "reset" | "r" => Input::Reset,
        "config" | "configure" | "c" => Input::Configure {
            work: words.next().unwrap_or_default().to_string(),
            brk: words.next().unwrap_or_default().to_string(),
        },
        "status" => Input::Status,
        "help" | "h" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        other => Input::Unknown(other.to_string()),
    }
}

struct Screen {
    notifications: bool,
}

impl Screen {
    fn render(&self, event: &Event) {
        match event {
            Event::DisplayUpdate { .. } => {
                print!("\r{event}   ");
                let _ = std::io::stdout().flush();
            }
            Event::SessionComplete { title, message, .. } => {
                if self.notifications {
                    println!("\n\x07*** {title} ***\n{message}");
                }
            }
        }
    }

    fn line(&self, text: &str) {
        println!("\r{text}");
    }
}

pub fn run(args: TimerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let defaults = config.timer_settings();
    let settings = match (args.work, args.break_minutes) {
        (None, None) => defaults,
        (work, brk) => TimerSettings::new(
            work.unwrap_or(defaults.work_minutes() as i64),
            brk.unwrap_or(defaults.break_minutes() as i64),
        )?,
    };
    let screen = Screen {
        notifications: config.notifications.enabled,
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(session(settings, screen));
    // A pending stdin read must not hold up exit.
    runtime.shutdown_background();
    result
}

async fn session(settings: TimerSettings, screen: Screen) -> Result<(), Box<dyn std::error::Error>> {
    let (handle, driver) = timer::spawn(settings, IntervalClock::new());
    let mut events = handle.subscribe().await?;

    let snap = handle.snapshot().await?;
    screen.render(&Event::display_update(
        snap.session,
        Duration::from_secs(snap.time_left_secs),
    ));
    screen.line("");
    screen.line(HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !apply(&handle, &screen, parse_input(&line)).await? {
                    break;
                }
            }
            event = events.recv() => match event {
                Ok(event) => screen.render(&event),
                Err(RecvError::Lagged(n)) => tracing::warn!(skipped = n, "display fell behind"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    handle.quit().await;
    driver.await?;
    drain(&mut events, &screen).await;
    println!();
    Ok(())
}

/// Render whatever was published before the driver stopped.
async fn drain(events: &mut Receiver<Event>, screen: &Screen) {
    loop {
        match events.recv().await {
            Ok(event) => screen.render(&event),
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        }
    }
}

/// Carry out one line of input. Returns `false` once the user quits.
async fn apply(
    handle: &TimerHandle,
    screen: &Screen,
    input: Input,
) -> Result<bool, Box<dyn std::error::Error>> {
    match input {
        Input::Start => {
            if !handle.start().await? {
                screen.line("Already running");
            }
        }
        Input::TogglePause => match handle.pause_or_resume().await? {
            TimerState::Idle => screen.line("Not running"),
            TimerState::Paused => screen.line("Paused (type 'pause' again to resume)"),
            TimerState::Active => screen.line("Resumed"),
        },
        Input::Reset => handle.reset().await?,
        Input::Configure { work, brk } => match handle.reconfigure_input(&work, &brk).await {
            Ok(()) => {}
            Err(CoreError::Config(e)) if e.is_invalid_config() => {
                screen.line(&format!("Invalid Input: {e}"))
            }
            Err(e) => return Err(e.into()),
        },
        Input::Status => {
            let snap = handle.snapshot().await?;
            screen.line(&serde_json::to_string_pretty(&snap)?);
        }
        Input::Help => screen.line(HELP),
        Input::Empty => {}
        Input::Unknown(cmd) => screen.line(&format!("unknown command: {cmd} ({HELP})")),
        Input::Quit => return Ok(false),
    }
    Ok(true)
}
