//! Tumbler session host.
//!
//! Hosts one combination lock together with the widgets its passcode is
//! derived from, and drives it from line-oriented player input.
//!
//! ## Architecture
//!
//! ```text
//! tumbler-session
//!   ├─ SystemEnv     (production Environment impl)
//!   ├─ Rack          (serial tag, battery holders, key broadcasters)
//!   ├─ Session       (lock + rack, per-tick ordering)
//!   └─ run()         (Tokio loop: stdin lines + Environment::sleep ticks)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod rack;
mod session;
mod system_env;

use std::str::FromStr;

pub use error::SessionError;
pub use rack::{BatteryHolder, Rack, SerialTag};
pub use session::{Button, Output, Session, SessionConfig};
pub use system_env::SystemEnv;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tumbler_core::Environment;

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Press a lock button.
    Press(Button),
    /// End the session.
    Quit,
}

impl FromStr for Command {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "q" | "quit" => Ok(Self::Quit),
            other => other.parse().map(Self::Press),
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The lock was opened.
    Solved,
    /// The player quit or input ended first.
    Quit,
}

/// Activate `session` and drive it until the lock opens or input ends.
///
/// Input lines are applied as they arrive. Ticks are paced by the session's
/// [`Environment::sleep`] every [`Session::tick_interval`], and each tick is
/// fed the time elapsed on the environment clock. When `input` is exhausted a
/// final tick runs so the last presses are checked before returning.
pub async fn run<E, R>(session: &mut Session<E>, input: R) -> Result<Outcome, SessionError>
where
    E: Environment,
    R: AsyncBufRead + Unpin,
{
    report(&session.activate()?);

    let env = session.env().clone();
    let interval = session.tick_interval();
    let mut lines = input.lines();
    let mut last_tick = env.now();

    let sleep = env.sleep(interval);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    let delta = env.now().saturating_duration_since(last_tick);
                    report(&session.tick(delta)?);
                    return Ok(outcome(session));
                };
                if line.trim().is_empty() {
                    continue;
                }

                match line.parse::<Command>() {
                    Ok(Command::Quit) => {
                        tracing::info!("player quit");
                        return Ok(Outcome::Quit);
                    },
                    Ok(Command::Press(button)) => report(&session.press(button)?),
                    Err(e) => tracing::warn!("{}", e),
                }
            },
            () = &mut sleep => {
                let now = env.now();
                let delta = now.saturating_duration_since(last_tick);
                last_tick = now;
                sleep.set(env.sleep(interval));

                report(&session.tick(delta)?);
                if session.is_solved() {
                    return Ok(Outcome::Solved);
                }
            },
        }
    }
}

fn outcome<E: Environment>(session: &Session<E>) -> Outcome {
    if session.is_solved() { Outcome::Solved } else { Outcome::Quit }
}

fn report(outputs: &[Output]) {
    for output in outputs {
        tracing::info!("{}", output);
    }
}
