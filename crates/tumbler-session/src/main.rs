//! Tumbler session binary.
//!
//! # Usage
//!
//! ```bash
//! # Default session: one broadcaster, serial IE7E63, one battery
//! tumbler
//!
//! # No broadcasters, so the code follows the serial and unit counts
//! tumbler --broadcasters 0 --serial KT4NE7 --batteries 2,1 --units 4 --solved 2
//! ```
//!
//! Type `l`, `r` or `x` (one per line) to press left, right or reset, and
//! `q` to quit.

use std::time::Duration;

use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use tumbler_session::{Outcome, Session, SessionConfig, SystemEnv};

/// Rotary combination lock session
#[derive(Parser, Debug)]
#[command(name = "tumbler")]
#[command(about = "Rotary combination lock with rotating key broadcasters")]
#[command(version)]
struct Args {
    /// Session serial identifier (must end in a digit)
    #[arg(long, default_value = "IE7E63")]
    serial: String,

    /// Battery count of each holder, comma separated
    #[arg(long, value_delimiter = ',', default_value = "1")]
    batteries: Vec<u32>,

    /// Number of rotating key broadcasters
    #[arg(long, default_value = "1")]
    broadcasters: usize,

    /// Puzzle units in the session besides the lock
    #[arg(long, default_value = "2")]
    units: usize,

    /// Of those units, how many are already solved
    #[arg(long, default_value = "0")]
    solved: usize,

    /// Seconds between key rotations
    #[arg(long, default_value = "60")]
    rotation_secs: u64,

    /// Milliseconds between solve checks
    #[arg(long, default_value = "50")]
    tick_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = SessionConfig {
        serial: args.serial,
        battery_holders: args.batteries,
        broadcasters: args.broadcasters,
        other_units: args.units,
        other_solved: args.solved,
        rotation_period: Duration::from_secs(args.rotation_secs),
        tick_interval: Duration::from_millis(args.tick_ms),
    };

    let mut session = Session::new(SystemEnv::new(), config)?;
    tracing::info!("tumbler session starting");

    match tumbler_session::run(&mut session, BufReader::new(tokio::io::stdin())).await? {
        Outcome::Solved => tracing::info!(rejections = session.lock().rejections(), "lock opened"),
        Outcome::Quit => tracing::info!("session ended with the lock closed"),
    }

    Ok(())
}
