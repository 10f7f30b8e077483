//! Tumbler core
//!
//! Sans-IO implementation of a rotary combination lock whose code is derived
//! live from the surrounding session, plus the rotating key broadcaster that
//! feeds it.
//!
//! # Architecture
//!
//! Every component is a pure state machine that:
//! - Receives events from the caller (button presses, ticks, activation)
//! - Produces actions for the caller to execute (rotate the dial model,
//!   update a display, play a sound, report a pass)
//! - Reads the session only through the [`SignalGateway`] trait and draws
//!   randomness only through the [`Environment`] trait
//!
//! # Components
//!
//! - [`Dial`]: direction-reversal gesture capture
//! - [`Passcode`]: code derivation from session signals
//! - [`solve::check`]: compares captured input with a fresh passcode
//! - [`CombinationLock`]: lifecycle (`Inactive → Armed → Solved`) over the
//!   above
//! - [`KeyBroadcaster`]: timer-driven rotating key widget

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod broadcaster;
pub mod dial;
pub mod env;
mod error;
mod event;
pub mod gateway;
pub mod lock;
pub mod passcode;
pub mod solve;
mod widget;

pub use broadcaster::{KeyBroadcaster, ROTATION_PERIOD};
pub use dial::{CODE_LENGTH, DIAL_INCREMENT_DEGREES, DIAL_POSITIONS, Dial, DialPosition, Direction};
pub use env::Environment;
pub use error::LockError;
pub use event::{BroadcasterAction, LockAction, LockEvent, Sound};
pub use gateway::{HostGateway, SessionHost, SignalGateway, Snapshot, Standalone};
pub use lock::{CombinationLock, LockState};
pub use passcode::Passcode;
pub use solve::Verdict;
pub use widget::Widget;
