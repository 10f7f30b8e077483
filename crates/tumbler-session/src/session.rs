//! Session driver.
//!
//! `Session` wires one [`CombinationLock`] to a [`Rack`] of widgets and
//! enforces the per-tick ordering: button presses are applied as they arrive,
//! and each tick first advances the broadcaster timers and then runs the
//! lock's solve check against fresh widget answers.

use std::{fmt, str::FromStr, time::Duration};

use tumbler_core::{
    BroadcasterAction, CombinationLock, Environment, HostGateway, KeyBroadcaster, LockAction,
    LockEvent, LockState, ROTATION_PERIOD, SessionHost,
};

use crate::{
    SessionError,
    rack::{BatteryHolder, Rack, SerialTag},
};

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Serial identifier printed on the serial tag. Must end in a digit.
    pub serial: String,
    /// Battery count of each holder.
    pub battery_holders: Vec<u32>,
    /// Number of rotating key broadcasters.
    pub broadcasters: usize,
    /// Puzzle units besides the lock.
    pub other_units: usize,
    /// Of `other_units`, how many start solved.
    pub other_solved: usize,
    /// Broadcaster rotation period.
    pub rotation_period: Duration,
    /// Interval between solve checks.
    pub tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            serial: "IE7E63".to_string(),
            battery_holders: vec![1],
            broadcasters: 1,
            other_units: 2,
            other_solved: 0,
            rotation_period: ROTATION_PERIOD,
            tick_interval: Duration::from_millis(50),
        }
    }
}

impl SessionConfig {
    fn serial_tag(&self) -> Result<SerialTag, SessionError> {
        SerialTag::new(self.serial.as_str())
            .map_err(|e| SessionError::Config(format!("serial {:?}: {}", self.serial, e)))
    }

    /// Check the configuration for values no session can run with.
    pub fn validate(&self) -> Result<(), SessionError> {
        self.serial_tag()?;

        if self.other_solved > self.other_units {
            return Err(SessionError::Config(format!(
                "{} solved units exceed {} units",
                self.other_solved, self.other_units
            )));
        }
        if self.rotation_period.is_zero() {
            return Err(SessionError::Config("rotation period must be non-zero".to_string()));
        }
        if self.tick_interval.is_zero() {
            return Err(SessionError::Config("tick interval must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Lock buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Turn the dial one position left.
    Left,
    /// Turn the dial one position right.
    Right,
    /// Spin the dial back to zero and clear the input.
    Reset,
}

impl FromStr for Button {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "left" => Ok(Self::Left),
            "r" | "right" => Ok(Self::Right),
            "x" | "reset" => Ok(Self::Reset),
            other => Err(SessionError::UnknownCommand(other.to_string())),
        }
    }
}

impl From<Button> for LockEvent {
    fn from(button: Button) -> Self {
        match button {
            Button::Left => Self::RotateLeft,
            Button::Right => Self::RotateRight,
            Button::Reset => Self::Reset,
        }
    }
}

/// Something the session host should present.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Produced by the lock.
    Lock(LockAction),
    /// Produced by the broadcaster at `index`.
    Broadcaster {
        /// Broadcaster index in the rack.
        index: usize,
        /// The action.
        action: BroadcasterAction,
    },
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lock(LockAction::RotateDial { degrees }) => write!(f, "lock: rotate {degrees}°"),
            Self::Lock(LockAction::Display { text }) => write!(f, "lock: show {text}"),
            Self::Lock(LockAction::PlaySound(sound)) => write!(f, "lock: sound {sound:?}"),
            Self::Lock(LockAction::Pass) => write!(f, "lock: pass"),
            Self::Broadcaster { index, action: BroadcasterAction::Display { text } } => {
                write!(f, "key {index}: show {text}")
            },
            Self::Broadcaster { index, action: BroadcasterAction::PlaySound(sound) } => {
                write!(f, "key {index}: sound {sound:?}")
            },
        }
    }
}

/// One hosted lock session.
#[derive(Debug, Clone)]
pub struct Session<E: Environment> {
    env: E,
    rack: Rack<E>,
    lock: CombinationLock,
    tick_interval: Duration,
}

impl<E: Environment> Session<E> {
    /// Build a session from a validated configuration.
    pub fn new(env: E, config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;

        let serial_tag = config.serial_tag()?;
        let broadcasters = (0..config.broadcasters)
            .map(|_| KeyBroadcaster::with_period(env.clone(), config.rotation_period))
            .collect();
        let rack = Rack::new(
            serial_tag,
            config.battery_holders.into_iter().map(BatteryHolder::new).collect(),
            broadcasters,
            config.other_units.saturating_add(1),
            config.other_solved,
        );

        Ok(Self { env, rack, lock: CombinationLock::new(), tick_interval: config.tick_interval })
    }

    /// The environment.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// The widget rack.
    pub fn rack(&self) -> &Rack<E> {
        &self.rack
    }

    /// The lock.
    pub fn lock(&self) -> &CombinationLock {
        &self.lock
    }

    /// Interval between ticks.
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Whether the lock has been opened.
    pub fn is_solved(&self) -> bool {
        self.lock.is_solved()
    }

    /// Start the session: arm the lock and restart every broadcaster timer.
    ///
    /// Only the first activation has any effect.
    pub fn activate(&mut self) -> Result<Vec<Output>, SessionError> {
        if self.lock.state() != LockState::Inactive {
            return Ok(vec![]);
        }

        let mut outputs = self.lock_event(LockEvent::Activate)?;
        outputs.extend(broadcaster_outputs(self.rack.activate_broadcasters()));
        tracing::info!(
            broadcasters = self.rack.broadcasters().len(),
            units = self.rack.unit_count(),
            "session started"
        );
        Ok(outputs)
    }

    /// Press a lock button.
    pub fn press(&mut self, button: Button) -> Result<Vec<Output>, SessionError> {
        self.lock_event(button.into())
    }

    /// Advance time by `delta`: broadcaster timers first, then the solve
    /// check.
    pub fn tick(&mut self, delta: Duration) -> Result<Vec<Output>, SessionError> {
        let mut outputs = broadcaster_outputs(self.rack.tick_broadcasters(delta));
        outputs.extend(self.lock_event(LockEvent::Tick)?);
        Ok(outputs)
    }

    fn lock_event(&mut self, event: LockEvent) -> Result<Vec<Output>, SessionError> {
        let before = self.lock.state();
        let actions = self.lock.handle(event, &HostGateway::new(&self.rack))?;

        if before != LockState::Solved && self.lock.is_solved() {
            self.rack.mark_solved();
        }

        Ok(actions.into_iter().map(Output::Lock).collect())
    }
}

fn broadcaster_outputs(actions: Vec<(usize, BroadcasterAction)>) -> Vec<Output> {
    actions.into_iter().map(|(index, action)| Output::Broadcaster { index, action }).collect()
}
