//! Model world: one lock, its broadcasters and the session counts.

use std::time::Duration;

use tumbler_core::Environment;
use tumbler_proto::KEY_SPACE;
use tumbler_session::SessionConfig;

use super::{dial::ModelDial, operation::Operation};
use crate::SimEnv;

/// Lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelPhase {
    /// Not started.
    Inactive,
    /// Accepting input.
    Armed,
    /// Opened.
    Solved,
}

/// Observable state for oracle comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// Lifecycle phase.
    pub phase: ModelPhase,
    /// Dial position.
    pub position: i32,
    /// Whether the last turn was to the left.
    pub last_left: bool,
    /// Captured digits.
    pub input: Vec<i32>,
    /// Current key of every broadcaster.
    pub keys: Vec<u32>,
    /// Solved units, including the lock once opened.
    pub solved_units: usize,
}

#[derive(Debug, Clone)]
struct ModelBroadcaster {
    key: u32,
    elapsed: Duration,
}

/// Model world - the reference implementation.
#[derive(Debug, Clone)]
pub struct ModelWorld {
    env: SimEnv,
    dial: ModelDial,
    phase: ModelPhase,
    broadcasters: Vec<ModelBroadcaster>,
    period: Duration,
    serial_digit: i32,
    batteries: i32,
    total_units: usize,
    solved_units: usize,
    passes: usize,
}

impl ModelWorld {
    /// Build a model of the session `config` describes, drawing keys from a
    /// fresh `SimEnv` seeded with `seed`.
    pub fn new(seed: u64, config: &SessionConfig) -> Self {
        let env = SimEnv::with_seed(seed);
        let broadcasters = (0..config.broadcasters)
            .map(|_| ModelBroadcaster { key: env.random_below(KEY_SPACE), elapsed: Duration::ZERO })
            .collect();

        let serial_digit = config
            .serial
            .chars()
            .next_back()
            .and_then(|c| c.to_digit(10))
            .and_then(|d| i32::try_from(d).ok())
            .unwrap_or_default();
        let batteries = config.battery_holders.iter().map(|&b| i64::from(b)).sum::<i64>();

        Self {
            env,
            dial: ModelDial::new(),
            phase: ModelPhase::Inactive,
            broadcasters,
            period: config.rotation_period,
            serial_digit,
            batteries: i32::try_from(batteries % 20).unwrap_or_default(),
            total_units: config.other_units + 1,
            solved_units: config.other_solved,
            passes: 0,
        }
    }

    /// Times the lock reported a pass.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> ModelPhase {
        self.phase
    }

    /// The passcode the lock would accept right now.
    pub fn passcode(&self) -> [i32; 3] {
        let solved = on_dial(self.solved_units);
        let (a, b) = if self.broadcasters.is_empty() {
            (self.serial_digit + solved, on_dial(self.total_units))
        } else {
            self.broadcasters.iter().fold((0, 0), |(a, b), broadcaster| {
                let digits = broadcaster.key.to_string().into_bytes();
                let first = i32::from(digits[0] - b'0');
                let last = i32::from(digits[digits.len() - 1] - b'0');
                (a + last, b + first)
            })
        };

        let a = (a + self.batteries) % 20;
        let b = (b + solved) % 20;
        [a, b, (a + b) % 20]
    }

    /// Apply an operation.
    pub fn apply(&mut self, op: Operation) {
        match op {
            Operation::Activate => {
                if self.phase == ModelPhase::Inactive {
                    self.phase = ModelPhase::Armed;
                    for broadcaster in &mut self.broadcasters {
                        broadcaster.elapsed = Duration::ZERO;
                    }
                }
            },
            Operation::TurnLeft if self.phase == ModelPhase::Armed => self.dial.left(),
            Operation::TurnRight if self.phase == ModelPhase::Armed => self.dial.right(),
            Operation::Reset if self.phase == ModelPhase::Armed => self.dial.reset(),
            Operation::TurnLeft | Operation::TurnRight | Operation::Reset => {},
            Operation::Check => self.check(),
            Operation::AdvanceTime { secs } => {
                self.advance(Duration::from_secs(u64::from(secs)));
                self.check();
            },
        }
    }

    fn advance(&mut self, delta: Duration) {
        for broadcaster in &mut self.broadcasters {
            broadcaster.elapsed += delta;
            if broadcaster.elapsed >= self.period {
                broadcaster.elapsed = Duration::ZERO;
                broadcaster.key = self.env.random_below(KEY_SPACE);
            }
        }
    }

    fn check(&mut self) {
        if self.phase != ModelPhase::Armed {
            return;
        }
        let code = self.passcode();
        if self.dial.check(code) == Some(true) {
            self.phase = ModelPhase::Solved;
            self.passes += 1;
            self.solved_units += 1;
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        ObservableState {
            phase: self.phase,
            position: self.dial.position(),
            last_left: self.dial.last_left(),
            input: self.dial.input().to_vec(),
            keys: self.broadcasters.iter().map(|b| b.key).collect(),
            solved_units: self.solved_units,
        }
    }
}

fn on_dial(count: usize) -> i32 {
    i32::try_from(count % 20).unwrap_or_default()
}
