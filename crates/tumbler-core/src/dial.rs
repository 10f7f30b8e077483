//! Dial gesture state machine.
//!
//! The dial has twenty positions and remembers the direction of the last
//! turn. Digits are captured on direction reversals:
//!
//! ```text
//!   start (0, Right)
//!     right ... right        nothing captured
//!     left                   capture digit 1 (position before the turn)
//!     left ... left          nothing captured
//!     right                  capture digit 2 (position before the turn)
//!                            and digit 3 (position after the turn)
//!     right ... right        nothing captured while three digits are held
//! ```
//!
//! The third digit is captured whenever a right turn leaves exactly two
//! digits in the input. After a failed check drops the third digit, the next
//! right turn therefore captures a replacement.

use std::fmt;

/// Number of positions on the dial.
pub const DIAL_POSITIONS: u8 = 20;

/// Degrees the dial model rotates per position.
pub const DIAL_INCREMENT_DEGREES: f32 = 360.0 / DIAL_POSITIONS as f32;

/// Digits in a combination.
pub const CODE_LENGTH: usize = 3;

/// A dial position in `0..DIAL_POSITIONS`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DialPosition(u8);

impl DialPosition {
    /// Position zero, where the dial starts and resets to.
    pub const ZERO: Self = Self(0);

    /// Create a position. Returns `None` if `value >= DIAL_POSITIONS`.
    pub fn new(value: u8) -> Option<Self> {
        (value < DIAL_POSITIONS).then_some(Self(value))
    }

    /// Reduce any non-negative value onto the dial.
    pub fn wrapping(value: u64) -> Self {
        #[allow(clippy::cast_possible_truncation)] // reduced below DIAL_POSITIONS
        Self((value % u64::from(DIAL_POSITIONS)) as u8)
    }

    /// Numeric value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// One position clockwise (increasing), wrapping 19 → 0.
    pub fn next(self) -> Self {
        Self((self.0 + 1) % DIAL_POSITIONS)
    }

    /// One position counter-clockwise (decreasing), wrapping 0 → 19.
    pub fn prev(self) -> Self {
        Self((self.0 + DIAL_POSITIONS - 1) % DIAL_POSITIONS)
    }
}

impl fmt::Display for DialPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of the most recent turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Decreasing positions.
    Left,
    /// Increasing positions.
    #[default]
    Right,
}

/// Dial position, last direction and captured input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dial {
    position: DialPosition,
    direction: Direction,
    input: Vec<DialPosition>,
}

impl Dial {
    /// Fresh dial at position zero, facing right, with no input.
    pub fn new() -> Self {
        Self {
            position: DialPosition::ZERO,
            direction: Direction::Right,
            input: Vec::with_capacity(CODE_LENGTH),
        }
    }

    /// Current position.
    pub fn position(&self) -> DialPosition {
        self.position
    }

    /// Direction of the last turn.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Captured digits, oldest first.
    pub fn input(&self) -> &[DialPosition] {
        &self.input
    }

    /// Turn one position left. Returns the digits captured by this turn.
    pub fn turn_left(&mut self) -> &[DialPosition] {
        let before = self.input.len();

        if self.direction != Direction::Left {
            self.input.push(self.position);
        }

        self.position = self.position.prev();
        self.direction = Direction::Left;

        &self.input[before..]
    }

    /// Turn one position right. Returns the digits captured by this turn.
    pub fn turn_right(&mut self) -> &[DialPosition] {
        let before = self.input.len();

        if self.direction != Direction::Right {
            self.input.push(self.position);
        }

        self.position = self.position.next();

        // Exactly two: a third digit is taken once per reversal pair, and
        // again only after a failed check drops it.
        if self.input.len() == 2 {
            self.input.push(self.position);
        }

        self.direction = Direction::Right;

        &self.input[before..]
    }

    /// Return to position zero facing right and discard all input.
    ///
    /// Returns the position the dial was at before the reset.
    pub fn reset(&mut self) -> DialPosition {
        let previous = self.position;
        self.position = DialPosition::ZERO;
        self.direction = Direction::Right;
        self.input.clear();
        previous
    }

    /// Remove the third captured digit, keeping the first two.
    pub fn drop_third_digit(&mut self) -> Option<DialPosition> {
        (self.input.len() >= CODE_LENGTH).then(|| self.input.remove(CODE_LENGTH - 1))
    }
}
