//! Model dial.

/// Positions on the dial.
const POSITIONS: i32 = 20;

/// Dial with plain integer state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelDial {
    position: i32,
    last_left: bool,
    input: Vec<i32>,
}

impl ModelDial {
    /// Fresh dial.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position.
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Whether the last turn was to the left.
    pub fn last_left(&self) -> bool {
        self.last_left
    }

    /// Captured digits.
    pub fn input(&self) -> &[i32] {
        &self.input
    }

    /// One step left.
    pub fn left(&mut self) {
        if !self.last_left {
            self.input.push(self.position);
        }
        self.position = (self.position - 1).rem_euclid(POSITIONS);
        self.last_left = true;
    }

    /// One step right.
    pub fn right(&mut self) {
        if self.last_left {
            self.input.push(self.position);
        }
        self.position = (self.position + 1).rem_euclid(POSITIONS);
        if self.input.len() == 2 {
            self.input.push(self.position);
        }
        self.last_left = false;
    }

    /// Back to a fresh dial.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Compare the first three digits with `code`; on a miss drop the third.
    ///
    /// Returns `None` while fewer than three digits are held.
    pub fn check(&mut self, code: [i32; 3]) -> Option<bool> {
        if self.input.len() < 3 {
            return None;
        }
        if self.input[..3] == code {
            return Some(true);
        }
        self.input.remove(2);
        Some(false)
    }
}
