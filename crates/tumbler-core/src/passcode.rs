//! Passcode derivation.
//!
//! The combination is never stored. Every check derives it again from the
//! session, so it follows the rotating keys as they change:
//!
//! ```text
//!   keys present:  a = Σ last digit(key)         b = Σ first digit(key)
//!   no keys:       a = serial digit + solved     b = total units
//!
//!   a = (a + batteries) mod 20
//!   b = (b + solved)    mod 20
//!   c = (a + b)         mod 20
//! ```

use std::fmt;

use tumbler_proto::ProtocolError;

use crate::{
    dial::{CODE_LENGTH, DialPosition},
    gateway::SignalGateway,
};

/// A three digit combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Passcode([DialPosition; CODE_LENGTH]);

impl Passcode {
    /// Build a passcode from explicit digits.
    pub fn new(digits: [DialPosition; CODE_LENGTH]) -> Self {
        Self(digits)
    }

    /// Derive the current passcode from session signals.
    ///
    /// The serial is only read when no rotating keys are present.
    pub fn derive<G: SignalGateway + ?Sized>(gateway: &G) -> Result<Self, ProtocolError> {
        let keys = gateway.rotating_keys()?;
        // Counts are reduced before summing; the result is the same modulo
        // the dial size and no count can overflow the sum.
        let solved = on_dial(gateway.solved_units() as u64);

        let (a, b) = if keys.is_empty() {
            let serial = u64::from(gateway.last_serial_digit()?);
            (serial + solved, on_dial(gateway.total_units() as u64))
        } else {
            keys.iter().fold((0u64, 0u64), |(a, b), &key| {
                (a + u64::from(last_digit(key)), b + u64::from(first_digit(key)))
            })
        };

        let a = DialPosition::wrapping(a + on_dial(u64::from(gateway.battery_count()?)));
        let b = DialPosition::wrapping(b + solved);
        let c = DialPosition::wrapping(u64::from(a.value()) + u64::from(b.value()));

        Ok(Self([a, b, c]))
    }

    /// The digits, in entry order.
    pub fn digits(&self) -> [DialPosition; CODE_LENGTH] {
        self.0
    }

    /// Whether the first three captured digits equal this passcode.
    pub fn matches(&self, input: &[DialPosition]) -> bool {
        input.get(..CODE_LENGTH).is_some_and(|entered| entered == self.0)
    }
}

impl fmt::Display for Passcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{a} {b} {c}")
    }
}

fn on_dial(value: u64) -> u64 {
    u64::from(DialPosition::wrapping(value).value())
}

fn last_digit(key: u32) -> u32 {
    key % 10
}

fn first_digit(mut key: u32) -> u32 {
    while key >= 10 {
        key /= 10;
    }
    key
}
