//! Solve checker.
//!
//! Runs once per tick while the lock is armed. Nothing happens until three
//! digits are captured. A wrong combination drops only the third digit so the
//! player can keep turning right to try the next value without re-entering
//! the first two.

use crate::{
    dial::{CODE_LENGTH, Dial, DialPosition},
    error::LockError,
    gateway::SignalGateway,
    passcode::Passcode,
};

/// Outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Fewer than three digits captured.
    Pending,
    /// Input matches the current passcode.
    Solved,
    /// Input did not match; the third digit was discarded.
    Rejected {
        /// The digit that was removed.
        dropped: DialPosition,
    },
}

/// Compare the dial input with a freshly derived passcode.
///
/// On a derivation failure the input is left untouched, so the next tick
/// checks again.
pub fn check<G: SignalGateway + ?Sized>(
    dial: &mut Dial,
    gateway: &G,
) -> Result<Verdict, LockError> {
    if dial.input().len() < CODE_LENGTH {
        return Ok(Verdict::Pending);
    }

    let passcode = Passcode::derive(gateway)?;
    if passcode.matches(dial.input()) {
        return Ok(Verdict::Solved);
    }

    Ok(dial.drop_third_digit().map_or(Verdict::Pending, |dropped| Verdict::Rejected { dropped }))
}
