//! Operations for model-based testing.
//!
//! Operations are generated randomly by proptest (or decoded by the fuzzer
//! through `Arbitrary`) and applied to both the model and the real session.

use arbitrary::Arbitrary;

/// Operations that can be applied to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// Start the session.
    Activate,
    /// Press the left button.
    TurnLeft,
    /// Press the right button.
    TurnRight,
    /// Press the reset button.
    Reset,
    /// Tick without moving time: runs only the solve check.
    Check,
    /// Tick after `secs` seconds: broadcasters may rotate, then the solve
    /// check runs.
    AdvanceTime {
        /// Seconds to advance.
        secs: u8,
    },
}
