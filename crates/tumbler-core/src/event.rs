//! Events fed into the state machines and actions they produce.

/// Sound cues requested by the lock and broadcaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    /// One dial step.
    DialClick,
    /// Dial spun back to zero.
    DialReset,
    /// Lock opened.
    Unlock,
    /// Broadcaster generated a new key.
    KeyRotated,
}

/// Events fed into a [`crate::CombinationLock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockEvent {
    /// Session started; arms an inactive lock.
    Activate,
    /// Left button pressed.
    RotateLeft,
    /// Right button pressed.
    RotateRight,
    /// Reset button pressed.
    Reset,
    /// One evaluation step. Runs the solve check.
    Tick,
}

/// Actions produced by a [`crate::CombinationLock`].
#[derive(Debug, Clone, PartialEq)]
pub enum LockAction {
    /// Rotate the dial model about its axis. Positive is the left-turn sense.
    RotateDial {
        /// Rotation in degrees.
        degrees: f32,
    },
    /// Replace the dial text.
    Display {
        /// New text.
        text: String,
    },
    /// Play a sound cue.
    PlaySound(Sound),
    /// Report the lock as solved to the session. Emitted exactly once.
    Pass,
}

/// Actions produced by a [`crate::KeyBroadcaster`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcasterAction {
    /// Replace the key display.
    Display {
        /// New text.
        text: String,
    },
    /// Play a sound cue.
    PlaySound(Sound),
}
