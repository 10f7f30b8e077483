//! Combination lock state machine.
//!
//! The `CombinationLock` owns the dial and its lifecycle. It is a pure state
//! machine: callers feed [`LockEvent`]s together with a [`SignalGateway`] and
//! execute the returned [`LockAction`]s.
//!
//! # Lifecycle
//!
//! ```text
//!   Inactive --Activate--> Armed --Tick (match)--> Solved
//! ```
//!
//! Buttons and ticks are ignored outside `Armed`. `Solved` is terminal, so
//! [`LockAction::Pass`] is produced at most once per lock.
//!
//! # Ordering
//!
//! Within one tick the caller delivers button events first and `Tick` last,
//! so a check always sees the input of the same tick.

use crate::{
    dial::{DIAL_INCREMENT_DEGREES, Dial},
    error::LockError,
    event::{LockAction, LockEvent, Sound},
    gateway::SignalGateway,
    passcode::Passcode,
    solve::{self, Verdict},
};

/// Lifecycle state of a lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LockState {
    /// Waiting for the session to start.
    #[default]
    Inactive,
    /// Accepting input.
    Armed,
    /// Opened. Terminal.
    Solved,
}

/// Rotary combination lock.
#[derive(Debug, Clone, Default)]
pub struct CombinationLock {
    state: LockState,
    dial: Dial,
    /// Failed checks since activation.
    rejections: u64,
}

impl CombinationLock {
    /// New inactive lock with a fresh dial.
    pub fn new() -> Self {
        Self { state: LockState::Inactive, dial: Dial::new(), rejections: 0 }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LockState {
        self.state
    }

    /// Whether the lock has been opened.
    pub fn is_solved(&self) -> bool {
        self.state == LockState::Solved
    }

    /// The dial.
    pub fn dial(&self) -> &Dial {
        &self.dial
    }

    /// Failed checks since activation.
    pub fn rejections(&self) -> u64 {
        self.rejections
    }

    /// Process an event and return resulting actions.
    ///
    /// # Errors
    ///
    /// Returns `LockError::Signal` if the gateway answers a query with a
    /// malformed response. The lock state is unchanged in that case.
    pub fn handle<G: SignalGateway + ?Sized>(
        &mut self,
        event: LockEvent,
        gateway: &G,
    ) -> Result<Vec<LockAction>, LockError> {
        match event {
            LockEvent::Activate => self.handle_activate(gateway),
            LockEvent::Tick => self.handle_tick(gateway),
            LockEvent::RotateLeft | LockEvent::RotateRight | LockEvent::Reset
                if self.state != LockState::Armed =>
            {
                tracing::trace!(?event, state = ?self.state, "ignoring button");
                Ok(vec![])
            },
            LockEvent::RotateLeft => Ok(self.handle_rotate_left()),
            LockEvent::RotateRight => Ok(self.handle_rotate_right()),
            LockEvent::Reset => Ok(self.handle_reset()),
        }
    }

    /// Handle session activation.
    fn handle_activate<G: SignalGateway + ?Sized>(
        &mut self,
        gateway: &G,
    ) -> Result<Vec<LockAction>, LockError> {
        if self.state != LockState::Inactive {
            return Ok(vec![]);
        }

        let passcode = Passcode::derive(gateway)?;
        tracing::info!("lock armed");
        tracing::debug!(%passcode, "passcode at activation");

        self.state = LockState::Armed;
        Ok(vec![self.display()])
    }

    /// Handle left button.
    fn handle_rotate_left(&mut self) -> Vec<LockAction> {
        let captured = self.dial.turn_left();
        if !captured.is_empty() {
            tracing::debug!(?captured, "captured on left turn");
        }

        vec![
            LockAction::RotateDial { degrees: DIAL_INCREMENT_DEGREES },
            self.display(),
            LockAction::PlaySound(Sound::DialClick),
        ]
    }

    /// Handle right button.
    fn handle_rotate_right(&mut self) -> Vec<LockAction> {
        let captured = self.dial.turn_right();
        if !captured.is_empty() {
            tracing::debug!(?captured, "captured on right turn");
        }

        vec![
            LockAction::RotateDial { degrees: -DIAL_INCREMENT_DEGREES },
            self.display(),
            LockAction::PlaySound(Sound::DialClick),
        ]
    }

    /// Handle reset button.
    fn handle_reset(&mut self) -> Vec<LockAction> {
        let previous = self.dial.reset();

        vec![
            LockAction::RotateDial {
                degrees: DIAL_INCREMENT_DEGREES * f32::from(previous.value()),
            },
            self.display(),
            LockAction::PlaySound(Sound::DialReset),
        ]
    }

    /// Handle tick: run the solve check.
    fn handle_tick<G: SignalGateway + ?Sized>(
        &mut self,
        gateway: &G,
    ) -> Result<Vec<LockAction>, LockError> {
        if self.state != LockState::Armed {
            return Ok(vec![]);
        }

        match solve::check(&mut self.dial, gateway)? {
            Verdict::Pending => Ok(vec![]),
            Verdict::Rejected { dropped } => {
                self.rejections += 1;
                tracing::debug!(%dropped, rejections = self.rejections, "combination rejected");
                Ok(vec![])
            },
            Verdict::Solved => {
                self.state = LockState::Solved;
                tracing::info!(rejections = self.rejections, "lock solved");
                Ok(vec![LockAction::PlaySound(Sound::Unlock), LockAction::Pass])
            },
        }
    }

    fn display(&self) -> LockAction {
        LockAction::Display { text: self.dial.position().to_string() }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        dial::DialPosition,
        gateway::{Snapshot, Standalone},
    };

    /// Snapshot whose passcode is (1, 4, 5).
    fn snapshot() -> Snapshot {
        Snapshot {
            rotating_keys: Vec::new(),
            serial: "ZZ0".to_string(),
            batteries: 1,
            solved_units: 0,
            total_units: 4,
        }
    }

    fn armed() -> CombinationLock {
        let mut lock = CombinationLock::new();
        lock.handle(LockEvent::Activate, &snapshot()).unwrap();
        lock
    }

    fn press(lock: &mut CombinationLock, event: LockEvent, times: usize) {
        for _ in 0..times {
            lock.handle(event, &snapshot()).unwrap();
        }
    }

    #[test]
    fn new_lock_is_inactive() {
        let lock = CombinationLock::new();
        assert_eq!(lock.state(), LockState::Inactive);
        assert_eq!(lock.dial(), &Dial::new());
    }

    #[test]
    fn activate_arms_and_shows_position() {
        let mut lock = CombinationLock::new();
        let actions = lock.handle(LockEvent::Activate, &Standalone).unwrap();
        assert_eq!(lock.state(), LockState::Armed);
        assert_eq!(actions, vec![LockAction::Display { text: "0".to_string() }]);
    }

    #[test]
    fn second_activate_is_noop() {
        let mut lock = armed();
        assert!(lock.handle(LockEvent::Activate, &snapshot()).unwrap().is_empty());
        assert_eq!(lock.state(), LockState::Armed);
    }

    #[test]
    fn activate_with_broken_gateway_stays_inactive() {
        let mut lock = CombinationLock::new();
        let broken = Snapshot { serial: String::new(), ..snapshot() };
        assert!(lock.handle(LockEvent::Activate, &broken).is_err());
        assert_eq!(lock.state(), LockState::Inactive);
    }

    #[test]
    fn buttons_ignored_while_inactive() {
        let mut lock = CombinationLock::new();
        for event in [LockEvent::RotateLeft, LockEvent::RotateRight, LockEvent::Reset] {
            assert!(lock.handle(event, &snapshot()).unwrap().is_empty());
        }
        assert_eq!(lock.dial(), &Dial::new());
    }

    #[test]
    fn left_press_actions() {
        let mut lock = armed();
        let actions = lock.handle(LockEvent::RotateLeft, &snapshot()).unwrap();
        assert_eq!(actions, vec![
            LockAction::RotateDial { degrees: 18.0 },
            LockAction::Display { text: "19".to_string() },
            LockAction::PlaySound(Sound::DialClick),
        ]);
    }

    #[test]
    fn right_press_actions() {
        let mut lock = armed();
        let actions = lock.handle(LockEvent::RotateRight, &snapshot()).unwrap();
        assert_eq!(actions, vec![
            LockAction::RotateDial { degrees: -18.0 },
            LockAction::Display { text: "1".to_string() },
            LockAction::PlaySound(Sound::DialClick),
        ]);
    }

    #[test]
    fn reset_spins_back_proportionally() {
        let mut lock = armed();
        press(&mut lock, LockEvent::RotateRight, 3);
        let actions = lock.handle(LockEvent::Reset, &snapshot()).unwrap();
        assert_eq!(actions, vec![
            LockAction::RotateDial { degrees: 54.0 },
            LockAction::Display { text: "0".to_string() },
            LockAction::PlaySound(Sound::DialReset),
        ]);
        assert_eq!(lock.dial(), &Dial::new());
    }

    #[test]
    fn tick_solves_matching_input() {
        let mut lock = armed();
        press(&mut lock, LockEvent::RotateRight, 1);
        press(&mut lock, LockEvent::RotateLeft, 17); // capture 1, down to 4
        press(&mut lock, LockEvent::RotateRight, 1); // capture 4 and 5

        let actions = lock.handle(LockEvent::Tick, &snapshot()).unwrap();
        assert_eq!(actions, vec![LockAction::PlaySound(Sound::Unlock), LockAction::Pass]);
        assert!(lock.is_solved());
    }

    #[test]
    fn tick_rejects_and_allows_retry() {
        let mut lock = armed();
        press(&mut lock, LockEvent::RotateRight, 1);
        press(&mut lock, LockEvent::RotateLeft, 18); // capture 1, down to 3
        press(&mut lock, LockEvent::RotateRight, 1); // capture 3 and 4

        assert!(lock.handle(LockEvent::Tick, &snapshot()).unwrap().is_empty());
        assert_eq!(lock.rejections(), 1);
        assert_eq!(lock.dial().input().len(), 2);
        assert_eq!(lock.state(), LockState::Armed);
    }

    #[test]
    fn tick_while_inactive_is_noop() {
        let mut lock = CombinationLock::new();
        assert!(lock.handle(LockEvent::Tick, &snapshot()).unwrap().is_empty());
        assert_eq!(lock.state(), LockState::Inactive);
    }

    #[test]
    fn solved_lock_ignores_everything() {
        let mut lock = armed();
        press(&mut lock, LockEvent::RotateRight, 1);
        press(&mut lock, LockEvent::RotateLeft, 17);
        press(&mut lock, LockEvent::RotateRight, 1);
        lock.handle(LockEvent::Tick, &snapshot()).unwrap();
        assert!(lock.is_solved());

        let dial = lock.dial().clone();
        for event in [
            LockEvent::RotateLeft,
            LockEvent::RotateRight,
            LockEvent::Reset,
            LockEvent::Activate,
            LockEvent::Tick,
        ] {
            assert!(lock.handle(event, &snapshot()).unwrap().is_empty());
        }
        assert!(lock.is_solved());
        assert_eq!(lock.dial(), &dial);
        assert_eq!(dial.position(), DialPosition::new(5).unwrap());
    }
}
