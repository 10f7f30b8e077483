//! Fuzz target for the [`CombinationLock`] state machine
//!
//! # Strategy
//!
//! - Event sequences: arbitrary button presses, ticks and activations
//! - Moving signals: the rotating keys may change between any two events
//! - Broken signals: the serial may end in a non-digit
//!
//! # Invariants
//!
//! - Dial position and every captured digit stay in `0..20`
//! - Lifecycle never moves backwards (`Inactive → Armed → Solved`)
//! - `Pass` is emitted at most once, and only together with `Solved`
//! - A failed signal read leaves the lock exactly as it was
//! - Reset always yields position 0, direction Right, empty input
//! - NEVER panic

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tumbler_core::{
    CombinationLock, DIAL_POSITIONS, Dial, LockAction, LockEvent, LockState, Snapshot,
};

#[derive(Debug, Clone, Arbitrary)]
enum FuzzEvent {
    Activate,
    Left,
    Right,
    Reset,
    Tick,
    RotateKeys(Vec<u32>),
}

#[derive(Debug, Clone, Arbitrary)]
struct FuzzInput {
    keys: Vec<u32>,
    serial: String,
    batteries: u32,
    solved_units: usize,
    total_units: usize,
    events: Vec<FuzzEvent>,
}

fn rank(state: LockState) -> u8 {
    match state {
        LockState::Inactive => 0,
        LockState::Armed => 1,
        LockState::Solved => 2,
    }
}

fuzz_target!(|input: FuzzInput| {
    let mut snapshot = Snapshot {
        rotating_keys: input.keys.iter().map(|k| k % 1_000_000).collect(),
        serial: input.serial,
        batteries: input.batteries,
        solved_units: input.solved_units,
        total_units: input.total_units,
    };
    let mut lock = CombinationLock::new();
    let mut passes = 0;

    for event in input.events {
        let event = match event {
            FuzzEvent::RotateKeys(keys) => {
                snapshot.rotating_keys = keys.iter().map(|k| k % 1_000_000).collect();
                continue;
            },
            FuzzEvent::Activate => LockEvent::Activate,
            FuzzEvent::Left => LockEvent::RotateLeft,
            FuzzEvent::Right => LockEvent::RotateRight,
            FuzzEvent::Reset => LockEvent::Reset,
            FuzzEvent::Tick => LockEvent::Tick,
        };

        let before_state = lock.state();
        let before_dial = lock.dial().clone();

        match lock.handle(event, &snapshot) {
            Ok(actions) => {
                let pass_count = actions.iter().filter(|a| **a == LockAction::Pass).count();
                passes += pass_count;
                if pass_count > 0 {
                    assert_eq!(lock.state(), LockState::Solved);
                    assert_ne!(before_state, LockState::Solved);
                }

                if event == LockEvent::Reset && before_state == LockState::Armed {
                    assert_eq!(lock.dial(), &Dial::new());
                }
            },
            Err(_) => {
                assert_eq!(lock.state(), before_state);
                assert_eq!(lock.dial(), &before_dial);
            },
        }

        assert!(rank(lock.state()) >= rank(before_state), "lifecycle moved backwards");
        assert!(lock.dial().position().value() < DIAL_POSITIONS);
        assert!(lock.dial().input().iter().all(|d| d.value() < DIAL_POSITIONS));
    }

    assert!(passes <= 1, "pass emitted {passes} times");
});
