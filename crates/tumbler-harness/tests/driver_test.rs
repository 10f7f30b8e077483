//! Session loop driven on the virtual clock.
//!
//! `run` paces ticks with the environment, so under `SimEnv` every tick
//! advances virtual time and the broadcasters rotate without wall-clock
//! waiting.

use std::time::Duration;

use tumbler_core::KeyBroadcaster;
use tumbler_harness::SimEnv;
use tumbler_session::{Outcome, Session, SessionConfig};

const SEED: u64 = 11;
const TICK_MS: u64 = 5;
const ROTATION_MS: u64 = 20;

fn config() -> SessionConfig {
    SessionConfig {
        broadcasters: 1,
        rotation_period: Duration::from_millis(ROTATION_MS),
        tick_interval: Duration::from_millis(TICK_MS),
        ..SessionConfig::default()
    }
}

fn key_after(rotations: u64) -> u32 {
    let mut broadcaster = KeyBroadcaster::new(SimEnv::with_seed(SEED));
    for _ in 0..rotations {
        broadcaster.tick(tumbler_core::ROTATION_PERIOD);
    }
    broadcaster.key()
}

#[tokio::test]
async fn run_rotates_keys_on_virtual_time() {
    let env = SimEnv::with_seed(SEED);
    let mut session = Session::new(env.clone(), config()).unwrap();
    let input = "x\n".repeat(400);

    let outcome = tumbler_session::run(&mut session, input.as_bytes()).await.unwrap();
    assert_eq!(outcome, Outcome::Quit);

    // Every interval slept on the virtual clock reaches the broadcaster.
    let elapsed = u64::try_from(env.elapsed().as_millis()).unwrap();
    assert!(elapsed >= ROTATION_MS, "only {elapsed}ms of virtual time passed");
    assert_eq!(elapsed % TICK_MS, 0);

    let broadcaster = &session.rack().broadcasters()[0];
    let fed = u64::try_from(broadcaster.elapsed().as_millis()).unwrap();
    assert_eq!(fed, elapsed % ROTATION_MS);
    assert_eq!(broadcaster.key(), key_after(elapsed / ROTATION_MS));
}
