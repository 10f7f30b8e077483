//! Environment abstraction for deterministic testing.
//!
//! The `Environment` trait decouples lock and broadcaster logic from system
//! resources (time, randomness). This enables:
//!
//! - Deterministic Simulation: a seeded RNG and virtual clock reproduce every
//!   rotating key sequence exactly.
//!
//! - Production Runtime: the session binary plugs in OS entropy and the Tokio
//!   clock without any change to the state machines.
//!
//! # Invariants
//!
//! - Monotonicity: `env.now()` must never go backwards
//! - Determinism: Given the same seed, `random_bytes()` produces the same
//!   sequence
//! - Isolation: Implementations must not share global state

use std::time::{Duration, Instant};

/// Abstract environment providing time, randomness, and async primitives.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// 1. Time monotonicity: `now()` never goes backwards
/// 2. Uniform bytes: every byte from `random_bytes()` is uniform over `0..=255`
pub trait Environment: Clone + Send + Sync + 'static {
    /// Returns the current time.
    fn now(&self) -> Instant;

    /// Sleeps for the specified duration.
    ///
    /// Only driver code (the session tick loop) sleeps. State machines never
    /// call this.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;

    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    /// Generates a uniformly distributed value in `0..bound`.
    ///
    /// Uses rejection sampling: draws falling in the incomplete final bucket
    /// of `u64` are discarded, so no residue is favoured.
    ///
    /// # Panics
    ///
    /// Debug builds assert `bound > 0`. Release builds return `0` for a zero
    /// bound.
    fn random_below(&self, bound: u32) -> u32 {
        debug_assert!(bound > 0, "random_below requires a non-zero bound");
        if bound == 0 {
            return 0;
        }

        let bound = u64::from(bound);
        let limit = u64::MAX - (u64::MAX % bound);
        loop {
            let draw = self.random_u64();
            if draw < limit {
                #[allow(clippy::cast_possible_truncation)] // draw % bound < bound <= u32::MAX
                return (draw % bound) as u32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        future::Future,
        sync::{
            Arc,
            atomic::{AtomicU64, Ordering},
        },
    };

    use super::*;

    /// Counter-backed environment: each `random_u64` returns the next integer.
    #[derive(Clone)]
    struct CountingEnv {
        next: Arc<AtomicU64>,
    }

    impl CountingEnv {
        fn starting_at(value: u64) -> Self {
            Self { next: Arc::new(AtomicU64::new(value)) }
        }
    }

    impl Environment for CountingEnv {
        fn now(&self) -> Instant {
            Instant::now()
        }

        fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> + Send {
            std::future::ready(())
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            let value = self.next.fetch_add(1, Ordering::SeqCst).to_be_bytes();
            for (dst, src) in buffer.iter_mut().zip(value.iter().cycle()) {
                *dst = *src;
            }
        }
    }

    #[test]
    fn random_below_reduces_draw() {
        let env = CountingEnv::starting_at(1_000_007);
        assert_eq!(env.random_below(1_000_000), 7);
    }

    #[test]
    fn random_below_rejects_final_bucket() {
        let bound = 1_000_000u32;
        let limit = u64::MAX - (u64::MAX % u64::from(bound));
        let env = CountingEnv::starting_at(limit);

        // Every draw in `limit..=u64::MAX` is rejected; the counter then
        // wraps and `0` is accepted.
        assert_eq!(env.random_below(bound), 0);
        assert_eq!(env.next.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn random_below_one_is_zero() {
        let env = CountingEnv::starting_at(12_345);
        assert_eq!(env.random_below(1), 0);
    }
}
