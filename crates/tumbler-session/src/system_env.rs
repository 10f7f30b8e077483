//! Production Environment implementation using system time and RNG.

use std::time::{Duration, Instant};

use tumbler_core::Environment;

/// Production environment using system time and OS randomness.
///
/// - `now()` reads `std::time::Instant`
/// - `sleep()` delegates to `tokio::time::sleep()`
/// - `random_bytes()` reads `getrandom`, so rotating keys are unpredictable
///   across sessions
#[derive(Debug, Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).unwrap_or_else(|e| {
            // Keys stay in range either way; they just stop rotating to
            // fresh values until the OS source recovers.
            tracing::error!("getrandom failed: {}", e);
            buffer.fill(0);
        });
    }
}
