//! Rotating key broadcaster.
//!
//! A companion widget that shows a six digit key and replaces it with a fresh
//! uniform draw every rotation period. The lock never talks to it directly;
//! it answers `twofactor` queries routed by the session host.
//!
//! Time is an explicit accumulator advanced by [`KeyBroadcaster::tick`], so
//! rotation is deterministic under a simulated clock.

use std::time::Duration;

use tumbler_proto::{KEY_SPACE, QueryKind, Record, TwoFactorKey};

use crate::{
    env::Environment,
    event::{BroadcasterAction, Sound},
    widget::Widget,
};

/// Time between key rotations.
pub const ROTATION_PERIOD: Duration = Duration::from_secs(60);

/// Rotating key widget.
///
/// # Type Parameters
///
/// - `E`: Environment implementation for randomness
#[derive(Debug, Clone)]
pub struct KeyBroadcaster<E: Environment> {
    /// Environment for randomness.
    env: E,
    /// Current key, in `0..KEY_SPACE`.
    key: u32,
    /// Time since the last rotation or activation.
    elapsed: Duration,
    /// Rotation period.
    period: Duration,
}

impl<E: Environment> KeyBroadcaster<E> {
    /// Create a broadcaster with the default rotation period and a freshly
    /// drawn key.
    pub fn new(env: E) -> Self {
        Self::with_period(env, ROTATION_PERIOD)
    }

    /// Create a broadcaster with a custom rotation period.
    pub fn with_period(env: E, period: Duration) -> Self {
        let key = env.random_below(KEY_SPACE);
        Self { env, key, elapsed: Duration::ZERO, period }
    }

    /// Current key.
    pub fn key(&self) -> u32 {
        self.key
    }

    /// Time accumulated towards the next rotation.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Rotation period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Session started: restart the timer and show the current key.
    pub fn activate(&mut self) -> Vec<BroadcasterAction> {
        self.elapsed = Duration::ZERO;
        vec![self.display()]
    }

    /// Advance the timer by `delta`, rotating the key once the period is
    /// reached.
    ///
    /// The accumulator restarts from zero on rotation; any overshoot within
    /// the tick is discarded.
    pub fn tick(&mut self, delta: Duration) -> Vec<BroadcasterAction> {
        self.elapsed = self.elapsed.saturating_add(delta);
        if self.elapsed < self.period {
            return vec![];
        }

        self.elapsed = Duration::ZERO;
        self.key = self.env.random_below(KEY_SPACE);
        tracing::debug!(key = self.key, "rotated key");

        vec![BroadcasterAction::PlaySound(Sound::KeyRotated), self.display()]
    }

    fn display(&self) -> BroadcasterAction {
        BroadcasterAction::Display { text: format!("{}.", self.key) }
    }
}

impl<E: Environment> Widget for KeyBroadcaster<E> {
    fn answer(&self, query: &str) -> Option<String> {
        if QueryKind::from_wire(query) != Some(QueryKind::TwoFactor) {
            return None;
        }

        match (TwoFactorKey { key: self.key }).encode() {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::error!("failed to encode twofactor response: {}", e);
                None
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::{
        future::Future,
        sync::{
            Arc,
            atomic::{AtomicU64, Ordering},
        },
        time::Instant,
    };

    use super::*;

    /// Each `random_u64` call returns the next value of a counter.
    #[derive(Clone)]
    struct TestEnv {
        next: Arc<AtomicU64>,
    }

    impl TestEnv {
        fn starting_at(value: u64) -> Self {
            Self { next: Arc::new(AtomicU64::new(value)) }
        }
    }

    impl Environment for TestEnv {
        fn now(&self) -> Instant {
            Instant::now()
        }

        fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> + Send {
            std::future::ready(())
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            let value = self.next.fetch_add(1, Ordering::SeqCst).to_be_bytes();
            buffer.copy_from_slice(&value[..buffer.len()]);
        }
    }

    #[test]
    fn new_broadcaster_draws_key() {
        let broadcaster = KeyBroadcaster::new(TestEnv::starting_at(123_456));
        assert_eq!(broadcaster.key(), 123_456);
        assert_eq!(broadcaster.period(), ROTATION_PERIOD);
        assert_eq!(broadcaster.elapsed(), Duration::ZERO);
    }

    #[test]
    fn key_is_reduced_into_key_space() {
        let broadcaster = KeyBroadcaster::new(TestEnv::starting_at(3_000_042));
        assert_eq!(broadcaster.key(), 42);
    }

    #[test]
    fn tick_below_period_keeps_key() {
        let mut broadcaster = KeyBroadcaster::new(TestEnv::starting_at(5));
        assert!(broadcaster.tick(Duration::from_secs(59)).is_empty());
        assert_eq!(broadcaster.key(), 5);
        assert_eq!(broadcaster.elapsed(), Duration::from_secs(59));
    }

    #[test]
    fn tick_reaching_period_rotates() {
        let mut broadcaster = KeyBroadcaster::new(TestEnv::starting_at(5));
        broadcaster.tick(Duration::from_secs(30));
        let actions = broadcaster.tick(Duration::from_secs(30));

        assert_eq!(broadcaster.key(), 6);
        assert_eq!(broadcaster.elapsed(), Duration::ZERO);
        assert_eq!(actions, vec![
            BroadcasterAction::PlaySound(Sound::KeyRotated),
            BroadcasterAction::Display { text: "6.".to_string() },
        ]);
    }

    #[test]
    fn overshoot_is_discarded() {
        let mut broadcaster = KeyBroadcaster::new(TestEnv::starting_at(5));
        broadcaster.tick(Duration::from_secs(150));
        assert_eq!(broadcaster.key(), 6);
        assert_eq!(broadcaster.elapsed(), Duration::ZERO);
    }

    #[test]
    fn activate_restarts_timer_without_new_key() {
        let mut broadcaster = KeyBroadcaster::new(TestEnv::starting_at(77));
        broadcaster.tick(Duration::from_secs(45));

        let actions = broadcaster.activate();
        assert_eq!(broadcaster.key(), 77);
        assert_eq!(broadcaster.elapsed(), Duration::ZERO);
        assert_eq!(actions, vec![BroadcasterAction::Display { text: "77.".to_string() }]);

        assert!(broadcaster.tick(Duration::from_secs(45)).is_empty());
    }

    #[test]
    fn custom_period() {
        let mut broadcaster =
            KeyBroadcaster::with_period(TestEnv::starting_at(1), Duration::from_millis(100));
        assert!(!broadcaster.tick(Duration::from_millis(100)).is_empty());
        assert_eq!(broadcaster.key(), 2);
    }

    #[test]
    fn answers_twofactor_query() {
        let broadcaster = KeyBroadcaster::new(TestEnv::starting_at(123_456));
        let response = broadcaster.answer("twofactor").unwrap();
        assert_eq!(TwoFactorKey::decode(&response).unwrap().key, 123_456);
    }

    #[test]
    fn ignores_other_queries() {
        let broadcaster = KeyBroadcaster::new(TestEnv::starting_at(1));
        assert_eq!(broadcaster.answer("serial"), None);
        assert_eq!(broadcaster.answer("batteries"), None);
        assert_eq!(broadcaster.answer("twofactor_key"), None);
    }
}
