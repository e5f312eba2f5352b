//! Send throttling
//!
//! Tracks the last send per key so a code cannot be requested again inside
//! the cooldown window. The store sits behind a trait so the process-local
//! map can be swapped for a shared cache when running more than one instance.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Cooldown between sends for the same key.
pub const SEND_COOLDOWN_SECS: i64 = 60;

pub trait ThrottleStore: Send + Sync {
    /// Record an attempt for `key`. Returns the seconds left in the cooldown
    /// window if the attempt was rejected, `None` if it was admitted.
    fn check_and_record(&self, key: &str, now: DateTime<Utc>) -> Option<i64>;
}

/// Process-local throttle map.
#[derive(Default)]
pub struct MemoryThrottle {
    last_sent: DashMap<String, DateTime<Utc>>,
}

impl MemoryThrottle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ThrottleStore for MemoryThrottle {
    fn check_and_record(&self, key: &str, now: DateTime<Utc>) -> Option<i64> {
        let mut entry = self.last_sent.entry(key.to_string()).or_insert(
            // Sentinel far enough in the past to always admit the first send
            now - Duration::seconds(SEND_COOLDOWN_SECS + 1),
        );
        let elapsed = (now - *entry).num_seconds();
        if (0..SEND_COOLDOWN_SECS).contains(&elapsed) {
            return Some(SEND_COOLDOWN_SECS - elapsed);
        }
        *entry = now;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_send_admitted_second_rejected() {
        let throttle = MemoryThrottle::new();
        let now = Utc::now();

        assert_eq!(throttle.check_and_record("a@test", now), None);
        let retry = throttle
            .check_and_record("a@test", now + Duration::seconds(10))
            .unwrap();
        assert_eq!(retry, 50);
    }

    #[test]
    fn admitted_again_after_cooldown() {
        let throttle = MemoryThrottle::new();
        let now = Utc::now();

        assert_eq!(throttle.check_and_record("a@test", now), None);
        assert_eq!(
            throttle.check_and_record("a@test", now + Duration::seconds(61)),
            None
        );
    }

    #[test]
    fn keys_are_independent() {
        let throttle = MemoryThrottle::new();
        let now = Utc::now();

        assert_eq!(throttle.check_and_record("a@test", now), None);
        assert_eq!(throttle.check_and_record("b@test", now), None);
    }
}
