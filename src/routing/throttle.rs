//! Per-client throttling for the limit_premium route action.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use crate::config::ThrottleConfig;

/// A simple token bucket.
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
        }
    }

    fn try_acquire(&mut self, capacity: f64, refill_rate: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        // Refill tokens
        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Keyed token-bucket limiter applied to throttled labels.
///
/// One bucket per client key (typically the peer IP). Requests routed
/// with the throttle action draw a token; an empty bucket means the
/// request is refused with 429.
pub struct Throttle {
    buckets: Mutex<HashMap<String, TokenBucket>>,
    refill_rate: f64,
    burst: f64,
}

impl Throttle {
    pub fn new(config: &ThrottleConfig) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            refill_rate: f64::from(config.requests_per_second),
            burst: f64::from(config.burst_size),
        }
    }

    /// Draw a token for the given client key.
    pub fn check(&self, key: &str) -> bool {
        let mut buckets = self.buckets.lock().expect("throttle mutex poisoned");
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.burst));
        bucket.try_acquire(self.burst, self.refill_rate)
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("refill_rate", &self.refill_rate)
            .field("burst", &self.burst)
            .finish()
    }
}
