//! Token bucket pacing for report requests.
//!
//! The remote service has informal rate limits, so cities are fetched one at a
//! time with a pause in between. A bucket with capacity 1 refilled once per
//! `request_delay` reproduces a fixed pause; a larger capacity allows bursts.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

/// Token bucket state.
#[derive(Debug)]
struct TokenBucket {
    /// Current number of available tokens.
    tokens: f64,
    /// Last time the bucket was updated.
    last_update: Instant,
    /// Token refill rate (tokens per second).
    rate: f64,
    /// Maximum bucket capacity.
    capacity: f64,
}

impl TokenBucket {
    fn with_config(requests_per_minute: f64, capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
            rate: requests_per_minute / 60.0,
            capacity,
        }
    }

    /// Refill tokens based on elapsed time.
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_update = now;
    }

    fn try_acquire(&mut self) -> bool {
        self.refill();

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn time_until_available(&mut self) -> Duration {
        self.refill();

        if self.tokens >= 1.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64((1.0 - self.tokens) / self.rate)
        }
    }
}

/// Rate limiter configuration.
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Maximum requests per minute.
    pub requests_per_minute: f64,
    /// Maximum burst capacity.
    pub burst_capacity: f64,
}

impl RateLimitConfig {
    /// One request per `delay`, no bursting.
    pub fn from_delay(delay: Duration) -> Option<Self> {
        if delay.is_zero() {
            return None;
        }
        Some(Self {
            requests_per_minute: 60.0 / delay.as_secs_f64(),
            burst_capacity: 1.0,
        })
    }
}

/// Paces report requests.
///
/// An unlimited limiter never waits; it is what tests and a zero
/// `request_delay` use.
pub struct RateLimiter {
    bucket: Option<Mutex<TokenBucket>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            bucket: Some(Mutex::new(TokenBucket::with_config(
                config.requests_per_minute,
                config.burst_capacity,
            ))),
        }
    }

    /// Fixed pause between requests; zero disables pacing.
    pub fn from_delay(delay: Duration) -> Self {
        RateLimitConfig::from_delay(delay)
            .map(Self::new)
            .unwrap_or_else(Self::unlimited)
    }

    pub fn unlimited() -> Self {
        Self { bucket: None }
    }

    pub fn is_unlimited(&self) -> bool {
        self.bucket.is_none()
    }

    /// Lock the bucket, recovering from poison if necessary.
    fn lock(bucket: &Mutex<TokenBucket>) -> MutexGuard<'_, TokenBucket> {
        bucket.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Wait until a request may be sent.
    pub async fn acquire(&self) {
        let Some(bucket) = &self.bucket else {
            return;
        };

        loop {
            let wait_time = {
                let mut bucket = Self::lock(bucket);
                if bucket.try_acquire() {
                    return;
                }
                bucket.time_until_available()
            };

            if wait_time > Duration::ZERO {
                debug!("Rate limiter: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::unlimited()
    }
}
