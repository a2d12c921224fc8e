//! Rate limiter implementation
//!
//! Sliding one-minute window keyed by client address.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

const WINDOW: Duration = Duration::from_secs(60);

/// Result of a rate limit check
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Total limit for the window
    pub limit: u32,
    /// Time until the oldest request leaves the window (in seconds)
    pub reset_in_seconds: u64,
}

/// Per-key sliding window limiter
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    /// Per-key request timestamps
    records: Arc<RwLock<HashMap<String, Vec<Instant>>>>,
    cleanup_interval: Duration,
    last_cleanup: Arc<RwLock<Instant>>,
}

impl RateLimiter {
    /// Allow `limit` requests per key and minute
    pub fn per_minute(limit: u32) -> Self {
        Self {
            limit,
            records: Arc::new(RwLock::new(HashMap::new())),
            cleanup_interval: Duration::from_secs(300),
            last_cleanup: Arc::new(RwLock::new(Instant::now())),
        }
    }

    /// Check and record in one operation. Rejected requests are not recorded.
    pub async fn check_and_record(&self, key: &str) -> RateLimitResult {
        self.maybe_cleanup().await;

        let now = Instant::now();
        let mut records = self.records.write().await;
        let result = self.evaluate(records.get(key), now);

        if result.allowed {
            records.entry(key.to_string()).or_default().push(now);
        }

        result
    }

    fn evaluate(&self, records: Option<&Vec<Instant>>, now: Instant) -> RateLimitResult {
        let window_start = now.checked_sub(WINDOW).unwrap_or(now);
        let in_window: Vec<Instant> = records
            .map(|r| r.iter().copied().filter(|t| *t > window_start).collect())
            .unwrap_or_default();
        let count = in_window.len() as u32;

        if count >= self.limit {
            let reset_in = in_window
                .iter()
                .min()
                .map(|oldest| {
                    WINDOW
                        .as_secs()
                        .saturating_sub(now.duration_since(*oldest).as_secs())
                })
                .unwrap_or(WINDOW.as_secs());

            return RateLimitResult {
                allowed: false,
                remaining: 0,
                limit: self.limit,
                reset_in_seconds: reset_in.max(1),
            };
        }

        RateLimitResult {
            allowed: true,
            remaining: self.limit.saturating_sub(count + 1),
            limit: self.limit,
            reset_in_seconds: WINDOW.as_secs(),
        }
    }

    async fn maybe_cleanup(&self) {
        let should_cleanup = {
            let last = self.last_cleanup.read().await;
            last.elapsed() >= self.cleanup_interval
        };

        if should_cleanup {
            let mut last = self.last_cleanup.write().await;
            *last = Instant::now();

            let now = Instant::now();
            let cutoff = now.checked_sub(WINDOW).unwrap_or(now);

            let mut records = self.records.write().await;
            for timestamps in records.values_mut() {
                timestamps.retain(|t| *t > cutoff);
            }
            records.retain(|_, v| !v.is_empty());
        }
    }
}
