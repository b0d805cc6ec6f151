//! Per-client rate limiting for the crawl endpoint
//!
//! A sliding-log limiter: each key keeps the timestamps of its accepted
//! requests inside the window. Pruning, checking and recording happen under
//! one lock, so concurrent requests from the same client cannot both take the
//! last slot. Rejected requests are not recorded.

use crate::config::RateLimitConfig;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

/// Key count above which idle keys are swept on the next call
const SWEEP_THRESHOLD: usize = 1024;

/// Outcome of one rate limit check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    /// Whether the request may proceed
    pub success: bool,

    /// Requests allowed per window
    pub limit: usize,

    /// Requests left in the current window after this one
    pub remaining: usize,

    /// When the oldest counted request leaves the window
    pub reset: DateTime<Utc>,
}

/// Rate limiter keyed by client identifier
pub trait RateLimiter: Send + Sync {
    /// Checks and, when allowed, records one request for `key`
    fn limit(&self, key: &str) -> RateLimitDecision;
}

/// Sliding window limiter over an in-memory request log
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    max_requests: usize,
    window: Duration,
    windows: Mutex<HashMap<String, VecDeque<DateTime<Utc>>>>,
}

impl SlidingWindowLimiter {
    /// Allows `max_requests` per `window` for each key
    pub fn new(max_requests: usize, window: std::time::Duration) -> Self {
        Self {
            max_requests,
            window: Duration::from_std(window)
                .unwrap_or_else(|_| Duration::days(365))
                .min(Duration::days(365)),
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.max_requests,
            std::time::Duration::from_secs(config.window_seconds),
        )
    }

    /// Checks `key` against the window ending at `now`
    pub fn limit_at(&self, key: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let window_start = now
            .checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        if windows.len() > SWEEP_THRESHOLD {
            windows.retain(|_, hits| hits.back().is_some_and(|last| *last > window_start));
        }

        let hits = windows.entry(key.to_string()).or_default();
        while hits.front().is_some_and(|first| *first <= window_start) {
            hits.pop_front();
        }

        let success = hits.len() < self.max_requests;
        if success {
            hits.push_back(now);
        }

        let remaining = self.max_requests.saturating_sub(hits.len());
        let reset = hits
            .front()
            .copied()
            .unwrap_or(now)
            .checked_add_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        RateLimitDecision {
            success,
            limit: self.max_requests,
            remaining,
            reset,
        }
    }
}

impl RateLimiter for SlidingWindowLimiter {
    fn limit(&self, key: &str) -> RateLimitDecision {
        self.limit_at(key, Utc::now())
    }
}
