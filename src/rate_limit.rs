//! Fixed-window admission control for the HTTP boundary.
//!
//! Each client key gets a bucket holding the current window's start and
//! request count. The window resets when it expires; buckets idle for two
//! full windows are evicted on a periodic cleanup pass so the map stays
//! bounded. The game engine never depends on this layer for correctness.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};

/// Configuration for the rate limiter.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum number of requests allowed per window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
    /// Minimum interval between idle-bucket cleanup passes.
    pub cleanup_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
            cleanup_interval: Duration::from_secs(60),
        }
    }
}

/// Verdict for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request may proceed.
    pub allowed: bool,
    /// The configured per-window limit.
    pub limit: u32,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Time until the current window resets.
    pub retry_after: Duration,
}

#[derive(Debug)]
struct Bucket {
    window_start: Instant,
    count: u32,
}

/// Per-client fixed-window rate limiter.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    state: Mutex<LimiterState>,
}

#[derive(Debug)]
struct LimiterState {
    buckets: HashMap<String, Bucket>,
    last_cleanup: Instant,
}

impl RateLimiter {
    /// Creates a limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            state: Mutex::new(LimiterState {
                buckets: HashMap::new(),
                last_cleanup: Instant::now(),
            }),
        }
    }

    /// Checks whether a request from `client` may proceed, recording it if
    /// so.
    #[instrument(skip(self))]
    pub fn check(&self, client: &str) -> Decision {
        let now = Instant::now();
        let mut state = self.state.lock().unwrap();

        if now.duration_since(state.last_cleanup) >= self.config.cleanup_interval {
            state.last_cleanup = now;
            let idle_cutoff = self.config.window * 2;
            state
                .buckets
                .retain(|_, b| now.duration_since(b.window_start) <= idle_cutoff);
            debug!(tracked = state.buckets.len(), "Evicted idle buckets");
        }

        let bucket = state
            .buckets
            .entry(client.to_string())
            .or_insert_with(|| Bucket {
                window_start: now,
                count: 0,
            });

        if now.duration_since(bucket.window_start) >= self.config.window {
            bucket.window_start = now;
            bucket.count = 0;
        }

        let elapsed = now.duration_since(bucket.window_start);
        let retry_after = self.config.window.saturating_sub(elapsed);

        if bucket.count < self.config.max_requests {
            bucket.count += 1;
            Decision {
                allowed: true,
                limit: self.config.max_requests,
                remaining: self.config.max_requests - bucket.count,
                retry_after,
            }
        } else {
            warn!(client, "Rate limit exceeded");
            Decision {
                allowed: false,
                limit: self.config.max_requests,
                remaining: 0,
                retry_after,
            }
        }
    }

    /// Number of client buckets currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.state.lock().unwrap().buckets.len()
    }
}
