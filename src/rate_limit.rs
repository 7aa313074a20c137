use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::clock::Clock;
use crate::metrics::LIMITER_KEYS;

// Rate limit entry - tracks requests per bucket+key
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_at: Instant,
}

// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at: Instant,
}

impl RateLimitDecision {
    // Whole seconds until the window opens again, rounded up
    pub fn retry_after_secs(&self, now: Instant) -> u64 {
        let left = self.reset_at.saturating_duration_since(now);
        left.as_millis().div_ceil(1000).max(1) as u64
    }
}

// Process-local fixed-window counter keyed by "bucket:identity" strings.
// Constructed once by main and shared through AppState - no global singleton,
// so tests build their own with a manual clock.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    // Fixed-window check. An expired entry counts as absent and is replaced
    // wholesale, never merged. Bursts at a window edge can admit up to twice
    // the limit across the boundary - that matches the observed production
    // behavior and is kept as-is rather than tightened into a sliding window.
    //
    // The DashMap entry guard holds the shard lock across the whole
    // read-modify-write, so concurrent checks on one key never race; checks
    // on different keys run in parallel.
    pub fn check(&self, identifier: &str, limit: u32, window: Duration) -> RateLimitDecision {
        let now = self.clock.now();

        let mut entry = self
            .entries
            .entry(identifier.to_string())
            .or_insert(RateLimitEntry {
                count: 0,
                reset_at: now + window,
            });

        // window expired..? Reset it
        if entry.reset_at <= now {
            entry.count = 1;
            entry.reset_at = now + window;
            return RateLimitDecision {
                allowed: true,
                remaining: limit.saturating_sub(1),
                reset_at: entry.reset_at,
            };
        }

        entry.count += 1;
        if entry.count > limit {
            RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at: entry.reset_at,
            }
        } else {
            RateLimitDecision {
                allowed: true,
                remaining: limit - entry.count,
                reset_at: entry.reset_at,
            }
        }
    }

    // Drop entries whose window already passed. Advisory housekeeping to
    // bound memory - check() treats stale entries as absent either way.
    pub fn sweep_expired(&self) {
        let now = self.clock.now();
        self.entries.retain(|_, entry| entry.reset_at > now);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// Handle for the background sweep task - owned by main, aborted at shutdown
pub struct SweeperHandle {
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// Spawn the periodic sweep. Cadence is independent of request traffic.
pub fn start_sweeper(limiter: Arc<RateLimiter>, period: Duration) -> SweeperHandle {
    let handle = tokio::spawn(async move {
        println!("Rate limit sweeper started (interval: {:?})", period);

        let mut ticker = interval(period);
        ticker.tick().await; // first tick fires immediately

        loop {
            ticker.tick().await;
            limiter.sweep_expired();
            LIMITER_KEYS.set(limiter.len() as f64);
        }
    });

    SweeperHandle { handle }
}
