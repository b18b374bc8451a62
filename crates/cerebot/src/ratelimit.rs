//! Sliding-window command limit.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Tracks recent command invocations and rejects those over the limit.
///
/// Timestamps whose age reaches the window are pruned before every check.
/// A rejected invocation is not recorded.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    limit: usize,
    times: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(window: Duration, limit: usize) -> Self {
        Self {
            window,
            limit,
            times: VecDeque::new(),
        }
    }

    /// Record an invocation at `now` if the limit allows it.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        self.prune(now);

        if self.times.len() >= self.limit {
            debug!(
                "Command limit reached ({} in {:?})",
                self.times.len(),
                self.window
            );
            return false;
        }

        self.times.push_back(now);
        true
    }

    /// Invocations currently counted against the limit.
    pub fn in_window(&mut self, now: Instant) -> usize {
        self.prune(now);
        self.times.len()
    }

    fn prune(&mut self, now: Instant) {
        // Timestamps are pushed in order, so the oldest is always at the front
        while let Some(&oldest) = self.times.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                self.times.pop_front();
            } else {
                break;
            }
        }
    }
}
