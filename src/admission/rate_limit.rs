//! Fixed-window per-key rate limiter (C14 check 1). DashMap-keyed like the
//! teacher's `PerIpRateLimiter`, but tracks a plain `{windowStart, count}`
//! pair per key instead of a token bucket — the spec's `retryAfter` is
//! defined as seconds until the current window ends, which a token bucket
//! doesn't expose directly.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dashmap::DashMap;

struct Window {
    start: Instant,
    count: u32,
}

/// Sweep interval: entries whose window started more than this long ago are
/// dropped regardless of window length, bounding memory for abandoned keys.
const SWEEP_AGE: Duration = Duration::from_secs(5 * 60);

#[derive(Clone)]
pub struct FixedWindowLimiter {
    windows: Arc<DashMap<String, Mutex<Window>>>,
}

impl FixedWindowLimiter {
    pub fn new() -> Self {
        Self { windows: Arc::new(DashMap::new()) }
    }

    /// Returns `Ok(())` when the request is admitted, `Err(retry_after_secs)`
    /// when the key has exhausted `max` requests within `window`.
    pub fn check(&self, key: &str, window: Duration, max: u32) -> Result<(), u64> {
        let entry = self.windows.entry(key.to_string()).or_insert_with(|| {
            Mutex::new(Window { start: Instant::now(), count: 0 })
        });
        let mut state = entry.lock().unwrap();

        let now = Instant::now();
        if now.duration_since(state.start) >= window {
            state.start = now;
            state.count = 0;
        }

        if state.count >= max {
            let elapsed = now.duration_since(state.start);
            let remaining = window.saturating_sub(elapsed);
            return Err(remaining.as_secs().max(1));
        }

        state.count += 1;
        Ok(())
    }

    /// Drop windows that started longer ago than `SWEEP_AGE`, run
    /// periodically by the admission janitor.
    pub fn sweep(&self) {
        self.windows.retain(|_, window| {
            let state = window.lock().unwrap();
            state.start.elapsed() < SWEEP_AGE
        });
    }

    #[cfg(test)]
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new()
    }
}
