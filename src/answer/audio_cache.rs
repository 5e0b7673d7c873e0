//! AudioCache (C13): content-addressed cache of synthesised speech, keyed
//! by SHA-256 of the trimmed input text. `DashMap`-backed like the
//! teacher's `rate_limit.rs` per-key state, with a `tokio::sync::watch`
//! shutdown channel for the janitor task per the orchestrator's
//! `init`/`shutdown` lifecycle (DESIGN NOTES §9).

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tokio::sync::watch;
use tokio::task::JoinHandle;

const MAX_ENTRIES: usize = 1000;
const TTL: Duration = Duration::from_secs(24 * 60 * 60);
const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);
const EVICT_FRACTION: f64 = 0.2;

struct Entry {
    bytes: Vec<u8>,
    inserted_at: Instant,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
}

pub fn cache_key(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Process-wide audio cache. Clone is cheap (`Arc`-backed); all clones
/// share the same underlying map.
#[derive(Clone)]
pub struct AudioCache {
    entries: Arc<DashMap<String, Entry>>,
}

impl AudioCache {
    pub fn new() -> Self {
        Self { entries: Arc::new(DashMap::new()) }
    }

    fn is_expired(entry: &Entry) -> bool {
        entry.inserted_at.elapsed() >= TTL
    }

    /// Lookup by text; an expired entry is deleted and reported as a miss.
    pub fn get(&self, text: &str) -> Option<Vec<u8>> {
        let key = cache_key(text);
        let expired = match self.entries.get(&key) {
            Some(entry) => Self::is_expired(&entry),
            None => return None,
        };
        if expired {
            self.entries.remove(&key);
            return None;
        }
        self.entries.get(&key).map(|entry| entry.bytes.clone())
    }

    /// Insert `bytes` under `text`'s key, evicting the oldest 20% of
    /// entries first if the cache is already at capacity.
    pub fn put(&self, text: &str, bytes: Vec<u8>) {
        if self.entries.len() >= MAX_ENTRIES {
            self.evict_oldest_fraction();
        }
        let key = cache_key(text);
        self.entries.insert(key, Entry { bytes, inserted_at: Instant::now() });
    }

    fn evict_oldest_fraction(&self) {
        let to_evict = ((self.entries.len() as f64) * EVICT_FRACTION).ceil() as usize;
        if to_evict == 0 {
            return;
        }
        let mut by_age: Vec<(String, Instant)> =
            self.entries.iter().map(|r| (r.key().clone(), r.value().inserted_at)).collect();
        by_age.sort_by_key(|(_, inserted_at)| *inserted_at);
        for (key, _) in by_age.into_iter().take(to_evict) {
            self.entries.remove(&key);
        }
    }

    /// Remove every expired entry. Run periodically by the janitor task.
    pub fn sweep_expired(&self) {
        self.entries.retain(|_, entry| !Self::is_expired(entry));
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats { entries: self.entries.len(), capacity: MAX_ENTRIES }
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Spawn the hourly sweep task, returning a handle paired with a
    /// shutdown sender. Call the sender to stop the task deterministically
    /// instead of relying on process exit.
    pub fn spawn_janitor(&self) -> (JoinHandle<()>, watch::Sender<bool>) {
        let (tx, mut rx) = watch::channel(false);
        let cache = self.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                tokio::select! {
                    _ = interval.tick() => cache.sweep_expired(),
                    _ = rx.changed() => break,
                }
            }
        });
        (handle, tx)
    }
}

impl Default for AudioCache {
    fn default() -> Self {
        Self::new()
    }
}
