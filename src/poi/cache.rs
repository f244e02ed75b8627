//! Time-bounded POI result cache
//!
//! Entries are keyed by zone name plus the sorted category list, so the same
//! categories requested in a different order share an entry. Expired entries
//! are dropped when they are next looked up; nothing sweeps in the background,
//! so memory for a stale key is only reclaimed when that exact key is read
//! again.

use crate::constants::cache::POI_TTL_SECS;
use crate::poi::{PoiCategory, PoisByCategory};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: PoisByCategory,
    expires_at: Instant,
}

/// Shared POI cache
///
/// Concurrent misses on one key may both fetch upstream; the later `put`
/// simply overwrites the earlier one.
#[derive(Debug)]
pub struct PoiCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

/// Cache key: zone name and lexicographically sorted category keys
pub fn cache_key(zone: &str, categories: &[PoiCategory]) -> String {
    let mut keys: Vec<&str> = categories.iter().map(|c| c.key()).collect();
    keys.sort_unstable();
    keys.dedup();
    format!("{}_{}", zone, keys.join(","))
}

impl PoiCache {
    /// Create a cache with the default one-hour TTL
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(POI_TTL_SECS))
    }

    /// Create a cache with a custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Entry lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // A panic mid-insert cannot leave a half-written entry behind
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a live entry, evicting it if it has expired
    pub fn get(&self, zone: &str, categories: &[PoiCategory]) -> Option<PoisByCategory> {
        let key = cache_key(zone, categories);
        let mut entries = self.lock();

        let expired = match entries.get(&key) {
            Some(entry) if Instant::now() < entry.expires_at => {
                debug!(key = %key, "POI cache hit");
                return Some(entry.payload.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            debug!(key = %key, "POI cache entry expired");
            entries.remove(&key);
        } else {
            debug!(key = %key, "POI cache miss");
        }
        None
    }

    /// Store a payload unless it holds no POIs at all
    ///
    /// Returns whether the payload was stored. Empty payloads are skipped so a
    /// transient empty upstream answer is retried on the next request.
    pub fn put(&self, zone: &str, categories: &[PoiCategory], payload: PoisByCategory) -> bool {
        let key = cache_key(zone, categories);

        if payload.values().all(Vec::is_empty) {
            debug!(key = %key, "Empty POI result, skipping cache");
            return false;
        }

        let entry = CacheEntry {
            payload,
            expires_at: Instant::now() + self.ttl,
        };
        self.lock().insert(key, entry);
        true
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for PoiCache {
    fn default() -> Self {
        Self::new()
    }
}
