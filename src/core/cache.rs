use super::constants::now_millis;
use super::types::{PathDiscoveryRequest, SwapPath};
use dashmap::DashMap;
use log::debug;
use std::time::Duration;

/// Memoized discovery results keyed by (token_in, token_out, amount_out, chain_id, max_hops).
///
/// Entries carry no expiry of their own: freshness is recomputed from each
/// path's `created_at` on lookup, and one stale path evicts the whole entry.
pub struct PathCache {
    entries: DashMap<String, Vec<SwapPath>>,
    ttl: Duration,
}

impl PathCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, request: &PathDiscoveryRequest, max_hops: usize) -> Option<Vec<SwapPath>> {
        let key = request.cache_key(max_hops);
        let now = now_millis();

        // The read guard must be dropped before removing the same key
        {
            let entry = self.entries.get(&key)?;
            if self.is_fresh(entry.value(), now) {
                return Some(entry.value().clone());
            }
        }

        // Staleness is rechecked under the write lock: a concurrent put may have
        // replaced the entry since the read
        if self
            .entries
            .remove_if(&key, |_, paths| !self.is_fresh(paths, now))
            .is_some()
        {
            debug!("Evicted stale path cache entry {}", key);
        }
        None
    }

    pub fn put(&self, request: &PathDiscoveryRequest, max_hops: usize, paths: Vec<SwapPath>) {
        self.entries.insert(request.cache_key(max_hops), paths);
    }

    fn is_fresh(&self, paths: &[SwapPath], now: u64) -> bool {
        paths.iter().all(|path| path.age(now) < self.ttl)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
