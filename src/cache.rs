// src/cache.rs

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

struct CachedFragment {
    rendered: String,
    stored_at: Instant,
}

/// Time-bounded store of rendered template fragments.
///
/// Everything in here can be rebuilt from the database, so a miss or a
/// poisoned lock only costs a re-render.
///
/// Every `clear` bumps a generation counter. A fragment rendered from data
/// read before the last `clear` is dropped on `insert` instead of stored.
pub struct FragmentCache {
    ttl: Duration,
    generation: AtomicU64,
    entries: RwLock<HashMap<String, CachedFragment>>,
}

impl FragmentCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            generation: AtomicU64::new(0),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Builds the key for a fragment name and the values it varies on.
    pub fn key(fragment: &str, vary_on: &[&str]) -> String {
        let mut key = format!("template.cache.{}", fragment);
        for value in vary_on {
            key.push('.');
            key.push_str(value);
        }
        key
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.rendered.clone())
    }

    /// Read this before querying the data a fragment is rendered from.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Stores a fragment rendered at `generation`, unless the cache was
    /// cleared since.
    pub fn insert(&self, key: String, rendered: String, generation: u64) {
        if !self.is_enabled() {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!(key = %key, "Dropping fragment rendered before a clear");
            return;
        }
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        entries.insert(
            key,
            CachedFragment {
                rendered,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        self.generation.fetch_add(1, Ordering::AcqRel);
        entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_includes_vary_on_values() {
        assert_eq!(
            FragmentCache::key("index_page", &["2"]),
            "template.cache.index_page.2"
        );
    }

    #[test]
    fn stores_and_clears_fragments() {
        let cache = FragmentCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), "<p>hi</p>".to_string(), cache.generation());
        assert_eq!(cache.get("a").as_deref(), Some("<p>hi</p>"));

        cache.clear();
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn zero_ttl_disables_the_cache() {
        let cache = FragmentCache::new(Duration::ZERO);
        cache.insert("a".to_string(), "x".to_string(), cache.generation());
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn expired_entries_are_not_served() {
        let cache = FragmentCache::new(Duration::from_millis(10));
        cache.insert("a".to_string(), "x".to_string(), cache.generation());
        std::thread::sleep(Duration::from_millis(30));
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn fragment_rendered_before_a_clear_is_not_stored() {
        let cache = FragmentCache::new(Duration::from_secs(60));
        let generation = cache.generation();

        // A post is saved while the fragment is being rendered.
        cache.clear();
        cache.insert("a".to_string(), "stale".to_string(), generation);
        assert!(cache.get("a").is_none());

        cache.insert("a".to_string(), "fresh".to_string(), cache.generation());
        assert_eq!(cache.get("a").as_deref(), Some("fresh"));
    }
}
