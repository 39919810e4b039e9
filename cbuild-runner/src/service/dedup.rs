//! Log deduplication cache
//!
//! Log pages can overlap, so the same line may be served twice. The cache
//! remembers the most recently printed lines and reports repeats. It is
//! bounded: once full, the least recently recorded key is forgotten, which
//! allows a very old line to be printed again.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

/// Bounded LRU set of already emitted log keys
///
/// Uses a `Mutex` so a single cache can be shared across tasks.
pub struct LogDedupCache {
    entries: Mutex<LruCache<String, ()>>,
}

impl LogDedupCache {
    /// Creates a cache holding at most `capacity` keys
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Returns `true` if `key` was already recorded, leaving the cache as is.
    /// Otherwise records `key` and returns `false`.
    pub fn seen_or_record(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if entries.contains(key) {
            return true;
        }

        entries.put(key.to_string(), ());
        false
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cap()
            .get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_sighting_is_recorded() {
        let cache = LogDedupCache::new(4);
        assert!(!cache.seen_or_record("a"));
        assert!(cache.seen_or_record("a"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_seen_key_leaves_cache_unchanged() {
        let cache = LogDedupCache::new(2);
        assert!(!cache.seen_or_record("a"));
        assert!(!cache.seen_or_record("b"));

        // a repeat does not refresh "a"
        assert!(cache.seen_or_record("a"));
        assert_eq!(cache.len(), 2);

        // so "a" is still the oldest and goes first
        assert!(!cache.seen_or_record("c"));
        assert!(cache.seen_or_record("b"));
        assert!(cache.seen_or_record("c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_eviction_of_least_recent() {
        let cache = LogDedupCache::new(3);
        for key in ["a", "b", "c"] {
            assert!(!cache.seen_or_record(key));
        }

        // capacity + 1 distinct keys evicts exactly "a"
        assert!(!cache.seen_or_record("d"));
        assert_eq!(cache.len(), 3);
        assert!(cache.seen_or_record("c"));
        assert!(cache.seen_or_record("d"));
        assert!(cache.seen_or_record("b"));

        // an evicted key is unseen again
        assert!(!cache.seen_or_record("a"));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cache = LogDedupCache::new(0);
        assert_eq!(cache.capacity(), 1);
        assert!(cache.is_empty());
        assert!(!cache.seen_or_record("a"));
        assert!(!cache.seen_or_record("b"));
        assert!(!cache.seen_or_record("a"));
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(LogDedupCache::new(1024));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    (0..100)
                        .filter(|i| !cache.seen_or_record(&format!("line-{}", i)))
                        .count()
                })
            })
            .collect();

        let first_sightings: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(first_sightings, 100);
        assert_eq!(cache.len(), 100);
    }
}
