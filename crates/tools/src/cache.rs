//! Bounded TTL cache for tool results.
//!
//! An order-preserving map with least-recently-inserted eviction once
//! capacity is reached and per-entry expiry. Interior mutability through a
//! single mutex — the debate's fan-out points produce at most two
//! simultaneous writers, so contention is negligible.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

struct CacheInner<V> {
    map: HashMap<String, CacheEntry<V>>,
    /// Insertion order; front is the oldest entry.
    order: VecDeque<String>,
}

/// A bounded, TTL-expiring, insertion-ordered cache.
pub struct TtlCache<V> {
    inner: Mutex<CacheInner<V>>,
    ttl: Duration,
    capacity: usize,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache with the given capacity and entry time-to-live.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Look up a key. Expired entries are treated as misses.
    pub fn get(&self, key: &str) -> Option<V> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let entry = inner.map.get(key)?;
        if entry.inserted_at.elapsed() < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Insert a value, evicting the oldest entry when at capacity.
    /// Re-inserting an existing key refreshes its timestamp in place.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        if !inner.map.contains_key(&key) {
            if inner.map.len() >= self.capacity
                && let Some(oldest) = inner.order.pop_front()
            {
                inner.map.remove(&oldest);
                debug!(key = %truncate(&oldest), "Cache full, evicted oldest entry");
            }
            inner.order.push_back(key.clone());
        }

        inner.map.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.map.clear();
        inner.order.clear();
    }
}

fn truncate(s: &str) -> &str {
    let mut end = s.len().min(50);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_within_ttl() {
        let cache = TtlCache::new(10, Duration::from_secs(60));
        cache.insert("k", 42);
        assert_eq!(cache.get("k"), Some(42));
    }

    #[test]
    fn miss_after_expiry() {
        let cache = TtlCache::new(10, Duration::from_millis(0));
        cache.insert("k", 42);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn evicts_oldest_first() {
        let cache = TtlCache::new(3, Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);
        cache.insert("d", 4);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("d"), Some(4));
    }

    #[test]
    fn size_stays_bounded() {
        let cache = TtlCache::new(5, Duration::from_secs(60));
        for i in 0..100 {
            cache.insert(format!("k{i}"), i);
        }
        assert_eq!(cache.len(), 5);
        // Newest entries survive
        assert_eq!(cache.get("k99"), Some(99));
        assert_eq!(cache.get("k0"), None);
    }

    #[test]
    fn reinsert_refreshes_in_place() {
        let cache = TtlCache::new(2, Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 10);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(10));
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn empty_values_are_cached() {
        let cache: TtlCache<Vec<String>> = TtlCache::new(10, Duration::from_secs(60));
        cache.insert("q", vec![]);
        assert_eq!(cache.get("q"), Some(vec![]));
    }

    #[test]
    fn clear_empties_cache() {
        let cache = TtlCache::new(10, Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }
}
