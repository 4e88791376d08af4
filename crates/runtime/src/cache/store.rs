//! TTL key/value store.
//!
//! Entries carry the time they were written. Freshness is judged at read time
//! against the TTL the caller passes; there is no background sweeper. An entry
//! whose age equals the TTL is already expired.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use progress_core::Timestamp;

use crate::clock::Clock;

#[derive(Clone, Debug)]
pub struct CacheEntry<V> {
    pub value: V,
    pub stored_at: Timestamp,
    /// Monotonic write counter; the lowest live value is evicted first.
    pub write_seq: u64,
}

/// Counters since construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped on read or by [`CacheStore::purge_expired`].
    pub expirations: u64,
    /// Entries dropped to stay within capacity.
    pub evictions: u64,
    pub invalidations: u64,
}

struct Inner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    next_seq: u64,
    stats: CacheStats,
    closed: bool,
}

/// Thread-safe TTL cache keyed by string.
///
/// A poisoned lock is recovered rather than surfaced: the map only ever holds
/// complete entries, so the data behind a panicked writer is still valid.
pub struct CacheStore<V> {
    inner: Mutex<Inner<V>>,
    capacity: Option<usize>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> CacheStore<V> {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_capacity(clock, None)
    }

    /// `capacity` of `None` (or zero) means unbounded.
    pub fn with_capacity(clock: Arc<dyn Clock>, capacity: Option<usize>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                next_seq: 0,
                stats: CacheStats::default(),
                closed: false,
            }),
            capacity: capacity.filter(|capacity| *capacity > 0),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fresh value for `key`, or `None` if absent or at least `ttl` old.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<V> {
        let now = self.clock.now();
        let mut inner = self.lock();
        if inner.closed {
            return None;
        }

        match inner
            .entries
            .get(key)
            .map(|entry| is_expired(entry.stored_at, now, ttl))
        {
            None => {
                inner.stats.misses += 1;
                return None;
            }
            Some(true) => {
                inner.entries.remove(key);
                inner.stats.expirations += 1;
                inner.stats.misses += 1;
                return None;
            }
            Some(false) => {}
        }

        inner.stats.hits += 1;
        inner.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Stores `value` stamped with the current time, replacing any previous
    /// value.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let now = self.clock.now();
        let mut inner = self.lock();
        if inner.closed {
            return;
        }

        let at_capacity = self
            .capacity
            .is_some_and(|capacity| inner.entries.len() >= capacity);
        if at_capacity && !inner.entries.contains_key(&key) {
            evict_oldest_write(&mut inner);
        }

        let write_seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
                write_seq,
            },
        );
    }

    /// Removes one key. Returns whether it was present.
    pub fn invalidate(&self, key: &str) -> bool {
        let mut inner = self.lock();
        let removed = inner.entries.remove(key).is_some();
        if removed {
            inner.stats.invalidations += 1;
        }
        removed
    }

    /// Removes every key starting with `prefix`. Returns how many.
    pub fn invalidate_scope(&self, prefix: &str) -> usize {
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - inner.entries.len();
        inner.stats.invalidations += removed as u64;
        removed
    }

    /// Drops every entry at least `ttl` old. Returns how many.
    pub fn purge_expired(&self, ttl: Duration) -> usize {
        let now = self.clock.now();
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner
            .entries
            .retain(|_, entry| !is_expired(entry.stored_at, now, ttl));
        let removed = before - inner.entries.len();
        inner.stats.expirations += removed as u64;
        removed
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            entries: inner.entries.len(),
            ..inner.stats
        }
    }

    /// Drops all entries. Later writes are ignored and reads miss.
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

fn is_expired(stored_at: Timestamp, now: Timestamp, ttl: Duration) -> bool {
    let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
    now.millis_since(stored_at) >= ttl_ms
}

fn evict_oldest_write<V>(inner: &mut Inner<V>) {
    let oldest = inner
        .entries
        .iter()
        .min_by_key(|(_, entry)| entry.write_seq)
        .map(|(key, _)| key.clone());
    if let Some(key) = oldest {
        inner.entries.remove(&key);
        inner.stats.evictions += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const TTL: Duration = Duration::from_millis(120_000);

    fn store(capacity: Option<usize>) -> (Arc<ManualClock>, CacheStore<u32>) {
        let clock = Arc::new(ManualClock::new(Timestamp::from_millis(10_000)));
        let cache = CacheStore::with_capacity(clock.clone(), capacity);
        (clock, cache)
    }

    #[test]
    fn ttl_boundary_is_exclusive() {
        let (clock, cache) = store(None);
        cache.set("mission_S1M1", 7);

        clock.advance(119_999);
        assert_eq!(cache.get("mission_S1M1", TTL), Some(7));

        clock.advance(1);
        assert_eq!(cache.get("mission_S1M1", TTL), None);
        // Expired entries are removed on read.
        assert!(!cache.contains("mission_S1M1"));

        cache.set("mission_S1M1", 8);
        clock.advance(120_001);
        assert_eq!(cache.get("mission_S1M1", TTL), None);
    }

    #[test]
    fn overwrite_restamps() {
        let (clock, cache) = store(None);
        cache.set("stage_1", 1);
        clock.advance(100_000);
        cache.set("stage_1", 2);
        clock.advance(100_000);
        assert_eq!(cache.get("stage_1", TTL), Some(2));
    }

    #[test]
    fn scope_invalidation_matches_prefix_only() {
        let (_, cache) = store(None);
        cache.set("bites_mission_S3M2", 1);
        cache.set("bite_S3M2B1", 2);
        cache.set("bite_S3M2B2", 3);
        cache.set("bite_S3M3B1", 4);

        assert_eq!(cache.invalidate_scope("bite_S3M2"), 2);
        assert!(cache.contains("bites_mission_S3M2"));
        assert!(cache.contains("bite_S3M3B1"));
        assert!(cache.invalidate("bites_mission_S3M2"));
        assert!(!cache.invalidate("bites_mission_S3M2"));
        assert_eq!(cache.stats().invalidations, 3);
    }

    #[test]
    fn capacity_evicts_least_recently_written() {
        let (_, cache) = store(Some(2));
        cache.set("a", 1);
        cache.set("b", 2);
        // Reads do not refresh write order.
        assert_eq!(cache.get("a", TTL), Some(1));
        cache.set("c", 3);

        assert!(!cache.contains("a"));
        assert!(cache.contains("b") && cache.contains("c"));

        // Rewriting an existing key never evicts.
        cache.set("b", 20);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn purge_sweeps_old_entries() {
        let (clock, cache) = store(None);
        cache.set("old", 1);
        clock.advance(60_000);
        cache.set("new", 2);
        clock.advance(60_000);

        assert_eq!(cache.purge_expired(TTL), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("new"));
    }

    #[test]
    fn stats_count_hits_and_misses() {
        let (_, cache) = store(None);
        assert_eq!(cache.get("missing", TTL), None);
        cache.set("k", 1);
        cache.get("k", TTL);
        cache.get("k", TTL);

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (2, 1, 1));
    }

    #[test]
    fn closed_store_ignores_writes() {
        let (_, cache) = store(None);
        cache.set("k", 1);
        cache.close();
        assert!(cache.is_empty());
        cache.set("k", 2);
        assert_eq!(cache.get("k", TTL), None);
        assert!(cache.is_closed());
    }
}
