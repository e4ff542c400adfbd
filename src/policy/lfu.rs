//! # LFU (Least Frequently Used) Cache with Forced Refresh
//!
//! Evicts the least frequently accessed entry when capacity is reached, and
//! periodically reports a hit as a miss so memoized callers recompute values
//! that are read very often.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                          LfuCore<K, V>                                   │
//!   │                                                                          │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │  FrequencyBuckets<K, V>         (owns keys, values and counts)     │ │
//!   │   │                                                                    │ │
//!   │   │  min_freq ─► freq=1: [D] ◄──► [C]        (front = newest touch)    │ │
//!   │   │              freq=2: [A]                                           │ │
//!   │   │              freq=5: [B]                                           │ │
//!   │   │                                                                    │ │
//!   │   │  Eviction: tail of the min_freq bucket (C), O(1)                   │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   │                                                                          │
//!   │   capacity: usize              refresh_threshold: NonZeroU64             │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operation Flow
//!
//! ```text
//!   insert(key, value)
//!        │
//!        ├── key present ──► replace value, bump frequency, return old value
//!        │
//!        ├── capacity == 0 ──► drop the value (cache never retains entries)
//!        │
//!        ├── len == capacity ──► evict tail of min_freq bucket
//!        │
//!        └──► new entry at freq=1, front of bucket 1, min_freq = 1
//!
//!   get(key)
//!        │
//!        ├── key absent ──► None
//!        │
//!        └──► bump frequency to f
//!                 │
//!                 ├── f % refresh_threshold == 0 ──► None (entry stays cached)
//!                 │
//!                 └──► Some(&value)
//! ```
//!
//! ## Forced Refresh
//!
//! With `refresh_threshold = t`, the read that brings an entry's access count
//! to `t`, `2t`, `3t`, ... reports a miss. The access is still credited and
//! the entry stays cached, so the next read hits again. A
//! [`Memoizer`](crate::memoize::Memoizer) sitting on top recomputes and
//! overwrites the value, bounding how stale a hot entry can get. Note that
//! overwriting through `insert` is itself an access and bumps the count.
//!
//! ## Example Usage
//!
//! ```
//! use memocache::policy::lfu::LfuCore;
//! use memocache::traits::CoreCache;
//!
//! let mut cache = LfuCore::try_new(2, 3).unwrap();
//!
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//! assert_eq!(cache.get(&"a"), Some(&1)); // a: freq 2
//!
//! cache.insert("c", 3); // evicts b (freq 1)
//! assert!(!cache.contains(&"b"));
//!
//! assert_eq!(cache.get(&"c"), Some(&3)); // freq 2
//! assert_eq!(cache.get(&"c"), None);     // freq 3: forced refresh
//! assert_eq!(cache.get(&"c"), Some(&3)); // freq 4: still cached
//! ```
//!
//! ## Thread Safety
//!
//! `LfuCore` is not thread-safe. Because `get` mutates frequency state, a
//! shared lock is not enough for reads; use
//! [`ConcurrentLfuCache`](crate::concurrent::ConcurrentLfuCache), which takes
//! the exclusive lock for `get`, `insert` and `remove`.

use std::hash::Hash;
use std::num::NonZeroU64;

use tracing::{debug, trace};

use crate::ds::FrequencyBuckets;
use crate::error::{ConfigError, InvariantError};
use crate::traits::{CoreCache, LfuCacheTrait};

/// Frequency-bucketed LFU cache.
///
/// See module-level documentation for details.
#[derive(Debug)]
pub struct LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    buckets: FrequencyBuckets<K, V>,
    capacity: usize,
    refresh_threshold: NonZeroU64,
}

impl<K, V> LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 yields a cache that accepts inserts but never retains
    /// them. Use [`try_new`](Self::try_new) to reject that configuration.
    pub fn new(capacity: usize, refresh_threshold: NonZeroU64) -> Self {
        debug!(
            capacity,
            refresh_threshold = refresh_threshold.get(),
            "creating lfu cache"
        );
        Self {
            buckets: FrequencyBuckets::with_capacity(capacity),
            capacity,
            refresh_threshold,
        }
    }

    /// Validating constructor: rejects a zero capacity or refresh threshold.
    ///
    /// ```
    /// use memocache::error::ConfigError;
    /// use memocache::policy::lfu::LfuCore;
    ///
    /// assert!(LfuCore::<u32, u32>::try_new(8, 4).is_ok());
    /// assert_eq!(
    ///     LfuCore::<u32, u32>::try_new(0, 4).unwrap_err(),
    ///     ConfigError::ZeroCapacity
    /// );
    /// ```
    pub fn try_new(capacity: usize, refresh_threshold: u64) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        let refresh_threshold =
            NonZeroU64::new(refresh_threshold).ok_or(ConfigError::ZeroRefreshThreshold)?;
        Ok(Self::new(capacity, refresh_threshold))
    }

    /// Returns the value for `key` without counting an access.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.buckets.get(key)
    }

    /// Verifies that the bucket structure is sound and within capacity. An
    /// error means a bug in this crate.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.buckets.check_invariants()?;
        if self.buckets.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.buckets.len(),
                self.capacity
            )));
        }
        Ok(())
    }

    fn evict_min_freq(&mut self) -> Option<(K, V)> {
        let (key, value, freq) = self.buckets.pop_min()?;
        trace!(freq, "lfu evicted entry");
        Some((key, value))
    }
}

impl<K, V> CoreCache<K, V> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some((_, slot)) = self.buckets.touch_value(&key) {
            return Some(std::mem::replace(slot, value));
        }

        if self.capacity == 0 {
            return None;
        }

        if self.buckets.len() >= self.capacity {
            self.evict_min_freq();
        }

        self.buckets.insert(key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let (freq, value) = self.buckets.touch_value(key)?;
        if freq % self.refresh_threshold.get() == 0 {
            trace!(freq, "lfu forced refresh");
            return None;
        }
        Some(&*value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.buckets.remove(key).map(|(value, _)| value)
    }

    fn contains(&self, key: &K) -> bool {
        self.buckets.contains(key)
    }

    fn len(&self) -> usize {
        self.buckets.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.buckets.clear();
    }
}

impl<K, V> LfuCacheTrait<K, V> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lfu(&mut self) -> Option<(K, V)> {
        self.evict_min_freq()
    }

    fn peek_lfu(&self) -> Option<(&K, &V)> {
        let (key, value, _) = self.buckets.peek_min()?;
        Some((key, value))
    }

    fn frequency(&self, key: &K) -> Option<u64> {
        self.buckets.frequency(key)
    }

    fn refresh_threshold(&self) -> u64 {
        self.refresh_threshold.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache<V>(capacity: usize, refresh_threshold: u64) -> LfuCore<String, V> {
        LfuCore::try_new(capacity, refresh_threshold).unwrap()
    }

    fn key(name: &str) -> String {
        name.to_string()
    }

    // Basic LFU Behavior Tests
    mod basic_behavior {
        use super::*;

        #[test]
        fn test_basic_insertion_and_retrieval() {
            let mut cache = cache(3, 100);

            assert_eq!(cache.insert(key("key1"), 100), None);
            assert_eq!(cache.insert(key("key2"), 200), None);
            assert_eq!(cache.insert(key("key3"), 300), None);

            assert_eq!(cache.get(&key("key1")), Some(&100));
            assert_eq!(cache.get(&key("key2")), Some(&200));
            assert_eq!(cache.get(&key("key3")), Some(&300));
            assert_eq!(cache.get(&key("nonexistent")), None);

            // 1 from insert + 1 from get
            assert_eq!(cache.frequency(&key("key1")), Some(2));
            assert_eq!(cache.frequency(&key("key2")), Some(2));
            assert_eq!(cache.frequency(&key("key3")), Some(2));
        }

        #[test]
        fn test_lfu_eviction_order() {
            let mut cache = cache(3, 100);
            cache.insert(key("key1"), 100);
            cache.insert(key("key2"), 200);
            cache.insert(key("key3"), 300);

            cache.get(&key("key2"));
            cache.get(&key("key2"));
            cache.get(&key("key3"));

            assert_eq!(cache.frequency(&key("key1")), Some(1));
            assert_eq!(cache.frequency(&key("key2")), Some(3));
            assert_eq!(cache.frequency(&key("key3")), Some(2));

            cache.insert(key("key4"), 400);

            assert!(!cache.contains(&key("key1")));
            assert!(cache.contains(&key("key2")));
            assert!(cache.contains(&key("key3")));
            assert!(cache.contains(&key("key4")));
            assert_eq!(cache.len(), 3);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn test_capacity_enforcement() {
            let mut cache = cache(2, 100);
            assert_eq!(cache.capacity(), 2);

            for i in 0..10 {
                cache.insert(format!("key{}", i), i);
                assert!(cache.len() <= cache.capacity());
            }
            assert_eq!(cache.len(), 2);
        }

        #[test]
        fn test_update_existing_key_bumps_frequency() {
            let mut cache = cache(2, 100);
            cache.insert(key("a"), 1);

            assert_eq!(cache.insert(key("a"), 10), Some(1));
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.frequency(&key("a")), Some(2));
            assert_eq!(cache.peek(&key("a")), Some(&10));
        }

        #[test]
        fn test_contains_and_peek_do_not_count_as_access() {
            let mut cache = cache(2, 100);
            cache.insert(key("a"), 1);
            cache.insert(key("b"), 2);

            for _ in 0..5 {
                assert!(cache.contains(&key("a")));
                assert_eq!(cache.peek(&key("a")), Some(&1));
            }
            assert_eq!(cache.frequency(&key("a")), Some(1));

            // "a" is still the oldest entry at freq=1 and gets evicted.
            cache.insert(key("c"), 3);
            assert!(!cache.contains(&key("a")));
            assert!(cache.contains(&key("b")));
        }

        #[test]
        fn test_remove() {
            let mut cache = cache(3, 100);
            cache.insert(key("a"), 1);
            cache.insert(key("b"), 2);

            assert_eq!(cache.remove(&key("a")), Some(1));
            assert_eq!(cache.remove(&key("a")), None);
            assert_eq!(cache.remove(&key("missing")), None);
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.get(&key("a")), None);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn test_clear_resets_all_state() {
            let mut cache = cache(3, 100);
            cache.insert(key("a"), 1);
            cache.insert(key("b"), 2);
            cache.get(&key("a"));

            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(cache.frequency(&key("a")), None);
            assert_eq!(cache.peek_lfu(), None);
            cache.check_invariants().unwrap();

            cache.insert(key("a"), 5);
            assert_eq!(cache.frequency(&key("a")), Some(1));
        }
    }

    // Eviction and tie-breaking
    mod eviction {
        use super::*;

        #[test]
        fn test_tie_break_evicts_oldest_touch() {
            let mut cache = cache(3, 100);
            cache.insert(key("a"), 1);
            cache.insert(key("b"), 2);
            cache.insert(key("c"), 3);

            // All at freq=1; "a" was inserted first.
            cache.insert(key("d"), 4);
            assert!(!cache.contains(&key("a")));

            // b, c, d at freq=1; bump then reinsert reorders within freq=2.
            cache.get(&key("c"));
            cache.get(&key("b"));
            cache.get(&key("d"));
            // freq=2 bucket (newest first): d, b, c
            cache.insert(key("e"), 5);
            assert!(!cache.contains(&key("c")));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn test_eviction_resets_frequency_on_reinsert() {
            let mut cache = cache(1, 100);
            cache.insert(key("a"), 1);
            cache.get(&key("a"));
            cache.get(&key("a"));
            assert_eq!(cache.frequency(&key("a")), Some(3));

            cache.insert(key("b"), 2);
            cache.insert(key("a"), 1);
            assert_eq!(cache.frequency(&key("a")), Some(1));
        }

        #[test]
        fn test_remove_of_min_bucket_recomputes_min() {
            let mut cache = cache(3, 100);
            cache.insert(key("cold"), 0);
            cache.insert(key("warm"), 1);
            cache.insert(key("hot"), 2);
            for _ in 0..2 {
                cache.get(&key("warm"));
            }
            for _ in 0..5 {
                cache.get(&key("hot"));
            }

            cache.remove(&key("cold"));
            assert_eq!(cache.peek_lfu(), Some((&key("warm"), &1)));
            cache.check_invariants().unwrap();

            // The next victim is "warm" (freq 3), not "hot" (freq 6).
            assert_eq!(cache.pop_lfu(), Some((key("warm"), 1)));
            assert_eq!(cache.peek_lfu(), Some((&key("hot"), &2)));
        }

        #[test]
        fn test_pop_and_peek_lfu() {
            let mut cache = cache(3, 100);
            assert_eq!(cache.pop_lfu(), None);
            assert_eq!(cache.peek_lfu(), None);

            cache.insert(key("a"), 1);
            cache.insert(key("b"), 2);
            cache.get(&key("a"));

            assert_eq!(cache.peek_lfu(), Some((&key("b"), &2)));
            assert_eq!(cache.pop_lfu(), Some((key("b"), 2)));
            assert_eq!(cache.pop_lfu(), Some((key("a"), 1)));
            assert!(cache.is_empty());
        }

        #[test]
        fn test_zero_capacity_never_retains() {
            let mut cache: LfuCore<&str, i32> = LfuCore::new(0, NonZeroU64::MIN);
            assert_eq!(cache.insert("a", 1), None);
            assert_eq!(cache.len(), 0);
            assert!(!cache.contains(&"a"));
            assert_eq!(cache.get(&"a"), None);
            cache.check_invariants().unwrap();
        }
    }

    // Forced refresh
    mod forced_refresh {
        use super::*;

        #[test]
        fn test_every_multiple_of_threshold_reports_miss() {
            let mut cache = cache(1, 3);
            cache.insert(key("a"), 7);

            // Access counts after each get: 2, 3, 4, 5, 6, 7
            let observed: Vec<_> = (0..6).map(|_| cache.get(&key("a")).copied()).collect();
            assert_eq!(
                observed,
                vec![Some(7), None, Some(7), Some(7), None, Some(7)]
            );
            assert!(cache.contains(&key("a")));
            assert_eq!(cache.frequency(&key("a")), Some(7));
        }

        #[test]
        fn test_threshold_one_always_misses_but_keeps_entry() {
            let mut cache = cache(2, 1);
            cache.insert(key("a"), 1);
            for _ in 0..4 {
                assert_eq!(cache.get(&key("a")), None);
            }
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.frequency(&key("a")), Some(5));
        }

        #[test]
        fn test_refresh_still_credits_access_for_eviction() {
            let mut cache = cache(2, 2);
            cache.insert(key("a"), 1);
            cache.insert(key("b"), 2);

            // Forced refresh: reports a miss, but "a" moves to freq=2.
            assert_eq!(cache.get(&key("a")), None);
            cache.insert(key("c"), 3);

            assert!(cache.contains(&key("a")));
            assert!(!cache.contains(&key("b")));
        }

        #[test]
        fn test_threshold_accessor() {
            let cache: LfuCore<String, u8> = cache(4, 9);
            assert_eq!(cache.refresh_threshold(), 9);
        }
    }

    // Entry storage
    mod storage {
        use super::*;
        use std::cell::Cell;
        use std::hash::Hasher;
        use std::rc::Rc;

        /// Key that counts how often it gets cloned.
        #[derive(Debug)]
        struct CountedKey {
            id: u32,
            clones: Rc<Cell<usize>>,
        }

        impl Clone for CountedKey {
            fn clone(&self) -> Self {
                self.clones.set(self.clones.get() + 1);
                Self {
                    id: self.id,
                    clones: Rc::clone(&self.clones),
                }
            }
        }

        impl PartialEq for CountedKey {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for CountedKey {}

        impl Hash for CountedKey {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }

        #[test]
        fn test_key_cloned_once_per_new_entry() {
            let clones = Rc::new(Cell::new(0));
            let key = |id| CountedKey {
                id,
                clones: Rc::clone(&clones),
            };
            let mut cache = LfuCore::try_new(2, 3).unwrap();

            cache.insert(key(1), "one");
            assert_eq!(clones.get(), 1);

            // Hits, refreshes, overwrites and removals never copy the key.
            for _ in 0..4 {
                cache.get(&key(1));
            }
            assert_eq!(cache.insert(key(1), "uno"), Some("one"));
            assert_eq!(cache.peek(&key(1)), Some(&"uno"));
            assert_eq!(clones.get(), 1);

            cache.insert(key(2), "two");
            cache.insert(key(3), "three");
            assert_eq!(clones.get(), 3);
            assert!(!cache.contains(&key(2)));

            assert_eq!(cache.remove(&key(3)), Some("three"));
            assert_eq!(cache.pop_lfu().map(|(k, v)| (k.id, v)), Some((1, "uno")));
            assert_eq!(clones.get(), 3);
            cache.check_invariants().unwrap();
        }
    }

    // Construction
    mod construction {
        use super::*;

        #[test]
        fn test_try_new_rejects_zero_parameters() {
            assert_eq!(
                LfuCore::<u8, u8>::try_new(0, 1).unwrap_err(),
                ConfigError::ZeroCapacity
            );
            assert_eq!(
                LfuCore::<u8, u8>::try_new(1, 0).unwrap_err(),
                ConfigError::ZeroRefreshThreshold
            );
        }
    }
}
