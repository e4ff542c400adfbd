//! # Cache Trait Hierarchy
//!
//! The uniform cache contract every eviction policy implements, in two
//! flavours: an owned, `&mut self` form for single-threaded use and a shared,
//! `&self` form for caches guarded by an internal lock.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────┐      ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │      │          SharedCache<K, V>              │
//!   │                                         │      │          (Send + Sync)                  │
//!   │  insert(&mut, K, V) → Option<V>         │      │                                         │
//!   │  get(&mut, &K) → Option<&V>             │      │  insert(&, K, V) → Option<V>            │
//!   │  remove(&mut, &K) → Option<V>           │      │  get(&, &K) → Option<V>   (clone)       │
//!   │  contains(&, &K) → bool                 │      │  remove(&, &K) → Option<V>              │
//!   │  len / is_empty / capacity / clear      │      │  contains / len / is_empty / capacity   │
//!   └──────────────────┬──────────────────────┘      └──────────────────▲──────────────────────┘
//!                      │                                                │
//!        ┌─────────────┼──────────────┐                                 │
//!        ▼             ▼              ▼                                 │
//!   LruCore        MruCore        LfuCore ──► LfuCacheTrait             │
//!        │             │              │                                 │
//!        └─────────────┴──────┬───────┘                                 │
//!                             ▼                                         │
//!                 ConcurrentCache<C: CoreCache> ────────────────────────┘
//!                   (parking_lot::RwLock)
//! ```
//!
//! ## Policy Comparison
//!
//! | Policy | Eviction victim                                   | Forced refresh |
//! |--------|---------------------------------------------------|----------------|
//! | LRU    | Least recently used entry                         | No             |
//! | MRU    | Most recently used entry                          | No             |
//! | LFU    | Lowest access count, oldest touch among ties      | Yes            |
//!
//! ## Access Semantics
//!
//! - `get` may update policy state (recency, frequency) and is therefore a
//!   write even though it reads a value.
//! - `contains` never counts as an access and never changes which entry is
//!   evicted next.
//! - `insert` on an existing key overwrites the value and never changes `len`.
//! - `remove` on a missing key is a no-op returning `None`.
//!
//! ## Thread Safety
//!
//! `CoreCache` implementations are not thread-safe. Wrap one in
//! [`ConcurrentCache`](crate::concurrent::ConcurrentCache) to obtain a
//! [`SharedCache`], which is what the [`Memoizer`](crate::memoize::Memoizer)
//! consumes.

use std::sync::Arc;

/// Core cache operations that all policies support.
///
/// # Example
///
/// ```
/// use memocache::traits::CoreCache;
/// use memocache::policy::lru::LruCore;
///
/// fn warm_cache<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = LruCore::new(100);
/// warm_cache(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if it existed.
    ///
    /// If the key is new and the cache is at capacity, one entry is evicted
    /// according to the policy first. Never fails.
    ///
    /// ```
    /// use memocache::traits::CoreCache;
    /// use memocache::policy::lru::LruCore;
    ///
    /// let mut cache = LruCore::new(10);
    /// assert_eq!(cache.insert(1, "first"), None);
    /// assert_eq!(cache.insert(1, "second"), Some("first"));
    /// assert_eq!(cache.len(), 1);
    /// ```
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a reference to a value by key.
    ///
    /// May update internal state (recency, frequency). A policy may also
    /// report `None` for a key that is still stored (see
    /// [`LfuCore`](crate::policy::lfu::LfuCore)'s forced refresh); callers
    /// treat that exactly like a miss.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Removes a key, returning its value. No-op for missing keys.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Checks if a key exists without updating access state.
    ///
    /// ```
    /// use memocache::policy::lfu::LfuCore;
    /// use memocache::traits::{CoreCache, LfuCacheTrait};
    ///
    /// let mut cache = LfuCore::try_new(10, 5).unwrap();
    /// cache.insert(1, "value");
    ///
    /// assert!(cache.contains(&1));
    /// assert!(!cache.contains(&99));
    /// assert_eq!(cache.frequency(&1), Some(1));
    /// ```
    fn contains(&self, key: &K) -> bool;

    /// Returns the current number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache contains no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries.
    fn capacity(&self) -> usize;

    /// Removes all entries.
    fn clear(&mut self);
}

/// Frequency-aware operations on top of [`CoreCache`].
///
/// # Example
///
/// ```
/// use memocache::traits::{CoreCache, LfuCacheTrait};
/// use memocache::policy::lfu::LfuCore;
///
/// let mut cache = LfuCore::try_new(10, 100).unwrap();
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.get(&"a");
///
/// assert_eq!(cache.peek_lfu(), Some((&"b", &2)));
/// assert_eq!(cache.pop_lfu(), Some(("b", 2)));
/// assert_eq!(cache.frequency(&"a"), Some(2));
/// ```
pub trait LfuCacheTrait<K, V>: CoreCache<K, V> {
    /// Removes and returns the next eviction victim.
    fn pop_lfu(&mut self) -> Option<(K, V)>;

    /// Returns the next eviction victim without removing it.
    fn peek_lfu(&self) -> Option<(&K, &V)>;

    /// Returns the access count of `key`. Does not count as an access.
    fn frequency(&self, key: &K) -> Option<u64>;

    /// Returns the access count at whose multiples a read reports a miss.
    fn refresh_threshold(&self) -> u64;
}

/// The cache contract for caches shared between threads.
///
/// Values are returned by clone; callers never borrow into the cache.
///
/// # Example
///
/// ```
/// use memocache::concurrent::ConcurrentLruCache;
/// use memocache::traits::SharedCache;
///
/// fn invalidate<C: SharedCache<u64, String>>(cache: &C, keys: &[u64]) {
///     for key in keys {
///         cache.remove(key);
///     }
/// }
///
/// let cache = ConcurrentLruCache::try_lru(10).unwrap();
/// cache.insert(1, "one".to_string());
/// cache.insert(2, "two".to_string());
/// invalidate(&cache, &[1]);
/// assert!(!cache.contains(&1));
/// assert_eq!(cache.get(&2), Some("two".to_string()));
/// ```
pub trait SharedCache<K, V>: Send + Sync {
    fn insert(&self, key: K, value: V) -> Option<V>;

    fn get(&self, key: &K) -> Option<V>;

    fn remove(&self, key: &K) -> Option<V>;

    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn clear(&self);
}

impl<K, V, C> SharedCache<K, V> for Arc<C>
where
    C: SharedCache<K, V> + ?Sized,
{
    fn insert(&self, key: K, value: V) -> Option<V> {
        (**self).insert(key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn remove(&self, key: &K) -> Option<V> {
        (**self).remove(key)
    }

    fn contains(&self, key: &K) -> bool {
        (**self).contains(key)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn clear(&self) {
        (**self).clear()
    }
}
