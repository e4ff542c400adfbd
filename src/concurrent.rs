//! Thread-safe wrapper around any single-threaded cache core.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────┐
//!   │                  ConcurrentCache<C>                       │
//!   │                                                           │
//!   │   parking_lot::RwLock<C>                                  │
//!   │     write lock: get, insert, remove, clear, write(..)     │
//!   │     read lock:  contains, len, is_empty, capacity, read(..)│
//!   │                                                           │
//!   │   C = LfuCore<K, V> | LruCore<K, V> | MruCore<K, V> | ... │
//!   └───────────────────────────────────────────────────────────┘
//! ```
//!
//! `get` updates recency or frequency inside the core, so it must hold the
//! exclusive lock. Only queries that leave policy state untouched share the
//! lock. Values leave the lock by clone, never by reference.
//!
//! The wrapper owns no threads and performs no blocking other than lock
//! acquisition. Share it between threads with [`Arc`](std::sync::Arc);
//! `Arc<ConcurrentCache<C>>` implements [`SharedCache`] as well.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use memocache::concurrent::ConcurrentLfuCache;
//! use memocache::traits::{LfuCacheTrait, SharedCache};
//!
//! let cache = Arc::new(ConcurrentLfuCache::try_lfu(100, 10).unwrap());
//!
//! let handles: Vec<_> = (0..4u64)
//!     .map(|t| {
//!         let cache = Arc::clone(&cache);
//!         thread::spawn(move || {
//!             for i in 0..10 {
//!                 cache.insert(t * 10 + i, i);
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(cache.len(), 40);
//! assert_eq!(cache.read(|core| core.frequency(&0)), Some(1));
//! ```

use std::hash::Hash;

use parking_lot::RwLock;

use crate::error::ConfigError;
use crate::policy::lfu::LfuCore;
use crate::policy::lru::LruCore;
use crate::policy::mru::MruCore;
use crate::traits::{CoreCache, SharedCache};

/// A cache core guarded by a single reader-writer lock.
#[derive(Debug)]
pub struct ConcurrentCache<C> {
    inner: RwLock<C>,
}

/// Thread-safe LFU cache with forced refresh.
pub type ConcurrentLfuCache<K, V> = ConcurrentCache<LfuCore<K, V>>;

/// Thread-safe LRU cache.
pub type ConcurrentLruCache<K, V> = ConcurrentCache<LruCore<K, V>>;

/// Thread-safe MRU cache.
pub type ConcurrentMruCache<K, V> = ConcurrentCache<MruCore<K, V>>;

impl<C> ConcurrentCache<C> {
    /// Wraps an existing core.
    pub fn new(core: C) -> Self {
        Self {
            inner: RwLock::new(core),
        }
    }

    /// Runs `f` with shared access to the core.
    ///
    /// `f` must not call back into this cache; the lock is not reentrant.
    pub fn read<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        let core = self.inner.read();
        f(&core)
    }

    /// Runs `f` with exclusive access to the core.
    ///
    /// Several operations inside one `write` call are atomic with respect to
    /// other threads.
    ///
    /// ```
    /// use memocache::concurrent::ConcurrentLfuCache;
    /// use memocache::traits::{LfuCacheTrait, SharedCache};
    ///
    /// let cache = ConcurrentLfuCache::try_lfu(4, 8).unwrap();
    /// cache.insert("a", 1);
    /// cache.insert("b", 2);
    /// cache.get(&"a");
    ///
    /// let victim = cache.write(|core| core.pop_lfu());
    /// assert_eq!(victim, Some(("b", 2)));
    /// ```
    pub fn write<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        let mut core = self.inner.write();
        f(&mut core)
    }

    /// Consumes the wrapper and returns the core.
    pub fn into_inner(self) -> C {
        self.inner.into_inner()
    }
}

impl<C> From<C> for ConcurrentCache<C> {
    fn from(core: C) -> Self {
        Self::new(core)
    }
}

impl<K, V> ConcurrentCache<LfuCore<K, V>>
where
    K: Eq + Hash + Clone,
{
    /// Validating constructor for a shared LFU cache.
    pub fn try_lfu(capacity: usize, refresh_threshold: u64) -> Result<Self, ConfigError> {
        LfuCore::try_new(capacity, refresh_threshold).map(Self::new)
    }
}

impl<K, V> ConcurrentCache<LruCore<K, V>>
where
    K: Eq + Hash + Clone,
{
    /// Validating constructor for a shared LRU cache.
    pub fn try_lru(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self::new(LruCore::new(capacity)))
    }
}

impl<K, V> ConcurrentCache<MruCore<K, V>>
where
    K: Eq + Hash + Clone,
{
    /// Validating constructor for a shared MRU cache.
    pub fn try_mru(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self::new(MruCore::new(capacity)))
    }
}

impl<K, V, C> SharedCache<K, V> for ConcurrentCache<C>
where
    C: CoreCache<K, V> + Send + Sync,
    V: Clone,
{
    fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        self.inner.write().get(key).cloned()
    }

    fn remove(&self, key: &K) -> Option<V> {
        self.inner.write().remove(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    fn len(&self) -> usize {
        self.inner.read().len()
    }

    fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    fn clear(&self) {
        self.inner.write().clear()
    }
}
