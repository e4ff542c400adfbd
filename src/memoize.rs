//! Memoizing decorator over any [`SharedCache`].
//!
//! ## Call Flow
//!
//! ```text
//!   call(key)
//!      │
//!      ├── cache.get(&key) == Some(v) ──► Ok(v)            (f not invoked)
//!      │
//!      └── miss or forced refresh ──► f(&key)
//!                                        │
//!                                        ├── Err(e) ──► Err(e)   (nothing cached)
//!                                        │
//!                                        └── Ok(v) ──► cache.insert(key, v.clone()) ──► Ok(v)
//! ```
//!
//! The memoizer knows nothing about the policy behind the cache. With an LFU
//! cache, a forced refresh surfaces here as an ordinary miss and the value is
//! recomputed and overwritten.
//!
//! Concurrent callers that miss on the same key may each invoke `f`; the
//! last insert wins. The wrapped function is expected to be pure.
//!
//! ## Example
//!
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use memocache::memoize::make_memoizer;
//!
//! static CALLS: AtomicUsize = AtomicUsize::new(0);
//!
//! let square = make_memoizer(16, 100, |n: &u64| {
//!     CALLS.fetch_add(1, Ordering::Relaxed);
//!     Ok::<_, String>(n * n)
//! })
//! .unwrap();
//!
//! assert_eq!(square.call(12), Ok(144));
//! assert_eq!(square.call(12), Ok(144));
//! assert_eq!(CALLS.load(Ordering::Relaxed), 1);
//! ```

use std::hash::Hash;
use std::marker::PhantomData;

use tracing::trace;

use crate::concurrent::{ConcurrentLfuCache, ConcurrentLruCache, ConcurrentMruCache};
use crate::error::ConfigError;
use crate::traits::SharedCache;

/// A function wrapped with a result cache.
pub struct Memoizer<K, V, E, F, C> {
    cache: C,
    func: F,
    _marker: PhantomData<fn(K) -> Result<V, E>>,
}

/// Memoizer backed by an LFU cache with forced refresh.
pub type LfuMemoizer<K, V, E, F> = Memoizer<K, V, E, F, ConcurrentLfuCache<K, V>>;

/// Memoizer backed by an LRU cache.
pub type LruMemoizer<K, V, E, F> = Memoizer<K, V, E, F, ConcurrentLruCache<K, V>>;

/// Memoizer backed by an MRU cache.
pub type MruMemoizer<K, V, E, F> = Memoizer<K, V, E, F, ConcurrentMruCache<K, V>>;

impl<K, V, E, F, C> Memoizer<K, V, E, F, C>
where
    K: Clone,
    V: Clone,
    F: Fn(&K) -> Result<V, E>,
    C: SharedCache<K, V>,
{
    /// Wraps `func` with `cache`.
    ///
    /// The cache may already hold entries, or be shared with other code
    /// through an [`Arc`](std::sync::Arc).
    pub fn new(cache: C, func: F) -> Self {
        Self {
            cache,
            func,
            _marker: PhantomData,
        }
    }

    /// Returns the cached result for `key`, computing and caching it on a
    /// miss. Errors from the wrapped function are returned unchanged and
    /// leave the cache untouched.
    pub fn call(&self, key: K) -> Result<V, E> {
        if let Some(value) = self.cache.get(&key) {
            return Ok(value);
        }

        trace!("memoizer miss");
        match (self.func)(&key) {
            Ok(value) => {
                self.cache.insert(key, value.clone());
                Ok(value)
            }
            Err(err) => {
                trace!("memoized function failed, result not cached");
                Err(err)
            }
        }
    }

    /// The cache backing this memoizer.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Turns the memoizer into a plain closure with the wrapped signature.
    pub fn into_fn(self) -> impl Fn(K) -> Result<V, E> {
        move |key| self.call(key)
    }
}

impl<K, V, E, F, C> std::fmt::Debug for Memoizer<K, V, E, F, C>
where
    C: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoizer")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Memoizes `func` behind an LFU cache that forces a recompute on every
/// `refresh_threshold`-th read of a key.
///
/// ```
/// use memocache::error::ConfigError;
/// use memocache::memoize::make_memoizer;
///
/// let err = make_memoizer(8, 0, |n: &u32| Ok::<_, ()>(*n)).unwrap_err();
/// assert_eq!(err, ConfigError::ZeroRefreshThreshold);
/// ```
pub fn make_memoizer<K, V, E, F>(
    capacity: usize,
    refresh_threshold: u64,
    func: F,
) -> Result<LfuMemoizer<K, V, E, F>, ConfigError>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
    F: Fn(&K) -> Result<V, E>,
{
    let cache = ConcurrentLfuCache::try_lfu(capacity, refresh_threshold)?;
    Ok(Memoizer::new(cache, func))
}

/// Memoizes `func` behind an LRU cache.
pub fn make_lru_memoizer<K, V, E, F>(
    capacity: usize,
    func: F,
) -> Result<LruMemoizer<K, V, E, F>, ConfigError>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
    F: Fn(&K) -> Result<V, E>,
{
    let cache = ConcurrentLruCache::try_lru(capacity)?;
    Ok(Memoizer::new(cache, func))
}

/// Memoizes `func` behind an MRU cache.
pub fn make_mru_memoizer<K, V, E, F>(
    capacity: usize,
    func: F,
) -> Result<MruMemoizer<K, V, E, F>, ConfigError>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
    F: Fn(&K) -> Result<V, E>,
{
    let cache = ConcurrentMruCache::try_mru(capacity)?;
    Ok(Memoizer::new(cache, func))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::LfuCacheTrait;
    use std::cell::Cell;
    use std::sync::Arc;

    #[test]
    fn hit_skips_wrapped_function() {
        let calls = Cell::new(0);
        let memo = make_lru_memoizer(4, |n: &i32| {
            calls.set(calls.get() + 1);
            Ok::<_, ()>(n + n)
        })
        .unwrap();

        assert_eq!(memo.call(3), Ok(6));
        assert_eq!(memo.call(3), Ok(6));
        assert_eq!(memo.call(4), Ok(8));
        assert_eq!(calls.get(), 2);
        assert_eq!(memo.cache().len(), 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let calls = Cell::new(0);
        let memo = make_memoizer(4, 10, |n: &u32| {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Err(format!("transient failure for {n}"))
            } else {
                Ok(*n)
            }
        })
        .unwrap();

        assert_eq!(memo.call(7), Err("transient failure for 7".to_string()));
        assert!(!memo.cache().contains(&7));

        assert_eq!(memo.call(7), Ok(7));
        assert_eq!(memo.call(7), Ok(7));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn forced_refresh_recomputes_value() {
        let calls = Cell::new(0u32);
        let memo = make_memoizer(4, 3, |_: &&str| {
            calls.set(calls.get() + 1);
            Ok::<_, ()>(calls.get())
        })
        .unwrap();

        // insert: count 1
        assert_eq!(memo.call("k"), Ok(1));
        // get: count 2, hit
        assert_eq!(memo.call("k"), Ok(1));
        // get: count 3, forced refresh; overwrite bumps to 4
        assert_eq!(memo.call("k"), Ok(2));
        assert_eq!(memo.cache().read(|core| core.frequency(&"k")), Some(4));
        // get: count 5, hit on the recomputed value
        assert_eq!(memo.call("k"), Ok(2));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn mru_memoizer_evicts_latest() {
        let memo = make_mru_memoizer(2, |n: &u8| Ok::<_, ()>(u16::from(*n) * 2)).unwrap();
        memo.call(1).unwrap();
        memo.call(2).unwrap();
        memo.call(3).unwrap();

        assert!(memo.cache().contains(&1));
        assert!(!memo.cache().contains(&2));
        assert!(memo.cache().contains(&3));
    }

    #[test]
    fn factories_validate_configuration() {
        let identity = |n: &u8| Ok::<_, ()>(*n);
        assert_eq!(
            make_memoizer(0, 1, identity).unwrap_err(),
            ConfigError::ZeroCapacity
        );
        assert_eq!(
            make_lru_memoizer(0, identity).unwrap_err(),
            ConfigError::ZeroCapacity
        );
        assert_eq!(
            make_mru_memoizer(0, identity).unwrap_err(),
            ConfigError::ZeroCapacity
        );
    }

    #[test]
    fn shared_cache_is_visible_to_other_holders() {
        let cache = Arc::new(ConcurrentLruCache::try_lru(8).unwrap());
        let memo = Memoizer::new(Arc::clone(&cache), |s: &String| {
            Ok::<_, ()>(s.len())
        });

        assert_eq!(memo.call("hello".to_string()), Ok(5));
        assert_eq!(cache.get(&"hello".to_string()), Some(5));

        cache.insert("seeded".to_string(), 99);
        assert_eq!(memo.call("seeded".to_string()), Ok(99));
    }

    #[test]
    fn into_fn_keeps_memoizing() {
        let calls = Cell::new(0);
        let doubled = make_lru_memoizer(2, |n: &i64| {
            calls.set(calls.get() + 1);
            Ok::<_, ()>(n * 2)
        })
        .unwrap()
        .into_fn();

        assert_eq!(doubled(21), Ok(42));
        assert_eq!(doubled(21), Ok(42));
        assert_eq!(calls.get(), 1);
    }
}
