//! Unified cache builder for all eviction policies.
//!
//! Picks a policy at runtime, from code or from a deserialized
//! [`CacheConfig`], and hands back a [`Cache`] that dispatches to the chosen
//! core.
//!
//! ## Example
//!
//! ```rust
//! use memocache::builder::{CacheBuilder, CachePolicy};
//! use memocache::traits::CoreCache;
//!
//! let mut cache = CacheBuilder::new(100).build::<u64, String>(CachePolicy::Lru);
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use memocache::builder::{CacheBuilder, CacheConfig, CachePolicy};
//!
//! let config: CacheConfig =
//!     serde_json::from_str(r#"{"capacity": 64, "policy": "lfu", "refresh_threshold": 5}"#)
//!         .unwrap();
//! assert_eq!(config.policy, CachePolicy::Lfu { refresh_threshold: 5 });
//!
//! let cache = CacheBuilder::from_config(&config)
//!     .try_build::<String, u32>(config.policy)
//!     .unwrap();
//! assert_eq!(cache.policy(), CachePolicy::Lfu { refresh_threshold: 5 });
//! ```

use std::hash::Hash;
use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use crate::concurrent::ConcurrentCache;
use crate::error::ConfigError;
use crate::policy::lfu::LfuCore;
use crate::policy::lru::LruCore;
use crate::policy::mru::MruCore;
use crate::traits::{CoreCache, LfuCacheTrait};

/// Available cache eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum CachePolicy {
    /// Least Recently Used eviction.
    Lru,
    /// Most Recently Used eviction.
    Mru,
    /// Least Frequently Used eviction; every `refresh_threshold`-th read of a
    /// key reports a miss.
    Lfu { refresh_threshold: u64 },
}

/// Deserializable cache configuration.
///
/// The policy fields are flattened into the top level:
/// `{"capacity": 128, "policy": "lru"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub capacity: usize,
    #[serde(flatten)]
    pub policy: CachePolicy,
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if let CachePolicy::Lfu { refresh_threshold: 0 } = self.policy {
            return Err(ConfigError::ZeroRefreshThreshold);
        }
        Ok(())
    }
}

/// Unified cache wrapper that provides a consistent API regardless of policy.
#[derive(Debug)]
pub struct Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: CacheInner<K, V>,
}

#[derive(Debug)]
enum CacheInner<K, V>
where
    K: Eq + Hash + Clone,
{
    Lru(LruCore<K, V>),
    Mru(MruCore<K, V>),
    Lfu(LfuCore<K, V>),
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// The policy this cache was built with.
    pub fn policy(&self) -> CachePolicy {
        match &self.inner {
            CacheInner::Lru(_) => CachePolicy::Lru,
            CacheInner::Mru(_) => CachePolicy::Mru,
            CacheInner::Lfu(lfu) => CachePolicy::Lfu {
                refresh_threshold: lfu.refresh_threshold(),
            },
        }
    }
}

impl<K, V> CoreCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.insert(key, value),
            CacheInner::Mru(mru) => mru.insert(key, value),
            CacheInner::Lfu(lfu) => lfu.insert(key, value),
        }
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.get(key),
            CacheInner::Mru(mru) => mru.get(key),
            CacheInner::Lfu(lfu) => lfu.get(key),
        }
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.remove(key),
            CacheInner::Mru(mru) => mru.remove(key),
            CacheInner::Lfu(lfu) => lfu.remove(key),
        }
    }

    fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lru(lru) => lru.contains(key),
            CacheInner::Mru(mru) => mru.contains(key),
            CacheInner::Lfu(lfu) => lfu.contains(key),
        }
    }

    fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.len(),
            CacheInner::Mru(mru) => mru.len(),
            CacheInner::Lfu(lfu) => lfu.len(),
        }
    }

    fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.capacity(),
            CacheInner::Mru(mru) => mru.capacity(),
            CacheInner::Lfu(lfu) => lfu.capacity(),
        }
    }

    fn clear(&mut self) {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.clear(),
            CacheInner::Mru(mru) => mru.clear(),
            CacheInner::Lfu(lfu) => lfu.clear(),
        }
    }
}

/// Builder for creating cache instances.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Create a builder using the capacity from `config`.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Build a cache with the specified policy.
    ///
    /// A capacity of 0 yields a cache that never retains entries.
    ///
    /// # Panics
    ///
    /// Panics if `policy` is [`CachePolicy::Lfu`] with a zero refresh
    /// threshold. Use [`try_build`](Self::try_build) for untrusted input.
    ///
    /// # Example
    ///
    /// ```rust
    /// use memocache::builder::{CacheBuilder, CachePolicy};
    ///
    /// let lru = CacheBuilder::new(100).build::<u64, String>(CachePolicy::Lru);
    /// let mru = CacheBuilder::new(100).build::<u64, String>(CachePolicy::Mru);
    /// let lfu = CacheBuilder::new(100)
    ///     .build::<u64, String>(CachePolicy::Lfu { refresh_threshold: 10 });
    /// ```
    pub fn build<K, V>(self, policy: CachePolicy) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        let inner = match policy {
            CachePolicy::Lru => CacheInner::Lru(LruCore::new(self.capacity)),
            CachePolicy::Mru => CacheInner::Mru(MruCore::new(self.capacity)),
            CachePolicy::Lfu { refresh_threshold } => {
                let Some(refresh_threshold) = NonZeroU64::new(refresh_threshold) else {
                    panic!("lfu refresh threshold must be greater than zero");
                };
                CacheInner::Lfu(LfuCore::new(self.capacity, refresh_threshold))
            }
        };

        Cache { inner }
    }

    /// Build a cache, rejecting a zero capacity or refresh threshold.
    pub fn try_build<K, V>(self, policy: CachePolicy) -> Result<Cache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        CacheConfig {
            capacity: self.capacity,
            policy,
        }
        .validate()?;
        Ok(self.build(policy))
    }

    /// Build a validated cache behind a lock, ready to share between threads.
    ///
    /// ```rust
    /// use std::sync::Arc;
    ///
    /// use memocache::builder::{CacheBuilder, CachePolicy};
    /// use memocache::memoize::Memoizer;
    ///
    /// let cache = CacheBuilder::new(32)
    ///     .try_build_concurrent::<u32, u64>(CachePolicy::Mru)
    ///     .unwrap();
    /// let fib = Memoizer::new(Arc::new(cache), |n: &u32| Ok::<_, ()>(u64::from(*n) * 3));
    /// assert_eq!(fib.call(7), Ok(21));
    /// ```
    pub fn try_build_concurrent<K, V>(
        self,
        policy: CachePolicy,
    ) -> Result<ConcurrentCache<Cache<K, V>>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        self.try_build(policy).map(ConcurrentCache::new)
    }
}
