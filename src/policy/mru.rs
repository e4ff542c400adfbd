//! # MRU (Most Recently Used) Cache
//!
//! Evicts the entry that was touched last. This suits cyclic or scanning
//! access patterns where the item just used is the one least likely to be
//! needed again soon.
//!
//! ## Architecture
//!
//! ```text
//!   index: FxHashMap<K, SlotId> ──► entries: IntrusiveList<(K, V)>
//!
//!   head (MRU, evicted next) ─► [c] ◄──► [a] ◄──► [b] ◄── tail (LRU)
//! ```
//!
//! Layout matches [`LruCore`](super::lru::LruCore); only the eviction end
//! differs. When a new key arrives at capacity, the current head is evicted
//! first and the new entry then becomes the head.
//!
//! ## Example Usage
//!
//! ```
//! use memocache::policy::mru::MruCore;
//! use memocache::traits::CoreCache;
//!
//! let mut cache = MruCore::new(2);
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//! cache.get(&"a");
//!
//! cache.insert("c", 3); // evicts "a", the most recently used
//! assert!(!cache.contains(&"a"));
//! assert!(cache.contains(&"b"));
//! assert!(cache.contains(&"c"));
//! ```

use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::{IntrusiveList, SlotId};
use crate::error::InvariantError;
use crate::policy::lru::check_recency_index;
use crate::traits::CoreCache;

/// Recency-ordered cache evicting the most recently used entry.
#[derive(Debug)]
pub struct MruCore<K, V> {
    index: FxHashMap<K, SlotId>,
    entries: IntrusiveList<(K, V)>,
    capacity: usize,
}

impl<K, V> MruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        debug!(capacity, "creating mru cache");
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            entries: IntrusiveList::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the value for `key` without refreshing its recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.entries.get(id).map(|(_, value)| value)
    }

    /// Returns the entry that would be evicted next.
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        self.entries.front().map(|(key, value)| (key, value))
    }

    /// Removes and returns the most recently used entry.
    pub fn pop_mru(&mut self) -> Option<(K, V)> {
        let (key, value) = self.entries.pop_front()?;
        self.index.remove(&key);
        Some((key, value))
    }

    /// Iterates keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        check_recency_index(&self.index, &self.entries, self.capacity)
    }
}

impl<K, V> CoreCache<K, V> for MruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            self.entries.move_to_front(id);
            let (_, slot) = self.entries.get_mut(id)?;
            return Some(std::mem::replace(slot, value));
        }

        if self.capacity == 0 {
            return None;
        }

        if self.entries.len() >= self.capacity
            && let Some((evicted, _)) = self.entries.pop_front()
        {
            self.index.remove(&evicted);
            trace!(len = self.entries.len(), "mru evicted entry");
        }

        let id = self.entries.push_front((key.clone(), value));
        self.index.insert(key, id);
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.entries.move_to_front(id);
        self.entries.get(id).map(|(_, value)| value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.entries.remove(id).map(|(_, value)| value)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();
    }
}
