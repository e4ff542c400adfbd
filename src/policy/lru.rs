//! # LRU (Least Recently Used) Cache
//!
//! Evicts the entry that has gone longest without being read or written.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LruCore<K, V>                               │
//!   │                                                                      │
//!   │   index: FxHashMap<K, SlotId>                                        │
//!   │   ┌─────────┬──────────┐                                             │
//!   │   │  "a"    │  id_2    │──┐                                          │
//!   │   │  "b"    │  id_0    │──┼──┐                                       │
//!   │   │  "c"    │  id_1    │──┼──┼──┐                                    │
//!   │   └─────────┴──────────┘  │  │  │                                    │
//!   │                           ▼  ▼  ▼                                    │
//!   │   entries: IntrusiveList<(K, V)>                                     │
//!   │                                                                      │
//!   │   head (MRU) ─► [a] ◄──► [c] ◄──► [b] ◄── tail (LRU, evicted next)   │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! | Operation  | Effect on order              | Complexity |
//! |------------|------------------------------|------------|
//! | `insert`   | new or updated key to front  | O(1)       |
//! | `get`      | hit moves to front           | O(1)       |
//! | `contains` | none                         | O(1)       |
//! | `peek`     | none                         | O(1)       |
//! | `remove`   | unlinks entry                | O(1)       |
//!
//! ## Example Usage
//!
//! ```
//! use memocache::policy::lru::LruCore;
//! use memocache::traits::CoreCache;
//!
//! let mut cache = LruCore::new(2);
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//! cache.get(&"a");
//!
//! cache.insert("c", 3); // evicts "b"
//! assert!(cache.contains(&"a"));
//! assert!(!cache.contains(&"b"));
//! ```
//!
//! ## Thread Safety
//!
//! Not thread-safe; wrap in
//! [`ConcurrentLruCache`](crate::concurrent::ConcurrentLruCache).

use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::{IntrusiveList, SlotId};
use crate::error::InvariantError;
use crate::traits::CoreCache;

/// Recency-ordered cache evicting the least recently used entry.
#[derive(Debug)]
pub struct LruCore<K, V> {
    index: FxHashMap<K, SlotId>,
    entries: IntrusiveList<(K, V)>,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 yields a cache that never retains anything.
    pub fn new(capacity: usize) -> Self {
        debug!(capacity, "creating lru cache");
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
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.entries.back().map(|(key, value)| (key, value))
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let (key, value) = self.entries.pop_back()?;
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

impl<K, V> CoreCache<K, V> for LruCore<K, V>
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
            && let Some((evicted, _)) = self.entries.pop_back()
        {
            self.index.remove(&evicted);
            trace!(len = self.entries.len(), "lru evicted entry");
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

/// Shared consistency check for the list-backed recency policies.
pub(crate) fn check_recency_index<K, V>(
    index: &FxHashMap<K, SlotId>,
    entries: &IntrusiveList<(K, V)>,
    capacity: usize,
) -> Result<(), InvariantError>
where
    K: Eq + Hash,
{
    if index.len() != entries.len() {
        return Err(InvariantError::new(format!(
            "index holds {} keys but list holds {} entries",
            index.len(),
            entries.len()
        )));
    }
    if entries.len() > capacity {
        return Err(InvariantError::new(format!(
            "{} entries exceed capacity {}",
            entries.len(),
            capacity
        )));
    }
    for (key, &id) in index {
        match entries.get(id) {
            Some((stored, _)) if stored == key => {}
            _ => return Err(InvariantError::new("index points at the wrong list node")),
        }
    }
    entries.check_links()
}
