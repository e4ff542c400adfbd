//! Frequency buckets for O(1) LFU tracking.
//!
//! Owns every LFU entry (key, value and access count) with O(1) insert,
//! touch, remove and eviction. Entries sharing a count live in one bucket,
//! kept in recency order, and the non-empty buckets are chained in ascending
//! frequency order so the minimum can always be found without scanning.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                       FrequencyBuckets<K, V> Layout                         │
//! │                                                                             │
//! │   ┌─────────────────────────────┐   ┌─────────────────────────────────┐     │
//! │   │  index: FxHashMap<K,SlotId> │   │  nodes: SlotArena<Node<K, V>>   │     │
//! │   │                             │   │                                 │     │
//! │   │  ┌───────────┬──────────┐   │   │  ┌──────┬───────────────────┐   │     │
//! │   │  │    Key    │  SlotId  │   │   │  │ Slot │ Node              │   │     │
//! │   │  ├───────────┼──────────┤   │   │  ├──────┼───────────────────┤   │     │
//! │   │  │   "fib"   │   id_0   │───┼───┼─►│ id_0 │ freq:2, value, ⇄  │   │     │
//! │   │  │   "sqrt"  │   id_1   │───┼───┼─►│ id_1 │ freq:1, value, ⇄  │   │     │
//! │   │  │   "pow"   │   id_2   │───┼───┼─►│ id_2 │ freq:1, value, ⇄  │   │     │
//! │   │  └───────────┴──────────┘   │   │  └──────┴───────────────────┘   │     │
//! │   └─────────────────────────────┘   └─────────────────────────────────┘     │
//! │                                                                             │
//! │   ┌───────────────────────────────────────────────────────────────────┐     │
//! │   │  buckets: FxHashMap<u64, Bucket>  (frequency → recency list)      │     │
//! │   │                                                                   │     │
//! │   │  min_freq = 1                                                     │     │
//! │   │       │                                                           │     │
//! │   │       ▼                                                           │     │
//! │   │  freq=1: head ──► [id_2] ◄──► [id_1] ◄── tail                     │     │
//! │   │                    newest       oldest (evicted first)            │     │
//! │   │                                                                   │     │
//! │   │  freq=2: head ──► [id_0] ◄── tail                                 │     │
//! │   │                                                                   │     │
//! │   │  Bucket chain: freq=1 ──next──► freq=2                            │     │
//! │   │                freq=2 ◄──prev── freq=1                            │     │
//! │   └───────────────────────────────────────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────────┘
//!
//! Touch Flow (frequency bump)
//! ───────────────────────────
//!
//!   touch("sqrt"):
//!     1. Lookup id_1 in index
//!     2. Unlink id_1 from the freq=1 bucket
//!     3. If freq=1 bucket is empty → unchain it; if it was min_freq,
//!        min_freq moves to its successor
//!     4. Create the freq=2 bucket if needed, chained after freq=1's position
//!     5. Push id_1 to the front of freq=2 (most recently touched)
//!
//! Eviction Flow (pop_min)
//! ───────────────────────
//!
//!   pop_min():
//!     1. Use min_freq to find the lowest bucket
//!     2. Take the tail of that bucket (oldest touch at that frequency)
//!     3. Remove it from index and arena
//!     4. If the bucket is empty → unchain it, min_freq moves to its successor
//! ```
//!
//! ## Operations
//!
//! | Operation      | Time | Notes                                   |
//! |----------------|------|-----------------------------------------|
//! | `insert`       | O(1) | New key starts at freq=1                |
//! | `touch`        | O(1) | Increment frequency, move to bucket head|
//! | `remove`       | O(1) | Successor bucket becomes the new min    |
//! | `pop_min`      | O(1) | Oldest entry of the lowest frequency    |
//! | `get`          | O(1) | Read-only                               |
//! | `frequency`    | O(1) | Read-only                               |
//!
//! ## Example Usage
//!
//! ```
//! use memocache::ds::FrequencyBuckets;
//!
//! let mut freq = FrequencyBuckets::new();
//! freq.insert("page_a", 10);
//! freq.insert("page_b", 20);
//! freq.insert("page_c", 30);
//!
//! freq.touch(&"page_a"); // freq=2
//!
//! // Lowest frequency wins; ties go to the entry touched longest ago.
//! assert_eq!(freq.pop_min(), Some(("page_b", 20, 1)));
//! assert_eq!(freq.pop_min(), Some(("page_c", 30, 1)));
//! assert_eq!(freq.pop_min(), Some(("page_a", 10, 2)));
//! ```
//!
//! ## Thread Safety
//!
//! Not thread-safe; the owning cache is wrapped in
//! [`ConcurrentCache`](crate::concurrent::ConcurrentCache) for shared use.

use std::collections::hash_map::Entry;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

/// Link pointers are touched on every bump and eviction, so they come first.
#[derive(Debug)]
#[repr(C)]
struct Node<K, V> {
    prev: Option<SlotId>,
    next: Option<SlotId>,
    freq: u64,
    key: K,
    value: V,
}

#[derive(Debug, Default)]
struct Bucket {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    prev: Option<u64>,
    next: Option<u64>,
}

/// Where an entry sat in the bucket chain before it was unlinked.
struct Unlinked {
    emptied: bool,
    prev: Option<u64>,
    next: Option<u64>,
}

/// Default bucket pre-allocation. Most entries cluster at low frequencies.
pub const DEFAULT_BUCKET_PREALLOC: usize = 32;

/// O(1) LFU entry store with recency tie-breaking within a frequency.
///
/// # Example
///
/// ```
/// use memocache::ds::FrequencyBuckets;
///
/// let mut freq = FrequencyBuckets::new();
/// freq.insert("a", 1);
/// freq.insert("b", 2);
/// freq.touch(&"a");
///
/// assert_eq!(freq.frequency(&"a"), Some(2));
/// assert_eq!(freq.frequency(&"b"), Some(1));
/// assert_eq!(freq.min_freq(), Some(1));
/// assert_eq!(freq.peek_min(), Some((&"b", &2, 1)));
/// ```
#[derive(Debug)]
pub struct FrequencyBuckets<K, V> {
    nodes: SlotArena<Node<K, V>>,
    index: FxHashMap<K, SlotId>,
    buckets: FxHashMap<u64, Bucket>,
    // 0 while empty.
    min_freq: u64,
}

impl<K, V> FrequencyBuckets<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty store with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotArena::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::with_capacity_and_hasher(
                DEFAULT_BUCKET_PREALLOC,
                Default::default(),
            ),
            min_freq: 0,
        }
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `key` is stored. Does not count as an access.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the value for `key` without counting an access.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.node(key).map(|node| &node.value)
    }

    /// Returns the current frequency for `key`, if present.
    #[inline]
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.node(key).map(|node| node.freq)
    }

    /// Returns the smallest frequency with a non-empty bucket.
    pub fn min_freq(&self) -> Option<u64> {
        (self.min_freq != 0).then_some(self.min_freq)
    }

    /// Peeks the eviction candidate `(key, value, freq)`: the tail of the
    /// min-frequency bucket.
    pub fn peek_min(&self) -> Option<(&K, &V, u64)> {
        let id = self.buckets.get(&self.min_freq)?.tail?;
        let node = self.nodes.get(id)?;
        Some((&node.key, &node.value, node.freq))
    }

    /// Iterates the keys at `freq`, most recently touched first.
    ///
    /// ```
    /// use memocache::ds::FrequencyBuckets;
    ///
    /// let mut freq = FrequencyBuckets::new();
    /// freq.insert("a", ());
    /// freq.insert("b", ());
    /// freq.insert("c", ());
    ///
    /// let keys: Vec<_> = freq.iter_bucket(1).copied().collect();
    /// assert_eq!(keys, vec!["c", "b", "a"]);
    /// ```
    pub fn iter_bucket(&self, freq: u64) -> BucketIter<'_, K, V> {
        BucketIter {
            nodes: &self.nodes,
            current: self.buckets.get(&freq).and_then(|bucket| bucket.head),
        }
    }

    /// Iterates the non-empty frequencies in ascending order.
    pub fn frequencies(&self) -> FrequencyIter<'_> {
        FrequencyIter {
            buckets: &self.buckets,
            current: self.min_freq(),
        }
    }

    /// Stores a new key with frequency 1 at the front of bucket 1.
    ///
    /// If the key is already stored, only its value is replaced and the old
    /// one returned; frequency and recency are left alone.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let id = match self.index.entry(key) {
            Entry::Occupied(slot) => {
                let node = self.nodes.get_mut(*slot.get())?;
                return Some(std::mem::replace(&mut node.value, value));
            }
            Entry::Vacant(slot) => {
                let id = self.nodes.insert(Node {
                    prev: None,
                    next: None,
                    freq: 1,
                    key: slot.key().clone(),
                    value,
                });
                slot.insert(id);
                id
            }
        };

        if !self.buckets.contains_key(&1) {
            self.insert_bucket(1, None, self.min_freq());
        }
        self.list_push_front(1, id);
        self.min_freq = 1;
        None
    }

    /// Increments the frequency of `key` and returns the new value.
    ///
    /// The key moves to the front of its new bucket. At `u64::MAX` the count
    /// saturates and only the recency position changes.
    #[inline]
    pub fn touch(&mut self, key: &K) -> Option<u64> {
        self.touch_value(key).map(|(freq, _)| freq)
    }

    /// Like [`touch`](Self::touch), also handing back the stored value.
    pub fn touch_value(&mut self, key: &K) -> Option<(u64, &mut V)> {
        let id = *self.index.get(key)?;
        let current_freq = self.nodes.get(id)?.freq;

        if current_freq == u64::MAX {
            self.list_remove(current_freq, id)?;
            self.list_push_front(current_freq, id);
        } else {
            let next_freq = current_freq + 1;
            let unlinked = self.unlink(current_freq, id)?;
            if !self.buckets.contains_key(&next_freq) {
                let prev = if unlinked.emptied {
                    unlinked.prev
                } else {
                    Some(current_freq)
                };
                self.insert_bucket(next_freq, prev, unlinked.next);
            }

            if let Some(node) = self.nodes.get_mut(id) {
                node.freq = next_freq;
            }
            self.list_push_front(next_freq, id);
            if self.min_freq == 0 || next_freq < self.min_freq {
                self.min_freq = next_freq;
            }
        }

        let node = self.nodes.get_mut(id)?;
        Some((node.freq, &mut node.value))
    }

    /// Removes `key`, returning its value and the frequency it had.
    ///
    /// When this empties the minimum bucket, the next non-empty frequency in
    /// the chain becomes the minimum; it need not be `min + 1`.
    ///
    /// ```
    /// use memocache::ds::FrequencyBuckets;
    ///
    /// let mut freq = FrequencyBuckets::new();
    /// freq.insert("cold", 'c');
    /// freq.insert("hot", 'h');
    /// for _ in 0..4 {
    ///     freq.touch(&"hot");
    /// }
    ///
    /// assert_eq!(freq.remove(&"cold"), Some(('c', 1)));
    /// assert_eq!(freq.min_freq(), Some(5));
    /// assert_eq!(freq.remove(&"cold"), None);
    /// ```
    #[inline]
    pub fn remove(&mut self, key: &K) -> Option<(V, u64)> {
        let id = self.index.remove(key)?;
        let freq = self.nodes.get(id)?.freq;
        self.unlink(freq, id)?;
        self.nodes.remove(id).map(|node| (node.value, node.freq))
    }

    /// Removes and returns the eviction candidate `(key, value, freq)`.
    #[inline]
    pub fn pop_min(&mut self) -> Option<(K, V, u64)> {
        let freq = self.min_freq;
        let id = self.buckets.get(&freq)?.tail?;
        self.unlink(freq, id)?;

        let node = self.nodes.remove(id)?;
        self.index.remove(&node.key);
        Some((node.key, node.value, node.freq))
    }

    /// Clears all state.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.buckets.clear();
        self.min_freq = 0;
    }

    /// Verifies the two-way index/bucket consistency and the bucket chain.
    ///
    /// - every index entry resolves to a live node, and every node in a
    ///   bucket is indexed under its own key;
    /// - every node sits in the bucket matching its frequency;
    /// - no bucket is empty, the chain is strictly ascending and covers every
    ///   bucket, and `min_freq` is the smallest bucket key.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        ensure(self.len() == self.index.len(), || {
            format!(
                "node count {} does not match index size {}",
                self.len(),
                self.index.len()
            )
        })?;

        if self.is_empty() {
            ensure(self.buckets.is_empty(), || {
                "empty store still holds buckets".to_string()
            })?;
            return ensure(self.min_freq == 0, || {
                format!("empty store has min_freq {}", self.min_freq)
            });
        }

        let smallest = self.buckets.keys().copied().min();
        ensure(smallest == self.min_freq(), || {
            format!(
                "min_freq {:?} does not match smallest bucket {:?}",
                self.min_freq(),
                smallest
            )
        })?;

        let mut chained = 0usize;
        let mut linked = 0usize;
        let mut expected_prev = None;
        for freq in self.frequencies() {
            let bucket = self
                .buckets
                .get(&freq)
                .ok_or_else(|| InvariantError::new(format!("chain names missing bucket {freq}")))?;
            ensure(bucket.prev == expected_prev, || {
                format!("bucket {freq} has prev {:?}, expected {expected_prev:?}", bucket.prev)
            })?;
            if let Some(next) = bucket.next {
                ensure(next > freq, || format!("bucket chain not ascending at {freq}"))?;
            }

            let mut current = bucket.head;
            let mut last = None;
            let mut count = 0usize;
            while let Some(id) = current {
                let node = self
                    .nodes
                    .get(id)
                    .ok_or_else(|| InvariantError::new(format!("bucket {freq} links a freed slot")))?;
                ensure(node.freq == freq, || {
                    format!("node with freq {} found in bucket {freq}", node.freq)
                })?;
                ensure(node.prev == last, || format!("broken back-link in bucket {freq}"))?;
                ensure(self.index.get(&node.key) == Some(&id), || {
                    format!("node in bucket {freq} is not indexed at its slot")
                })?;
                last = Some(id);
                current = node.next;
                count += 1;
                ensure(count <= self.len(), || format!("cycle in bucket {freq}"))?;
            }
            ensure(count > 0, || format!("bucket {freq} is empty"))?;
            ensure(bucket.tail == last, || format!("bucket {freq} tail is stale"))?;

            linked += count;
            chained += 1;
            expected_prev = Some(freq);
        }

        ensure(chained == self.buckets.len(), || {
            format!(
                "bucket chain reaches {chained} of {} buckets",
                self.buckets.len()
            )
        })?;
        ensure(linked == self.len(), || {
            format!("{linked} nodes linked into buckets, {} stored", self.len())
        })
    }

    fn node(&self, key: &K) -> Option<&Node<K, V>> {
        self.nodes.get(*self.index.get(key)?)
    }

    fn unlink(&mut self, freq: u64, id: SlotId) -> Option<Unlinked> {
        self.list_remove(freq, id)?;
        let bucket = self.buckets.get(&freq)?;
        let unlinked = Unlinked {
            emptied: bucket.head.is_none(),
            prev: bucket.prev,
            next: bucket.next,
        };

        if unlinked.emptied {
            self.remove_bucket(freq, unlinked.prev, unlinked.next);
            if self.min_freq == freq {
                self.min_freq = unlinked.next.unwrap_or(0);
            }
        }
        Some(unlinked)
    }

    fn insert_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        self.buckets.insert(
            freq,
            Bucket {
                head: None,
                tail: None,
                prev,
                next,
            },
        );

        if let Some(prev) = prev
            && let Some(prev_bucket) = self.buckets.get_mut(&prev)
        {
            prev_bucket.next = Some(freq);
        }
        if let Some(next) = next
            && let Some(next_bucket) = self.buckets.get_mut(&next)
        {
            next_bucket.prev = Some(freq);
        }
    }

    fn remove_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        if let Some(prev) = prev
            && let Some(prev_bucket) = self.buckets.get_mut(&prev)
        {
            prev_bucket.next = next;
        }
        if let Some(next) = next
            && let Some(next_bucket) = self.buckets.get_mut(&next)
        {
            next_bucket.prev = prev;
        }
        self.buckets.remove(&freq);
    }

    fn list_push_front(&mut self, freq: u64, id: SlotId) {
        let Some(bucket) = self.buckets.get_mut(&freq) else {
            return;
        };

        let old_head = bucket.head;
        if let Some(node) = self.nodes.get_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head.and_then(|head| self.nodes.get_mut(head)) {
            Some(head_node) => head_node.prev = Some(id),
            None => bucket.tail = Some(id),
        }
        bucket.head = Some(id);
    }

    fn list_remove(&mut self, freq: u64, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.nodes.get(id)?;
            (node.prev, node.next)
        };

        let bucket = self.buckets.get_mut(&freq)?;
        match prev.and_then(|prev| self.nodes.get_mut(prev)) {
            Some(prev_node) => prev_node.next = next,
            None => bucket.head = next,
        }
        match next.and_then(|next| self.nodes.get_mut(next)) {
            Some(next_node) => next_node.prev = prev,
            None => bucket.tail = prev,
        }

        if let Some(node) = self.nodes.get_mut(id) {
            node.prev = None;
            node.next = None;
        }
        Some(())
    }
}

impl<K, V> Default for FrequencyBuckets<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

fn ensure(cond: bool, msg: impl FnOnce() -> String) -> Result<(), InvariantError> {
    if cond {
        Ok(())
    } else {
        Err(InvariantError::new(msg()))
    }
}

/// Keys of one bucket, most recently touched first.
pub struct BucketIter<'a, K, V> {
    nodes: &'a SlotArena<Node<K, V>>,
    current: Option<SlotId>,
}

impl<'a, K, V> Iterator for BucketIter<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.nodes.get(id)?;
        self.current = node.next;
        Some(&node.key)
    }
}

/// Non-empty frequencies in ascending order.
pub struct FrequencyIter<'a> {
    buckets: &'a FxHashMap<u64, Bucket>,
    current: Option<u64>,
}

impl Iterator for FrequencyIter<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        let freq = self.current?;
        self.current = self.buckets.get(&freq).and_then(|bucket| bucket.next);
        Some(freq)
    }
}
