//! Slot storage addressed by stable index handles.
//!
//! Vacant slots form a singly linked free chain threaded through the slots
//! themselves, so reuse costs no side allocation. A [`SlotId`] stays valid
//! until its slot is removed; the key indexes and recency lists of the cache
//! cores cross-reference entries through it instead of through pointers.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SlotId(usize);

#[derive(Debug)]
enum Slot<T> {
    Occupied(T),
    /// Next vacant slot in the free chain.
    Vacant(Option<usize>),
}

#[derive(Debug)]
pub(crate) struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn insert(&mut self, value: T) -> SlotId {
        self.len += 1;
        if let Some(idx) = self.free_head
            && let Some(Slot::Vacant(next_free)) = self.slots.get(idx)
        {
            self.free_head = *next_free;
            self.slots[idx] = Slot::Occupied(value);
            return SlotId(idx);
        }
        self.slots.push(Slot::Occupied(value));
        SlotId(self.slots.len() - 1)
    }

    /// Frees the slot and returns its value; `None` for a stale handle.
    pub(crate) fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.0)?;
        if !matches!(slot, Slot::Occupied(_)) {
            return None;
        }
        match std::mem::replace(slot, Slot::Vacant(self.free_head)) {
            Slot::Occupied(value) => {
                self.free_head = Some(id.0);
                self.len -= 1;
                Some(value)
            }
            Slot::Vacant(_) => None,
        }
    }

    pub(crate) fn get(&self, id: SlotId) -> Option<&T> {
        match self.slots.get(id.0)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    pub(crate) fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        match self.slots.get_mut(id.0)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    pub(crate) fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every value and forgets all handles; capacity is kept.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}
