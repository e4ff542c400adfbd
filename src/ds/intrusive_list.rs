//! Recency list for the LRU and MRU cores.
//!
//! A doubly linked list whose nodes live in a [`SlotArena`] and point at each
//! other by [`SlotId`]. The cores keep `(key, value)` pairs here and hold the
//! returned ids in their key index, so a hit can be relinked at the head in
//! O(1).
//!
//! ```text
//!   head ─► [id_4] ◄──► [id_0] ◄──► [id_2] ◄── tail
//!           newest                  oldest
//! ```

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

#[derive(Debug)]
pub(crate) struct IntrusiveList<T> {
    nodes: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> IntrusiveList<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn front(&self) -> Option<&T> {
        self.get(self.head?)
    }

    pub(crate) fn back(&self) -> Option<&T> {
        self.get(self.tail?)
    }

    pub(crate) fn get(&self, id: SlotId) -> Option<&T> {
        self.nodes.get(id).map(|node| &node.value)
    }

    pub(crate) fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.nodes.get_mut(id).map(|node| &mut node.value)
    }

    /// Head to tail.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            cursor: self.head,
        }
    }

    pub(crate) fn push_front(&mut self, value: T) -> SlotId {
        let id = self.nodes.insert(Node {
            value,
            prev: None,
            next: None,
        });
        self.link_at_head(id);
        id
    }

    pub(crate) fn pop_front(&mut self) -> Option<T> {
        self.remove(self.head?)
    }

    pub(crate) fn pop_back(&mut self) -> Option<T> {
        self.remove(self.tail?)
    }

    pub(crate) fn remove(&mut self, id: SlotId) -> Option<T> {
        self.unlink(id)?;
        self.nodes.remove(id).map(|node| node.value)
    }

    /// Relinks `id` at the head. Stale ids are ignored.
    pub(crate) fn move_to_front(&mut self, id: SlotId) {
        if self.head == Some(id) || !self.nodes.contains(id) {
            return;
        }
        self.unlink(id);
        self.link_at_head(id);
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Walks the list head to tail and checks every back-link, the tail
    /// pointer, and that the walk reaches exactly `len()` nodes.
    pub(crate) fn check_links(&self) -> Result<(), InvariantError> {
        let mut walked = 0usize;
        let mut prev = None;
        let mut cursor = self.head;

        while let Some(id) = cursor {
            let node = self
                .nodes
                .get(id)
                .ok_or_else(|| InvariantError::new("list links a freed slot"))?;
            if node.prev != prev {
                return Err(InvariantError::new("broken back-link in recency list"));
            }
            walked += 1;
            if walked > self.len() {
                return Err(InvariantError::new("cycle in recency list"));
            }
            prev = Some(id);
            cursor = node.next;
        }

        if self.tail != prev {
            return Err(InvariantError::new("recency list tail is stale"));
        }
        if walked != self.len() {
            return Err(InvariantError::new(format!(
                "recency list reaches {walked} of {} nodes",
                self.len()
            )));
        }
        Ok(())
    }

    fn unlink(&mut self, id: SlotId) -> Option<()> {
        let node = self.nodes.get_mut(id)?;
        let (prev, next) = (node.prev.take(), node.next.take());

        match prev.and_then(|prev| self.nodes.get_mut(prev)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|next| self.nodes.get_mut(next)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }
        Some(())
    }

    fn link_at_head(&mut self, id: SlotId) {
        let old_head = self.head.replace(id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head.and_then(|head| self.nodes.get_mut(head)) {
            Some(head_node) => head_node.prev = Some(id),
            None => self.tail = Some(id),
        }
    }
}

pub(crate) struct Iter<'a, T> {
    nodes: &'a SlotArena<Node<T>>,
    cursor: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.value)
    }
}
