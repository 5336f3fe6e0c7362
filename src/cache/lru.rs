//! LRU Recency List Module
//!
//! Implements recency tracking for cache eviction as a doubly-linked list
//! threaded through an arena of slots. Freed slots are recycled through a
//! free list, so promotion, removal and eviction are all O(1).

use std::iter::FusedIterator;

use crate::cache::entry::{Entry, SlotIndex};

// == Recency List ==
/// Tracks access order for LRU eviction.
///
/// Entries are linked where:
/// - Head = Least recently used
/// - Tail = Most recently used
#[derive(Debug)]
pub(crate) struct RecencyList<K, V> {
    /// Entry arena, `None` marks a free slot
    slots: Vec<Option<Entry<K, V>>>,
    /// Vacant slots ready for reuse
    free: Vec<SlotIndex>,
    head: Option<SlotIndex>,
    tail: Option<SlotIndex>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Back ==
    /// Stores a new entry at the most recently used end.
    ///
    /// Returns the slot the entry was placed in.
    pub fn push_back(&mut self, key: K, value: V) -> SlotIndex {
        let entry = Entry::new(key, value);
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(entry);
                idx
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };

        self.link_back(idx);
        self.len += 1;
        idx
    }

    // == Move To Back ==
    /// Marks an entry as most recently used.
    pub fn move_to_back(&mut self, idx: SlotIndex) {
        if self.tail == Some(idx) || self.get(idx).is_none() {
            return;
        }
        self.unlink(idx);
        self.link_back(idx);
    }

    // == Remove ==
    /// Unlinks an entry and frees its slot.
    pub fn remove(&mut self, idx: SlotIndex) -> Option<(K, V)> {
        self.get(idx)?;
        self.unlink(idx);

        let entry = self.slots[idx].take()?;
        self.free.push(idx);
        self.len -= 1;
        Some(entry.into_pair())
    }

    // == Pop Front ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn pop_front(&mut self) -> Option<(K, V)> {
        let head = self.head?;
        self.remove(head)
    }

    // == Front ==
    /// Returns the least recently used entry without removing it.
    pub fn front(&self) -> Option<&Entry<K, V>> {
        self.head.and_then(|idx| self.get(idx))
    }

    pub fn get(&self, idx: SlotIndex) -> Option<&Entry<K, V>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, idx: SlotIndex) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    /// Value stored in an occupied slot.
    ///
    /// # Panics
    /// Panics if the slot is vacant; callers only pass slots taken from the
    /// lookup index.
    pub fn value(&self, idx: SlotIndex) -> &V {
        match self.get(idx) {
            Some(entry) => &entry.value,
            None => unreachable!("recency slot {idx} is vacant"),
        }
    }

    /// Mutable value stored in an occupied slot.
    ///
    /// # Panics
    /// Panics if the slot is vacant.
    pub fn value_mut(&mut self, idx: SlotIndex) -> &mut V {
        match self.get_mut(idx) {
            Some(entry) => &mut entry.value,
            None => unreachable!("recency slot {idx} is vacant"),
        }
    }

    // == Length ==
    /// Returns the number of linked entries.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    /// Drops every entry and releases the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iter ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            front: self.tail,
            back: self.head,
            remaining: self.len,
        }
    }

    // == Consistency Check ==
    /// Walks the links and checks them against the arena bookkeeping.
    pub fn is_consistent(&self) -> bool {
        let mut seen = 0;
        let mut prev = None;
        let mut cursor = self.head;

        while let Some(idx) = cursor {
            let Some(entry) = self.get(idx) else {
                return false;
            };
            if entry.prev != prev || seen >= self.len {
                return false;
            }
            seen += 1;
            prev = Some(idx);
            cursor = entry.next;
        }

        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        let free_are_vacant = self.free.iter().all(|&idx| self.get(idx).is_none());

        let head_is_oldest = self.front().map_or(self.len == 0, |entry| entry.prev.is_none());

        seen == self.len
            && head_is_oldest
            && prev == self.tail
            && occupied == self.len
            && free_are_vacant
            && occupied + self.free.len() == self.slots.len()
    }

    fn link_back(&mut self, idx: SlotIndex) {
        let old_tail = self.tail;
        if let Some(entry) = self.get_mut(idx) {
            entry.prev = old_tail;
            entry.next = None;
        }

        match old_tail {
            Some(tail) => self.set_next(tail, Some(idx)),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }

    fn unlink(&mut self, idx: SlotIndex) {
        let Some((prev, next)) = self.get(idx).map(|entry| (entry.prev, entry.next)) else {
            return;
        };

        match prev {
            Some(p) => self.set_next(p, next),
            None => self.head = next,
        }
        match next {
            Some(n) => self.set_prev(n, prev),
            None => self.tail = prev,
        }

        if let Some(entry) = self.get_mut(idx) {
            entry.prev = None;
            entry.next = None;
        }
    }

    fn set_next(&mut self, idx: SlotIndex, next: Option<SlotIndex>) {
        if let Some(entry) = self.get_mut(idx) {
            entry.next = next;
        }
    }

    fn set_prev(&mut self, idx: SlotIndex, prev: Option<SlotIndex>) {
        if let Some(entry) = self.get_mut(idx) {
            entry.prev = prev;
        }
    }
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// == Iterator ==
/// Borrowing iterator over cache entries, most recently used first.
///
/// `next_back` walks from the least recently used end.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    front: Option<SlotIndex>,
    back: Option<SlotIndex>,
    remaining: usize,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.list.get(self.front?)?;
        self.front = entry.prev;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.list.get(self.back?)?;
        self.back = entry.next;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
