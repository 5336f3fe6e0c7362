//! Cache Entry Module
//!
//! Defines the node stored in the recency list arena.

/// Index of an entry slot inside the recency list arena.
pub(crate) type SlotIndex = usize;

// == Cache Entry ==
/// A single key-value pair plus its neighbours in recency order.
#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    /// The key, also held by the lookup index
    pub key: K,
    /// The stored value
    pub value: V,
    /// Slot of the next less recently used entry
    pub prev: Option<SlotIndex>,
    /// Slot of the next more recently used entry
    pub next: Option<SlotIndex>,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates an unlinked entry.
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            prev: None,
            next: None,
        }
    }

    // == Into Pair ==
    /// Consumes the entry, dropping its links.
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}
