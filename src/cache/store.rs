//! Cache Store Module
//!
//! Main cache engine combining a HashMap index with the recency list.
//!
//! Every key lives in two places: the index maps it to an arena slot, and the
//! slot holds the key, the value and the recency links. Promotion relinks a
//! slot at the most recently used end; eviction pops the least recently used
//! end. Both are O(1).

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use tracing::{debug, info, trace};

use crate::cache::entry::SlotIndex;
use crate::cache::lru::{Iter, RecencyList};
use crate::cache::CacheStats;
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

/// Callback invoked with each pair removed by capacity pressure.
pub type EvictCallback<K, V> = Box<dyn FnMut(&K, &V) + Send>;

// == LRU Cache ==
/// Bounded cache with least-recently-used eviction.
///
/// Reads and writes move the touched key to the most recently used end. When
/// an insert pushes the cache past its capacity, the least recently used entry
/// is removed and handed to the registered eviction callback.
///
/// The cache performs no locking. Wrap it in a `Mutex` to share it between
/// threads; even `get` needs exclusive access because it reorders entries.
///
/// # Examples
/// ```
/// use lru_redux::LruCache;
///
/// let mut cache = LruCache::new(2).unwrap();
/// cache.set("a", 1);
/// cache.set("b", 2);
/// cache.get("a");
/// cache.set("c", 3);
///
/// assert!(!cache.contains_key("b"));
/// assert_eq!(cache.to_vec(), vec![("c", 3), ("a", 1)]);
/// ```
pub struct LruCache<K, V> {
    /// Key to arena slot lookup
    index: HashMap<K, SlotIndex>,
    /// Entries in recency order
    list: RecencyList<K, V>,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Single-slot eviction listener
    on_evict: Option<EvictCallback<K, V>>,
    stats: CacheStats,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidCapacity` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        check_capacity(capacity)?;
        Ok(Self {
            index: HashMap::new(),
            list: RecencyList::new(),
            capacity,
            on_evict: None,
            stats: CacheStats::new(),
        })
    }

    /// Creates an empty cache sized by `config`.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::new(config.capacity)
    }

    // == Capacity ==
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the capacity, evicting least recently used entries until the
    /// cache fits. `None` keeps the current capacity.
    ///
    /// Every entry removed here goes through the eviction callback, oldest
    /// first.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidCapacity` for zero; the cache is left
    /// untouched.
    pub fn set_capacity(&mut self, capacity: Option<usize>) -> Result<()> {
        let capacity = capacity.unwrap_or(self.capacity);
        check_capacity(capacity)?;

        if capacity != self.capacity {
            info!(
                old_capacity = self.capacity,
                new_capacity = capacity,
                "cache capacity changed"
            );
        }
        self.capacity = capacity;

        while self.list.len() > self.capacity {
            if !self.evict_one() {
                break;
            }
        }
        Ok(())
    }

    /// Accepted for parity with expiring cache variants. Entries in this
    /// cache never expire, so the value is ignored.
    pub fn set_ttl(&mut self, _ttl: Option<Duration>) {}

    // == Get Or Set ==
    /// Returns the value for `key`, computing and storing it on a miss.
    ///
    /// `compute` runs only when the key is absent. A hit promotes the key.
    pub fn get_or_set<F>(&mut self, key: K, compute: F) -> &V
    where
        F: FnOnce() -> V,
    {
        let idx = match self.promote(&key) {
            Some(idx) => idx,
            None => {
                let value = compute();
                self.insert_new(key, value)
            }
        };
        self.list.value(idx)
    }

    /// Like [`get_or_set`](Self::get_or_set) with a fallible `compute`.
    ///
    /// # Errors
    /// Returns whatever `compute` fails with. Nothing is inserted in that case.
    pub fn try_get_or_set<F, E>(&mut self, key: K, compute: F) -> std::result::Result<&V, E>
    where
        F: FnOnce() -> std::result::Result<V, E>,
    {
        let idx = match self.promote(&key) {
            Some(idx) => idx,
            None => {
                let value = compute()?;
                self.insert_new(key, value)
            }
        };
        Ok(self.list.value(idx))
    }

    // == Fetch ==
    /// Returns a copy of the value for `key`, or `default()` on a miss.
    ///
    /// The fallback result is not stored.
    pub fn fetch<Q, F>(&mut self, key: &Q, default: F) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
        F: FnOnce() -> V,
    {
        match self.get(key) {
            Some(value) => value.clone(),
            None => default(),
        }
    }

    /// Like [`fetch`](Self::fetch) with a fallible fallback.
    ///
    /// # Errors
    /// Returns whatever `default` fails with.
    pub fn try_fetch<Q, F, E>(&mut self, key: &Q, default: F) -> std::result::Result<V, E>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
        F: FnOnce() -> std::result::Result<V, E>,
    {
        match self.get(key) {
            Some(value) => Ok(value.clone()),
            None => default(),
        }
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.promote(key)?;
        Some(self.list.value(idx))
    }

    /// Mutable access to the value for `key`; promotes like [`get`](Self::get).
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.promote(key)?;
        Some(self.list.value_mut(idx))
    }

    /// Returns the value for `key` without touching recency or stats.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        Some(self.list.value(idx))
    }

    // == Set ==
    /// Stores `value` under `key` as the most recently used entry.
    ///
    /// An existing value for the key is replaced. If the cache grows past its
    /// capacity, exactly one least recently used entry is evicted.
    pub fn set(&mut self, key: K, value: V) -> &V {
        let idx = match self.index.get(&key).copied() {
            Some(idx) => {
                *self.list.value_mut(idx) = value;
                self.list.move_to_back(idx);
                trace!("replaced cache entry");
                idx
            }
            None => self.insert_new(key, value),
        };
        self.list.value(idx)
    }

    // == Delete ==
    /// Removes `key` and returns its value.
    ///
    /// This is a caller-directed removal: the eviction callback is not run.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        self.list.remove(idx).map(|(_, value)| value)
    }

    /// Alias of [`delete`](Self::delete).
    pub fn evict<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.delete(key)
    }

    // == Contains ==
    /// Presence check; does not promote.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Alias of [`contains_key`](Self::contains_key).
    pub fn has_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.contains_key(key)
    }

    // == Clear ==
    /// Drops every entry without running the eviction callback.
    pub fn clear(&mut self) {
        debug!(dropped = self.list.len(), "cache cleared");
        self.index.clear();
        self.list.clear();
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn count(&self) -> usize {
        self.list.len()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    // == Iteration ==
    /// Iterates entries from most to least recently used.
    ///
    /// Iterating never changes the recency order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    /// Calls `f` for every entry, most recently used first.
    pub fn each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, value) in self.list.iter() {
            f(key, value);
        }
    }

    // == Export ==
    /// Copies all pairs out, most recently used first.
    pub fn to_vec(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        self.list
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Copies all values out, most recently used first.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.list.iter().map(|(_, value)| value.clone()).collect()
    }

    // == Eviction Callback ==
    /// Installs `callback`, replacing any previous one.
    pub fn register_evict_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&K, &V) + Send + 'static,
    {
        self.on_evict = Some(Box::new(callback));
    }

    /// Replaces the callback slot; `None` empties it.
    pub fn set_evict_callback(&mut self, callback: Option<EvictCallback<K, V>>) {
        self.on_evict = callback;
    }

    pub fn clear_evict_callback(&mut self) {
        self.on_evict = None;
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats;
        stats.total_entries = self.list.len();
        stats
    }

    /// Zeroes the hit, miss and eviction counters.
    pub fn reset_stats(&mut self) {
        self.stats.reset_counters();
    }

    // == Validation ==
    /// Checks that the index, the recency links and the capacity agree.
    pub fn is_valid(&self) -> bool {
        self.list.is_consistent()
            && self.index.len() == self.list.len()
            && self.list.len() <= self.capacity
            && self
                .index
                .iter()
                .all(|(key, &idx)| self.list.get(idx).is_some_and(|entry| entry.key == *key))
    }

    /// Looks up `key`, recording a hit or miss and promoting it on a hit.
    fn promote<Q>(&mut self, key: &Q) -> Option<SlotIndex>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.get(key).copied() {
            Some(idx) => {
                self.stats.record_hit();
                self.list.move_to_back(idx);
                Some(idx)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Links a key known to be absent at the most recently used end, then
    /// evicts at most one entry. An insert grows the cache by one, so a
    /// single eviction restores the capacity bound.
    fn insert_new(&mut self, key: K, value: V) -> SlotIndex {
        let idx = self.list.push_back(key.clone(), value);
        self.index.insert(key, idx);
        trace!(len = self.list.len(), "inserted cache entry");

        if self.list.len() > self.capacity {
            self.evict_one();
        }
        idx
    }

    /// Removes the least recently used entry and notifies the callback.
    ///
    /// The entry is gone from the store before the callback runs, so a
    /// panicking callback leaves the eviction in place.
    fn evict_one(&mut self) -> bool {
        let Some((key, value)) = self.list.pop_front() else {
            return false;
        };
        self.index.remove(&key);
        self.stats.record_eviction();
        debug!(
            len = self.list.len(),
            capacity = self.capacity,
            "evicted least recently used entry"
        );

        if let Some(callback) = self.on_evict.as_mut() {
            callback(&key, &value);
        }
        true
    }
}

fn check_capacity(capacity: usize) -> Result<()> {
    if capacity < 1 {
        return Err(CacheError::InvalidCapacity(capacity));
    }
    Ok(())
}

impl<'a, K: Hash + Eq + Clone, V> IntoIterator for &'a LruCache<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("entries", &self.list.iter().collect::<Vec<_>>())
            .field("has_evict_callback", &self.on_evict.is_some())
            .field("stats", &self.stats)
            .finish()
    }
}
