//! LRU Redux - A bounded in-memory LRU cache
//!
//! Provides an entry-count bounded cache with O(1) promotion, deterministic
//! least-recently-used eviction and an optional eviction callback.
//!
//! The crate emits `tracing` events (capacity changes at `info`, evictions at
//! `debug`, inserts at `trace`) but never installs a subscriber.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheStats, EvictCallback, Iter, LruCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
