//! Cache Module
//!
//! Provides a bounded in-memory cache with LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use lru::Iter;
pub use stats::CacheStats;
pub use store::{EvictCallback, LruCache};
