//! Configuration data models
//!
//! This module defines all configuration structures used by the cache engine.

#![allow(missing_docs)]

pub mod cache;
pub mod logging;

// Re-export all configuration types
pub use cache::*;
pub use logging::*;

/// Default TTL of the query cache, in seconds
pub fn default_query_cache_ttl() -> Option<u64> {
    Some(3600) // 1 hour
}

pub fn default_query_cache_size_mb() -> u64 {
    512
}

pub fn default_embedding_cache_ttl() -> Option<u64> {
    Some(86_400) // 1 day
}

pub fn default_embedding_cache_size_mb() -> u64 {
    1024
}

pub fn default_result_cache_ttl() -> Option<u64> {
    Some(1800) // 30 minutes
}

pub fn default_result_cache_size_mb() -> u64 {
    2048
}

pub fn default_similarity_threshold() -> f64 {
    0.95
}

pub fn default_batch_size() -> usize {
    32
}

pub fn default_batch_timeout_ms() -> u64 {
    100
}

pub fn default_queue_max_size() -> usize {
    1000
}

/// Average serialized entry size used to turn a megabyte budget into an item count
pub fn default_avg_item_size_bytes() -> u64 {
    1024
}

pub fn default_log_level() -> String {
    "info".to_string()
}
