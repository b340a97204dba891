//! Cache configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// How a natural-language query is turned into a query-cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeyStrategy {
    /// Hash of the raw query string
    Exact,
    /// Hash of the normalized query (case, punctuation, whitespace and stop words removed)
    Fuzzy,
    /// Embedding similarity against previously seen queries
    #[default]
    Semantic,
}

/// Storage used behind every cache layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process LRU with TTL
    #[default]
    Memory,
    /// Remote key-value store
    Remote,
    /// In-process hot tier in front of the remote store
    Hybrid,
}

/// Compression applied to payloads written to the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    Gzip,
    #[default]
    Lz4,
    Zstd,
}

impl fmt::Display for KeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyStrategy::Exact => write!(f, "exact"),
            KeyStrategy::Fuzzy => write!(f, "fuzzy"),
            KeyStrategy::Semantic => write!(f, "semantic"),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Memory => write!(f, "memory"),
            BackendKind::Remote => write!(f, "remote"),
            BackendKind::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionAlgorithm::Gzip => write!(f, "gzip"),
            CompressionAlgorithm::Lz4 => write!(f, "lz4"),
            CompressionAlgorithm::Zstd => write!(f, "zstd"),
        }
    }
}

/// Multi-level cache configuration
///
/// Read once when the cache layers are built and never mutated afterwards.
/// TTLs are in seconds; `None` (or `0`) means entries never expire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub query_cache_enabled: bool,
    pub query_cache_ttl: Option<u64>,
    pub query_cache_size_mb: u64,
    pub cache_key_strategy: KeyStrategy,
    /// Minimum cosine similarity for a semantic query-cache hit
    pub semantic_cache_threshold: f64,
    /// Upper bound on entries held by the semantic matcher (unbounded when unset)
    pub semantic_max_entries: Option<usize>,

    pub embedding_cache_enabled: bool,
    pub embedding_cache_ttl: Option<u64>,
    pub embedding_cache_size_mb: u64,

    pub result_cache_enabled: bool,
    pub result_cache_ttl: Option<u64>,
    pub result_cache_size_mb: u64,

    /// Maximum number of items coalesced into one batch call
    pub batch_size: usize,
    /// Longest time a batch stays open after its first item arrives
    pub batch_timeout_ms: u64,
    /// Capacity of the pending-request queue
    pub queue_max_size: usize,

    pub warmup_enabled: bool,
    pub warmup_queries: Vec<String>,

    pub compress_cache: bool,
    pub compression_algorithm: CompressionAlgorithm,

    pub cache_backend: BackendKind,
    /// Connection URL of the remote store, required by the remote and hybrid backends
    pub remote_url: Option<String>,
    pub avg_item_size_bytes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            query_cache_enabled: true,
            query_cache_ttl: default_query_cache_ttl(),
            query_cache_size_mb: default_query_cache_size_mb(),
            cache_key_strategy: KeyStrategy::default(),
            semantic_cache_threshold: default_similarity_threshold(),
            semantic_max_entries: None,
            embedding_cache_enabled: true,
            embedding_cache_ttl: default_embedding_cache_ttl(),
            embedding_cache_size_mb: default_embedding_cache_size_mb(),
            result_cache_enabled: true,
            result_cache_ttl: default_result_cache_ttl(),
            result_cache_size_mb: default_result_cache_size_mb(),
            batch_size: default_batch_size(),
            batch_timeout_ms: default_batch_timeout_ms(),
            queue_max_size: default_queue_max_size(),
            warmup_enabled: true,
            warmup_queries: Vec::new(),
            compress_cache: true,
            compression_algorithm: CompressionAlgorithm::default(),
            cache_backend: BackendKind::default(),
            remote_url: None,
            avg_item_size_bytes: default_avg_item_size_bytes(),
        }
    }
}

impl CacheConfig {
    /// Number of entries a layer with the given megabyte budget may hold
    pub fn max_items(&self, size_mb: u64) -> usize {
        if size_mb == 0 {
            return 1024;
        }
        let total_bytes = size_mb.saturating_mul(1024 * 1024);
        let items = total_bytes / self.avg_item_size_bytes.max(1);
        usize::try_from(items).unwrap_or(usize::MAX).max(1)
    }

    /// Compression to apply to remote payloads, if any
    pub fn compression(&self) -> Option<CompressionAlgorithm> {
        self.compress_cache.then_some(self.compression_algorithm)
    }

    pub fn query_ttl(&self) -> Option<Duration> {
        ttl_from_secs(self.query_cache_ttl)
    }

    pub fn embedding_ttl(&self) -> Option<Duration> {
        ttl_from_secs(self.embedding_cache_ttl)
    }

    pub fn result_ttl(&self) -> Option<Duration> {
        ttl_from_secs(self.result_cache_ttl)
    }

    pub fn batch_timeout(&self) -> Duration {
        Duration::from_millis(self.batch_timeout_ms)
    }
}

/// Non-positive TTLs disable expiry
pub fn ttl_from_secs(secs: Option<u64>) -> Option<Duration> {
    secs.filter(|s| *s > 0).map(Duration::from_secs)
}

impl std::str::FromStr for KeyStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(KeyStrategy::Exact),
            "fuzzy" => Ok(KeyStrategy::Fuzzy),
            "semantic" => Ok(KeyStrategy::Semantic),
            other => Err(format!("Unknown cache key strategy: {}", other)),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            // "redis" is accepted for configs written against the redis-only deployment
            "remote" | "redis" => Ok(BackendKind::Remote),
            "hybrid" => Ok(BackendKind::Hybrid),
            other => Err(format!("Unknown cache backend: {}", other)),
        }
    }
}

impl std::str::FromStr for CompressionAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gzip" => Ok(CompressionAlgorithm::Gzip),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            other => Err(format!("Unknown compression algorithm: {}", other)),
        }
    }
}
