//! Error types for the cache engine

use thiserror::Error;

/// Result type alias for the cache engine
pub type Result<T> = std::result::Result<T, CacheError>;

/// Main error type for the cache engine
#[derive(Error, Debug)]
pub enum CacheError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Redis errors
    #[cfg(feature = "redis")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Errors raised by a non-Redis remote store client
    #[error("Remote store error: {0}")]
    Remote(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored payload could not be decompressed
    #[error("Compression error: {0}")]
    Compression(String),

    /// The batch function failed for the whole batch
    #[error("Batch error: {0}")]
    Batch(String),

    /// The batch processor stopped before the item was resolved
    #[error("Batch processor stopped before the request completed")]
    BatchCancelled,

    /// Embedding provider errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Retrieval errors
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Answer synthesis errors
    #[error("Compute error: {0}")]
    Compute(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
