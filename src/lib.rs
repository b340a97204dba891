//! # ragcache
//!
//! Multi-level cache and request batching engine for retrieval-augmented
//! generation pipelines.
//!
//! ## Features
//!
//! - **Layered caching**: final answers, query embeddings and retrieval results
//!   each get their own cache, TTL and size budget
//! - **Key strategies**: exact, normalized (fuzzy) or embedding-similarity
//!   (semantic) matching of incoming queries
//! - **Pluggable storage**: in-process LRU, Redis, or both stacked as a hybrid
//! - **Batching**: concurrent single-item calls coalesced into batch calls,
//!   bounded by size and a deadline
//! - **Metrics**: per-layer hit rates and estimated latency/cost savings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ragcache::{CacheConfig, CacheError, CacheManager, ComputeInput, Resolvers};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = CacheManager::new(CacheConfig::default(), None)?;
//!
//!     let embedder = |text: String| async move {
//!         Ok::<_, CacheError>(vec![text.len() as f32, 1.0])
//!     };
//!     let answer: String = manager
//!         .get_or_compute(
//!             "How do I reset my password?",
//!             |input: ComputeInput| async move {
//!                 Ok::<_, CacheError>(format!("Answer for {}", input.query))
//!             },
//!             Resolvers::new().with_embedder(&embedder),
//!         )
//!         .await?;
//!
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::{BackendKind, CacheConfig, CompressionAlgorithm, Config, KeyStrategy};
pub use utils::error::{CacheError, Result};

pub use core::batch::{BatchConfig, BatchProcessor};
pub use core::cache_manager::{
    CacheLayer, CacheManager, CacheMetrics, ComputeInput, MetricsSnapshot, Resolvers,
    SavingsEstimates,
};
pub use core::layers::{EmbeddingCache, QueryCache, ResultCache};
pub use core::semantic_cache::SemanticMatcher;
pub use core::traits::{BatchEmbedder, BatchHandler, EmbeddingProvider, Retriever, SyncEmbedder};
pub use storage::CacheBackend;

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
