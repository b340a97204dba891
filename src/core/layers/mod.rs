//! Leaf cache layers
//!
//! Each layer wraps one [`CacheBackend`](crate::storage::CacheBackend) with
//! its own key derivation and TTL:
//!
//! - [`QueryCache`] - final responses, keyed by query under the configured strategy
//! - [`EmbeddingCache`] - embedding vectors, keyed by exact text
//! - [`ResultCache`] - retrieval payloads, keyed by rounded embedding
//!
//! Values are stored as JSON, so any serde type round-trips.

mod embedding;
pub mod keys;
mod query;
mod result;


pub use embedding::EmbeddingCache;
pub use query::QueryCache;
pub use result::ResultCache;
