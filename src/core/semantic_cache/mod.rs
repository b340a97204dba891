//! Semantic query matching
//!
//! Resolves a query to the cache key of a previously seen query whose
//! embedding is similar enough, so differently-phrased questions share one
//! query-cache entry.

mod matcher;
mod types;
mod utils;


pub use matcher::SemanticMatcher;
pub use types::SemanticEntry;
pub use utils::cosine_similarity;
