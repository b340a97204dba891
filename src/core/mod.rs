//! Core cache engine
//!
//! - `layers` - query, embedding and result caches
//! - `semantic_cache` - embedding-similarity matcher for the semantic key strategy
//! - `cache_manager` - layered lookup orchestration and metrics
//! - `batch` - deadline-bounded request coalescing
//! - `traits` - collaborator contracts (embedding, retrieval, batch functions)

pub mod batch;
pub mod cache_manager;
pub mod layers;
pub mod semantic_cache;
pub mod traits;
