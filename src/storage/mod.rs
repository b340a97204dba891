//! Storage layer for the cache engine
//!
//! Every cache layer stores serialized payloads in one [`CacheBackend`]:
//! an in-process LRU, a remote key-value store, or both stacked.

mod backend;
mod hybrid;
mod memory;
/// Redis remote store
#[cfg(feature = "redis")]
pub mod redis;
/// Remote tier
pub mod remote;
#[cfg(test)]
pub(crate) mod tests;

pub use backend::CacheBackend;
pub use hybrid::HybridBackend;
pub use memory::MemoryBackend;
pub use remote::{RemoteBackend, RemoteStore};
