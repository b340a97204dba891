//! Collaborator traits
//!
//! The engine never embeds, retrieves or batches on its own; callers plug
//! those operations in through these traits. Each one is implemented for
//! plain async closures, so `|text: String| async move { ... }` works
//! wherever an [`EmbeddingProvider`] is expected.

mod batch;
mod embedding;
mod retrieval;

pub use batch::BatchHandler;
pub use embedding::{BatchEmbedder, EmbeddingProvider, SyncEmbedder};
pub use retrieval::Retriever;
