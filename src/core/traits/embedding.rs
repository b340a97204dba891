//! Embedding collaborators

use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;

/// Single-text embedding function
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[async_trait]
impl<F, Fut> EmbeddingProvider for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<f32>>> + Send + 'static,
{
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self(text.to_string()).await
    }
}

/// Embedding function taking a batch of texts
///
/// Implementations return one vector per input text, in input order.
#[async_trait]
pub trait BatchEmbedder: Send + Sync {
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;
}

#[async_trait]
impl<F, Fut> BatchEmbedder for F
where
    F: Fn(Vec<String>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<Vec<f32>>>> + Send + 'static,
{
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        self(texts).await
    }
}

/// Adapts a blocking batch embedding function (e.g. a local model) to [`BatchEmbedder`]
pub struct SyncEmbedder<F>(F);

impl<F> SyncEmbedder<F>
where
    F: Fn(&[String]) -> Result<Vec<Vec<f32>>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> BatchEmbedder for SyncEmbedder<F>
where
    F: Fn(&[String]) -> Result<Vec<Vec<f32>>> + Send + Sync,
{
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        (self.0)(&texts)
    }
}

impl<F> std::fmt::Debug for SyncEmbedder<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEmbedder").finish_non_exhaustive()
    }
}
