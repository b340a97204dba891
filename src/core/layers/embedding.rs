//! Embedding cache

use super::keys::{hash_key, namespaced};
use crate::config::CacheConfig;
use crate::core::traits::BatchEmbedder;
use crate::storage::CacheBackend;
use crate::utils::error::{CacheError, Result};
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

const NAMESPACE: &str = "embedding";

/// Embedding vectors keyed by the exact input text
#[derive(Debug)]
pub struct EmbeddingCache {
    config: Arc<CacheConfig>,
    backend: CacheBackend,
}

impl EmbeddingCache {
    pub fn new(config: Arc<CacheConfig>, backend: CacheBackend) -> Self {
        Self { config, backend }
    }

    /// Build with the backend selected by the configuration
    pub fn from_config(config: Arc<CacheConfig>) -> Result<Self> {
        let backend = CacheBackend::from_config(
            &config,
            config.embedding_cache_size_mb,
            config.embedding_ttl(),
        )?;
        Ok(Self::new(config, backend))
    }

    pub async fn get(&self, text: &str) -> Result<Option<Vec<f32>>> {
        match self.backend.get(&Self::key(text)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub async fn set(&self, text: &str, embedding: &[f32]) -> Result<()> {
        let payload = Bytes::from(serde_json::to_vec(embedding)?);
        self.backend
            .set(&Self::key(text), payload, self.config.embedding_ttl())
            .await
    }

    /// Embed `texts` in order, calling `embedder` once for the cache misses only
    pub async fn embed_many(
        &self,
        texts: &[String],
        embedder: &dyn BatchEmbedder,
    ) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        let mut missing = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            let cached = self.get(text).await?;
            if cached.is_none() {
                missing.push(i);
            }
            embeddings.push(cached);
        }

        if !missing.is_empty() {
            debug!("Embedding {} of {} texts", missing.len(), texts.len());
            let batch = missing.iter().map(|&i| texts[i].clone()).collect();
            let computed = embedder.embed_batch(batch).await?;
            if computed.len() != missing.len() {
                return Err(CacheError::embedding(format!(
                    "Embedder returned {} vectors for {} texts",
                    computed.len(),
                    missing.len()
                )));
            }
            for (i, embedding) in missing.into_iter().zip(computed) {
                self.set(&texts[i], &embedding).await?;
                embeddings[i] = Some(embedding);
            }
        }

        Ok(embeddings.into_iter().flatten().collect())
    }

    pub async fn delete(&self, text: &str) -> Result<()> {
        self.backend.delete(&Self::key(text)).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.backend.clear().await
    }

    pub fn backend(&self) -> &CacheBackend {
        &self.backend
    }

    fn key(text: &str) -> String {
        namespaced(NAMESPACE, &hash_key(text))
    }
}
