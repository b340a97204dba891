//! Retrieval result cache

use super::keys::{embedding_key, namespaced};
use crate::config::CacheConfig;
use crate::storage::CacheBackend;
use crate::utils::error::Result;
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

const NAMESPACE: &str = "result";

/// Retrieval payloads keyed by the (rounded) query embedding
#[derive(Debug)]
pub struct ResultCache {
    config: Arc<CacheConfig>,
    backend: CacheBackend,
}

impl ResultCache {
    pub fn new(config: Arc<CacheConfig>, backend: CacheBackend) -> Self {
        Self { config, backend }
    }

    pub fn from_config(config: Arc<CacheConfig>) -> Result<Self> {
        let backend = CacheBackend::from_config(
            &config,
            config.result_cache_size_mb,
            config.result_ttl(),
        )?;
        Ok(Self::new(config, backend))
    }

    pub async fn get<P: DeserializeOwned>(&self, embedding: &[f32]) -> Result<Option<P>> {
        match self.backend.get(&Self::key(embedding)?).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub async fn set<P: Serialize + ?Sized>(&self, embedding: &[f32], value: &P) -> Result<()> {
        let payload = Bytes::from(serde_json::to_vec(value)?);
        self.backend
            .set(&Self::key(embedding)?, payload, self.config.result_ttl())
            .await
    }

    pub async fn delete(&self, embedding: &[f32]) -> Result<()> {
        self.backend.delete(&Self::key(embedding)?).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.backend.clear().await
    }

    pub fn backend(&self) -> &CacheBackend {
        &self.backend
    }

    fn key(embedding: &[f32]) -> Result<String> {
        Ok(namespaced(NAMESPACE, &embedding_key(embedding)?))
    }
}
