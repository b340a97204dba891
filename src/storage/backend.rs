//! Cache backend enum with dispatch methods

use super::hybrid::HybridBackend;
use super::memory::MemoryBackend;
use super::remote::{RemoteBackend, RemoteStore};
use crate::config::{BackendKind, CacheConfig};
use crate::utils::error::{CacheError, Result};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Key-value storage behind one cache layer
#[derive(Debug)]
pub enum CacheBackend {
    /// In-process LRU with TTL
    Memory(MemoryBackend),
    /// Remote key-value store
    Remote(RemoteBackend),
    /// Memory in front of remote
    Hybrid(HybridBackend),
}

impl CacheBackend {
    /// Build the backend selected by `config` for a layer with the given budget and TTL
    pub fn from_config(config: &CacheConfig, size_mb: u64, ttl: Option<Duration>) -> Result<Self> {
        let max_items = config.max_items(size_mb);
        info!(
            "Initializing {} cache backend ({} items, ttl {:?})",
            config.cache_backend, max_items, ttl
        );

        let memory = MemoryBackend::new(max_items, ttl);
        match config.cache_backend {
            BackendKind::Memory => Ok(CacheBackend::Memory(memory)),
            BackendKind::Remote => Ok(CacheBackend::Remote(Self::remote_from_config(config)?)),
            BackendKind::Hybrid => Ok(CacheBackend::Hybrid(HybridBackend::new(
                memory,
                Self::remote_from_config(config)?,
            ))),
        }
    }

    /// In-memory backend
    pub fn memory(max_items: usize, default_ttl: Option<Duration>) -> Self {
        CacheBackend::Memory(MemoryBackend::new(max_items, default_ttl))
    }

    /// Remote backend over an existing store client
    pub fn remote(store: Arc<dyn RemoteStore>, config: &CacheConfig) -> Self {
        CacheBackend::Remote(RemoteBackend::new(store, config.compression()))
    }

    fn remote_from_config(config: &CacheConfig) -> Result<RemoteBackend> {
        let url = config
            .remote_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                CacheError::config(format!(
                    "The {} cache backend requires remote_url",
                    config.cache_backend
                ))
            })?;

        Ok(RemoteBackend::new(
            connect_remote(url)?,
            config.compression(),
        ))
    }

    /// Get a value
    pub async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        match self {
            CacheBackend::Memory(backend) => backend.get(key).await,
            CacheBackend::Remote(backend) => backend.get(key).await,
            CacheBackend::Hybrid(backend) => backend.get(key).await,
        }
    }

    /// Store a value; see each variant for how a missing TTL is treated
    pub async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> Result<()> {
        match self {
            CacheBackend::Memory(backend) => backend.set(key, value, ttl).await,
            CacheBackend::Remote(backend) => backend.set(key, value, ttl).await,
            CacheBackend::Hybrid(backend) => backend.set(key, value, ttl).await,
        }
    }

    /// Delete a value
    pub async fn delete(&self, key: &str) -> Result<()> {
        match self {
            CacheBackend::Memory(backend) => backend.delete(key).await,
            CacheBackend::Remote(backend) => backend.delete(key).await,
            CacheBackend::Hybrid(backend) => backend.delete(key).await,
        }
    }

    /// Remove every entry
    pub async fn clear(&self) -> Result<()> {
        match self {
            CacheBackend::Memory(backend) => backend.clear().await,
            CacheBackend::Remote(backend) => backend.clear().await,
            CacheBackend::Hybrid(backend) => backend.clear().await,
        }
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        match self {
            CacheBackend::Memory(_) => Ok(()),
            CacheBackend::Remote(backend) => backend.health_check().await,
            CacheBackend::Hybrid(backend) => backend.health_check().await,
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            CacheBackend::Memory(_) => BackendKind::Memory,
            CacheBackend::Remote(_) => BackendKind::Remote,
            CacheBackend::Hybrid(_) => BackendKind::Hybrid,
        }
    }
}

#[cfg(feature = "redis")]
fn connect_remote(url: &str) -> Result<Arc<dyn RemoteStore>> {
    Ok(Arc::new(super::redis::RedisStore::new(url)?))
}

#[cfg(not(feature = "redis"))]
fn connect_remote(_url: &str) -> Result<Arc<dyn RemoteStore>> {
    Err(CacheError::config(
        "Remote cache backends require the `redis` feature",
    ))
}
