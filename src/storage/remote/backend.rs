//! Remote cache backend

use super::compression::{compress, decompress};
use super::store::RemoteStore;
use crate::config::CompressionAlgorithm;
use crate::utils::error::Result;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

/// Cache backend delegating to a [`RemoteStore`]
///
/// Payloads are framed (and optionally compressed) before they leave the process.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    store: Arc<dyn RemoteStore>,
    compression: Option<CompressionAlgorithm>,
}

impl RemoteBackend {
    pub fn new(store: Arc<dyn RemoteStore>, compression: Option<CompressionAlgorithm>) -> Self {
        Self { store, compression }
    }

    pub async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        match self.store.get(key).await? {
            Some(payload) => Ok(Some(Bytes::from(decompress(&payload)?))),
            None => Ok(None),
        }
    }

    /// Store a value; a missing or zero TTL writes without expiry
    pub async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> Result<()> {
        let payload = compress(&value, self.compression);
        let ttl = ttl.filter(|ttl| !ttl.is_zero());
        self.store.set(key, payload, ttl).await
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        self.store.delete(key).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.flush().await
    }

    pub async fn health_check(&self) -> Result<()> {
        self.store.ping().await
    }

    pub fn compression(&self) -> Option<CompressionAlgorithm> {
        self.compression
    }
}
