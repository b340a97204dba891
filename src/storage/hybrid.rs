//! Hybrid backend: hot in-memory tier in front of the remote tier

use super::memory::MemoryBackend;
use super::remote::RemoteBackend;
use crate::utils::error::Result;
use bytes::Bytes;
use std::time::Duration;
use tracing::warn;

/// Two-tier backend
///
/// The remote tier is authoritative and is always written; the memory tier
/// only accelerates reads, so losing it costs locality and never correctness.
#[derive(Debug)]
pub struct HybridBackend {
    memory: MemoryBackend,
    remote: RemoteBackend,
}

impl HybridBackend {
    pub fn new(memory: MemoryBackend, remote: RemoteBackend) -> Self {
        Self { memory, remote }
    }

    /// Read the memory tier, then the remote tier, promoting remote hits.
    ///
    /// Promoted entries get the memory tier's default TTL rather than the
    /// remaining TTL of the remote copy.
    pub async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        if let Some(value) = self.memory.get(key).await? {
            return Ok(Some(value));
        }

        let value = self.remote.get(key).await?;
        if let Some(value) = &value {
            self.memory.set(key, value.clone(), None).await?;
        }
        Ok(value)
    }

    pub async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> Result<()> {
        self.memory.set(key, value.clone(), ttl).await?;
        self.remote.set(key, value, ttl).await
    }

    /// Delete from both tiers; the first error is returned after both were attempted
    pub async fn delete(&self, key: &str) -> Result<()> {
        let memory = self.memory.delete(key).await;
        let remote = self.remote.delete(key).await;
        Self::first_error("delete", memory, remote)
    }

    pub async fn clear(&self) -> Result<()> {
        let memory = self.memory.clear().await;
        let remote = self.remote.clear().await;
        Self::first_error("clear", memory, remote)
    }

    pub async fn health_check(&self) -> Result<()> {
        self.remote.health_check().await
    }

    /// The hot tier
    pub fn memory(&self) -> &MemoryBackend {
        &self.memory
    }

    /// The authoritative tier
    pub fn remote(&self) -> &RemoteBackend {
        &self.remote
    }

    fn first_error(op: &str, memory: Result<()>, remote: Result<()>) -> Result<()> {
        if memory.is_err() != remote.is_err() {
            warn!("Hybrid {} only partially applied", op);
        }
        memory.and(remote)
    }
}
