//! Remote key-value store client contract

use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Network key-value store reached by the remote and hybrid backends
///
/// Errors are returned to the caller of the cache operation unchanged;
/// implementations must not retry internally.
#[async_trait]
pub trait RemoteStore: Send + Sync + std::fmt::Debug {
    /// Fetch the raw payload stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store a payload, expiring after `ttl` when one is given
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// Drop every key in the store's database
    async fn flush(&self) -> Result<()>;

    /// Connectivity check
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
