//! Tests for the storage backends

use super::*;
use crate::config::{BackendKind, CacheConfig, CompressionAlgorithm};
use crate::utils::error::{CacheError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// In-process remote store that can be switched offline
#[derive(Debug, Default)]
pub(crate) struct FakeRemoteStore {
    entries: DashMap<String, (Vec<u8>, Option<Duration>)>,
    offline: AtomicBool,
}

impl FakeRemoteStore {
    pub(crate) fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).map(|entry| entry.0.clone())
    }

    pub(crate) fn ttl(&self, key: &str) -> Option<Duration> {
        self.entries.get(key).and_then(|entry| entry.1)
    }

    fn check(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CacheError::remote("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for FakeRemoteStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.check()?;
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        self.check()?;
        self.entries.insert(key.to_string(), (value, ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.check()?;
        self.entries.remove(key);
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.check()?;
        self.entries.clear();
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.check()
    }
}

fn hybrid(store: &Arc<FakeRemoteStore>, compression: Option<CompressionAlgorithm>) -> CacheBackend {
    CacheBackend::Hybrid(HybridBackend::new(
        MemoryBackend::new(16, None),
        RemoteBackend::new(store.clone(), compression),
    ))
}

#[tokio::test]
async fn test_round_trip_every_backend() {
    let store = Arc::new(FakeRemoteStore::default());
    let backends = [
        CacheBackend::memory(16, None),
        CacheBackend::remote(store.clone(), &CacheConfig::default()),
        hybrid(&store, None),
    ];

    for backend in &backends {
        backend
            .set("k", Bytes::from_static(b"value"), None)
            .await
            .unwrap();
        assert_eq!(
            backend.get("k").await.unwrap(),
            Some(Bytes::from_static(b"value")),
            "{} backend",
            backend.kind()
        );
        assert_eq!(backend.get("missing").await.unwrap(), None);

        backend.delete("k").await.unwrap();
        assert_eq!(backend.get("k").await.unwrap(), None);
        backend.health_check().await.unwrap();
    }
}

#[tokio::test]
async fn test_memory_evicts_least_recently_used() {
    let backend = MemoryBackend::new(2, None);
    backend.set("a", Bytes::from_static(b"1"), None).await.unwrap();
    backend.set("b", Bytes::from_static(b"2"), None).await.unwrap();

    // touching "a" makes "b" the eviction candidate
    assert!(backend.get("a").await.unwrap().is_some());
    backend.set("c", Bytes::from_static(b"3"), None).await.unwrap();

    assert_eq!(backend.len(), 2);
    assert!(backend.get("a").await.unwrap().is_some());
    assert!(backend.get("b").await.unwrap().is_none());
    assert!(backend.get("c").await.unwrap().is_some());
}

#[tokio::test]
async fn test_memory_zero_capacity_holds_one() {
    let backend = MemoryBackend::new(0, None);
    assert_eq!(backend.capacity(), 1);
}

#[tokio::test]
async fn test_memory_ttl_expiry() {
    let backend = MemoryBackend::new(8, Some(Duration::from_millis(50)));
    backend.set("default", Bytes::from_static(b"x"), None).await.unwrap();
    backend
        .set("forever", Bytes::from_static(b"y"), Some(Duration::ZERO))
        .await
        .unwrap();
    backend
        .set("long", Bytes::from_static(b"z"), Some(Duration::from_secs(60)))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(backend.get("default").await.unwrap(), None);
    assert!(backend.get("forever").await.unwrap().is_some());
    assert!(backend.get("long").await.unwrap().is_some());
    // the expired entry was purged on read
    assert_eq!(backend.len(), 2);
}

#[tokio::test]
async fn test_memory_overwrite_and_clear() {
    let backend = MemoryBackend::new(8, None);
    backend.set("k", Bytes::from_static(b"old"), None).await.unwrap();
    backend.set("k", Bytes::from_static(b"new"), None).await.unwrap();
    assert_eq!(backend.get("k").await.unwrap(), Some(Bytes::from_static(b"new")));

    backend.clear().await.unwrap();
    assert!(backend.is_empty());
}

#[tokio::test]
async fn test_remote_ttl_forwarded() {
    let store = Arc::new(FakeRemoteStore::default());
    let backend = RemoteBackend::new(store.clone(), None);

    backend
        .set("a", Bytes::from_static(b"1"), Some(Duration::from_secs(30)))
        .await
        .unwrap();
    backend
        .set("b", Bytes::from_static(b"2"), Some(Duration::ZERO))
        .await
        .unwrap();

    assert_eq!(store.ttl("a"), Some(Duration::from_secs(30)));
    assert_eq!(store.ttl("b"), None);
}

#[tokio::test]
async fn test_remote_compresses_payloads() {
    let store = Arc::new(FakeRemoteStore::default());
    let backend = RemoteBackend::new(store.clone(), Some(CompressionAlgorithm::Zstd));
    let value = Bytes::from("retrieval ".repeat(200));

    backend.set("doc", value.clone(), None).await.unwrap();

    let raw = store.raw("doc").unwrap();
    assert!(raw.len() < value.len());
    assert_eq!(backend.get("doc").await.unwrap(), Some(value));
}

#[tokio::test]
async fn test_remote_errors_propagate() {
    let store = Arc::new(FakeRemoteStore::default());
    let backend = RemoteBackend::new(store.clone(), None);
    store.set_offline(true);

    assert!(backend.get("k").await.is_err());
    assert!(backend.set("k", Bytes::new(), None).await.is_err());
    assert!(backend.health_check().await.is_err());
}

#[tokio::test]
async fn test_hybrid_reads_remote_after_memory_loss() {
    let store = Arc::new(FakeRemoteStore::default());
    let backend = HybridBackend::new(
        MemoryBackend::new(16, None),
        RemoteBackend::new(store.clone(), Some(CompressionAlgorithm::Lz4)),
    );

    backend.set("k", Bytes::from_static(b"v"), None).await.unwrap();
    backend.memory().clear().await.unwrap();
    assert!(backend.memory().is_empty());

    assert_eq!(backend.get("k").await.unwrap(), Some(Bytes::from_static(b"v")));
    // the remote hit was promoted into the hot tier
    assert_eq!(backend.memory().len(), 1);

    store.set_offline(true);
    assert_eq!(backend.get("k").await.unwrap(), Some(Bytes::from_static(b"v")));
}

#[tokio::test]
async fn test_hybrid_delete_and_clear_both_tiers() {
    let store = Arc::new(FakeRemoteStore::default());
    let backend = hybrid(&store, None);

    backend.set("a", Bytes::from_static(b"1"), None).await.unwrap();
    backend.set("b", Bytes::from_static(b"2"), None).await.unwrap();
    assert_eq!(store.len(), 2);

    backend.delete("a").await.unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(backend.get("a").await.unwrap(), None);

    backend.clear().await.unwrap();
    assert_eq!(store.len(), 0);
    assert_eq!(backend.get("b").await.unwrap(), None);
}

#[tokio::test]
async fn test_hybrid_delete_reports_remote_failure() {
    let store = Arc::new(FakeRemoteStore::default());
    let backend = HybridBackend::new(
        MemoryBackend::new(16, None),
        RemoteBackend::new(store.clone(), None),
    );
    backend.set("k", Bytes::from_static(b"v"), None).await.unwrap();

    store.set_offline(true);
    assert!(backend.delete("k").await.is_err());
    // the memory tier was still cleared
    assert!(backend.memory().is_empty());
}

#[test]
fn test_from_config_memory() {
    let config = CacheConfig::default();
    let backend = CacheBackend::from_config(&config, 1, None).unwrap();
    assert_eq!(backend.kind(), BackendKind::Memory);
}

#[test]
fn test_from_config_remote_requires_url() {
    let config = CacheConfig {
        cache_backend: BackendKind::Hybrid,
        remote_url: None,
        ..Default::default()
    };
    let err = CacheBackend::from_config(&config, 1, None).unwrap_err();
    assert!(matches!(err, CacheError::Config(_)));
}

#[cfg(feature = "redis")]
#[test]
fn test_from_config_remote_connects_lazily() {
    let config = CacheConfig {
        cache_backend: BackendKind::Remote,
        remote_url: Some("redis://127.0.0.1:1/0".to_string()),
        ..Default::default()
    };
    let backend = CacheBackend::from_config(&config, 1, None).unwrap();
    assert_eq!(backend.kind(), BackendKind::Remote);
}
