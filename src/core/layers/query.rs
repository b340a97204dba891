//! Query (final answer) cache

use super::keys::{hash_key, namespaced, normalize_query};
use crate::config::{CacheConfig, KeyStrategy};
use crate::core::semantic_cache::SemanticMatcher;
use crate::storage::CacheBackend;
use crate::utils::error::Result;
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

const NAMESPACE: &str = "query";

/// Final responses keyed by the configured [`KeyStrategy`]
///
/// With the semantic strategy and a matcher, a lookup may resolve to the
/// key of a different but similar query stored earlier.
#[derive(Debug)]
pub struct QueryCache {
    config: Arc<CacheConfig>,
    backend: CacheBackend,
    matcher: Option<Arc<SemanticMatcher>>,
}

impl QueryCache {
    pub fn new(
        config: Arc<CacheConfig>,
        backend: CacheBackend,
        matcher: Option<Arc<SemanticMatcher>>,
    ) -> Self {
        Self {
            config,
            backend,
            matcher,
        }
    }

    pub fn from_config(
        config: Arc<CacheConfig>,
        matcher: Option<Arc<SemanticMatcher>>,
    ) -> Result<Self> {
        let backend =
            CacheBackend::from_config(&config, config.query_cache_size_mb, config.query_ttl())?;
        Ok(Self::new(config, backend, matcher))
    }

    pub async fn get<V: DeserializeOwned>(&self, query: &str) -> Result<Option<V>> {
        let key = self.resolve_key(query).await;
        match self.backend.get(&key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Store `value` under the query's own key and register it for semantic lookup
    pub async fn set<V: Serialize + ?Sized>(&self, query: &str, value: &V) -> Result<()> {
        let key = self.storage_key(query);
        let ttl = self.config.query_ttl();
        let payload = Bytes::from(serde_json::to_vec(value)?);
        self.backend.set(&key, payload, ttl).await?;

        if let Some(matcher) = self.semantic_matcher() {
            matcher.add(&key, query, ttl).await;
        }
        Ok(())
    }

    pub async fn delete(&self, query: &str) -> Result<()> {
        let key = self.storage_key(query);
        if let Some(matcher) = self.semantic_matcher() {
            matcher.remove(&key);
        }
        self.backend.delete(&key).await
    }

    pub async fn clear(&self) -> Result<()> {
        if let Some(matcher) = &self.matcher {
            matcher.clear();
        }
        self.backend.clear().await
    }

    /// Key a lookup for `query` resolves to
    pub async fn resolve_key(&self, query: &str) -> String {
        if let Some(matcher) = self.semantic_matcher() {
            if let Some(key) = matcher.find(query).await {
                debug!("Query resolved through semantic match");
                return key;
            }
        }
        self.storage_key(query)
    }

    /// Key `query` is stored under, independent of any semantic match
    pub fn storage_key(&self, query: &str) -> String {
        let digest = match self.config.cache_key_strategy {
            KeyStrategy::Exact => hash_key(query),
            KeyStrategy::Fuzzy | KeyStrategy::Semantic => hash_key(&normalize_query(query)),
        };
        namespaced(NAMESPACE, &digest)
    }

    pub fn strategy(&self) -> KeyStrategy {
        self.config.cache_key_strategy
    }

    pub fn backend(&self) -> &CacheBackend {
        &self.backend
    }

    fn semantic_matcher(&self) -> Option<&SemanticMatcher> {
        match self.config.cache_key_strategy {
            KeyStrategy::Semantic => self.matcher.as_deref(),
            _ => None,
        }
    }
}
