//! Cache manager implementation
//!
//! Runs one request through the cache layers in order (query, embedding,
//! result) and falls through to the caller's compute function.

use super::metrics::CacheMetrics;
use super::types::{CacheLayer, ComputeInput, Resolvers, SavingsEstimates};
use crate::config::{CacheConfig, KeyStrategy};
use crate::core::layers::{EmbeddingCache, QueryCache, ResultCache};
use crate::core::semantic_cache::SemanticMatcher;
use crate::core::traits::{BatchEmbedder, EmbeddingProvider};
use crate::utils::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Multi-level cache manager
#[derive(Debug)]
pub struct CacheManager {
    config: Arc<CacheConfig>,
    metrics: CacheMetrics,
    semantic_matcher: Option<Arc<SemanticMatcher>>,
    query_cache: Option<QueryCache>,
    embedding_cache: Option<EmbeddingCache>,
    result_cache: Option<ResultCache>,
}

impl CacheManager {
    /// Build the enabled layers from `config`.
    ///
    /// The semantic matcher exists only when an embedder is given and the
    /// key strategy is semantic.
    pub fn new(config: CacheConfig, embedder: Option<Arc<dyn BatchEmbedder>>) -> Result<Self> {
        let config = Arc::new(config);

        let semantic_matcher = match (config.cache_key_strategy, embedder) {
            (KeyStrategy::Semantic, Some(embedder)) => Some(Arc::new(SemanticMatcher::new(
                embedder,
                config.semantic_cache_threshold,
                config.semantic_max_entries,
            ))),
            _ => None,
        };

        let query_cache = if config.query_cache_enabled {
            Some(QueryCache::from_config(
                config.clone(),
                semantic_matcher.clone(),
            )?)
        } else {
            None
        };
        let embedding_cache = if config.embedding_cache_enabled {
            Some(EmbeddingCache::from_config(config.clone())?)
        } else {
            None
        };
        let result_cache = if config.result_cache_enabled {
            Some(ResultCache::from_config(config.clone())?)
        } else {
            None
        };

        info!(
            "Cache manager ready: query={} ({}), embedding={}, result={}, backend={}",
            query_cache.is_some(),
            config.cache_key_strategy,
            embedding_cache.is_some(),
            result_cache.is_some(),
            config.cache_backend
        );

        Ok(Self {
            config,
            metrics: CacheMetrics::new(),
            semantic_matcher,
            query_cache,
            embedding_cache,
            result_cache,
        })
    }

    /// Resolve `query` through the cache layers, computing what is missing.
    ///
    /// A query-cache hit returns immediately. Otherwise the embedding is
    /// resolved when an embedder is given, the retrieval result when a
    /// retriever, an embedding and a result cache are all available, and
    /// `compute_fn` receives whatever was resolved. Its response is stored in
    /// the query cache.
    pub async fn get_or_compute<R, P, F, Fut>(
        &self,
        query: &str,
        compute_fn: F,
        resolvers: Resolvers<'_, P>,
    ) -> Result<R>
    where
        R: Serialize + DeserializeOwned,
        P: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce(ComputeInput<P>) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let default_estimates = SavingsEstimates::default();
        let estimates = resolvers.estimates.unwrap_or(&default_estimates);

        if let Some(cache) = &self.query_cache {
            if let Some(cached) = cache.get::<R>(query).await? {
                debug!("{} hit", CacheLayer::Query);
                self.record_hit(CacheLayer::Query, estimates);
                return Ok(cached);
            }
            debug!("{} miss", CacheLayer::Query);
            self.metrics.record_miss(CacheLayer::Query);
        }

        let embedding = match resolvers.embedder {
            Some(embedder) => Some(self.resolve_embedding(query, embedder, estimates).await?),
            None => None,
        };

        let mut result = None;
        if let (Some(retriever), Some(embedding), Some(cache)) =
            (resolvers.retriever, &embedding, &self.result_cache)
        {
            if let Some(cached) = cache.get::<P>(embedding).await? {
                debug!("{} hit", CacheLayer::Result);
                self.record_hit(CacheLayer::Result, estimates);
                result = Some(cached);
            } else {
                debug!("{} miss", CacheLayer::Result);
                self.metrics.record_miss(CacheLayer::Result);
                let retrieved = retriever.retrieve(embedding.clone()).await?;
                cache.set(embedding, &retrieved).await?;
                result = Some(retrieved);
            }
        }

        let response = compute_fn(ComputeInput {
            query: query.to_string(),
            embedding,
            result,
        })
        .await?;

        if let Some(cache) = &self.query_cache {
            cache.set(query, &response).await?;
        }
        Ok(response)
    }

    /// Run every configured warm-up query through [`get_or_compute`](Self::get_or_compute).
    ///
    /// A failing query is logged and skipped. Returns how many queries were
    /// cached; zero when warm-up is disabled.
    pub async fn warmup<R, F, Fut>(&self, compute_fn: F) -> Result<usize>
    where
        R: Serialize + DeserializeOwned,
        F: Fn(ComputeInput) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        if !self.config.warmup_enabled {
            return Ok(0);
        }

        let mut warmed = 0;
        for query in &self.config.warmup_queries {
            match self
                .get_or_compute(query, &compute_fn, Resolvers::<serde_json::Value>::default())
                .await
            {
                Ok(_) => warmed += 1,
                Err(e) => warn!("Warm-up query {:?} failed: {}", query, e),
            }
        }
        info!(
            "Warmed cache with {} of {} queries",
            warmed,
            self.config.warmup_queries.len()
        );
        Ok(warmed)
    }

    /// Clear every enabled layer and the semantic matcher
    pub async fn clear_all(&self) -> Result<()> {
        if let Some(cache) = &self.query_cache {
            cache.clear().await?;
        }
        if let Some(cache) = &self.embedding_cache {
            cache.clear().await?;
        }
        if let Some(cache) = &self.result_cache {
            cache.clear().await?;
        }
        info!("All cache layers cleared");
        Ok(())
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn query_cache(&self) -> Option<&QueryCache> {
        self.query_cache.as_ref()
    }

    pub fn embedding_cache(&self) -> Option<&EmbeddingCache> {
        self.embedding_cache.as_ref()
    }

    pub fn result_cache(&self) -> Option<&ResultCache> {
        self.result_cache.as_ref()
    }

    pub fn semantic_matcher(&self) -> Option<&SemanticMatcher> {
        self.semantic_matcher.as_deref()
    }

    async fn resolve_embedding(
        &self,
        query: &str,
        embedder: &dyn EmbeddingProvider,
        estimates: &SavingsEstimates,
    ) -> Result<Vec<f32>> {
        if let Some(cache) = &self.embedding_cache {
            if let Some(cached) = cache.get(query).await? {
                debug!("{} hit", CacheLayer::Embedding);
                self.record_hit(CacheLayer::Embedding, estimates);
                return Ok(cached);
            }
            debug!("{} miss", CacheLayer::Embedding);
            self.metrics.record_miss(CacheLayer::Embedding);
        }

        let embedding = embedder.embed(query).await?;
        if let Some(cache) = &self.embedding_cache {
            cache.set(query, &embedding).await?;
        }
        Ok(embedding)
    }

    fn record_hit(&self, layer: CacheLayer, estimates: &SavingsEstimates) {
        self.metrics
            .record_hit(layer, estimates.latency(layer), estimates.cost(layer));
    }
}
