//! Cache manager type definitions

use crate::core::traits::{EmbeddingProvider, Retriever};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Named cache layer, as reported in metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CacheLayer {
    #[serde(rename = "query_cache")]
    Query,
    #[serde(rename = "embedding_cache")]
    Embedding,
    #[serde(rename = "result_cache")]
    Result,
}

impl CacheLayer {
    pub const ALL: [CacheLayer; 3] = [CacheLayer::Query, CacheLayer::Embedding, CacheLayer::Result];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheLayer::Query => "query_cache",
            CacheLayer::Embedding => "embedding_cache",
            CacheLayer::Result => "result_cache",
        }
    }
}

impl fmt::Display for CacheLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the compute function may use to synthesize an answer
///
/// Always passed in full; fields the pipeline could not resolve are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeInput<P = serde_json::Value> {
    pub query: String,
    pub embedding: Option<Vec<f32>>,
    /// Retrieval payload, present only when it went through the result cache
    pub result: Option<P>,
}

/// Optional embed and retrieve functions for one `get_or_compute` call
pub struct Resolvers<'a, P = serde_json::Value>
where
    P: Send + 'static,
{
    pub embedder: Option<&'a dyn EmbeddingProvider>,
    pub retriever: Option<&'a dyn Retriever<P>>,
    pub estimates: Option<&'a SavingsEstimates>,
}

impl<'a, P> Resolvers<'a, P>
where
    P: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            embedder: None,
            retriever: None,
            estimates: None,
        }
    }

    pub fn with_embedder<E: EmbeddingProvider>(mut self, embedder: &'a E) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn with_retriever<T: Retriever<P>>(mut self, retriever: &'a T) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Credit hits with the given latency/cost savings
    pub fn with_estimates(mut self, estimates: &'a SavingsEstimates) -> Self {
        self.estimates = Some(estimates);
        self
    }
}

impl<P> Default for Resolvers<'_, P>
where
    P: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Caller-supplied estimates of what one hit on each layer saves
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavingsEstimates {
    #[serde(default)]
    pub latency_ms: HashMap<CacheLayer, f64>,
    #[serde(default)]
    pub cost: HashMap<CacheLayer, f64>,
}

impl SavingsEstimates {
    pub fn with_latency(mut self, layer: CacheLayer, ms: f64) -> Self {
        self.latency_ms.insert(layer, ms);
        self
    }

    pub fn with_cost(mut self, layer: CacheLayer, cost: f64) -> Self {
        self.cost.insert(layer, cost);
        self
    }

    pub fn latency(&self, layer: CacheLayer) -> f64 {
        self.latency_ms.get(&layer).copied().unwrap_or(0.0)
    }

    pub fn cost(&self, layer: CacheLayer) -> f64 {
        self.cost.get(&layer).copied().unwrap_or(0.0)
    }
}

/// Counters for one layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerStats {
    pub hits: u64,
    pub misses: u64,
    pub latency_saved_ms: f64,
    pub cost_saved: f64,
}

impl LayerStats {
    /// hits / (hits + misses), 0 without observations
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Point-in-time copy of all metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub layers: BTreeMap<CacheLayer, LayerStats>,
    pub latency_saved_total_ms: f64,
    pub cost_saved_total: f64,
}
