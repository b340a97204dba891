//! Hit/miss and savings accounting per cache layer

use super::types::{CacheLayer, LayerStats, MetricsSnapshot};
use dashmap::DashMap;

/// Running cache counters, safe to read while the manager updates them
#[derive(Debug, Default)]
pub struct CacheMetrics {
    layers: DashMap<CacheLayer, LayerStats>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a hit and credit the estimated savings
    pub fn record_hit(&self, layer: CacheLayer, latency_saved_ms: f64, cost_saved: f64) {
        let mut stats = self.layers.entry(layer).or_default();
        stats.hits += 1;
        stats.latency_saved_ms += latency_saved_ms;
        stats.cost_saved += cost_saved;
    }

    pub fn record_miss(&self, layer: CacheLayer) {
        self.layers.entry(layer).or_default().misses += 1;
    }

    pub fn hits(&self, layer: CacheLayer) -> u64 {
        self.layer(layer).hits
    }

    pub fn misses(&self, layer: CacheLayer) -> u64 {
        self.layer(layer).misses
    }

    pub fn hit_rate(&self, layer: CacheLayer) -> f64 {
        self.layer(layer).hit_rate()
    }

    /// Counters for one layer (all zero if it was never used)
    pub fn layer(&self, layer: CacheLayer) -> LayerStats {
        self.layers
            .get(&layer)
            .map(|stats| stats.value().clone())
            .unwrap_or_default()
    }

    pub fn latency_saved_total_ms(&self) -> f64 {
        self.layers.iter().map(|stats| stats.latency_saved_ms).sum()
    }

    pub fn cost_saved_total(&self) -> f64 {
        self.layers.iter().map(|stats| stats.cost_saved).sum()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let layers = self
            .layers
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        MetricsSnapshot {
            layers,
            latency_saved_total_ms: self.latency_saved_total_ms(),
            cost_saved_total: self.cost_saved_total(),
        }
    }

    pub fn reset(&self) {
        self.layers.clear();
    }
}
