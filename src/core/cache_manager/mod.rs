//! Multi-level cache management
//!
//! [`CacheManager`] owns the query, embedding and result caches, decides
//! which layers a request goes through, and keeps [`CacheMetrics`].

mod manager;
mod metrics;
mod types;

#[cfg(test)]
mod tests;

pub use manager::CacheManager;
pub use metrics::CacheMetrics;
pub use types::{
    CacheLayer, ComputeInput, LayerStats, MetricsSnapshot, Resolvers, SavingsEstimates,
};
