//! Types for the batch processor

use crate::config::CacheConfig;
use crate::utils::error::Result;
use std::time::Duration;
use tokio::sync::oneshot;

/// Batch accumulation limits
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Largest number of items handed to the batch function at once
    pub batch_size: usize,
    /// How long a batch stays open after its first item arrives
    pub timeout: Duration,
    /// Pending requests accepted before callers wait for queue space
    pub queue_max_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for BatchConfig {
    fn from(config: &CacheConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            timeout: config.batch_timeout(),
            queue_max_size: config.queue_max_size,
        }
    }
}

impl BatchConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_queue_max_size(mut self, queue_max_size: usize) -> Self {
        self.queue_max_size = queue_max_size;
        self
    }
}

/// One queued call: the input and the slot its caller is waiting on
///
/// Dropping the request without sending resolves the caller with a cancellation.
#[derive(Debug)]
pub struct BatchRequest<T, R> {
    pub item: T,
    pub slot: oneshot::Sender<Result<R>>,
}
