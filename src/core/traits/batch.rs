//! Batch function collaborator

use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;

/// Function processing a whole batch of items at once
///
/// Must return exactly one result per item, in item order.
#[async_trait]
pub trait BatchHandler<T, R>: Send + Sync
where
    T: Send + 'static,
    R: Send + 'static,
{
    async fn process_batch(&self, items: Vec<T>) -> Result<Vec<R>>;
}

#[async_trait]
impl<F, Fut, T, R> BatchHandler<T, R> for F
where
    F: Fn(Vec<T>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<R>>> + Send + 'static,
    T: Send + 'static,
    R: Send + 'static,
{
    async fn process_batch(&self, items: Vec<T>) -> Result<Vec<R>> {
        self(items).await
    }
}
