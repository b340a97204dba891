//! Retrieval collaborator

use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;

/// Vector search over the document index
///
/// `P` is whatever payload the pipeline hands to answer synthesis
/// (document chunks, scores, ...); it is cached as-is by the result cache.
#[async_trait]
pub trait Retriever<P>: Send + Sync
where
    P: Send + 'static,
{
    async fn retrieve(&self, embedding: Vec<f32>) -> Result<P>;
}

#[async_trait]
impl<F, Fut, P> Retriever<P> for F
where
    F: Fn(Vec<f32>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<P>> + Send + 'static,
    P: Send + 'static,
{
    async fn retrieve(&self, embedding: Vec<f32>) -> Result<P> {
        self(embedding).await
    }
}
