//! Deadline-bounded request coalescing

use super::types::{BatchConfig, BatchRequest};
use crate::core::traits::BatchHandler;
use crate::utils::error::{CacheError, Result};
use futures::FutureExt;
use parking_lot::Mutex;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// One generation of the accumulation loop and the queue feeding it.
///
/// The loop task owns the receiver, so aborting it closes the queue: queued
/// requests are dropped and blocked senders fail.
struct Worker<T, R> {
    sender: mpsc::Sender<BatchRequest<T, R>>,
    handle: JoinHandle<()>,
}

/// Coalesces concurrent single-item calls into calls of a batch function
///
/// A batch closes when it reaches `batch_size` items or when `timeout` has
/// elapsed since its first item, whichever comes first. Later arrivals never
/// extend a batch past that deadline.
pub struct BatchProcessor<T, R>
where
    T: Send + 'static,
    R: Send + 'static,
{
    handler: Arc<dyn BatchHandler<T, R>>,
    config: BatchConfig,
    worker: Mutex<Option<Worker<T, R>>>,
}

impl<T, R> BatchProcessor<T, R>
where
    T: Send + 'static,
    R: Send + 'static,
{
    /// Create a stopped processor; the loop starts on first use
    pub fn new<H>(handler: H, config: BatchConfig) -> Self
    where
        H: BatchHandler<T, R> + 'static,
    {
        let config = BatchConfig {
            batch_size: config.batch_size.max(1),
            queue_max_size: config.queue_max_size.max(1),
            ..config
        };
        info!(
            "Creating batch processor: size {}, timeout {:?}, queue {}",
            config.batch_size, config.timeout, config.queue_max_size
        );

        Self {
            handler: Arc::new(handler),
            config,
            worker: Mutex::new(None),
        }
    }

    /// Start the accumulation loop if it is not already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) {
        self.running_sender();
    }

    /// Sender of the live loop generation, spawning a new one if needed
    fn running_sender(&self) -> mpsc::Sender<BatchRequest<T, R>> {
        let mut worker = self.worker.lock();
        if let Some(current) = worker.as_ref().filter(|w| !w.handle.is_finished()) {
            return current.sender.clone();
        }

        debug!("Starting batch accumulation loop");
        let (sender, receiver) = mpsc::channel(self.config.queue_max_size);
        let handle = tokio::spawn(accumulate(
            receiver,
            self.handler.clone(),
            self.config.clone(),
        ));
        *worker = Some(Worker {
            sender: sender.clone(),
            handle,
        });
        sender
    }

    /// Cancel the loop and wait for it to exit.
    ///
    /// Callers whose items were queued, in flight, or still waiting for
    /// queue space resolve with [`CacheError::BatchCancelled`].
    pub async fn stop(&self) {
        let worker = self.worker.lock().take();
        if let Some(Worker { sender, handle }) = worker {
            drop(sender);
            handle.abort();
            let _ = handle.await;
            debug!("Batch accumulation loop stopped");
        }
    }

    /// Submit one item and wait for its result
    pub async fn process(&self, item: T) -> Result<R> {
        let sender = self.running_sender();

        let (slot, result) = oneshot::channel();
        sender
            .send(BatchRequest { item, slot })
            .await
            .map_err(|_| CacheError::BatchCancelled)?;

        result.await.map_err(|_| CacheError::BatchCancelled)?
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .as_ref()
            .is_some_and(|w| !w.handle.is_finished())
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }
}

impl<T, R> Drop for BatchProcessor<T, R>
where
    T: Send + 'static,
    R: Send + 'static,
{
    fn drop(&mut self) {
        if let Some(worker) = self.worker.get_mut().take() {
            worker.handle.abort();
        }
    }
}

impl<T, R> std::fmt::Debug for BatchProcessor<T, R>
where
    T: Send + 'static,
    R: Send + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchProcessor")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .finish()
    }
}

async fn accumulate<T, R>(
    mut receiver: mpsc::Receiver<BatchRequest<T, R>>,
    handler: Arc<dyn BatchHandler<T, R>>,
    config: BatchConfig,
) where
    T: Send + 'static,
    R: Send + 'static,
{
    while let Some(first) = receiver.recv().await {
        let deadline = Instant::now() + config.timeout;
        let mut batch = vec![first];

        while batch.len() < config.batch_size && Instant::now() < deadline {
            match tokio::time::timeout_at(deadline, receiver.recv()).await {
                Ok(Some(request)) => batch.push(request),
                Ok(None) | Err(_) => break,
            }
        }

        dispatch(handler.as_ref(), batch).await;
    }
}

async fn dispatch<T, R>(handler: &dyn BatchHandler<T, R>, batch: Vec<BatchRequest<T, R>>)
where
    T: Send + 'static,
    R: Send + 'static,
{
    let (items, slots): (Vec<T>, Vec<_>) = batch
        .into_iter()
        .map(|request| (request.item, request.slot))
        .unzip();
    debug!("Dispatching batch of {} items", items.len());

    let outcome = AssertUnwindSafe(handler.process_batch(items))
        .catch_unwind()
        .await;

    let results = match outcome {
        Ok(Ok(results)) => results,
        Ok(Err(e)) => return fail_all(slots, &e.to_string()),
        Err(_) => return fail_all(slots, "batch function panicked"),
    };

    if results.len() != slots.len() {
        warn!(
            "Batch function returned {} results for {} items",
            results.len(),
            slots.len()
        );
    }

    let returned = results.len();
    let expected = slots.len();
    let mut results = results.into_iter();
    for slot in slots {
        let outcome = results.next().ok_or_else(|| {
            CacheError::batch(format!(
                "Batch function returned {} results for {} items",
                returned, expected
            ))
        });
        // the caller may have given up waiting
        let _ = slot.send(outcome);
    }
}

fn fail_all<R>(slots: Vec<oneshot::Sender<Result<R>>>, message: &str) {
    warn!("Batch of {} items failed: {}", slots.len(), message);
    for slot in slots {
        let _ = slot.send(Err(CacheError::batch(message)));
    }
}
