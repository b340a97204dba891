//! Batch processing
//!
//! [`BatchProcessor`] merges concurrent calls to an expensive, batch-capable
//! function (embedding many texts, scoring many documents) into fewer calls.

mod processor;
mod types;


pub use processor::BatchProcessor;
pub use types::{BatchConfig, BatchRequest};
