//! Error handling for the cache engine
//!
//! This module defines the error type shared by every cache layer, backend and
//! the batch processor.

mod helpers;
mod types;

pub use types::{CacheError, Result};
