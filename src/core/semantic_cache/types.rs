//! Type definitions for semantic matching

use std::time::Instant;

/// Embedding of a query that was stored under a cache key
#[derive(Debug, Clone)]
pub struct SemanticEntry {
    pub embedding: Vec<f32>,
    pub expires_at: Option<Instant>,
}

impl SemanticEntry {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at < now)
    }
}
