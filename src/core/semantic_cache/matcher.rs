//! Embedding-similarity index behind the semantic key strategy

use super::types::SemanticEntry;
use super::utils::cosine_similarity;
use crate::core::traits::BatchEmbedder;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Maps previously seen queries, by embedding, to the cache key they were stored under
pub struct SemanticMatcher {
    embedder: Arc<dyn BatchEmbedder>,
    threshold: f64,
    max_entries: Option<usize>,
    /// Insertion-ordered; ties during lookup resolve to the earliest entry
    entries: Mutex<Vec<(String, SemanticEntry)>>,
}

impl SemanticMatcher {
    /// Create a matcher; `max_entries` bounds the index, dropping the oldest entries first
    pub fn new(
        embedder: Arc<dyn BatchEmbedder>,
        threshold: f64,
        max_entries: Option<usize>,
    ) -> Self {
        info!(
            "Initializing semantic matcher with threshold: {}, capacity: {:?}",
            threshold, max_entries
        );
        Self {
            embedder,
            threshold,
            max_entries,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Find the key of the most similar live entry, if it clears the threshold.
    ///
    /// Expired entries are purged first. Embedding failures count as no match.
    pub async fn find(&self, query: &str) -> Option<String> {
        let embedding = self.embed(query).await?;

        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|(_, entry)| !entry.is_expired(now));

        let mut best: Option<(&str, f64)> = None;
        for (key, entry) in entries.iter() {
            let score = cosine_similarity(&embedding, &entry.embedding);
            if score > best.map_or(0.0, |(_, s)| s) {
                best = Some((key, score));
            }
        }

        match best {
            Some((key, score)) if score >= self.threshold => {
                debug!("Semantic match with similarity {:.3}", score);
                Some(key.to_string())
            }
            _ => None,
        }
    }

    /// Register `query` as resolving to `key`; a missing or zero TTL never expires
    pub async fn add(&self, key: &str, query: &str, ttl: Option<Duration>) {
        let Some(embedding) = self.embed(query).await else {
            return;
        };
        let entry = SemanticEntry {
            embedding,
            expires_at: ttl.filter(|t| !t.is_zero()).map(|t| Instant::now() + t),
        };

        let mut entries = self.entries.lock();
        if let Some(slot) = entries.iter_mut().find(|(k, _)| k == key) {
            slot.1 = entry;
            return;
        }
        entries.push((key.to_string(), entry));

        if let Some(max) = self.max_entries {
            let excess = entries.len().saturating_sub(max.max(1));
            if excess > 0 {
                entries.drain(..excess);
                debug!("Semantic matcher dropped {} oldest entries", excess);
            }
        }
    }

    /// Forget the entry stored under `key`
    pub fn remove(&self, key: &str) {
        self.entries.lock().retain(|(k, _)| k != key);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    async fn embed(&self, query: &str) -> Option<Vec<f32>> {
        match self.embedder.embed_batch(vec![query.to_string()]).await {
            Ok(vectors) => vectors.into_iter().next().filter(|v| !v.is_empty()),
            Err(e) => {
                warn!("Failed to embed query for semantic matching: {}", e);
                None
            }
        }
    }
}

impl std::fmt::Debug for SemanticMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticMatcher")
            .field("threshold", &self.threshold)
            .field("max_entries", &self.max_entries)
            .field("entries", &self.len())
            .finish()
    }
}
