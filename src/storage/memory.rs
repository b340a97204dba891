//! In-memory LRU backend with per-entry expiry

use crate::utils::error::Result;
use bytes::Bytes;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: Bytes,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Bounded least-recently-used map
///
/// Every operation runs inside one short critical section so the recency
/// order is never observed half-updated.
#[derive(Debug)]
pub struct MemoryBackend {
    store: Mutex<LruCache<String, MemoryEntry>>,
    /// Applied when `set` is called without an explicit TTL
    default_ttl: Option<Duration>,
}

impl MemoryBackend {
    /// Create a backend holding at most `max_items` entries (minimum 1)
    pub fn new(max_items: usize, default_ttl: Option<Duration>) -> Self {
        let capacity = NonZeroUsize::new(max_items).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Mutex::new(LruCache::new(capacity)),
            default_ttl: default_ttl.filter(|ttl| !ttl.is_zero()),
        }
    }

    /// Get a value and mark it most recently used; expired entries are purged
    pub async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let mut store = self.store.lock();
        match store.get(key) {
            None => return Ok(None),
            Some(entry) if !entry.is_expired(Instant::now()) => {
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => {}
        }
        store.pop(key);
        Ok(None)
    }

    /// Insert or overwrite a value, evicting least recently used entries past capacity.
    ///
    /// `None` falls back to the backend's default TTL; a zero TTL never expires.
    pub async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> Result<()> {
        let expires_at = ttl
            .or(self.default_ttl)
            .filter(|ttl| !ttl.is_zero())
            .map(|ttl| Instant::now() + ttl);

        self.store
            .lock()
            .put(key.to_string(), MemoryEntry { value, expires_at });
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        self.store.lock().pop(key);
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.lock().clear();
        Ok(())
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.store.lock().cap().get()
    }
}
