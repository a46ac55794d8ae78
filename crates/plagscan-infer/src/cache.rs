//! LRU cache for document embeddings.
//!
//! Keyed by the SHA-256 of the text so whole documents do not sit in the
//! key set. Default: 1000 entries, 1-hour TTL.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use ndarray::Array1;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

struct CacheEntry {
    embedding: Array1<f32>,
    inserted_at: Instant,
}

/// Thread-safe LRU cache for embeddings.
pub struct EmbeddingCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    order: Vec<String>,
    max_size: usize,
    ttl: Duration,
}

impl CacheInner {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            let key = self.order.remove(pos);
            self.order.push(key);
        }
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.order.retain(|k| k != key);
    }
}

/// Cache key for a text.
pub fn text_key(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

impl EmbeddingCache {
    /// Create a new cache with the given capacity and TTL.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(max_size),
                order: Vec::with_capacity(max_size),
                max_size,
                ttl,
            }),
        }
    }

    /// Create a cache with default settings (1000 entries, 1hr TTL).
    pub fn default_cache() -> Self {
        Self::new(1000, Duration::from_secs(3600))
    }

    /// Get a cached embedding. Returns None on miss or expired entry.
    pub fn get(&self, text: &str) -> Option<Array1<f32>> {
        let key = text_key(text);
        let mut inner = self.inner.lock();

        let (embedding, expired) = match inner.entries.get(&key) {
            Some(entry) => (
                entry.embedding.clone(),
                entry.inserted_at.elapsed() >= inner.ttl,
            ),
            None => return None,
        };

        if expired {
            inner.remove(&key);
            return None;
        }
        inner.touch(&key);
        Some(embedding)
    }

    /// Insert an embedding into the cache.
    pub fn put(&self, text: &str, embedding: Array1<f32>) {
        let key = text_key(text);
        let mut inner = self.inner.lock();
        if inner.max_size == 0 {
            return;
        }

        let entry = CacheEntry {
            embedding,
            inserted_at: Instant::now(),
        };

        if inner.entries.contains_key(&key) {
            inner.entries.insert(key.clone(), entry);
            inner.touch(&key);
            return;
        }

        while inner.entries.len() >= inner.max_size && !inner.order.is_empty() {
            let oldest = inner.order.remove(0);
            inner.entries.remove(&oldest);
        }

        inner.order.push(key.clone());
        inner.entries.insert(key, entry);
    }

    /// Number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all entries.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}
