//! In-memory TTL cache.
//!
//! Entries expire a fixed duration after insertion. There is no size bound and
//! no single-flight: concurrent misses on the same key each run the underlying
//! operation and the last writer wins.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Shared handle to a key/value store with expiry. Cloning shares the store.
pub struct TtlCache<K, V> {
    inner: Arc<Mutex<HashMap<K, CacheEntry<V>>>>,
    ttl: Duration,
    name: &'static str,
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            ttl: self.ttl,
            name: self.name,
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            name,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Look up a live entry. Expired entries are removed on access.
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock().await;
        match inner.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                inner.remove(key);
                None
            }
            None => None,
        }
    }

    pub async fn insert(&self, key: K, value: V) {
        let mut inner = self.inner.lock().await;
        inner.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop every entry.
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        let dropped = inner.len();
        inner.clear();
        debug!(cache = self.name, dropped, "cache reset");
    }

    /// Remove expired entries, returning how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let mut inner = self.inner.lock().await;
        let before = inner.len();
        inner.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        before - inner.len()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Memoize `op` under `key`. Only successful results are stored.
pub async fn cached<K, V, E, F, Fut>(cache: &TtlCache<K, V>, key: K, op: F) -> Result<V, E>
where
    K: Eq + Hash,
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    if let Some(hit) = cache.get(&key).await {
        debug!(cache = cache.name(), "cache hit");
        return Ok(hit);
    }
    debug!(cache = cache.name(), "cache miss");

    let value = op().await?;
    cache.insert(key, value.clone()).await;
    Ok(value)
}
