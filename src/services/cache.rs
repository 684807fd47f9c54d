// src/services/cache.rs
// DOCUMENTATION: In-memory cache for downloaded image data
// PURPOSE: Avoid downloading the same icon, symbol or image twice within its TTL

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Cached payload and its deadline
#[derive(Clone, Debug)]
struct CachedBytes {
    bytes: Vec<u8>,
    expires_at: Instant,
}

impl CachedBytes {
    fn new(bytes: Vec<u8>, ttl: Duration) -> Self {
        Self {
            bytes,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Image data cache with TTL
/// DOCUMENTATION: Keyed by the source URL; safe to share between tasks
pub struct DataCache {
    entries: Arc<RwLock<HashMap<String, CachedBytes>>>,
    default_ttl: Duration,
}

impl DataCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            default_ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Cache key of a download URL
    /// Fragments never reach the server, so they are not part of the key.
    pub fn key_for(url: &Url) -> String {
        let mut url = url.clone();
        url.set_fragment(None);
        url.to_string()
    }

    /// Bytes stored under `key`, unless missing or expired
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let entries = self.entries.read().await;

        match entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                log::debug!("Image cache hit: {}", key);
                Some(entry.bytes.clone())
            }
            Some(_) => {
                log::debug!("Image cache entry expired: {}", key);
                None
            }
            None => {
                log::debug!("Image cache miss: {}", key);
                None
            }
        }
    }

    pub async fn set(&self, key: String, bytes: Vec<u8>) {
        self.set_with_ttl(key, bytes, self.default_ttl).await;
    }

    pub async fn set_with_ttl(&self, key: String, bytes: Vec<u8>, ttl: Duration) {
        let size = bytes.len();
        let mut entries = self.entries.write().await;
        entries.insert(key.clone(), CachedBytes::new(bytes, ttl));
        log::debug!(
            "Image cache stored {} bytes for {} (ttl {}s)",
            size,
            key,
            ttl.as_secs()
        );
    }

    /// Drop expired entries
    pub async fn cleanup(&self) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        let removed = before - entries.len();

        if removed > 0 {
            log::info!(
                "Image cache cleanup: removed {} expired entries ({} remaining)",
                removed,
                entries.len()
            );
        }
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.read().await;
        let total = entries.len();
        let expired = entries.values().filter(|e| e.is_expired()).count();
        let cached_bytes = entries
            .values()
            .filter(|e| !e.is_expired())
            .map(|e| e.bytes.len())
            .sum();

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
            cached_bytes,
        }
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        log::info!("Image cache cleared: {} entries removed", count);
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
    /// Bytes held by entries that have not expired
    pub cached_bytes: usize,
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired entries until the handle is aborted
pub fn start_cleanup_task(cache: Arc<DataCache>, interval_seconds: u64) -> JoinHandle<()> {
    let period = Duration::from_secs(interval_seconds.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    })
}
