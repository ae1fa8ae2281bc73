//! In-process export cache.
//!
//! Finished exports are kept under `exports/<user_id>/<entry_id>.pdf` with a
//! fixed time-to-live. The cache is best effort: callers log its errors and
//! carry on rendering.

use chrono::{DateTime, Duration, Utc};
use journal_pdf::PdfExport;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Default time-to-live for cached exports (one day).
pub const DEFAULT_TTL_SECS: i64 = 86_400;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Invalid cache key component: {0:?}")]
    InvalidKey(String),
}

/// A cached export together with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedExport {
    pub export: PdfExport,
    pub expires_at: DateTime<Utc>,
}

impl CachedExport {
    pub fn page_count(&self) -> usize {
        self.export.page_count
    }

    pub fn truncated(&self) -> bool {
        self.export.truncated
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Storage key for an entry's export.
pub fn export_key(user_id: &str, entry_id: &str) -> Result<String, CacheError> {
    for part in [user_id, entry_id] {
        if part.is_empty() || part == "." || part == ".." || part.contains(['/', '\\']) {
            return Err(CacheError::InvalidKey(part.to_string()));
        }
    }
    Ok(format!("exports/{user_id}/{entry_id}.pdf"))
}

/// Shared map of cached exports. Cloning shares the underlying storage.
#[derive(Debug, Clone)]
pub struct MemoryExportStore {
    entries: Arc<RwLock<HashMap<String, CachedExport>>>,
    ttl: Duration,
}

impl Default for MemoryExportStore {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}

impl MemoryExportStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get(
        &self,
        user_id: &str,
        entry_id: &str,
    ) -> Result<Option<CachedExport>, CacheError> {
        self.get_at(user_id, entry_id, Utc::now()).await
    }

    /// Looks up an export as of `now`. Expired entries are evicted and
    /// reported as misses.
    pub async fn get_at(
        &self,
        user_id: &str,
        entry_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<CachedExport>, CacheError> {
        let key = export_key(user_id, entry_id)?;

        {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                None => return Ok(None),
                Some(cached) if !cached.is_expired_at(now) => return Ok(Some(cached.clone())),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(&key).is_some_and(|cached| cached.is_expired_at(now)) {
            entries.remove(&key);
            debug!(key = %key, "evicted expired export");
        }
        Ok(None)
    }

    /// Stores an export, evicting every entry that has expired by now.
    pub async fn put(
        &self,
        user_id: &str,
        entry_id: &str,
        export: PdfExport,
    ) -> Result<CachedExport, CacheError> {
        self.put_at(user_id, entry_id, export, Utc::now()).await
    }

    pub async fn put_at(
        &self,
        user_id: &str,
        entry_id: &str,
        export: PdfExport,
        now: DateTime<Utc>,
    ) -> Result<CachedExport, CacheError> {
        let key = export_key(user_id, entry_id)?;
        let cached = CachedExport {
            export,
            expires_at: now + self.ttl,
        };
        debug!(
            key = %key,
            pages = cached.page_count(),
            truncated = cached.truncated(),
            expires_at = %cached.expires_at,
            "cached export"
        );
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, existing| !existing.is_expired_at(now));
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, "evicted expired exports");
        }
        entries.insert(key, cached.clone());
        Ok(cached)
    }

    /// Drops every entry expired as of `now`, returning how many were removed.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, cached| !cached.is_expired_at(now));
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
