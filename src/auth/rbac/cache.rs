//! Process-local cache of permission check results
//!
//! Entries expire after the configured TTL; there is no push invalidation on
//! role changes, so a revoked grant may keep answering `true` until expiry.

use crate::config::PermissionCacheConfig;
use crate::core::models::UserId;
use crate::utils::error::{Result, RollcallError};
use moka::future::Cache;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tracing::debug;

use super::types::{AtomicCacheStats, CacheStats, PermissionCacheKey};

/// Bounded, TTL-limited permission cache; a disabled cache stores nothing
#[derive(Clone)]
pub struct PermissionCache {
    inner: Option<Cache<PermissionCacheKey, bool>>,
    stats: Arc<AtomicCacheStats>,
}

impl std::fmt::Debug for PermissionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionCache")
            .field("enabled", &self.is_enabled())
            .field("stats", &self.stats)
            .finish()
    }
}

impl PermissionCache {
    pub fn new(config: &PermissionCacheConfig) -> Self {
        let inner = config.enabled.then(|| {
            Cache::builder()
                .max_capacity(config.max_entries)
                .time_to_live(config.ttl())
                .support_invalidation_closures()
                .build()
        });

        Self {
            inner,
            stats: Arc::new(AtomicCacheStats::default()),
        }
    }

    /// Cache that never stores anything
    pub fn disabled() -> Self {
        Self {
            inner: None,
            stats: Arc::new(AtomicCacheStats::default()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    pub async fn get(&self, key: &PermissionCacheKey) -> Option<bool> {
        let cache = self.inner.as_ref()?;
        let hit = cache.get(key).await;
        let counter = if hit.is_some() {
            &self.stats.hits
        } else {
            &self.stats.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        hit
    }

    pub async fn insert(&self, key: PermissionCacheKey, granted: bool) {
        if let Some(cache) = &self.inner {
            cache.insert(key, granted).await;
        }
    }

    /// Drop every cached answer for one user
    pub fn invalidate_user(&self, user_id: UserId) -> Result<()> {
        let Some(cache) = &self.inner else {
            return Ok(());
        };
        debug!("Invalidating cached permissions of user {}", user_id);
        cache
            .invalidate_entries_if(move |key, _| key.user_id == user_id)
            .map(|_| ())
            .map_err(|e| {
                RollcallError::internal(format!("Permission cache invalidation failed: {}", e))
            })
    }

    pub fn clear(&self) {
        if let Some(cache) = &self.inner {
            debug!("Clearing permission cache");
            cache.invalidate_all();
        }
    }

    /// Apply pending evictions and invalidations now
    pub async fn sync(&self) {
        if let Some(cache) = &self.inner {
            cache.run_pending_tasks().await;
        }
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.inner.as_ref().map_or(0, |cache| cache.entry_count());
        self.stats.snapshot(entries)
    }
}
