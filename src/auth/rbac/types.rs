//! Permission cache types

use crate::core::models::{OfferingId, PermissionScopeRef, TeamId, UserId};
use std::sync::atomic::{AtomicU64, Ordering};

/// Cache key of one permission check
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionCacheKey {
    pub user_id: UserId,
    pub code: String,
    pub offering_id: Option<OfferingId>,
    pub team_id: Option<TeamId>,
}

impl PermissionCacheKey {
    pub fn new(user_id: UserId, code: &str, scope: PermissionScopeRef) -> Self {
        Self {
            user_id,
            code: code.to_string(),
            offering_id: scope.offering_id,
            team_id: scope.team_id,
        }
    }
}

/// Hit and miss counters (lock-free atomics for the hot path)
#[derive(Debug, Default)]
pub(super) struct AtomicCacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
}

impl AtomicCacheStats {
    pub fn snapshot(&self, entries: u64) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
        }
    }
}

/// Point-in-time cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Approximate; pending evictions may not be reflected yet
    pub entries: u64,
}
