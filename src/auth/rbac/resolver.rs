//! Permission resolution
//!
//! A user holds a code in a scope when any applicable channel grants it:
//! the global role always applies, course roles apply when an offering is
//! named, the team role applies when a team is named. Only grants exist, so
//! the channels combine with OR.

use crate::config::PermissionCacheConfig;
use crate::core::models::{ChannelGrants, OfferingId, PermissionScopeRef, TeamId, UserId};
use crate::storage::Database;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::{debug, warn};

use super::cache::PermissionCache;
use super::types::{CacheStats, PermissionCacheKey};

/// Answers "may user U use code P in scope S"
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    db: Arc<Database>,
    cache: PermissionCache,
}

impl PermissionResolver {
    pub fn new(db: Arc<Database>, config: &PermissionCacheConfig) -> Self {
        Self {
            db,
            cache: PermissionCache::new(config),
        }
    }

    /// Resolver that always goes to the store
    pub fn uncached(db: Arc<Database>) -> Self {
        Self {
            db,
            cache: PermissionCache::disabled(),
        }
    }

    pub async fn has_permission(
        &self,
        user_id: UserId,
        code: &str,
        offering_id: Option<OfferingId>,
        team_id: Option<TeamId>,
    ) -> Result<bool> {
        self.check(user_id, code, PermissionScopeRef::new(offering_id, team_id))
            .await
    }

    /// Cached check; store failures are returned and never cached
    pub async fn check(
        &self,
        user_id: UserId,
        code: &str,
        scope: PermissionScopeRef,
    ) -> Result<bool> {
        if is_malformed(user_id, code, scope) {
            warn!(
                "Rejecting malformed permission check: user {}, code '{}', scope {:?}",
                user_id, code, scope
            );
            return Ok(false);
        }

        let key = PermissionCacheKey::new(user_id, code, scope);
        if let Some(granted) = self.cache.get(&key).await {
            return Ok(granted);
        }

        let granted = self.channel_grants(user_id, code, scope).await?.granted();
        self.cache.insert(key, granted).await;
        Ok(granted)
    }

    /// Check that skips the cache in both directions
    pub async fn has_permission_uncached(
        &self,
        user_id: UserId,
        code: &str,
        offering_id: Option<OfferingId>,
        team_id: Option<TeamId>,
    ) -> Result<bool> {
        let scope = PermissionScopeRef::new(offering_id, team_id);
        Ok(self.channel_grants(user_id, code, scope).await?.granted())
    }

    /// Per-channel answers in one store round trip
    pub async fn channel_grants(
        &self,
        user_id: UserId,
        code: &str,
        scope: PermissionScopeRef,
    ) -> Result<ChannelGrants> {
        if is_malformed(user_id, code, scope) {
            return Ok(ChannelGrants::default());
        }

        let grants = self.db.channel_grants(user_id, code, scope).await?;
        debug!(
            "Permission {} for user {}: global={} course={} team={}",
            code, user_id, grants.global, grants.course, grants.team
        );
        Ok(grants)
    }

    /// Sorted, deduplicated codes the user holds over the applicable channels
    pub async fn list_permission_codes(
        &self,
        user_id: UserId,
        offering_id: Option<OfferingId>,
        team_id: Option<TeamId>,
    ) -> Result<Vec<String>> {
        let scope = PermissionScopeRef::new(offering_id, team_id);
        if user_id <= 0 || scope.is_malformed() {
            return Ok(Vec::new());
        }
        self.db.permission_codes(user_id, scope).await
    }

    pub fn invalidate_user(&self, user_id: UserId) -> Result<()> {
        self.cache.invalidate_user(user_id)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &PermissionCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn is_malformed(user_id: UserId, code: &str, scope: PermissionScopeRef) -> bool {
    user_id <= 0 || code.trim().is_empty() || scope.is_malformed()
}
