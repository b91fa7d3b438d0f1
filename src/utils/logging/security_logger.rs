//! Security-aware logging utilities

use crate::auth::DenialReason;
use crate::core::models::UserId;
use tracing::{debug, warn};

/// Structured events for authentication and authorization outcomes
pub struct SecurityLogger;

impl SecurityLogger {
    /// A request arrived without a resolvable identity
    pub fn log_missing_identity(action: &str) {
        warn!(
            target: "security",
            event_type = "authentication",
            action,
            success = false,
            "Authentication failure: no identity for {}",
            action
        );
    }

    /// Log authorization events
    pub fn log_authz_event(
        user_id: UserId,
        resource: &str,
        action: &str,
        granted: bool,
        reason: Option<&DenialReason>,
    ) {
        if granted {
            debug!(
                target: "security",
                user_id,
                resource,
                action,
                granted,
                "Authorization granted: {} on {}",
                action,
                resource
            );
        } else {
            let reason = reason.map(ToString::to_string).unwrap_or_default();
            warn!(
                target: "security",
                user_id,
                resource,
                action,
                granted,
                reason = %reason,
                "Authorization denied: {} on {}",
                action,
                resource
            );
        }
    }
}
