//! Authorization
//!
//! Permission resolution over the global, course and team role layers, and the
//! gate that combines it with session ownership before any mutation.

pub mod gate;
pub mod rbac;
mod types;

pub use gate::AuthorizationGate;
pub use rbac::{PermissionCache, PermissionResolver};
pub use types::{CreateScope, DenialReason, MutationCheck};

use crate::core::models::UserId;
use crate::utils::error::{Result, RollcallError};

/// Turn the caller's optional identity into a user id, or reject the request
pub fn require_identity(identity: Option<UserId>) -> Result<UserId> {
    identity.ok_or_else(|| RollcallError::unauthenticated("No authenticated user on the request"))
}
