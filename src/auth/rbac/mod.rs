//! Role-based permission resolution
//!
//! Role names map to permission codes through three grant tables, one per
//! layer (global, course, team).

mod cache;
pub mod defaults;
mod resolver;
mod types;

pub use cache::PermissionCache;
pub use defaults::{SeedSummary, seed_default_policy};
pub use resolver::PermissionResolver;
pub use types::{CacheStats, PermissionCacheKey};
