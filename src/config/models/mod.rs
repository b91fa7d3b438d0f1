//! Configuration data models
//!
//! This module defines all configuration structures used by rollcall.

pub mod access;
pub mod logging;
pub mod storage;

pub use access::*;
pub use logging::*;
pub use storage::*;

/// Default maximum connections
pub fn default_max_connections() -> u32 {
    10
}

/// Default connection timeout in seconds
pub fn default_connection_timeout() -> u64 {
    5
}

/// Default permission cache capacity
pub fn default_permission_cache_entries() -> u64 {
    10_000
}

/// Default permission cache TTL in seconds
pub fn default_permission_cache_ttl() -> u64 {
    60
}

/// Default access code length
pub fn default_access_code_length() -> usize {
    6
}

/// Default access code alphabet, without `I`, `O`, `0` and `1`
pub fn default_access_code_alphabet() -> String {
    "ABCDEFGHJKLMNPQRSTUVWXYZ23456789".to_string()
}

/// Default number of draws before giving up on a unique code
pub fn default_access_code_attempts() -> u32 {
    10
}

/// Default access code window in hours
pub fn default_code_window_hours() -> i64 {
    24
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}
