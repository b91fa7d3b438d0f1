//! Permission cache, access code and session lifecycle configuration

use super::*;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Permission cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionCacheConfig {
    /// Enable caching of permission checks
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum number of cached checks
    #[serde(default = "default_permission_cache_entries")]
    pub max_entries: u64,
    /// Time-to-live of a cached check in seconds; upper bound on role-change propagation
    #[serde(default = "default_permission_cache_ttl")]
    pub ttl_seconds: u64,
}

impl Default for PermissionCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_permission_cache_entries(),
            ttl_seconds: default_permission_cache_ttl(),
        }
    }
}

impl PermissionCacheConfig {
    pub fn ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ttl_seconds)
    }

    /// Merge permission cache configurations
    pub fn merge(mut self, other: Self) -> Self {
        if !other.enabled {
            self.enabled = false;
        }
        if other.max_entries != default_permission_cache_entries() {
            self.max_entries = other.max_entries;
        }
        if other.ttl_seconds != default_permission_cache_ttl() {
            self.ttl_seconds = other.ttl_seconds;
        }
        self
    }
}

/// Access code configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessCodeConfig {
    /// Number of characters in a code
    #[serde(default = "default_access_code_length")]
    pub length: usize,
    /// Characters codes are drawn from
    #[serde(default = "default_access_code_alphabet")]
    pub alphabet: String,
    /// Draws before allocation fails with a conflict
    #[serde(default = "default_access_code_attempts")]
    pub max_attempts: u32,
}

impl Default for AccessCodeConfig {
    fn default() -> Self {
        Self {
            length: default_access_code_length(),
            alphabet: default_access_code_alphabet(),
            max_attempts: default_access_code_attempts(),
        }
    }
}

impl AccessCodeConfig {
    /// Merge access code configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.length != default_access_code_length() {
            self.length = other.length;
        }
        if other.alphabet != default_access_code_alphabet() {
            self.alphabet = other.alphabet;
        }
        if other.max_attempts != default_access_code_attempts() {
            self.max_attempts = other.max_attempts;
        }
        self
    }
}

/// Session lifecycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Access code window after the scheduled start when no end time is given
    #[serde(default = "default_code_window_hours")]
    pub default_code_window_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_code_window_hours: default_code_window_hours(),
        }
    }
}

impl SessionConfig {
    pub fn code_window(&self) -> Duration {
        Duration::hours(self.default_code_window_hours)
    }

    /// Merge session configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.default_code_window_hours != default_code_window_hours() {
            self.default_code_window_hours = other.default_code_window_hours;
        }
        self
    }
}
