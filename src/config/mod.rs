//! Configuration management for rollcall
//!
//! This module handles loading, validation, and merging of configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{Result, RollcallError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Permission cache configuration
    #[serde(default)]
    pub permissions: PermissionCacheConfig,
    /// Access code configuration
    #[serde(default)]
    pub access_codes: AccessCodeConfig,
    /// Session lifecycle configuration
    #[serde(default)]
    pub sessions: SessionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RollcallError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| RollcallError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();

        if let Some(url) = env_var("ROLLCALL_DATABASE_URL") {
            config.database.url = url;
        }
        if let Some(value) = env_parse("ROLLCALL_DB_MAX_CONNECTIONS")? {
            config.database.max_connections = value;
        }
        if let Some(value) = env_parse("ROLLCALL_DB_CONNECTION_TIMEOUT")? {
            config.database.connection_timeout = value;
        }
        if let Some(value) = env_parse("ROLLCALL_PERMISSION_CACHE_ENABLED")? {
            config.permissions.enabled = value;
        }
        if let Some(value) = env_parse("ROLLCALL_PERMISSION_CACHE_MAX_ENTRIES")? {
            config.permissions.max_entries = value;
        }
        if let Some(value) = env_parse("ROLLCALL_PERMISSION_CACHE_TTL")? {
            config.permissions.ttl_seconds = value;
        }
        if let Some(value) = env_parse("ROLLCALL_ACCESS_CODE_LENGTH")? {
            config.access_codes.length = value;
        }
        if let Some(value) = env_parse("ROLLCALL_CODE_WINDOW_HOURS")? {
            config.sessions.default_code_window_hours = value;
        }
        if let Some(level) = env_var("ROLLCALL_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(value) = env_parse("ROLLCALL_LOG_JSON")? {
            config.logging.json = value;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.database
            .validate()
            .map_err(|e| RollcallError::Config(format!("Database config error: {}", e)))?;

        self.permissions
            .validate()
            .map_err(|e| RollcallError::Config(format!("Permission cache config error: {}", e)))?;

        self.access_codes
            .validate()
            .map_err(|e| RollcallError::Config(format!("Access code config error: {}", e)))?;

        self.sessions
            .validate()
            .map_err(|e| RollcallError::Config(format!("Session config error: {}", e)))?;

        self.logging
            .validate()
            .map_err(|e| RollcallError::Config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.database = self.database.merge(other.database);
        self.permissions = self.permissions.merge(other.permissions);
        self.access_codes = self.access_codes.merge(other.access_codes);
        self.sessions = self.sessions.merge(other.sessions);
        self.logging = self.logging.merge(other.logging);
        self
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| RollcallError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_var(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| RollcallError::Config(format!("Invalid value for {}: {}", name, e)))
        })
        .transpose()
}
