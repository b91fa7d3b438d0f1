//! Permission cache, access code and session validators

use super::trait_def::Validate;
use crate::config::models::*;

impl Validate for PermissionCacheConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }

        if self.max_entries == 0 {
            return Err("Permission cache max_entries must be greater than 0".to_string());
        }

        if self.ttl_seconds == 0 {
            return Err("Permission cache ttl_seconds must be greater than 0".to_string());
        }

        // Role changes take up to one TTL to propagate.
        if self.ttl_seconds > 3600 {
            return Err("Permission cache ttl_seconds should not exceed 3600".to_string());
        }

        Ok(())
    }
}

impl Validate for AccessCodeConfig {
    fn validate(&self) -> Result<(), String> {
        if !(4..=12).contains(&self.length) {
            return Err("Access code length must be between 4 and 12".to_string());
        }

        if let Some(c) = self
            .alphabet
            .chars()
            .find(|c| matches!(c.to_ascii_uppercase(), 'I' | 'O' | '0' | '1'))
        {
            return Err(format!(
                "Access code alphabet must not contain ambiguous character '{}'",
                c
            ));
        }

        if self.alphabet.chars().any(|c| !c.is_ascii_alphanumeric()) {
            return Err("Access code alphabet must be ASCII alphanumeric".to_string());
        }

        if self.alphabet.len() < 2 {
            return Err("Access code alphabet needs at least two characters".to_string());
        }

        if self.max_attempts == 0 {
            return Err("Access code max_attempts must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for SessionConfig {
    fn validate(&self) -> Result<(), String> {
        if self.default_code_window_hours <= 0 {
            return Err("default_code_window_hours must be greater than 0".to_string());
        }

        if self.default_code_window_hours > 24 * 14 {
            return Err("default_code_window_hours should not exceed two weeks".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Logging level cannot be empty".to_string());
        }
        Ok(())
    }
}
