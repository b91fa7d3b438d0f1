//! Storage configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating database configuration");

        if self.url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }

        if !self.is_sqlite() && !self.is_postgres() {
            return Err("Only PostgreSQL and SQLite databases are supported".to_string());
        }

        if self.max_connections == 0 {
            return Err("Database max connections must be greater than 0".to_string());
        }

        if self.max_connections > 1000 {
            return Err("Database max connections should not exceed 1000".to_string());
        }

        if self.connection_timeout == 0 {
            return Err("Database connection timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
