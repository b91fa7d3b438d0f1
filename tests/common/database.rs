//! Test database utilities
//!
//! Each test gets an isolated in-memory SQLite database.

use rollcall_rs::auth::rbac::seed_default_policy;
use rollcall_rs::config::DatabaseConfig;
use rollcall_rs::storage::Database;
use std::sync::Arc;

/// Test database wrapper providing isolated in-memory SQLite instances
#[derive(Debug, Clone)]
pub struct TestDatabase {
    inner: Arc<Database>,
}

impl TestDatabase {
    /// Create a migrated, empty in-memory database
    pub async fn new() -> Self {
        let db = Database::new(&test_db_config())
            .await
            .expect("Failed to create in-memory test database");

        db.migrate()
            .await
            .expect("Failed to run database migrations");

        Self {
            inner: Arc::new(db),
        }
    }

    /// Create a database with the default permission catalog and grants
    pub async fn seeded() -> Self {
        let db = Self::new().await;
        seed_default_policy(db.db())
            .await
            .expect("Failed to seed default policy");
        db
    }

    pub fn db(&self) -> &Database {
        &self.inner
    }

    pub fn db_arc(&self) -> Arc<Database> {
        Arc::clone(&self.inner)
    }
}

/// In-memory databases only live as long as their single connection
pub fn test_db_config() -> DatabaseConfig {
    DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        connection_timeout: 5,
        sql_logging: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_creation() {
        let db = TestDatabase::new().await;
        assert!(db.db().health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_seeded_database_has_catalog() {
        let db = TestDatabase::seeded().await;
        let stats = db.db().stats().await.unwrap();
        assert!(stats.permissions >= 12);
        assert_eq!(stats.users, 0);
    }
}
