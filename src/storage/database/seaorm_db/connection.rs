use crate::config::DatabaseConfig;
use crate::utils::error::{Result, RollcallError};
use sea_orm::*;
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::super::entities;
use super::super::migration::Migrator;
use super::types::{DatabaseBackendType, DatabaseStats, SeaOrmDatabase};

impl SeaOrmDatabase {
    /// Open a pooled connection to the configured database
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let backend_type = if config.is_sqlite() {
            DatabaseBackendType::SQLite
        } else if config.is_postgres() {
            DatabaseBackendType::PostgreSQL
        } else {
            return Err(RollcallError::config(format!(
                "Unsupported database url: {}",
                config.url
            )));
        };

        let db = Self::try_connect(&config.url, config).await?;
        info!("Database connection established ({:?})", backend_type);
        Ok(Self { db, backend_type })
    }

    /// Wrap an existing connection
    pub fn from_connection(db: DatabaseConnection) -> Self {
        let backend_type = match db.get_database_backend() {
            DbBackend::Postgres => DatabaseBackendType::PostgreSQL,
            _ => DatabaseBackendType::SQLite,
        };
        Self { db, backend_type }
    }

    async fn try_connect(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let timeout = Duration::from_secs(config.connection_timeout);
        let mut opt = ConnectOptions::new(url.to_string());
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(timeout)
            .acquire_timeout(timeout)
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(3600))
            .sqlx_logging(config.sql_logging)
            .sqlx_logging_level(log::LevelFilter::Debug);

        Database::connect(opt).await.map_err(RollcallError::Database)
    }

    /// Get the current backend type
    pub fn backend_type(&self) -> DatabaseBackendType {
        self.backend_type
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations...");
        Migrator::up(&self.db, None).await.map_err(|e| {
            warn!("Migration failed: {}", e);
            RollcallError::Database(e)
        })?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying database connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Close the database connection
    pub async fn close(self) -> Result<()> {
        self.db.close().await.map_err(RollcallError::Database)?;
        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        debug!("Performing database health check");

        let _result = entities::User::find()
            .limit(1)
            .all(&self.db)
            .await
            .map_err(RollcallError::Database)?;

        debug!("Database health check passed");
        Ok(())
    }

    /// Row counts for the main tables
    pub async fn stats(&self) -> Result<DatabaseStats> {
        let users = entities::User::find().count(&self.db).await?;
        let offerings = entities::Offering::find().count(&self.db).await?;
        let active_sessions = entities::AttendanceSession::find()
            .filter(entities::attendance_session::Column::IsActive.eq(true))
            .count(&self.db)
            .await?;
        let permissions = entities::Permission::find().count(&self.db).await?;

        Ok(DatabaseStats {
            users,
            offerings,
            active_sessions,
            permissions,
        })
    }
}
