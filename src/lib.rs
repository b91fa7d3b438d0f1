//! # Rollcall-RS
//!
//! Authorization and attendance-session core for a course-management backend.
//!
//! ## Features
//!
//! - **Layered permissions**: global, course and team role layers mapped to flat permission codes
//! - **Single-query resolution**: all applicable channels evaluated in one store round trip
//! - **Permission cache**: bounded, TTL-limited and explicitly flushable
//! - **Attendance sessions**: short access codes, derived status, auto-open on schedule
//! - **Team visibility**: team-scoped sessions shown only to active members
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rollcall_rs::{Config, Rollcall};
//! use rollcall_rs::core::models::CreateSessionRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/rollcall.yaml").await?;
//!     let rollcall = Rollcall::new(config).await?;
//!
//!     let created = rollcall
//!         .attendance()
//!         .create_session(
//!             Some(7),
//!             1,
//!             CreateSessionRequest {
//!                 title: "Week 3 lecture".to_string(),
//!                 session_date: "2025-01-10".to_string(),
//!                 session_time: Some("10:00".to_string()),
//!                 ..Default::default()
//!             },
//!         )
//!         .await?;
//!
//!     println!("Access code: {}", created.session.access_code);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use auth::{AuthorizationGate, DenialReason, PermissionResolver};
pub use config::Config;
pub use core::attendance::{AccessCodeGenerator, AttendanceService, VisibilityFilter};
pub use storage::Database;
pub use utils::error::{Result, RollcallError};

use std::sync::Arc;
use tracing::info;

/// Store, permission resolver and attendance service wired from one configuration
#[derive(Debug, Clone)]
pub struct Rollcall {
    config: Config,
    db: Arc<Database>,
    attendance: AttendanceService,
}

impl Rollcall {
    /// Connect to the store, apply migrations and build the services
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating rollcall instance");

        let db = Arc::new(Database::new(&config.database).await?);
        db.migrate().await?;

        let attendance = AttendanceService::from_config(db.clone(), &config)?;
        Ok(Self {
            config,
            db,
            attendance,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn attendance(&self) -> &AttendanceService {
        &self.attendance
    }

    pub fn permissions(&self) -> &PermissionResolver {
        self.attendance.resolver()
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
