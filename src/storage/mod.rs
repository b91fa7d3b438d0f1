//! Storage layer
//!
//! Relational persistence for users, rosters, the permission catalog and attendance sessions.

/// Database storage module
pub mod database;

pub use database::{Database, DatabaseBackendType, DatabaseStats};
