//! Core error types

use crate::auth::DenialReason;
use thiserror::Error;

/// Result type alias for rollcall
pub type Result<T> = std::result::Result<T, RollcallError>;

/// Main error type for rollcall
#[derive(Error, Debug)]
pub enum RollcallError {
    /// No resolvable identity was supplied with the request
    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    /// Identity resolved, but a permission or ownership check failed
    #[error("Forbidden: {0}")]
    Forbidden(DenialReason),

    /// Session, offering, team or access code is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed schedule, missing field or illegal transition
    #[error("Validation error: {0}")]
    Validation(String),

    /// Access code retries exhausted or a unique constraint was violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Connection, timeout or query failure reported by the store
    #[error("Database error: {0}")]
    Database(sea_orm::DbErr),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
