// Module declarations
mod connection;
mod directory_ops;
mod permission_ops;
mod policy_ops;
mod session_ops;
mod types;

// Re-export public types
pub use types::{DatabaseBackendType, DatabaseStats, SeaOrmDatabase};
