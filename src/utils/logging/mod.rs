//! Logging setup and security event logging
//!
//! Everything goes through `tracing`. Authorization decisions are additionally
//! emitted on the `security` target so they can be filtered or routed apart.

mod security_logger;

pub use security_logger::SecurityLogger;

use crate::config::LoggingConfig;
use crate::utils::error::{Result, RollcallError};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| {
            RollcallError::config(format!("Invalid log level '{}': {}", config.level, e))
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| RollcallError::internal(format!("Failed to install logger: {}", e)))
}
