//! Shared utilities: error taxonomy and tracing setup

pub mod error;
pub mod logging;
