//! Configuration validation
//!
//! - `trait_def`: Core Validate trait definition
//! - `storage_validators`: Database validators
//! - `access_validators`: Permission cache, access code and session validators

mod access_validators;
mod storage_validators;
mod trait_def;

pub use trait_def::Validate;
