//! Error handling for rollcall
//!
//! This module defines the error taxonomy shared by the permission engine,
//! the attendance lifecycle and the storage layer.

mod conversions;
mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{Result, RollcallError};
