//! Common test utilities for rollcall-rs
//!
//! - In-memory SQLite database with migrations and the default policy applied
//! - A campus fixture wiring the attendance service to a manual clock
//!
//! # Usage
//!
//! ```rust
//! use crate::common::Campus;
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let campus = Campus::new().await;
//!     let student = campus.student("sam").await;
//!     // ...
//! }
//! ```

pub mod database;

pub use database::TestDatabase;
pub use fixtures::{Campus, at, lecture};
