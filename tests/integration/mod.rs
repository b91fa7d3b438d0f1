//! Integration tests for rollcall-rs
//!
//! These tests verify the interaction between the permission engine, the
//! attendance lifecycle and the store without mocking.

pub mod access_code_tests;
pub mod database_tests;
pub mod gate_tests;
pub mod permission_cache_tests;
pub mod permission_tests;
pub mod session_lifecycle_tests;
