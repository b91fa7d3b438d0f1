//! Core domain logic
//!
//! Domain models, the attendance session lifecycle and the time source it
//! runs against.

pub mod attendance;
pub mod clock;
pub mod models;

pub use clock::{Clock, ManualClock, SystemClock};
