//! Attendance sessions
//!
//! Access code allocation, the derived session lifecycle, team visibility and
//! the service that ties them to authorization and storage.

pub mod access_code;
pub mod lifecycle;
pub mod service;
pub mod visibility;

pub use access_code::{
    AccessCodeGenerator, CandidateSource, CodeRegistry, RandomSource, normalize_code,
};
pub use lifecycle::{CloseTransition, OpenTransition, Schedule};
pub use service::AttendanceService;
pub use visibility::VisibilityFilter;
