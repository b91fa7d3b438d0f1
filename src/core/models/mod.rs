//! Domain models shared by the permission engine and the attendance core

pub mod course;
pub mod permission;
pub mod session;
pub mod user;

pub use course::{
    Enrollment, Offering, OfferingId, Team, TeamId, TeamMembership, course_roles, team_roles,
};
pub use permission::{
    ChannelGrants, Permission, PermissionScope, PermissionScopeRef, codes,
};
pub use session::{
    AttendanceRecord, CodeVerification, CreateSessionRequest, NewSession, Session, SessionId,
    SessionQuestion, SessionStatus, SessionView, UpdateSessionRequest,
};
pub use user::{GlobalRole, User, UserId, UserStatus};
