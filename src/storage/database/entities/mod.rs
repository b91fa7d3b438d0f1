/// Attendance record entity module
pub mod attendance_record;
/// Attendance session entity module
pub mod attendance_session;
/// Course role grant entity module
pub mod course_role_permission;
/// Enrollment entity module
pub mod enrollment;
/// Global role grant entity module
pub mod global_role_permission;
/// Offering entity module
pub mod offering;
/// Offering staff assignment entity module
pub mod offering_staff;
/// Permission catalog entity module
pub mod permission;
/// Session question entity module
pub mod session_question;
/// Team entity module
pub mod team;
/// Team membership entity module
pub mod team_membership;
/// Team role grant entity module
pub mod team_role_permission;
/// User entity module
pub mod user;

pub use attendance_record::Entity as AttendanceRecord;
pub use attendance_session::Entity as AttendanceSession;
pub use course_role_permission::Entity as CourseRolePermission;
pub use enrollment::Entity as Enrollment;
pub use global_role_permission::Entity as GlobalRolePermission;
pub use offering::Entity as Offering;
pub use offering_staff::Entity as OfferingStaff;
pub use permission::Entity as Permission;
pub use session_question::Entity as SessionQuestion;
pub use team::Entity as Team;
pub use team_membership::Entity as TeamMembership;
pub use team_role_permission::Entity as TeamRolePermission;
pub use user::Entity as User;
