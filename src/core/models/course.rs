//! Offerings, enrollments and teams

use super::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Offering identifier
pub type OfferingId = i64;
/// Team identifier
pub type TeamId = i64;

/// Course-scoped role names
pub mod course_roles {
    pub const STUDENT: &str = "student";
    pub const TA: &str = "ta";
    pub const STAFF: &str = "staff";
    pub const INSTRUCTOR: &str = "instructor";
}

/// Team-scoped role names
pub mod team_roles {
    pub const LEADER: &str = "leader";
    pub const MEMBER: &str = "member";
}

/// One running instance of a course in a given term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    pub id: OfferingId,
    /// Course code, e.g. `CS101`
    pub course_code: String,
    pub title: String,
    pub term: String,
    pub year: i32,
}

/// Course membership of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub user_id: UserId,
    pub offering_id: OfferingId,
    pub course_role: String,
}

/// Team within an offering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub offering_id: OfferingId,
    pub name: String,
}

/// Membership of a user in a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembership {
    pub id: i64,
    pub team_id: TeamId,
    pub user_id: UserId,
    pub team_role: String,
    pub joined_at: DateTime<Utc>,
    /// Set once the user leaves; the membership is inactive from then on
    pub left_at: Option<DateTime<Utc>>,
}

impl TeamMembership {
    pub fn is_active(&self) -> bool {
        self.left_at.is_none()
    }

    pub fn is_leader(&self) -> bool {
        self.is_active() && self.team_role == team_roles::LEADER
    }
}
