//! Permission catalog types

use super::course::{OfferingId, TeamId};
use serde::{Deserialize, Serialize};

/// Breadth at which a permission applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionScope {
    Global,
    Course,
    Team,
}

impl std::fmt::Display for PermissionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionScope::Global => write!(f, "global"),
            PermissionScope::Course => write!(f, "course"),
            PermissionScope::Team => write!(f, "team"),
        }
    }
}

impl std::str::FromStr for PermissionScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(PermissionScope::Global),
            "course" => Ok(PermissionScope::Course),
            "team" => Ok(PermissionScope::Team),
            _ => Err(format!("Invalid permission scope: {}", s)),
        }
    }
}

/// Permission definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    /// Immutable lookup code, e.g. `attendance.open`
    pub code: String,
    pub scope: PermissionScope,
    pub description: Option<String>,
}

/// Scope identifiers accompanying a permission check
///
/// The course channel applies only when `offering_id` is set, the team channel
/// only when `team_id` is set. The global channel always applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionScopeRef {
    pub offering_id: Option<OfferingId>,
    pub team_id: Option<TeamId>,
}

impl PermissionScopeRef {
    pub fn global() -> Self {
        Self::default()
    }

    pub fn offering(offering_id: OfferingId) -> Self {
        Self {
            offering_id: Some(offering_id),
            team_id: None,
        }
    }

    pub fn new(offering_id: Option<OfferingId>, team_id: Option<TeamId>) -> Self {
        Self {
            offering_id,
            team_id,
        }
    }

    /// Whether a supplied id cannot name a stored row
    pub fn is_malformed(&self) -> bool {
        self.offering_id.is_some_and(|id| id <= 0) || self.team_id.is_some_and(|id| id <= 0)
    }
}

/// Per-channel outcome of a permission check; the check passes when any channel grants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelGrants {
    pub global: bool,
    pub course: bool,
    pub team: bool,
}

impl ChannelGrants {
    pub fn granted(&self) -> bool {
        self.global || self.course || self.team
    }
}

/// Permission codes used by the attendance core
pub mod codes {
    pub const SESSIONS_VIEW: &str = "sessions.view";
    pub const SESSIONS_CREATE: &str = "sessions.create";
    pub const SESSIONS_UPDATE: &str = "sessions.update";
    pub const SESSIONS_DELETE: &str = "sessions.delete";
    pub const SESSIONS_QUESTIONS: &str = "sessions.questions";
    pub const ATTENDANCE_OPEN: &str = "attendance.open";
    pub const ATTENDANCE_CLOSE: &str = "attendance.close";
    pub const ATTENDANCE_CHECK_IN: &str = "attendance.check_in";
    pub const ROSTER_VIEW: &str = "roster.view";
    pub const ROSTER_IMPORT: &str = "roster.import";
    pub const TEAMS_MANAGE: &str = "teams.manage";
    pub const USERS_MANAGE: &str = "users.manage";
}
