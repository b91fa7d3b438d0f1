//! User identity types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identifier
pub type UserId = i64;

/// Platform-wide role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalRole {
    /// Platform administrator
    Admin,
    /// Teaching staff account
    Instructor,
    /// Regular student account
    Student,
    /// Limited guest account
    Guest,
}

impl GlobalRole {
    /// Role name as stored in `users.global_role` and `global_role_permissions.role`
    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalRole::Admin => "admin",
            GlobalRole::Instructor => "instructor",
            GlobalRole::Student => "student",
            GlobalRole::Guest => "guest",
        }
    }
}

impl std::fmt::Display for GlobalRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GlobalRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(GlobalRole::Admin),
            "instructor" => Ok(GlobalRole::Instructor),
            "student" => Ok(GlobalRole::Student),
            "guest" => Ok(GlobalRole::Guest),
            _ => Err(format!("Invalid global role: {}", s)),
        }
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Active user
    Active,
    /// Inactive user
    Inactive,
    /// Deleted user (soft delete), never resolved
    Deleted,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
            UserStatus::Deleted => write!(f, "deleted"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "deleted" => Ok(UserStatus::Deleted),
            _ => Err(format!("Invalid user status: {}", s)),
        }
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Username (unique)
    pub username: String,
    pub display_name: Option<String>,
    pub global_role: GlobalRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the account takes part in permission resolution
    pub fn is_resolvable(&self) -> bool {
        self.status != UserStatus::Deleted
    }
}
