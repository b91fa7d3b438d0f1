use crate::core::models::{GlobalRole, User as DomainUser, UserStatus};
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Username (unique)
    #[sea_orm(unique)]
    pub username: String,

    /// Display name (optional)
    pub display_name: Option<String>,

    /// Global role name, key into `global_role_permissions`
    pub global_role: String,

    /// `active`, `inactive` or `deleted`
    pub status: String,

    /// Creation timestamp
    pub created_at: DateTimeWithTimeZone,

    /// Last update timestamp
    pub updated_at: DateTimeWithTimeZone,
}

/// User entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,

    #[sea_orm(has_many = "super::team_membership::Entity")]
    TeamMemberships,
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::team_membership::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamMemberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// Conversion methods between SeaORM model and our domain model
impl Model {
    /// Convert SeaORM model to domain user model
    ///
    /// Unknown role or status strings degrade to the least privileged values.
    pub fn to_domain_user(&self) -> DomainUser {
        DomainUser {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            global_role: self.global_role.parse().unwrap_or(GlobalRole::Guest),
            status: self.status.parse().unwrap_or(UserStatus::Inactive),
            created_at: self.created_at.naive_utc().and_utc(),
        }
    }

    /// Active model for a new user row
    pub fn new_active(
        username: &str,
        display_name: Option<&str>,
        role: GlobalRole,
        now: chrono::DateTime<chrono::Utc>,
    ) -> ActiveModel {
        ActiveModel {
            id: sea_orm::NotSet,
            username: Set(username.to_string()),
            display_name: Set(display_name.map(str::to_string)),
            global_role: Set(role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}
