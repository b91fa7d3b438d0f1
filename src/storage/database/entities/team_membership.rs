use crate::core::models::TeamMembership;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Team membership database model
///
/// Rows are never deleted on leave; `left_at` marks them inactive.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "team_memberships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub team_id: i64,
    pub user_id: i64,
    /// Team role name, key into `team_role_permissions`
    pub team_role: String,
    pub joined_at: DateTimeWithTimeZone,
    pub left_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id"
    )]
    Team,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn to_domain(&self) -> TeamMembership {
        TeamMembership {
            id: self.id,
            team_id: self.team_id,
            user_id: self.user_id,
            team_role: self.team_role.clone(),
            joined_at: self.joined_at.naive_utc().and_utc(),
            left_at: self.left_at.map(|dt| dt.naive_utc().and_utc()),
        }
    }
}
