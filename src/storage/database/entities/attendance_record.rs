use crate::core::models::AttendanceRecord;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Check-in of a user to a session; unique per (session, user)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    pub user_id: i64,
    pub checked_in_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attendance_session::Entity",
        from = "Column::SessionId",
        to = "super::attendance_session::Column::Id"
    )]
    Session,
}

impl Related<super::attendance_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn to_domain(&self) -> AttendanceRecord {
        AttendanceRecord {
            id: self.id,
            session_id: self.session_id,
            user_id: self.user_id,
            checked_in_at: self.checked_in_at.naive_utc().and_utc(),
        }
    }
}
