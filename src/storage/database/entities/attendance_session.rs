use crate::core::models::Session;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attendance session database model
///
/// No status column exists; status is derived from the schedule and the
/// attendance timestamps at read time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub offering_id: i64,
    /// `None` for course-wide sessions
    pub team_id: Option<i64>,
    pub title: String,
    pub session_date: Date,
    pub session_time: Option<Time>,
    /// Unique among active sessions (partial unique index)
    pub access_code: String,
    pub code_expires_at: DateTimeWithTimeZone,
    pub attendance_opened_at: Option<DateTimeWithTimeZone>,
    pub attendance_closed_at: Option<DateTimeWithTimeZone>,
    pub is_active: bool,
    pub created_by: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::offering::Entity",
        from = "Column::OfferingId",
        to = "super::offering::Column::Id"
    )]
    Offering,

    #[sea_orm(has_many = "super::session_question::Entity")]
    Questions,

    #[sea_orm(has_many = "super::attendance_record::Entity")]
    Records,
}

impl Related<super::offering::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offering.def()
    }
}

impl Related<super::session_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn to_domain(&self) -> Session {
        Session {
            id: self.id,
            offering_id: self.offering_id,
            team_id: self.team_id,
            title: self.title.clone(),
            session_date: self.session_date,
            session_time: self.session_time,
            access_code: self.access_code.clone(),
            code_expires_at: self.code_expires_at.naive_utc().and_utc(),
            attendance_opened_at: self.attendance_opened_at.map(|dt| dt.naive_utc().and_utc()),
            attendance_closed_at: self.attendance_closed_at.map(|dt| dt.naive_utc().and_utc()),
            is_active: self.is_active,
            created_by: self.created_by,
            created_at: self.created_at.naive_utc().and_utc(),
            updated_at: self.updated_at.naive_utc().and_utc(),
        }
    }
}
