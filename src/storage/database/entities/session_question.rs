use crate::core::models::SessionQuestion;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Question attached to an attendance session
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "session_questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    pub position: i32,
    pub prompt: String,
    pub created_at: DateTimeWithTimeZone,
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
    pub fn to_domain(&self) -> SessionQuestion {
        SessionQuestion {
            id: self.id,
            session_id: self.session_id,
            position: self.position,
            prompt: self.prompt.clone(),
            created_at: self.created_at.naive_utc().and_utc(),
        }
    }
}
