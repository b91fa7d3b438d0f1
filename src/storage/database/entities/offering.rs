use crate::core::models::Offering;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Course offering database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "offerings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_code: String,
    pub title: String,
    pub term: String,
    pub year: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::team::Entity")]
    Teams,

    #[sea_orm(has_many = "super::attendance_session::Entity")]
    Sessions,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teams.def()
    }
}

impl Related<super::attendance_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn to_domain(&self) -> Offering {
        Offering {
            id: self.id,
            course_code: self.course_code.clone(),
            title: self.title.clone(),
            term: self.term.clone(),
            year: self.year,
        }
    }
}
