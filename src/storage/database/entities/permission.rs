use crate::core::models::{Permission, PermissionScope};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Permission catalog entry
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "permissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Immutable lookup code
    #[sea_orm(unique)]
    pub code: String,

    /// `global`, `course` or `team`
    pub scope: String,

    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain permission; `None` when the stored scope is unknown
    pub fn to_domain(&self) -> Option<Permission> {
        let scope: PermissionScope = self.scope.parse().ok()?;
        Some(Permission {
            id: self.id,
            code: self.code.clone(),
            scope,
            description: self.description.clone(),
        })
    }
}
