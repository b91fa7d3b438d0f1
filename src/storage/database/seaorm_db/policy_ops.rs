use crate::core::models::{Permission, PermissionScope};
use crate::utils::error::{Result, RollcallError};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{
    self, course_role_permission, global_role_permission, permission, team_role_permission,
};
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Insert a catalog entry, or return the existing one with the same code
    pub async fn ensure_permission(
        &self,
        code: &str,
        scope: PermissionScope,
        description: Option<&str>,
    ) -> Result<Permission> {
        if let Some(existing) = self.find_permission_by_code(code).await? {
            return Ok(existing);
        }

        debug!("Creating permission: {}", code);
        let model = permission::ActiveModel {
            code: Set(code.to_string()),
            scope: Set(scope.to_string()),
            description: Set(description.map(str::to_string)),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        model.to_domain().ok_or_else(|| {
            RollcallError::internal(format!("Stored permission {} has an unknown scope", code))
        })
    }

    pub async fn find_permission_by_code(&self, code: &str) -> Result<Option<Permission>> {
        let model = entities::Permission::find()
            .filter(permission::Column::Code.eq(code))
            .one(&self.db)
            .await?;
        Ok(model.and_then(|m| m.to_domain()))
    }

    /// Full permission catalog ordered by code
    pub async fn list_permissions(&self) -> Result<Vec<Permission>> {
        let models = entities::Permission::find()
            .order_by_asc(permission::Column::Code)
            .all(&self.db)
            .await?;
        Ok(models.iter().filter_map(|m| m.to_domain()).collect())
    }

    /// Grant `code` to `role` on the given layer; granting twice is a no-op
    ///
    /// Returns whether a new grant row was written.
    pub async fn grant_role_permission(
        &self,
        layer: PermissionScope,
        role: &str,
        code: &str,
    ) -> Result<bool> {
        let permission = self.find_permission_by_code(code).await?.ok_or_else(|| {
            RollcallError::not_found(format!("Permission {} not found", code))
        })?;

        debug!("Granting {} to {} role {}", code, layer, role);

        let inserted = match layer {
            PermissionScope::Global => {
                entities::GlobalRolePermission::insert(global_role_permission::ActiveModel {
                    role: Set(role.to_string()),
                    permission_id: Set(permission.id),
                })
                .on_conflict(
                    OnConflict::columns([
                        global_role_permission::Column::Role,
                        global_role_permission::Column::PermissionId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await?
            }
            PermissionScope::Course => {
                entities::CourseRolePermission::insert(course_role_permission::ActiveModel {
                    role: Set(role.to_string()),
                    permission_id: Set(permission.id),
                })
                .on_conflict(
                    OnConflict::columns([
                        course_role_permission::Column::Role,
                        course_role_permission::Column::PermissionId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await?
            }
            PermissionScope::Team => {
                entities::TeamRolePermission::insert(team_role_permission::ActiveModel {
                    role: Set(role.to_string()),
                    permission_id: Set(permission.id),
                })
                .on_conflict(
                    OnConflict::columns([
                        team_role_permission::Column::Role,
                        team_role_permission::Column::PermissionId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await?
            }
        };

        Ok(inserted > 0)
    }

    /// Remove a grant; returns whether one existed
    pub async fn revoke_role_permission(
        &self,
        layer: PermissionScope,
        role: &str,
        code: &str,
    ) -> Result<bool> {
        let Some(permission) = self.find_permission_by_code(code).await? else {
            return Ok(false);
        };

        debug!("Revoking {} from {} role {}", code, layer, role);

        let removed = match layer {
            PermissionScope::Global => {
                entities::GlobalRolePermission::delete_many()
                    .filter(global_role_permission::Column::Role.eq(role))
                    .filter(global_role_permission::Column::PermissionId.eq(permission.id))
                    .exec(&self.db)
                    .await?
            }
            PermissionScope::Course => {
                entities::CourseRolePermission::delete_many()
                    .filter(course_role_permission::Column::Role.eq(role))
                    .filter(course_role_permission::Column::PermissionId.eq(permission.id))
                    .exec(&self.db)
                    .await?
            }
            PermissionScope::Team => {
                entities::TeamRolePermission::delete_many()
                    .filter(team_role_permission::Column::Role.eq(role))
                    .filter(team_role_permission::Column::PermissionId.eq(permission.id))
                    .exec(&self.db)
                    .await?
            }
        };

        Ok(removed.rows_affected > 0)
    }
}
