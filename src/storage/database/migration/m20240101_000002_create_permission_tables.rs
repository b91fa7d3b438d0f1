use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Permissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Permissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Permissions::Code)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Permissions::Scope).string_len(16).not_null())
                    .col(ColumnDef::new(Permissions::Description).text().null())
                    .to_owned(),
            )
            .await?;

        create_grant_table(manager, GlobalRolePermissions::Table, "global").await?;
        create_grant_table(manager, CourseRolePermissions::Table, "course").await?;
        create_grant_table(manager, TeamRolePermissions::Table, "team").await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TeamRolePermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseRolePermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GlobalRolePermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Permissions::Table).to_owned())
            .await
    }
}

/// The three grant tables share one shape: (role, permission_id) with a composite key
async fn create_grant_table<T>(manager: &SchemaManager<'_>, table: T, layer: &str) -> Result<(), DbErr>
where
    T: IntoIden + Clone + 'static,
{
    manager
        .create_table(
            Table::create()
                .table(table.clone())
                .if_not_exists()
                .col(ColumnDef::new(RoleGrant::Role).string_len(32).not_null())
                .col(ColumnDef::new(RoleGrant::PermissionId).big_integer().not_null())
                .primary_key(
                    Index::create()
                        .name(format!("pk_{}_role_permissions", layer))
                        .col(RoleGrant::Role)
                        .col(RoleGrant::PermissionId),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name(format!("fk_{}_role_permissions_permission_id", layer))
                        .from(table.clone(), RoleGrant::PermissionId)
                        .to(Permissions::Table, Permissions::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .if_not_exists()
                .name(format!("idx_{}_role_permissions_permission_id", layer))
                .table(table)
                .col(RoleGrant::PermissionId)
                .to_owned(),
        )
        .await
}

#[derive(DeriveIden)]
enum Permissions {
    Table,
    Id,
    Code,
    Scope,
    Description,
}

#[derive(DeriveIden, Clone)]
enum GlobalRolePermissions {
    Table,
}

#[derive(DeriveIden, Clone)]
enum CourseRolePermissions {
    Table,
}

#[derive(DeriveIden, Clone)]
enum TeamRolePermissions {
    Table,
}

#[derive(DeriveIden)]
enum RoleGrant {
    Role,
    PermissionId,
}
