//! Permission resolution queries
//!
//! Each channel (global, course, team) is a sub-select over the grant tables.
//! A check folds all applicable channels into one round trip; a listing unions them.

use crate::core::models::{ChannelGrants, PermissionScopeRef, UserId, UserStatus};
use crate::utils::error::Result;
use sea_orm::sea_query::{
    Alias, Expr, IntoColumnRef, Query, SelectStatement, SimpleExpr, UnionType,
};
use sea_orm::{ConnectionTrait, QueryResult};
use std::collections::BTreeSet;
use tracing::debug;

use super::super::entities::{
    course_role_permission, enrollment, global_role_permission, offering_staff, permission,
    team_membership, team_role_permission, user,
};
use super::types::SeaOrmDatabase;

const GLOBAL_GRANT: &str = "global_grant";
const COURSE_GRANT: &str = "course_grant";
const TEAM_GRANT: &str = "team_grant";

impl SeaOrmDatabase {
    /// Evaluate every applicable channel for `code` in a single query
    pub async fn channel_grants(
        &self,
        user_id: UserId,
        code: &str,
        scope: PermissionScopeRef,
    ) -> Result<ChannelGrants> {
        debug!(
            "Resolving {} for user {} (offering {:?}, team {:?})",
            code, user_id, scope.offering_id, scope.team_id
        );

        let mut query = Query::select();
        query.expr_as(
            as_flag(Expr::exists(global_channel(user_id, Some(code)))),
            Alias::new(GLOBAL_GRANT),
        );

        if let Some(offering_id) = scope.offering_id {
            let course = Expr::exists(enrollment_channel(user_id, offering_id, Some(code)))
                .or(Expr::exists(staff_channel(user_id, offering_id, Some(code))));
            query.expr_as(as_flag(course), Alias::new(COURSE_GRANT));
        }
        if let Some(team_id) = scope.team_id {
            query.expr_as(
                as_flag(Expr::exists(team_channel(user_id, team_id, Some(code)))),
                Alias::new(TEAM_GRANT),
            );
        }

        let stmt = self.db.get_database_backend().build(&query);
        let Some(row) = self.db.query_one(stmt).await? else {
            return Ok(ChannelGrants::default());
        };

        Ok(ChannelGrants {
            global: read_flag(&row, GLOBAL_GRANT)?,
            course: scope.offering_id.is_some() && read_flag(&row, COURSE_GRANT)?,
            team: scope.team_id.is_some() && read_flag(&row, TEAM_GRANT)?,
        })
    }

    /// Distinct codes granted over the applicable channels, sorted
    pub async fn permission_codes(
        &self,
        user_id: UserId,
        scope: PermissionScopeRef,
    ) -> Result<Vec<String>> {
        debug!(
            "Listing permission codes for user {} (offering {:?}, team {:?})",
            user_id, scope.offering_id, scope.team_id
        );

        let mut query = global_channel(user_id, None);
        if let Some(offering_id) = scope.offering_id {
            query.union(UnionType::Distinct, enrollment_channel(user_id, offering_id, None));
            query.union(UnionType::Distinct, staff_channel(user_id, offering_id, None));
        }
        if let Some(team_id) = scope.team_id {
            query.union(UnionType::Distinct, team_channel(user_id, team_id, None));
        }

        let stmt = self.db.get_database_backend().build(&query);
        let rows = self.db.query_all(stmt).await?;

        let mut codes = BTreeSet::new();
        for row in rows {
            codes.insert(row.try_get::<String>("", "code")?);
        }
        Ok(codes.into_iter().collect())
    }
}

fn as_flag(condition: SimpleExpr) -> SimpleExpr {
    Expr::case(condition, Expr::cust("1"))
        .finally(Expr::cust("0"))
        .into()
}

fn read_flag(row: &QueryResult, column: &str) -> Result<bool> {
    Ok(row.try_get::<i32>("", column)? != 0)
}

/// `SELECT permissions.code FROM permissions` narrowed to one code when given
fn grant_base(code: Option<&str>) -> SelectStatement {
    let mut query = Query::select();
    query
        .column((permission::Entity, permission::Column::Code))
        .from(permission::Entity);
    if let Some(code) = code {
        query.and_where(Expr::col((permission::Entity, permission::Column::Code)).eq(code));
    }
    query
}

/// Deleted users resolve to nothing on every channel
fn join_live_user<C>(query: &mut SelectStatement, user_col: C)
where
    C: IntoColumnRef,
{
    query
        .inner_join(
            user::Entity,
            Expr::col((user::Entity, user::Column::Id)).equals(user_col),
        )
        .and_where(
            Expr::col((user::Entity, user::Column::Status)).ne(UserStatus::Deleted.to_string()),
        );
}

fn global_channel(user_id: UserId, code: Option<&str>) -> SelectStatement {
    let mut query = grant_base(code);
    query.inner_join(
        global_role_permission::Entity,
        Expr::col((
            global_role_permission::Entity,
            global_role_permission::Column::PermissionId,
        ))
        .equals((permission::Entity, permission::Column::Id)),
    );
    query
        .inner_join(
            user::Entity,
            Expr::col((user::Entity, user::Column::GlobalRole)).equals((
                global_role_permission::Entity,
                global_role_permission::Column::Role,
            )),
        )
        .and_where(Expr::col((user::Entity, user::Column::Id)).eq(user_id))
        .and_where(
            Expr::col((user::Entity, user::Column::Status)).ne(UserStatus::Deleted.to_string()),
        );
    query
}

fn enrollment_channel(user_id: UserId, offering_id: i64, code: Option<&str>) -> SelectStatement {
    let mut query = grant_base(code);
    query
        .inner_join(
            course_role_permission::Entity,
            Expr::col((
                course_role_permission::Entity,
                course_role_permission::Column::PermissionId,
            ))
            .equals((permission::Entity, permission::Column::Id)),
        )
        .inner_join(
            enrollment::Entity,
            Expr::col((enrollment::Entity, enrollment::Column::CourseRole)).equals((
                course_role_permission::Entity,
                course_role_permission::Column::Role,
            )),
        )
        .and_where(Expr::col((enrollment::Entity, enrollment::Column::UserId)).eq(user_id))
        .and_where(
            Expr::col((enrollment::Entity, enrollment::Column::OfferingId)).eq(offering_id),
        );
    join_live_user(&mut query, (enrollment::Entity, enrollment::Column::UserId));
    query
}

fn staff_channel(user_id: UserId, offering_id: i64, code: Option<&str>) -> SelectStatement {
    let mut query = grant_base(code);
    query
        .inner_join(
            course_role_permission::Entity,
            Expr::col((
                course_role_permission::Entity,
                course_role_permission::Column::PermissionId,
            ))
            .equals((permission::Entity, permission::Column::Id)),
        )
        .inner_join(
            offering_staff::Entity,
            Expr::col((offering_staff::Entity, offering_staff::Column::StaffRole)).equals((
                course_role_permission::Entity,
                course_role_permission::Column::Role,
            )),
        )
        .and_where(
            Expr::col((offering_staff::Entity, offering_staff::Column::UserId)).eq(user_id),
        )
        .and_where(
            Expr::col((offering_staff::Entity, offering_staff::Column::OfferingId))
                .eq(offering_id),
        );
    join_live_user(&mut query, (offering_staff::Entity, offering_staff::Column::UserId));
    query
}

fn team_channel(user_id: UserId, team_id: i64, code: Option<&str>) -> SelectStatement {
    let mut query = grant_base(code);
    query
        .inner_join(
            team_role_permission::Entity,
            Expr::col((
                team_role_permission::Entity,
                team_role_permission::Column::PermissionId,
            ))
            .equals((permission::Entity, permission::Column::Id)),
        )
        .inner_join(
            team_membership::Entity,
            Expr::col((team_membership::Entity, team_membership::Column::TeamRole)).equals((
                team_role_permission::Entity,
                team_role_permission::Column::Role,
            )),
        )
        .and_where(
            Expr::col((team_membership::Entity, team_membership::Column::UserId)).eq(user_id),
        )
        .and_where(
            Expr::col((team_membership::Entity, team_membership::Column::TeamId)).eq(team_id),
        )
        .and_where(
            Expr::col((team_membership::Entity, team_membership::Column::LeftAt)).is_null(),
        );
    join_live_user(&mut query, (team_membership::Entity, team_membership::Column::UserId));
    query
}
