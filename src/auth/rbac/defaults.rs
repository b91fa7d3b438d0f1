//! Default permission catalog and role grants
//!
//! Seeding is idempotent: existing codes and grants are left as they are.

use crate::core::models::{GlobalRole, PermissionScope, codes, course_roles, team_roles};
use crate::storage::Database;
use crate::utils::error::Result;
use tracing::{debug, info};

/// Catalog entry seeded on a fresh database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionSeed {
    pub code: &'static str,
    pub scope: PermissionScope,
    pub description: &'static str,
}

/// Grant of one code to one role on one layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGrant {
    pub layer: PermissionScope,
    pub role: &'static str,
    pub code: &'static str,
}

/// Counts written by a seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub permissions: usize,
    pub new_grants: usize,
}

pub fn default_permissions() -> Vec<PermissionSeed> {
    vec![
        PermissionSeed {
            code: codes::USERS_MANAGE,
            scope: PermissionScope::Global,
            description: "Create, deactivate and re-role user accounts",
        },
        PermissionSeed {
            code: codes::SESSIONS_VIEW,
            scope: PermissionScope::Course,
            description: "List attendance sessions of an offering",
        },
        PermissionSeed {
            code: codes::SESSIONS_CREATE,
            scope: PermissionScope::Course,
            description: "Create attendance sessions",
        },
        PermissionSeed {
            code: codes::SESSIONS_UPDATE,
            scope: PermissionScope::Course,
            description: "Edit title and schedule of a session",
        },
        PermissionSeed {
            code: codes::SESSIONS_DELETE,
            scope: PermissionScope::Course,
            description: "Delete or retire a session",
        },
        PermissionSeed {
            code: codes::SESSIONS_QUESTIONS,
            scope: PermissionScope::Course,
            description: "Attach questions to a session",
        },
        PermissionSeed {
            code: codes::ATTENDANCE_OPEN,
            scope: PermissionScope::Course,
            description: "Open attendance for a session",
        },
        PermissionSeed {
            code: codes::ATTENDANCE_CLOSE,
            scope: PermissionScope::Course,
            description: "Close attendance for a session",
        },
        PermissionSeed {
            code: codes::ATTENDANCE_CHECK_IN,
            scope: PermissionScope::Course,
            description: "Check in to a session with its access code",
        },
        PermissionSeed {
            code: codes::ROSTER_VIEW,
            scope: PermissionScope::Course,
            description: "View the offering roster",
        },
        PermissionSeed {
            code: codes::ROSTER_IMPORT,
            scope: PermissionScope::Course,
            description: "Import roster entries",
        },
        PermissionSeed {
            code: codes::TEAMS_MANAGE,
            scope: PermissionScope::Course,
            description: "Create teams and manage memberships",
        },
    ]
}

pub fn default_grants() -> Vec<RoleGrant> {
    // Administrators hold every code platform-wide
    let mut grants: Vec<RoleGrant> = default_permissions()
        .into_iter()
        .map(|seed| RoleGrant {
            layer: PermissionScope::Global,
            role: GlobalRole::Admin.as_str(),
            code: seed.code,
        })
        .collect();

    let course = |role: &'static str, role_codes: &[&'static str]| {
        role_codes
            .iter()
            .map(move |&code| RoleGrant {
                layer: PermissionScope::Course,
                role,
                code,
            })
            .collect::<Vec<_>>()
    };

    grants.extend(course(
        course_roles::INSTRUCTOR,
        &[
            codes::SESSIONS_VIEW,
            codes::SESSIONS_CREATE,
            codes::SESSIONS_UPDATE,
            codes::SESSIONS_DELETE,
            codes::SESSIONS_QUESTIONS,
            codes::ATTENDANCE_OPEN,
            codes::ATTENDANCE_CLOSE,
            codes::ROSTER_VIEW,
            codes::ROSTER_IMPORT,
            codes::TEAMS_MANAGE,
        ],
    ));
    grants.extend(course(
        course_roles::STAFF,
        &[
            codes::SESSIONS_VIEW,
            codes::SESSIONS_CREATE,
            codes::SESSIONS_UPDATE,
            codes::SESSIONS_DELETE,
            codes::SESSIONS_QUESTIONS,
            codes::ATTENDANCE_OPEN,
            codes::ATTENDANCE_CLOSE,
            codes::ROSTER_VIEW,
        ],
    ));
    grants.extend(course(
        course_roles::TA,
        &[codes::SESSIONS_VIEW, codes::ROSTER_VIEW, codes::ROSTER_IMPORT],
    ));
    grants.extend(course(
        course_roles::STUDENT,
        &[codes::SESSIONS_VIEW, codes::ATTENDANCE_CHECK_IN],
    ));

    let team = |role: &'static str, role_codes: &[&'static str]| {
        role_codes
            .iter()
            .map(move |&code| RoleGrant {
                layer: PermissionScope::Team,
                role,
                code,
            })
            .collect::<Vec<_>>()
    };

    grants.extend(team(
        team_roles::LEADER,
        &[
            codes::SESSIONS_UPDATE,
            codes::SESSIONS_DELETE,
            codes::SESSIONS_QUESTIONS,
            codes::ATTENDANCE_OPEN,
            codes::ATTENDANCE_CLOSE,
            codes::ATTENDANCE_CHECK_IN,
        ],
    ));
    grants.extend(team(team_roles::MEMBER, &[codes::ATTENDANCE_CHECK_IN]));

    grants
}

/// Write the default catalog and grants
pub async fn seed_default_policy(db: &Database) -> Result<SeedSummary> {
    info!("Seeding default permission policy");

    let mut summary = SeedSummary::default();
    for seed in default_permissions() {
        db.ensure_permission(seed.code, seed.scope, Some(seed.description))
            .await?;
        summary.permissions += 1;
    }

    for grant in default_grants() {
        if db
            .grant_role_permission(grant.layer, grant.role, grant.code)
            .await?
        {
            summary.new_grants += 1;
        }
    }

    debug!(
        "Seeded {} permissions, {} new grants",
        summary.permissions, summary.new_grants
    );
    Ok(summary)
}
