//! Permission resolution integration tests
//!
//! Channels are checked against a seeded in-memory store.

#[cfg(test)]
mod tests {
    use crate::common::Campus;
    use rollcall_rs::core::models::{
        GlobalRole, PermissionScope, PermissionScopeRef, UserStatus, codes, course_roles,
        team_roles,
    };

    #[tokio::test]
    async fn test_course_role_change_grants_roster_import() {
        let campus = Campus::new().await;
        let resolver = campus.resolver();
        let user = campus.student("alex").await;

        assert!(
            !resolver
                .has_permission(user.id, codes::ROSTER_IMPORT, Some(campus.offering.id), None)
                .await
                .unwrap()
        );

        campus.enroll(&user, course_roles::TA).await;

        assert!(
            resolver
                .has_permission(user.id, codes::ROSTER_IMPORT, Some(campus.offering.id), None)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_course_channel_needs_offering() {
        let campus = Campus::new().await;
        let resolver = campus.resolver();
        let ta = campus.user("tara", GlobalRole::Student).await;
        campus.enroll(&ta, course_roles::TA).await;

        assert!(
            resolver
                .has_permission(ta.id, codes::ROSTER_IMPORT, Some(campus.offering.id), None)
                .await
                .unwrap()
        );
        assert!(
            !resolver
                .has_permission(ta.id, codes::ROSTER_IMPORT, None, None)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_team_channel_needs_team() {
        let campus = Campus::new().await;
        let resolver = campus.resolver();
        let leader = campus.student("lee").await;
        let team = campus.team_led_by("Blue", &leader).await;

        let offering_only = resolver
            .has_permission(leader.id, codes::ATTENDANCE_OPEN, Some(campus.offering.id), None)
            .await
            .unwrap();
        let with_team = resolver
            .has_permission(
                leader.id,
                codes::ATTENDANCE_OPEN,
                Some(campus.offering.id),
                Some(team.id),
            )
            .await
            .unwrap();

        assert!(!offering_only);
        assert!(with_team);
    }

    #[tokio::test]
    async fn test_global_channel_always_applies() {
        let campus = Campus::new().await;
        let resolver = campus.resolver();
        let admin = campus.user("root", GlobalRole::Admin).await;

        assert!(
            resolver
                .has_permission(admin.id, codes::USERS_MANAGE, None, None)
                .await
                .unwrap()
        );
        assert!(
            resolver
                .has_permission(admin.id, codes::SESSIONS_CREATE, Some(campus.offering.id), None)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_offering_staff_assignment_counts_for_course_channel() {
        let campus = Campus::new().await;
        let resolver = campus.resolver();
        let user = campus.student("sky").await;

        assert!(
            !resolver
                .has_permission(user.id, codes::SESSIONS_CREATE, Some(campus.offering.id), None)
                .await
                .unwrap()
        );

        campus
            .db
            .assign_staff_role(user.id, campus.offering.id, course_roles::STAFF)
            .await
            .unwrap();

        let grants = resolver
            .channel_grants(
                user.id,
                codes::SESSIONS_CREATE,
                PermissionScopeRef::offering(campus.offering.id),
            )
            .await
            .unwrap();
        assert!(!grants.global);
        assert!(grants.course);
        assert!(!grants.team);
        assert!(grants.granted());
    }

    #[tokio::test]
    async fn test_deleted_user_is_denied_everywhere() {
        let campus = Campus::new().await;
        let resolver = campus.resolver();
        let admin = campus.user("gone", GlobalRole::Admin).await;
        campus.enroll(&admin, course_roles::INSTRUCTOR).await;

        campus
            .db
            .set_user_status(admin.id, UserStatus::Deleted)
            .await
            .unwrap();

        assert!(
            !resolver
                .has_permission(admin.id, codes::SESSIONS_VIEW, Some(campus.offering.id), None)
                .await
                .unwrap()
        );
        assert!(
            resolver
                .list_permission_codes(admin.id, Some(campus.offering.id), None)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_unknown_user_and_code_are_denied() {
        let campus = Campus::new().await;
        let resolver = campus.resolver();
        let admin = campus.user("root", GlobalRole::Admin).await;

        assert!(
            !resolver
                .has_permission(admin.id, "sessions.teleport", None, None)
                .await
                .unwrap()
        );
        assert!(
            !resolver
                .has_permission(9_999, codes::SESSIONS_VIEW, Some(campus.offering.id), None)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_malformed_scope_is_denied() {
        let campus = Campus::new().await;
        let resolver = campus.resolver();
        let admin = campus.user("root", GlobalRole::Admin).await;

        assert!(
            !resolver
                .has_permission(admin.id, codes::SESSIONS_VIEW, Some(0), None)
                .await
                .unwrap()
        );
        assert!(
            !resolver
                .has_permission(admin.id, codes::SESSIONS_VIEW, Some(campus.offering.id), Some(-4))
                .await
                .unwrap()
        );
        assert!(
            resolver
                .list_permission_codes(admin.id, Some(-1), None)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_listing_is_sorted_union_without_duplicates() {
        let campus = Campus::new().await;
        let resolver = campus.resolver();
        let leader = campus.student("lee").await;
        let team = campus.team_led_by("Blue", &leader).await;

        let offering_codes = resolver
            .list_permission_codes(leader.id, Some(campus.offering.id), None)
            .await
            .unwrap();
        assert_eq!(
            offering_codes,
            vec![
                codes::ATTENDANCE_CHECK_IN.to_string(),
                codes::SESSIONS_VIEW.to_string()
            ]
        );

        let team_codes = resolver
            .list_permission_codes(leader.id, Some(campus.offering.id), Some(team.id))
            .await
            .unwrap();
        let mut expected = team_codes.clone();
        expected.sort();
        expected.dedup();
        assert_eq!(team_codes, expected);
        assert_eq!(
            team_codes
                .iter()
                .filter(|c| c.as_str() == codes::ATTENDANCE_CHECK_IN)
                .count(),
            1
        );
        assert!(team_codes.contains(&codes::ATTENDANCE_OPEN.to_string()));
        assert!(team_codes.contains(&codes::SESSIONS_VIEW.to_string()));
    }

    #[tokio::test]
    async fn test_leaving_team_drops_team_channel() {
        let campus = Campus::new().await;
        let resolver = campus.resolver();
        let leader = campus.student("lee").await;
        let member = campus.student("max").await;
        let team = campus.team_led_by("Blue", &leader).await;
        campus.join(&team, &member, team_roles::MEMBER).await;

        let scope = PermissionScopeRef::new(Some(campus.offering.id), Some(team.id));
        assert!(
            resolver
                .channel_grants(member.id, codes::ATTENDANCE_CHECK_IN, scope)
                .await
                .unwrap()
                .team
        );

        assert!(campus.db.leave_team(team.id, member.id).await.unwrap());

        let grants = resolver
            .channel_grants(member.id, codes::ATTENDANCE_CHECK_IN, scope)
            .await
            .unwrap();
        assert!(!grants.team);
        // Still enrolled as a student
        assert!(grants.course);
    }

    #[tokio::test]
    async fn test_revoked_grant_no_longer_resolves() {
        let campus = Campus::new().await;
        let resolver = campus.resolver();
        let student = campus.student("sam").await;

        assert!(
            campus
                .db
                .revoke_role_permission(
                    PermissionScope::Course,
                    course_roles::STUDENT,
                    codes::SESSIONS_VIEW
                )
                .await
                .unwrap()
        );
        assert!(
            !resolver
                .has_permission(student.id, codes::SESSIONS_VIEW, Some(campus.offering.id), None)
                .await
                .unwrap()
        );
    }
}
