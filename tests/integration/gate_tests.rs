//! Authorization gate integration tests

#[cfg(test)]
mod tests {
    use crate::common::{Campus, lecture};
    use rollcall_rs::auth::CreateScope;
    use rollcall_rs::core::models::{
        CreateSessionRequest, GlobalRole, UserStatus, codes, course_roles,
    };
    use rollcall_rs::{DenialReason, RollcallError};

    #[tokio::test]
    async fn test_create_scope_for_staff_and_leaders() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        let leader = campus.student("lee").await;
        let team = campus.team_led_by("Blue", &leader).await;
        let gate = campus.service.gate();

        assert_eq!(
            gate.resolve_create_scope(instructor.id, campus.offering.id, None)
                .await
                .unwrap(),
            CreateScope::Staff { team_id: None }
        );
        assert_eq!(
            gate.resolve_create_scope(instructor.id, campus.offering.id, Some(team.id))
                .await
                .unwrap(),
            CreateScope::Staff {
                team_id: Some(team.id)
            }
        );
        assert_eq!(
            gate.resolve_create_scope(leader.id, campus.offering.id, None)
                .await
                .unwrap(),
            CreateScope::TeamLeader { team_id: team.id }
        );
    }

    #[tokio::test]
    async fn test_plain_student_may_not_create() {
        let campus = Campus::new().await;
        let student = campus.student("sam").await;

        assert!(
            !campus
                .service
                .user_can_create_session(student.id, campus.offering.id)
                .await
                .unwrap()
        );

        let result = campus
            .service
            .create_session(
                Some(student.id),
                campus.offering.id,
                lecture("Mine", "2025-03-12", "10:00"),
            )
            .await;
        assert!(matches!(
            result,
            Err(RollcallError::Forbidden(DenialReason::NotEligibleToCreate { .. }))
        ));
    }

    #[tokio::test]
    async fn test_user_can_create_session_for_staff_and_leaders() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        let leader = campus.student("lee").await;
        campus.team_led_by("Blue", &leader).await;

        for user in [&instructor, &leader] {
            assert!(
                campus
                    .service
                    .user_can_create_session(user.id, campus.offering.id)
                    .await
                    .unwrap()
            );
        }
    }

    #[tokio::test]
    async fn test_deleted_leader_may_not_create() {
        let campus = Campus::new().await;
        let leader = campus.student("lee").await;
        campus.team_led_by("Blue", &leader).await;
        campus
            .db
            .set_user_status(leader.id, UserStatus::Deleted)
            .await
            .unwrap();

        assert!(
            !campus
                .service
                .user_can_create_session(leader.id, campus.offering.id)
                .await
                .unwrap()
        );
        assert!(
            campus
                .db
                .led_team_ids(leader.id, campus.offering.id)
                .await
                .unwrap()
                .is_empty()
        );

        let result = campus
            .service
            .create_session(
                Some(leader.id),
                campus.offering.id,
                lecture("Ghost", "2025-03-12", "10:00"),
            )
            .await;
        assert!(matches!(
            result,
            Err(RollcallError::Forbidden(DenialReason::NotEligibleToCreate { .. }))
        ));
    }

    #[tokio::test]
    async fn test_leader_of_several_teams_must_choose() {
        let campus = Campus::new().await;
        let leader = campus.student("lee").await;
        let blue = campus.team_led_by("Blue", &leader).await;
        let red = campus.team_led_by("Red", &leader).await;
        let other_leader = campus.student("oli").await;
        let green = campus.team_led_by("Green", &other_leader).await;

        let result = campus
            .service
            .create_session(
                Some(leader.id),
                campus.offering.id,
                lecture("Which?", "2025-03-12", "10:00"),
            )
            .await;
        assert!(matches!(result, Err(RollcallError::Validation(_))));

        let created = campus
            .service
            .create_session(
                Some(leader.id),
                campus.offering.id,
                CreateSessionRequest {
                    team_id: Some(red.id),
                    ..lecture("Red sync", "2025-03-12", "10:00")
                },
            )
            .await
            .unwrap();
        assert_eq!(created.session.team_id, Some(red.id));
        assert_ne!(created.session.team_id, Some(blue.id));

        let result = campus
            .service
            .create_session(
                Some(leader.id),
                campus.offering.id,
                CreateSessionRequest {
                    team_id: Some(green.id),
                    ..lecture("Not mine", "2025-03-12", "10:00")
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(RollcallError::Forbidden(DenialReason::NotTeamLeader { team_id })) if team_id == green.id
        ));
    }

    #[tokio::test]
    async fn test_staff_team_must_belong_to_offering() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        let elsewhere = campus
            .db
            .create_offering("CS202", "Systems", "spring", 2025)
            .await
            .unwrap();
        let foreign = campus.db.create_team(elsewhere.id, "Far").await.unwrap();

        let result = campus
            .service
            .create_session(
                Some(instructor.id),
                campus.offering.id,
                CreateSessionRequest {
                    team_id: Some(foreign.id),
                    ..lecture("Cross", "2025-03-12", "10:00")
                },
            )
            .await;
        assert!(matches!(result, Err(RollcallError::Validation(_))));
    }

    #[tokio::test]
    async fn test_mutation_requires_ownership() {
        let campus = Campus::new().await;
        let owner = campus.instructor("ines").await;
        let colleague = campus.instructor("ivan").await;
        let id = campus
            .session(&owner, lecture("Mine", "2025-03-12", "07:00"))
            .await
            .session
            .id;

        let check = campus
            .service
            .gate()
            .check_mutation(
                colleague.id,
                &campus.db.find_session(id).await.unwrap().unwrap(),
                codes::ATTENDANCE_OPEN,
            )
            .await
            .unwrap();
        assert!(!check.is_owner);
        assert!(check.holds_permission);

        let result = campus.service.open_attendance(Some(colleague.id), id).await;
        assert!(matches!(
            result,
            Err(RollcallError::Forbidden(DenialReason::NotOwner { session_id })) if session_id == id
        ));

        let result = campus.service.delete_session(Some(colleague.id), id).await;
        assert!(matches!(result, Err(RollcallError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_owner_without_permission_is_denied() {
        let campus = Campus::new().await;
        let leader = campus.student("lee").await;
        let team = campus.team_led_by("Blue", &leader).await;
        let id = campus
            .session(&leader, lecture("Blue sync", "2025-03-12", "07:00"))
            .await
            .session
            .id;

        assert!(campus.db.leave_team(team.id, leader.id).await.unwrap());

        let result = campus.service.open_attendance(Some(leader.id), id).await;
        match result {
            Err(RollcallError::Forbidden(DenialReason::MissingPermission { code })) => {
                assert_eq!(code, codes::ATTENDANCE_OPEN);
            }
            other => panic!("expected missing permission, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_demoted_creator_loses_mutations() {
        let campus = Campus::new().await;
        let owner = campus.instructor("ines").await;
        let id = campus
            .session(&owner, lecture("Lecture", "2025-03-12", "07:00"))
            .await
            .session
            .id;

        campus.enroll(&owner, course_roles::STUDENT).await;

        let result = campus.service.close_attendance(Some(owner.id), id).await;
        assert!(matches!(
            result,
            Err(RollcallError::Forbidden(DenialReason::MissingPermission { .. }))
        ));
    }

    #[tokio::test]
    async fn test_admin_creator_passes_both_predicates() {
        let campus = Campus::new().await;
        let admin = campus.user("root", GlobalRole::Admin).await;
        let created = campus
            .session(&admin, lecture("Ops", "2025-03-12", "07:00"))
            .await;

        let opened = campus
            .service
            .open_attendance(Some(admin.id), created.session.id)
            .await;
        assert!(opened.is_ok());
    }
}
