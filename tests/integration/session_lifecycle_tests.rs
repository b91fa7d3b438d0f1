//! Session lifecycle integration tests
//!
//! Every campus starts at 2025-03-12 08:00 UTC on a manual clock.

#[cfg(test)]
mod tests {
    use crate::common::{Campus, at, lecture};
    use chrono::Duration;
    use rollcall_rs::RollcallError;
    use rollcall_rs::core::models::{
        CodeVerification, CreateSessionRequest, SessionStatus, UpdateSessionRequest,
    };

    #[tokio::test]
    async fn test_past_session_auto_opens_on_listing() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;

        let created = campus
            .session(&instructor, lecture("Yesterday", "2025-03-11", "09:00"))
            .await;
        assert!(created.session.attendance_opened_at.is_none());

        let listed = campus
            .service
            .get_sessions_by_offering(campus.offering.id, Some(instructor.id))
            .await
            .unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, SessionStatus::Open);
        assert_eq!(
            listed[0].session.attendance_opened_at,
            Some(at("2025-03-12", 8, 0))
        );
    }

    #[tokio::test]
    async fn test_yesterday_session_auto_opens_after_code_window_lapsed() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        let created = campus
            .session(&instructor, lecture("Yesterday", "2025-03-11", "09:00"))
            .await;
        assert_eq!(created.session.code_expires_at, at("2025-03-12", 9, 0));

        campus.clock.set(at("2025-03-12", 10, 0));
        let listed = campus
            .service
            .get_sessions_by_offering(campus.offering.id, Some(instructor.id))
            .await
            .unwrap();

        assert_eq!(listed[0].status, SessionStatus::Open);
        assert_eq!(
            listed[0].session.attendance_opened_at,
            Some(at("2025-03-12", 10, 0))
        );
        assert_eq!(listed[0].session.code_expires_at, at("2025-03-13", 10, 0));
        assert!(
            campus
                .service
                .verify_access_code(&created.session.access_code)
                .await
                .unwrap()
                .is_valid()
        );
    }

    #[tokio::test]
    async fn test_second_auto_open_writer_keeps_first_stamp() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        let id = campus
            .session(&instructor, lecture("Morning", "2025-03-12", "07:30"))
            .await
            .session
            .id;

        let first = at("2025-03-12", 8, 0);
        let second = at("2025-03-12", 8, 5);
        assert!(campus.db.auto_open_session(id, first, None).await.unwrap());
        assert!(!campus.db.auto_open_session(id, second, None).await.unwrap());

        let stored = campus.db.find_session(id).await.unwrap().unwrap();
        assert_eq!(stored.attendance_opened_at, Some(first));
        assert_eq!(stored.updated_at, first);
    }

    #[tokio::test]
    async fn test_concurrent_listings_agree_on_auto_open_stamp() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        let student = campus.student("sam").await;
        campus
            .session(&instructor, lecture("Morning", "2025-03-12", "07:30"))
            .await;

        let (by_instructor, by_student) = tokio::join!(
            campus
                .service
                .get_sessions_by_offering(campus.offering.id, Some(instructor.id)),
            campus
                .service
                .get_sessions_by_offering(campus.offering.id, Some(student.id)),
        );
        let by_instructor = by_instructor.unwrap();
        let by_student = by_student.unwrap();

        assert_eq!(
            by_instructor[0].session.attendance_opened_at,
            Some(at("2025-03-12", 8, 0))
        );
        assert_eq!(
            by_student[0].session.attendance_opened_at,
            by_instructor[0].session.attendance_opened_at
        );
    }

    #[tokio::test]
    async fn test_auto_open_happens_once() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        campus
            .session(&instructor, lecture("Morning", "2025-03-12", "07:30"))
            .await;

        let first = campus
            .service
            .get_sessions_by_offering(campus.offering.id, Some(instructor.id))
            .await
            .unwrap();
        campus.clock.advance(Duration::minutes(20));
        let second = campus
            .service
            .get_sessions_by_offering(campus.offering.id, Some(instructor.id))
            .await
            .unwrap();

        let opened = first[0].session.attendance_opened_at;
        assert_eq!(opened, Some(at("2025-03-12", 8, 0)));
        assert_eq!(second[0].session.attendance_opened_at, opened);
    }

    #[tokio::test]
    async fn test_future_session_is_pending_and_cannot_open() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;

        let created = campus
            .session(&instructor, lecture("Tomorrow", "2025-03-13", "10:00"))
            .await;
        assert_eq!(created.status, SessionStatus::Pending);
        assert_eq!(created.session.access_code.len(), 6);
        assert_eq!(
            created.session.code_expires_at,
            at("2025-03-14", 10, 0)
        );

        let listed = campus
            .service
            .get_sessions_by_offering(campus.offering.id, Some(instructor.id))
            .await
            .unwrap();
        assert!(listed[0].session.attendance_opened_at.is_none());

        let result = campus
            .service
            .open_attendance(Some(instructor.id), created.session.id)
            .await;
        assert!(matches!(result, Err(RollcallError::Validation(_))));

        let result = campus
            .service
            .close_attendance(Some(instructor.id), created.session.id)
            .await;
        assert!(matches!(result, Err(RollcallError::Validation(_))));
    }

    #[tokio::test]
    async fn test_open_is_idempotent() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        let created = campus
            .session(&instructor, lecture("Lab", "2025-03-12", "07:00"))
            .await;
        let id = created.session.id;

        let opened = campus
            .service
            .open_attendance(Some(instructor.id), id)
            .await
            .unwrap();
        assert_eq!(opened.status, SessionStatus::Open);

        campus.clock.advance(Duration::minutes(10));
        let again = campus
            .service
            .open_attendance(Some(instructor.id), id)
            .await
            .unwrap();

        assert_eq!(again.status, SessionStatus::Open);
        assert_eq!(
            again.session.attendance_opened_at,
            opened.session.attendance_opened_at
        );
        assert_eq!(again.session.updated_at, opened.session.updated_at);
    }

    #[tokio::test]
    async fn test_close_then_reopen() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        let id = campus
            .session(&instructor, lecture("Lab", "2025-03-12", "07:00"))
            .await
            .session
            .id;

        campus
            .service
            .open_attendance(Some(instructor.id), id)
            .await
            .unwrap();
        campus.clock.advance(Duration::minutes(15));

        let closed = campus
            .service
            .close_attendance(Some(instructor.id), id)
            .await
            .unwrap();
        assert_eq!(closed.status, SessionStatus::Closed);
        assert_eq!(
            closed.session.attendance_closed_at,
            Some(at("2025-03-12", 8, 15))
        );

        campus.clock.advance(Duration::minutes(5));
        let closed_again = campus
            .service
            .close_attendance(Some(instructor.id), id)
            .await
            .unwrap();
        assert_eq!(
            closed_again.session.attendance_closed_at,
            closed.session.attendance_closed_at
        );

        let reopened = campus
            .service
            .open_attendance(Some(instructor.id), id)
            .await
            .unwrap();
        assert_eq!(reopened.status, SessionStatus::Open);
        assert_eq!(reopened.session.attendance_closed_at, None);
        assert_eq!(
            reopened.session.attendance_opened_at,
            Some(at("2025-03-12", 8, 20))
        );
    }

    #[tokio::test]
    async fn test_reopen_extends_lapsed_code() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        let request = CreateSessionRequest {
            ends_at: Some(at("2025-03-12", 8, 30)),
            ..lecture("Short", "2025-03-12", "07:45")
        };
        let id = campus.session(&instructor, request).await.session.id;

        campus
            .service
            .open_attendance(Some(instructor.id), id)
            .await
            .unwrap();
        campus.clock.set(at("2025-03-12", 9, 0));

        let lapsed = campus
            .service
            .get_sessions_by_offering(campus.offering.id, Some(instructor.id))
            .await
            .unwrap();
        assert_eq!(lapsed[0].status, SessionStatus::Closed);

        let reopened = campus
            .service
            .open_attendance(Some(instructor.id), id)
            .await
            .unwrap();
        assert_eq!(reopened.status, SessionStatus::Open);
        assert_eq!(reopened.session.code_expires_at, at("2025-03-13", 9, 0));
    }

    #[tokio::test]
    async fn test_end_before_start_is_rejected() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        let request = CreateSessionRequest {
            ends_at: Some(at("2025-03-12", 9, 0)),
            ..lecture("Backwards", "2025-03-12", "10:00")
        };

        let result = campus
            .service
            .create_session(Some(instructor.id), campus.offering.id, request)
            .await;
        assert!(matches!(result, Err(RollcallError::Validation(_))));
    }

    #[tokio::test]
    async fn test_malformed_schedule_is_rejected() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;

        for request in [
            lecture("Bad date", "12/03/2025", "10:00"),
            lecture("Bad time", "2025-03-12", "25:61"),
            lecture("   ", "2025-03-12", "10:00"),
        ] {
            let result = campus
                .service
                .create_session(Some(instructor.id), campus.offering.id, request)
                .await;
            assert!(matches!(result, Err(RollcallError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthenticated() {
        let campus = Campus::new().await;

        let result = campus
            .service
            .create_session(None, campus.offering.id, lecture("Anon", "2025-03-12", "10:00"))
            .await;
        assert!(matches!(result, Err(RollcallError::Unauthenticated(_))));

        let result = campus
            .service
            .get_sessions_by_offering(campus.offering.id, None)
            .await;
        assert!(matches!(result, Err(RollcallError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn test_verify_access_code_reasons() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;

        let unknown = campus.service.verify_access_code("ZZZZZZ").await.unwrap();
        assert_eq!(unknown, CodeVerification::NotFound);

        let pending = campus
            .session(&instructor, lecture("Later", "2025-03-12", "12:00"))
            .await;
        assert_eq!(
            campus
                .service
                .verify_access_code(&pending.session.access_code)
                .await
                .unwrap(),
            CodeVerification::NotOpen(SessionStatus::Pending)
        );

        let live = campus
            .session(&instructor, lecture("Now", "2025-03-12", "07:55"))
            .await;
        let typed = format!("  {} ", live.session.access_code.to_lowercase());
        let verified = campus.service.verify_access_code(&typed).await.unwrap();
        assert!(verified.is_valid());

        campus
            .service
            .close_attendance(Some(instructor.id), live.session.id)
            .await
            .unwrap();
        assert_eq!(
            campus
                .service
                .verify_access_code(&live.session.access_code)
                .await
                .unwrap(),
            CodeVerification::NotOpen(SessionStatus::Closed)
        );

        campus
            .service
            .deactivate_session(Some(instructor.id), live.session.id)
            .await
            .unwrap();
        assert_eq!(
            campus
                .service
                .verify_access_code(&live.session.access_code)
                .await
                .unwrap(),
            CodeVerification::Inactive
        );

        campus.clock.set(at("2025-03-14", 0, 0));
        assert_eq!(
            campus
                .service
                .verify_access_code(&pending.session.access_code)
                .await
                .unwrap(),
            CodeVerification::Expired
        );
    }

    #[tokio::test]
    async fn test_update_session_recomputes_code_window() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        let id = campus
            .session(&instructor, lecture("Draft", "2025-03-13", "10:00"))
            .await
            .session
            .id;

        let updated = campus
            .service
            .update_session(
                Some(instructor.id),
                id,
                UpdateSessionRequest {
                    title: Some("Week 2 lecture".to_string()),
                    session_time: Some("14:30".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.session.title, "Week 2 lecture");
        assert_eq!(updated.session.scheduled_start(), at("2025-03-13", 14, 30));
        assert_eq!(updated.session.code_expires_at, at("2025-03-14", 14, 30));

        let result = campus
            .service
            .update_session(Some(instructor.id), id, UpdateSessionRequest::default())
            .await;
        assert!(matches!(result, Err(RollcallError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_session_removes_code() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        let created = campus
            .session(&instructor, lecture("Oops", "2025-03-12", "10:00"))
            .await;

        campus
            .service
            .delete_session(Some(instructor.id), created.session.id)
            .await
            .unwrap();

        assert!(
            campus
                .db
                .find_session(created.session.id)
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(
            campus
                .service
                .verify_access_code(&created.session.access_code)
                .await
                .unwrap(),
            CodeVerification::NotFound
        );
    }

    #[tokio::test]
    async fn test_delete_session_removes_questions_and_check_ins() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        let student = campus.student("sam").await;
        let created = campus
            .session(&instructor, lecture("Live", "2025-03-12", "07:50"))
            .await;
        let id = created.session.id;

        campus
            .service
            .add_questions(Some(instructor.id), id, vec!["Present?".to_string()])
            .await
            .unwrap();
        campus
            .service
            .check_in(Some(student.id), &created.session.access_code)
            .await
            .unwrap();

        assert!(campus.db.delete_session(id).await.unwrap());
        assert!(campus.db.list_questions(id).await.unwrap().is_empty());
        assert!(campus.db.list_check_ins(id).await.unwrap().is_empty());
        assert!(!campus.db.delete_session(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_questions_are_appended_in_order() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        let student = campus.student("sam").await;
        let id = campus
            .session(&instructor, lecture("Quiz", "2025-03-12", "10:00"))
            .await
            .session
            .id;

        let first = campus
            .service
            .add_questions(
                Some(instructor.id),
                id,
                vec!["What is ownership?".to_string(), "  ".to_string(), "What is a borrow?".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(first.len(), 2);

        campus
            .service
            .add_questions(Some(instructor.id), id, vec!["What is a lifetime?".to_string()])
            .await
            .unwrap();

        let questions = campus
            .service
            .list_questions(Some(student.id), id)
            .await
            .unwrap();
        let positions: Vec<i32> = questions.iter().map(|q| q.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(questions[2].prompt, "What is a lifetime?");

        let result = campus
            .service
            .add_questions(Some(instructor.id), id, vec!["   ".to_string()])
            .await;
        assert!(matches!(result, Err(RollcallError::Validation(_))));
    }

    #[tokio::test]
    async fn test_check_in_records_once() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        let student = campus.student("sam").await;
        let code = campus
            .session(&instructor, lecture("Live", "2025-03-12", "07:50"))
            .await
            .session
            .access_code;

        let record = campus
            .service
            .check_in(Some(student.id), &code.to_lowercase())
            .await
            .unwrap();
        assert_eq!(record.user_id, student.id);
        assert_eq!(record.checked_in_at, at("2025-03-12", 8, 0));

        let again = campus.service.check_in(Some(student.id), &code).await;
        assert!(matches!(again, Err(RollcallError::Conflict(_))));

        let unknown = campus.service.check_in(Some(student.id), "QQQQQQ").await;
        assert!(matches!(unknown, Err(RollcallError::NotFound(_))));

        let roster = campus
            .service
            .list_check_ins(Some(instructor.id), record.session_id)
            .await
            .unwrap();
        assert_eq!(roster.len(), 1);
    }
}
