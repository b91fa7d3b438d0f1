//! Permission cache behavior through the attendance service

#[cfg(test)]
mod tests {
    use crate::common::{Campus, lecture};
    use crate::common::database::test_db_config;
    use rollcall_rs::config::Config;
    use rollcall_rs::core::models::{codes, course_roles};

    async fn cached_campus() -> Campus {
        let mut config = Config::default();
        config.database = test_db_config();
        Campus::with_config(config).await
    }

    #[tokio::test]
    async fn test_role_change_visible_after_invalidation() {
        let campus = cached_campus().await;
        let resolver = campus.service.resolver();
        let user = campus.student("casey").await;

        assert!(
            !resolver
                .has_permission(user.id, codes::SESSIONS_CREATE, Some(campus.offering.id), None)
                .await
                .unwrap()
        );

        campus.enroll(&user, course_roles::STAFF).await;
        assert!(
            !resolver
                .has_permission(user.id, codes::SESSIONS_CREATE, Some(campus.offering.id), None)
                .await
                .unwrap()
        );

        resolver.invalidate_user(user.id).unwrap();
        assert!(
            resolver
                .has_permission(user.id, codes::SESSIONS_CREATE, Some(campus.offering.id), None)
                .await
                .unwrap()
        );

        let created = campus
            .session(&user, lecture("Promoted", "2025-03-12", "10:00"))
            .await;
        assert_eq!(created.session.created_by, user.id);
    }

    #[tokio::test]
    async fn test_clear_cache_resets_entries() {
        let campus = cached_campus().await;
        let resolver = campus.service.resolver();
        let user = campus.student("casey").await;

        for code in [codes::SESSIONS_VIEW, codes::ATTENDANCE_CHECK_IN] {
            assert!(
                resolver
                    .has_permission(user.id, code, Some(campus.offering.id), None)
                    .await
                    .unwrap()
            );
        }
        resolver.cache().sync().await;
        assert_eq!(resolver.cache_stats().entries, 2);

        resolver.clear_cache();
        resolver.cache().sync().await;
        assert_eq!(resolver.cache_stats().entries, 0);
    }
}
