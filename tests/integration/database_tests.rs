//! Database integration tests
//!
//! Directory and policy operations against a real in-memory SQLite database.

#[cfg(test)]
mod tests {
    use crate::common::TestDatabase;
    use crate::common::database::test_db_config;
    use rollcall_rs::RollcallError;
    use rollcall_rs::auth::rbac::seed_default_policy;
    use rollcall_rs::config::DatabaseConfig;
    use rollcall_rs::core::models::{GlobalRole, PermissionScope, team_roles};
    use rollcall_rs::storage::Database;

    #[tokio::test]
    async fn test_database_health_check() {
        let db = Database::new(&test_db_config()).await;
        assert!(db.is_ok(), "Failed to create database: {:?}", db.err());

        let db = db.unwrap();
        let migrate_result = db.migrate().await;
        assert!(
            migrate_result.is_ok(),
            "Migration failed: {:?}",
            migrate_result.err()
        );

        let health = db.health_check().await;
        assert!(health.is_ok(), "Health check failed: {:?}", health.err());
    }

    #[tokio::test]
    async fn test_unsupported_url_is_config_error() {
        let config = DatabaseConfig {
            url: "mysql://localhost/rollcall".to_string(),
            ..test_db_config()
        };
        assert!(matches!(
            Database::new(&config).await,
            Err(RollcallError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_seeding_twice_adds_no_grants() {
        let db = TestDatabase::seeded().await;
        let again = seed_default_policy(db.db()).await.unwrap();
        assert_eq!(again.new_grants, 0);
        assert_eq!(again.permissions, db.db().list_permissions().await.unwrap().len());
    }

    #[tokio::test]
    async fn test_grant_unknown_code_is_not_found() {
        let db = TestDatabase::seeded().await;
        let result = db
            .db()
            .grant_role_permission(PermissionScope::Course, "student", "sessions.teleport")
            .await;
        assert!(matches!(result, Err(RollcallError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_user_lookup() {
        let db = TestDatabase::new().await;
        let user = db
            .db()
            .create_user("jordan", Some("Jordan"), GlobalRole::Guest)
            .await
            .unwrap();

        let found = db.db().find_user_by_username("jordan").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(db.db().find_user(user.id + 1).await.unwrap().is_none());

        let duplicate = db
            .db()
            .create_user("jordan", None, GlobalRole::Guest)
            .await;
        assert!(matches!(duplicate, Err(RollcallError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_one_active_membership_per_team() {
        let db = TestDatabase::new().await;
        let user = db
            .db()
            .create_user("kim", None, GlobalRole::Student)
            .await
            .unwrap();
        let offering = db
            .db()
            .create_offering("CS101", "Intro", "fall", 2024)
            .await
            .unwrap();
        let team = db.db().create_team(offering.id, "Blue").await.unwrap();

        db.db()
            .add_team_member(team.id, user.id, team_roles::MEMBER)
            .await
            .unwrap();
        let again = db
            .db()
            .add_team_member(team.id, user.id, team_roles::LEADER)
            .await;
        assert!(matches!(again, Err(RollcallError::Conflict(_))));

        assert!(db.db().leave_team(team.id, user.id).await.unwrap());
        assert!(!db.db().leave_team(team.id, user.id).await.unwrap());

        let rejoined = db
            .db()
            .add_team_member(team.id, user.id, team_roles::LEADER)
            .await
            .unwrap();
        assert!(rejoined.is_leader());
        assert_eq!(
            db.db().led_team_ids(user.id, offering.id).await.unwrap(),
            vec![team.id]
        );
    }
}
