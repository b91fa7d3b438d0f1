//! Access code allocation against the session store

#[cfg(test)]
mod tests {
    use crate::common::{Campus, lecture};
    use crate::common::fixtures::default_now;
    use chrono::{Duration, NaiveDate, NaiveTime};
    use parking_lot::Mutex;
    use rollcall_rs::config::AccessCodeConfig;
    use rollcall_rs::core::attendance::{
        AccessCodeGenerator, CandidateSource, CodeRegistry, normalize_code,
    };
    use rollcall_rs::core::attendance::access_code::AMBIGUOUS_CHARACTERS;
    use rollcall_rs::core::models::NewSession;
    use rollcall_rs::{Database, RollcallError};
    use std::collections::VecDeque;
    use std::sync::Arc;

    struct ScriptedSource {
        codes: Mutex<VecDeque<&'static str>>,
        draws: Mutex<u32>,
    }

    impl ScriptedSource {
        fn new(codes: &[&'static str]) -> Self {
            Self {
                codes: Mutex::new(codes.iter().copied().collect()),
                draws: Mutex::new(0),
            }
        }

        fn draws(&self) -> u32 {
            *self.draws.lock()
        }
    }

    impl CandidateSource for ScriptedSource {
        fn draw(&self, _alphabet: &[char], _length: usize) -> String {
            *self.draws.lock() += 1;
            self.codes.lock().pop_front().unwrap_or("ZZZZZZ").to_string()
        }
    }

    async fn hold_code(campus: &Campus, creator: i64, code: &str) -> i64 {
        campus
            .db
            .insert_session(
                NewSession {
                    offering_id: campus.offering.id,
                    team_id: None,
                    title: "Existing".to_string(),
                    session_date: NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
                    session_time: NaiveTime::from_hms_opt(9, 0, 0),
                    access_code: code.to_string(),
                    code_expires_at: default_now() + Duration::hours(25),
                    created_by: creator,
                },
                default_now(),
            )
            .await
            .unwrap()
            .id
    }

    fn generator(db: Arc<Database>, source: Arc<ScriptedSource>) -> AccessCodeGenerator {
        AccessCodeGenerator::with_source(&AccessCodeConfig::default(), db, source).unwrap()
    }

    #[tokio::test]
    async fn test_generator_skips_code_held_by_active_session() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        hold_code(&campus, instructor.id, "ABC123").await;

        let source = Arc::new(ScriptedSource::new(&["ABC123", "HJK789"]));
        let code = generator(campus.db.clone(), source.clone())
            .generate_unique_access_code()
            .await
            .unwrap();

        assert_ne!(code, "ABC123");
        assert_eq!(code, "HJK789");
        assert_eq!(source.draws(), 2);
    }

    #[tokio::test]
    async fn test_retired_session_releases_its_code() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        let id = hold_code(&campus, instructor.id, "ABC123").await;

        assert!(campus.db.is_code_in_use("ABC123").await.unwrap());
        campus
            .db
            .set_session_active(id, false, default_now())
            .await
            .unwrap();
        assert!(!campus.db.is_code_in_use("ABC123").await.unwrap());

        let source = Arc::new(ScriptedSource::new(&["ABC123"]));
        let code = generator(campus.db.clone(), source.clone())
            .generate_unique_access_code()
            .await
            .unwrap();
        assert_eq!(code, "ABC123");
        assert_eq!(source.draws(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_active_code_is_a_conflict() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;
        hold_code(&campus, instructor.id, "ABC123").await;

        let result = campus
            .db
            .insert_session(
                NewSession {
                    offering_id: campus.offering.id,
                    team_id: None,
                    title: "Racer".to_string(),
                    session_date: NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
                    session_time: None,
                    access_code: "ABC123".to_string(),
                    code_expires_at: default_now() + Duration::hours(24),
                    created_by: instructor.id,
                },
                default_now(),
            )
            .await;
        assert!(matches!(result, Err(RollcallError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_created_sessions_get_distinct_readable_codes() {
        let campus = Campus::new().await;
        let instructor = campus.instructor("ines").await;

        let mut codes = Vec::new();
        for day in 13..=20 {
            let view = campus
                .session(
                    &instructor,
                    lecture("Lecture", &format!("2025-03-{}", day), "10:00"),
                )
                .await;
            codes.push(view.session.access_code);
        }

        for code in &codes {
            assert_eq!(code.len(), 6);
            assert_eq!(&normalize_code(code), code);
            assert!(!code.chars().any(|c| AMBIGUOUS_CHARACTERS.contains(&c)));
        }
        let mut unique = codes.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), codes.len());
    }
}
