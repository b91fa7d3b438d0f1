use crate::core::attendance::CodeRegistry;
use crate::core::models::{
    AttendanceRecord, NewSession, OfferingId, Session, SessionId, SessionQuestion, UserId,
};
use crate::utils::error::{Result, RollcallError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, attendance_record, attendance_session, session_question};
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Insert a session; a code already held by an active session is a conflict
    pub async fn insert_session(&self, new: NewSession, now: DateTime<Utc>) -> Result<Session> {
        debug!(
            "Inserting session '{}' for offering {} (team {:?})",
            new.title, new.offering_id, new.team_id
        );

        let model = attendance_session::ActiveModel {
            offering_id: Set(new.offering_id),
            team_id: Set(new.team_id),
            title: Set(new.title),
            session_date: Set(new.session_date),
            session_time: Set(new.session_time),
            access_code: Set(new.access_code),
            code_expires_at: Set(new.code_expires_at.into()),
            attendance_opened_at: Set(None),
            attendance_closed_at: Set(None),
            is_active: Set(true),
            created_by: Set(new.created_by),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(model.to_domain())
    }

    pub async fn find_session(&self, session_id: SessionId) -> Result<Option<Session>> {
        let model = entities::AttendanceSession::find_by_id(session_id)
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.to_domain()))
    }

    /// Session holding `code`, preferring the active holder over retired ones
    pub async fn find_session_by_code(&self, code: &str) -> Result<Option<Session>> {
        let model = entities::AttendanceSession::find()
            .filter(attendance_session::Column::AccessCode.eq(code))
            .order_by_desc(attendance_session::Column::IsActive)
            .order_by_desc(attendance_session::Column::Id)
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.to_domain()))
    }

    /// Active sessions of an offering in schedule order
    pub async fn list_active_sessions(&self, offering_id: OfferingId) -> Result<Vec<Session>> {
        debug!("Listing active sessions for offering {}", offering_id);

        let models = entities::AttendanceSession::find()
            .filter(attendance_session::Column::OfferingId.eq(offering_id))
            .filter(attendance_session::Column::IsActive.eq(true))
            .order_by_asc(attendance_session::Column::SessionDate)
            .order_by_asc(attendance_session::Column::SessionTime)
            .order_by_asc(attendance_session::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.iter().map(|m| m.to_domain()).collect())
    }

    /// Stamp the auto-open time unless another writer already did
    ///
    /// `code_expires_at` restarts a lapsed code window in the same write.
    /// Returns whether this call wrote the stamp.
    pub async fn auto_open_session(
        &self,
        session_id: SessionId,
        now: DateTime<Utc>,
        code_expires_at: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        let mut update = entities::AttendanceSession::update_many()
            .col_expr(
                attendance_session::Column::AttendanceOpenedAt,
                Expr::value(now.fixed_offset()),
            )
            .col_expr(
                attendance_session::Column::UpdatedAt,
                Expr::value(now.fixed_offset()),
            );
        if let Some(expires) = code_expires_at {
            update = update.col_expr(
                attendance_session::Column::CodeExpiresAt,
                Expr::value(expires.fixed_offset()),
            );
        }

        let result = update
            .filter(attendance_session::Column::Id.eq(session_id))
            .filter(attendance_session::Column::AttendanceOpenedAt.is_null())
            .filter(attendance_session::Column::AttendanceClosedAt.is_null())
            .filter(attendance_session::Column::IsActive.eq(true))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            debug!("Auto-opened session {} at {}", session_id, now);
        }
        Ok(result.rows_affected > 0)
    }

    /// Record an explicit open: stamp `opened_at`, clear `closed_at`
    pub async fn mark_session_opened(
        &self,
        session_id: SessionId,
        opened_at: DateTime<Utc>,
        code_expires_at: Option<DateTime<Utc>>,
    ) -> Result<Session> {
        let mut active: attendance_session::ActiveModel =
            self.session_model(session_id).await?.into();
        active.attendance_opened_at = Set(Some(opened_at.into()));
        active.attendance_closed_at = Set(None);
        if let Some(expires) = code_expires_at {
            active.code_expires_at = Set(expires.into());
        }
        active.updated_at = Set(opened_at.into());
        Ok(active.update(&self.db).await?.to_domain())
    }

    pub async fn mark_session_closed(
        &self,
        session_id: SessionId,
        closed_at: DateTime<Utc>,
    ) -> Result<Session> {
        let mut active: attendance_session::ActiveModel =
            self.session_model(session_id).await?.into();
        active.attendance_closed_at = Set(Some(closed_at.into()));
        active.updated_at = Set(closed_at.into());
        Ok(active.update(&self.db).await?.to_domain())
    }

    /// Persist title, schedule and code window of an edited session
    pub async fn save_session_details(
        &self,
        session: &Session,
        now: DateTime<Utc>,
    ) -> Result<Session> {
        let mut active: attendance_session::ActiveModel =
            self.session_model(session.id).await?.into();
        active.title = Set(session.title.clone());
        active.session_date = Set(session.session_date);
        active.session_time = Set(session.session_time);
        active.code_expires_at = Set(session.code_expires_at.into());
        active.updated_at = Set(now.into());
        Ok(active.update(&self.db).await?.to_domain())
    }

    pub async fn set_session_active(
        &self,
        session_id: SessionId,
        is_active: bool,
        now: DateTime<Utc>,
    ) -> Result<Session> {
        let mut active: attendance_session::ActiveModel =
            self.session_model(session_id).await?.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(now.into());
        Ok(active.update(&self.db).await?.to_domain())
    }

    /// Hard delete; questions and check-ins go with the session
    pub async fn delete_session(&self, session_id: SessionId) -> Result<bool> {
        debug!("Deleting session {}", session_id);

        let txn = self.db.begin().await?;
        entities::SessionQuestion::delete_many()
            .filter(session_question::Column::SessionId.eq(session_id))
            .exec(&txn)
            .await?;
        entities::AttendanceRecord::delete_many()
            .filter(attendance_record::Column::SessionId.eq(session_id))
            .exec(&txn)
            .await?;
        let result = entities::AttendanceSession::delete_by_id(session_id)
            .exec(&txn)
            .await?;
        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn session_model(&self, session_id: SessionId) -> Result<attendance_session::Model> {
        entities::AttendanceSession::find_by_id(session_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| RollcallError::not_found(format!("Session {} not found", session_id)))
    }

    /// Append questions after the ones already attached
    pub async fn insert_questions(
        &self,
        session_id: SessionId,
        prompts: &[String],
        now: DateTime<Utc>,
    ) -> Result<Vec<SessionQuestion>> {
        let txn = self.db.begin().await?;

        let last: Option<i32> = entities::SessionQuestion::find()
            .select_only()
            .column_as(session_question::Column::Position.max(), "max_position")
            .filter(session_question::Column::SessionId.eq(session_id))
            .into_tuple::<Option<i32>>()
            .one(&txn)
            .await?
            .flatten();

        let mut questions = Vec::with_capacity(prompts.len());
        for (offset, prompt) in prompts.iter().enumerate() {
            let position = last.unwrap_or(0) + offset as i32 + 1;
            let model = session_question::ActiveModel {
                session_id: Set(session_id),
                position: Set(position),
                prompt: Set(prompt.clone()),
                created_at: Set(now.into()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            questions.push(model.to_domain());
        }

        txn.commit().await?;
        debug!(
            "Attached {} questions to session {}",
            questions.len(),
            session_id
        );
        Ok(questions)
    }

    pub async fn list_questions(&self, session_id: SessionId) -> Result<Vec<SessionQuestion>> {
        let models = entities::SessionQuestion::find()
            .filter(session_question::Column::SessionId.eq(session_id))
            .order_by_asc(session_question::Column::Position)
            .all(&self.db)
            .await?;
        Ok(models.iter().map(|m| m.to_domain()).collect())
    }

    /// Record a check-in; a second check-in by the same user is a conflict
    pub async fn record_check_in(
        &self,
        session_id: SessionId,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<AttendanceRecord> {
        let model = attendance_record::ActiveModel {
            session_id: Set(session_id),
            user_id: Set(user_id),
            checked_in_at: Set(now.into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(model.to_domain())
    }

    pub async fn list_check_ins(&self, session_id: SessionId) -> Result<Vec<AttendanceRecord>> {
        let models = entities::AttendanceRecord::find()
            .filter(attendance_record::Column::SessionId.eq(session_id))
            .order_by_asc(attendance_record::Column::CheckedInAt)
            .all(&self.db)
            .await?;
        Ok(models.iter().map(|m| m.to_domain()).collect())
    }
}

#[async_trait]
impl CodeRegistry for SeaOrmDatabase {
    async fn is_code_in_use(&self, code: &str) -> Result<bool> {
        let holders = entities::AttendanceSession::find()
            .filter(attendance_session::Column::AccessCode.eq(code))
            .filter(attendance_session::Column::IsActive.eq(true))
            .count(&self.db)
            .await?;
        Ok(holders > 0)
    }
}
