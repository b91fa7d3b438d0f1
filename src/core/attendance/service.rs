//! Attendance session operations
//!
//! Every entry point takes the caller's optional identity, runs it through the
//! authorization gate and then applies a lifecycle transition against the store.

use crate::auth::{AuthorizationGate, DenialReason, PermissionResolver, require_identity};
use crate::config::{Config, SessionConfig};
use crate::core::clock::{Clock, SystemClock};
use crate::core::models::{
    AttendanceRecord, CodeVerification, CreateSessionRequest, NewSession, OfferingId, Session,
    SessionId, SessionQuestion, SessionStatus, SessionView, UpdateSessionRequest, UserId, codes,
};
use crate::storage::Database;
use crate::utils::error::{Result, RollcallError};
use crate::utils::logging::SecurityLogger;
use std::sync::Arc;
use tracing::{debug, info};

use super::access_code::{AccessCodeGenerator, normalize_code};
use super::lifecycle::{self, CloseTransition, OpenTransition, Schedule};
use super::visibility::VisibilityFilter;

/// Attendance session service
#[derive(Debug, Clone)]
pub struct AttendanceService {
    db: Arc<Database>,
    gate: AuthorizationGate,
    generator: Arc<AccessCodeGenerator>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
}

impl AttendanceService {
    pub fn new(
        db: Arc<Database>,
        gate: AuthorizationGate,
        generator: AccessCodeGenerator,
        clock: Arc<dyn Clock>,
        config: SessionConfig,
    ) -> Self {
        Self {
            db,
            gate,
            generator: Arc::new(generator),
            clock,
            config,
        }
    }

    /// Wire the service from configuration, using the store as the code registry
    pub fn from_config(db: Arc<Database>, config: &Config) -> Result<Self> {
        Self::with_clock(db, config, Arc::new(SystemClock))
    }

    pub fn with_clock(db: Arc<Database>, config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let resolver = PermissionResolver::new(db.clone(), &config.permissions);
        let gate = AuthorizationGate::new(resolver, db.clone());
        let generator = AccessCodeGenerator::new(&config.access_codes, db.clone())?;
        Ok(Self::new(
            db,
            gate,
            generator,
            clock,
            config.sessions.clone(),
        ))
    }

    pub fn gate(&self) -> &AuthorizationGate {
        &self.gate
    }

    pub fn resolver(&self) -> &PermissionResolver {
        self.gate.resolver()
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Create a PENDING session with a freshly minted access code
    pub async fn create_session(
        &self,
        identity: Option<UserId>,
        offering_id: OfferingId,
        request: CreateSessionRequest,
    ) -> Result<SessionView> {
        let user_id = require_identity_for(identity, codes::SESSIONS_CREATE)?;
        self.require_offering(offering_id).await?;

        let title = required_title(&request.title)?;
        let schedule = Schedule::parse(&request.session_date, request.session_time.as_deref())?;
        let code_expires_at =
            lifecycle::code_expiry(schedule.start(), request.ends_at, self.config.code_window())?;

        let scope = self
            .gate
            .resolve_create_scope(user_id, offering_id, request.team_id)
            .await?;

        let access_code = self.generator.generate_unique_access_code().await?;
        let now = self.clock.now();
        let session = self
            .db
            .insert_session(
                NewSession {
                    offering_id,
                    team_id: scope.team_id(),
                    title,
                    session_date: schedule.date,
                    session_time: schedule.time,
                    access_code,
                    code_expires_at,
                    created_by: user_id,
                },
                now,
            )
            .await?;

        info!(
            "User {} created session {} in offering {} (team {:?}), code expires at {}",
            user_id, session.id, offering_id, session.team_id, session.code_expires_at
        );
        Ok(SessionView::at(session, now))
    }

    /// Open attendance; repeated opens leave the stored stamp untouched
    pub async fn open_attendance(
        &self,
        identity: Option<UserId>,
        session_id: SessionId,
    ) -> Result<SessionView> {
        let user_id = require_identity_for(identity, codes::ATTENDANCE_OPEN)?;
        let session = self.require_session(session_id).await?;
        self.gate
            .authorize_mutation(user_id, &session, codes::ATTENDANCE_OPEN)
            .await?;

        let now = self.clock.now();
        let session = match lifecycle::plan_open(&session, now, self.config.code_window())? {
            OpenTransition::Unchanged => {
                debug!("Session {} is already open", session_id);
                session
            }
            OpenTransition::Open {
                opened_at,
                code_expires_at,
            } => {
                let session = self
                    .db
                    .mark_session_opened(session_id, opened_at, code_expires_at)
                    .await?;
                info!("User {} opened attendance for session {}", user_id, session_id);
                session
            }
        };
        Ok(SessionView::at(session, now))
    }

    /// Close attendance; closing a closed session succeeds without a write
    pub async fn close_attendance(
        &self,
        identity: Option<UserId>,
        session_id: SessionId,
    ) -> Result<SessionView> {
        let user_id = require_identity_for(identity, codes::ATTENDANCE_CLOSE)?;
        let session = self.require_session(session_id).await?;
        self.gate
            .authorize_mutation(user_id, &session, codes::ATTENDANCE_CLOSE)
            .await?;

        let now = self.clock.now();
        let session = match lifecycle::plan_close(&session, now)? {
            CloseTransition::Unchanged => {
                debug!("Session {} is already closed", session_id);
                session
            }
            CloseTransition::Close { closed_at } => {
                let session = self.db.mark_session_closed(session_id, closed_at).await?;
                info!("User {} closed attendance for session {}", user_id, session_id);
                session
            }
        };
        Ok(SessionView::at(session, now))
    }

    /// Check a user-typed access code
    ///
    /// A session whose start has passed gets its auto-open stamp here as well,
    /// so a code is usable before anyone has listed the offering.
    pub async fn verify_access_code(&self, code: &str) -> Result<CodeVerification> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Ok(CodeVerification::NotFound);
        }

        let Some(session) = self.db.find_session_by_code(&code).await? else {
            debug!("Access code {} matches no session", code);
            return Ok(CodeVerification::NotFound);
        };
        if !session.is_active {
            return Ok(CodeVerification::Inactive);
        }

        let now = self.clock.now();
        if session.code_expires_at <= now {
            return Ok(CodeVerification::Expired);
        }

        let session = self.auto_open(session, now).await?;
        match session.status_at(now) {
            SessionStatus::Open => Ok(CodeVerification::Valid(session)),
            status => Ok(CodeVerification::NotOpen(status)),
        }
    }

    /// Sessions of an offering the caller may see, auto-opening due ones
    pub async fn get_sessions_by_offering(
        &self,
        offering_id: OfferingId,
        identity: Option<UserId>,
    ) -> Result<Vec<SessionView>> {
        let user_id = require_identity_for(identity, codes::SESSIONS_VIEW)?;
        self.require_offering(offering_id).await?;
        self.gate.authorize_listing(user_id, offering_id).await?;

        let now = self.clock.now();
        let sessions = self.db.list_active_sessions(offering_id).await?;
        let mut opened = Vec::with_capacity(sessions.len());
        for session in sessions {
            opened.push(self.auto_open(session, now).await?);
        }

        let filter = VisibilityFilter::new(self.db.active_team_ids(user_id, offering_id).await?);
        let visible = filter.apply(opened);
        debug!(
            "User {} sees {} session(s) in offering {}",
            user_id,
            visible.len(),
            offering_id
        );

        Ok(visible
            .into_iter()
            .map(|session| SessionView::at(session, now))
            .collect())
    }

    pub async fn user_can_create_session(
        &self,
        user_id: UserId,
        offering_id: OfferingId,
    ) -> Result<bool> {
        self.gate.user_can_create_session(user_id, offering_id).await
    }

    /// Edit title, schedule or code window
    ///
    /// A schedule change without an explicit end resets the code window to the
    /// default length after the new start.
    pub async fn update_session(
        &self,
        identity: Option<UserId>,
        session_id: SessionId,
        request: UpdateSessionRequest,
    ) -> Result<SessionView> {
        let user_id = require_identity_for(identity, codes::SESSIONS_UPDATE)?;
        if request.is_empty() {
            return Err(RollcallError::validation("No fields to update"));
        }

        let mut session = self.require_session(session_id).await?;
        self.gate
            .authorize_mutation(user_id, &session, codes::SESSIONS_UPDATE)
            .await?;

        if let Some(title) = &request.title {
            session.title = required_title(title)?;
        }

        let schedule_changed = request.session_date.is_some() || request.session_time.is_some();
        if schedule_changed {
            let date = request
                .session_date
                .clone()
                .unwrap_or_else(|| session.session_date.format("%Y-%m-%d").to_string());
            let time = match &request.session_time {
                Some(time) => Some(time.clone()),
                None => session
                    .session_time
                    .map(|t| t.format("%H:%M:%S").to_string()),
            };
            let schedule = Schedule::parse(&date, time.as_deref())?;
            session.session_date = schedule.date;
            session.session_time = schedule.time;
        }

        if schedule_changed || request.ends_at.is_some() {
            session.code_expires_at = lifecycle::code_expiry(
                session.scheduled_start(),
                request.ends_at,
                self.config.code_window(),
            )?;
        }

        let now = self.clock.now();
        let session = self.db.save_session_details(&session, now).await?;
        info!("User {} updated session {}", user_id, session_id);
        Ok(SessionView::at(session, now))
    }

    /// Remove a session together with its questions and check-ins
    pub async fn delete_session(&self, identity: Option<UserId>, session_id: SessionId) -> Result<()> {
        let user_id = require_identity_for(identity, codes::SESSIONS_DELETE)?;
        let session = self.require_session(session_id).await?;
        self.gate
            .authorize_mutation(user_id, &session, codes::SESSIONS_DELETE)
            .await?;

        self.db.delete_session(session_id).await?;
        info!("User {} deleted session {}", user_id, session_id);
        Ok(())
    }

    /// Retire a session; its access code becomes free for reuse
    pub async fn deactivate_session(
        &self,
        identity: Option<UserId>,
        session_id: SessionId,
    ) -> Result<SessionView> {
        let user_id = require_identity_for(identity, codes::SESSIONS_DELETE)?;
        let session = self.require_session(session_id).await?;
        self.gate
            .authorize_mutation(user_id, &session, codes::SESSIONS_DELETE)
            .await?;

        let now = self.clock.now();
        let session = if session.is_active {
            let session = self.db.set_session_active(session_id, false, now).await?;
            info!("User {} deactivated session {}", user_id, session_id);
            session
        } else {
            session
        };
        Ok(SessionView::at(session, now))
    }

    pub async fn add_questions(
        &self,
        identity: Option<UserId>,
        session_id: SessionId,
        prompts: Vec<String>,
    ) -> Result<Vec<SessionQuestion>> {
        let user_id = require_identity_for(identity, codes::SESSIONS_QUESTIONS)?;
        let prompts: Vec<String> = prompts
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if prompts.is_empty() {
            return Err(RollcallError::validation("At least one question is required"));
        }

        let session = self.require_session(session_id).await?;
        self.gate
            .authorize_mutation(user_id, &session, codes::SESSIONS_QUESTIONS)
            .await?;

        let questions = self
            .db
            .insert_questions(session_id, &prompts, self.clock.now())
            .await?;
        info!(
            "User {} added {} question(s) to session {}",
            user_id,
            questions.len(),
            session_id
        );
        Ok(questions)
    }

    /// Questions of a session the caller can see
    pub async fn list_questions(
        &self,
        identity: Option<UserId>,
        session_id: SessionId,
    ) -> Result<Vec<SessionQuestion>> {
        let user_id = require_identity_for(identity, codes::SESSIONS_VIEW)?;
        let session = self.require_session(session_id).await?;
        self.authorize_read(user_id, &session).await?;
        self.db.list_questions(session_id).await
    }

    /// Record the caller's attendance against an access code
    pub async fn check_in(&self, identity: Option<UserId>, code: &str) -> Result<AttendanceRecord> {
        let user_id = require_identity_for(identity, codes::ATTENDANCE_CHECK_IN)?;

        let session = match self.verify_access_code(code).await? {
            CodeVerification::Valid(session) => session,
            CodeVerification::NotFound => {
                return Err(RollcallError::not_found("Unknown access code"));
            }
            rejected => {
                return Err(RollcallError::validation(format!(
                    "Access code rejected: {}",
                    rejected.reason().unwrap_or("invalid")
                )));
            }
        };

        let resource = format!("session:{}", session.id);
        if let Some(team_id) = session.team_id {
            if self.db.active_membership(team_id, user_id).await?.is_none() {
                let reason = DenialReason::NotTeamMember { team_id };
                SecurityLogger::log_authz_event(
                    user_id,
                    &resource,
                    codes::ATTENDANCE_CHECK_IN,
                    false,
                    Some(&reason),
                );
                return Err(RollcallError::forbidden(reason));
            }
        }

        if !self
            .gate
            .holds(user_id, codes::ATTENDANCE_CHECK_IN, &session)
            .await?
        {
            let reason = DenialReason::MissingPermission {
                code: codes::ATTENDANCE_CHECK_IN.to_string(),
            };
            SecurityLogger::log_authz_event(
                user_id,
                &resource,
                codes::ATTENDANCE_CHECK_IN,
                false,
                Some(&reason),
            );
            return Err(RollcallError::forbidden(reason));
        }

        let record = self
            .db
            .record_check_in(session.id, user_id, self.clock.now())
            .await?;
        info!("User {} checked in to session {}", user_id, session.id);
        Ok(record)
    }

    /// Check-ins of a session, for holders of `roster.view`
    pub async fn list_check_ins(
        &self,
        identity: Option<UserId>,
        session_id: SessionId,
    ) -> Result<Vec<AttendanceRecord>> {
        let user_id = require_identity_for(identity, codes::ROSTER_VIEW)?;
        let session = self.require_session(session_id).await?;
        if !self
            .gate
            .holds(user_id, codes::ROSTER_VIEW, &session)
            .await?
        {
            return Err(RollcallError::forbidden(DenialReason::MissingPermission {
                code: codes::ROSTER_VIEW.to_string(),
            }));
        }
        self.db.list_check_ins(session_id).await
    }

    async fn auto_open(&self, session: Session, now: chrono::DateTime<chrono::Utc>) -> Result<Session> {
        if !lifecycle::needs_auto_open(&session, now) {
            return Ok(session);
        }

        let code_expires_at =
            lifecycle::auto_open_expiry(&session, now, self.config.code_window());
        if self
            .db
            .auto_open_session(session.id, now, code_expires_at)
            .await?
        {
            info!("Auto-opened session {}", session.id);
        }
        // Another reader may have won the update; the stored stamp is authoritative.
        self.require_session(session.id).await
    }

    async fn authorize_read(&self, user_id: UserId, session: &Session) -> Result<()> {
        self.gate
            .authorize_listing(user_id, session.offering_id)
            .await?;
        match session.team_id {
            Some(team_id) if self.db.active_membership(team_id, user_id).await?.is_none() => {
                Err(RollcallError::forbidden(DenialReason::NotTeamMember { team_id }))
            }
            _ => Ok(()),
        }
    }

    async fn require_session(&self, session_id: SessionId) -> Result<Session> {
        self.db
            .find_session(session_id)
            .await?
            .ok_or_else(|| RollcallError::not_found(format!("Session {} not found", session_id)))
    }

    async fn require_offering(&self, offering_id: OfferingId) -> Result<()> {
        match self.db.find_offering(offering_id).await? {
            Some(_) => Ok(()),
            None => Err(RollcallError::not_found(format!(
                "Offering {} not found",
                offering_id
            ))),
        }
    }
}

fn require_identity_for(identity: Option<UserId>, action: &str) -> Result<UserId> {
    if identity.is_none() {
        SecurityLogger::log_missing_identity(action);
    }
    require_identity(identity)
}

fn required_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(RollcallError::validation("title is required"));
    }
    Ok(title.to_string())
}
