//! Attendance session types

use super::course::{OfferingId, TeamId};
use super::user::UserId;
use crate::core::attendance::lifecycle;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Session identifier
pub type SessionId = i64;

/// Effective state of an attendance session, always derived from stored fields and `now`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Code minted, not yet accepting check-ins
    Pending,
    /// Accepting check-ins
    Open,
    /// Window ended
    Closed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Pending => write!(f, "pending"),
            SessionStatus::Open => write!(f, "open"),
            SessionStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Attendance-taking session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub offering_id: OfferingId,
    /// `None` for course-wide sessions
    pub team_id: Option<TeamId>,
    pub title: String,
    pub session_date: NaiveDate,
    pub session_time: Option<NaiveTime>,
    pub access_code: String,
    pub code_expires_at: DateTime<Utc>,
    pub attendance_opened_at: Option<DateTime<Utc>>,
    pub attendance_closed_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Scheduled start of the session in UTC
    pub fn scheduled_start(&self) -> DateTime<Utc> {
        lifecycle::scheduled_start(self.session_date, self.session_time)
    }

    /// Effective status at `now`
    pub fn status_at(&self, now: DateTime<Utc>) -> SessionStatus {
        lifecycle::derive_status(
            self.scheduled_start(),
            self.attendance_opened_at,
            self.attendance_closed_at,
            self.code_expires_at,
            now,
        )
    }

    pub fn is_course_wide(&self) -> bool {
        self.team_id.is_none()
    }
}

/// Fields of a session about to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub offering_id: OfferingId,
    pub team_id: Option<TeamId>,
    pub title: String,
    pub session_date: NaiveDate,
    pub session_time: Option<NaiveTime>,
    pub access_code: String,
    pub code_expires_at: DateTime<Utc>,
    pub created_by: UserId,
}

/// Session together with the status it had when it was read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: Session,
    pub status: SessionStatus,
}

impl SessionView {
    pub fn at(session: Session, now: DateTime<Utc>) -> Self {
        let status = session.status_at(now);
        Self { session, status }
    }
}

/// Caller-supplied request to create a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub title: String,
    /// `YYYY-MM-DD`
    pub session_date: String,
    /// `HH:MM` or `HH:MM:SS`
    #[serde(default)]
    pub session_time: Option<String>,
    /// Explicit end of the access-code window
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    /// Requested team scope; forced to the led team for team leaders
    #[serde(default)]
    pub team_id: Option<TeamId>,
}

/// Partial update of a session; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSessionRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub session_date: Option<String>,
    #[serde(default)]
    pub session_time: Option<String>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
}

impl UpdateSessionRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.session_date.is_none()
            && self.session_time.is_none()
            && self.ends_at.is_none()
    }
}

/// Question attached to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionQuestion {
    pub id: i64,
    pub session_id: SessionId,
    pub position: i32,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

/// A user's check-in to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub checked_in_at: DateTime<Utc>,
}

/// Outcome of checking an access code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeVerification {
    /// The code belongs to an active, open session
    Valid(Session),
    /// No session carries the code
    NotFound,
    /// The session has been retired
    Inactive,
    /// The access-code window has passed
    Expired,
    /// The session is pending or closed
    NotOpen(SessionStatus),
}

impl CodeVerification {
    pub fn is_valid(&self) -> bool {
        matches!(self, CodeVerification::Valid(_))
    }

    /// Short reason for a rejected code
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            CodeVerification::Valid(_) => None,
            CodeVerification::NotFound => Some("not_found"),
            CodeVerification::Inactive => Some("inactive"),
            CodeVerification::Expired => Some("expired"),
            CodeVerification::NotOpen(_) => Some("not_open"),
        }
    }
}
