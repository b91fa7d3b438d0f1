//! Session lifecycle state machine
//!
//! Status is never stored. It is recomputed from the schedule, the two
//! attendance timestamps, the code expiry and the current time. The only
//! persisted side effects are the explicit open/close stamps and the one-time
//! auto-open stamp.

use crate::core::models::{Session, SessionStatus};
use crate::utils::error::{Result, RollcallError};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// Scheduled start; a missing time means midnight UTC
pub fn scheduled_start(date: NaiveDate, time: Option<NaiveTime>) -> DateTime<Utc> {
    date.and_time(time.unwrap_or(NaiveTime::MIN)).and_utc()
}

/// Derive the effective status of a session
pub fn derive_status(
    scheduled_start: DateTime<Utc>,
    opened_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    code_expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> SessionStatus {
    // A future schedule wins over any stored (possibly backfilled) timestamp.
    if scheduled_start > now {
        return SessionStatus::Pending;
    }

    match (opened_at, closed_at) {
        (Some(opened), Some(closed)) => {
            if now >= closed {
                SessionStatus::Closed
            } else if now >= opened {
                SessionStatus::Open
            } else {
                // Open stamp is ahead of the clock; the window has not begun.
                SessionStatus::Pending
            }
        }
        (Some(_), None) => {
            if now >= code_expires_at {
                SessionStatus::Closed
            } else {
                SessionStatus::Open
            }
        }
        _ => SessionStatus::Closed,
    }
}

/// Parsed session schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl Schedule {
    /// Parse a `YYYY-MM-DD` date and an optional `HH:MM[:SS]` time
    pub fn parse(date: &str, time: Option<&str>) -> Result<Self> {
        let date = date.trim();
        if date.is_empty() {
            return Err(RollcallError::validation("session_date is required"));
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
            RollcallError::validation(format!("Invalid session_date '{}': {}", date, e))
        })?;

        let time = match time.map(str::trim).filter(|t| !t.is_empty()) {
            None => None,
            Some(raw) => Some(
                NaiveTime::parse_from_str(raw, "%H:%M:%S")
                    .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
                    .map_err(|e| {
                        RollcallError::validation(format!(
                            "Invalid session_time '{}': {}",
                            raw, e
                        ))
                    })?,
            ),
        };

        Ok(Self { date, time })
    }

    pub fn start(&self) -> DateTime<Utc> {
        scheduled_start(self.date, self.time)
    }
}

/// Expiry of the access code for a schedule, honoring an explicit end time
pub fn code_expiry(
    start: DateTime<Utc>,
    ends_at: Option<DateTime<Utc>>,
    default_window: Duration,
) -> Result<DateTime<Utc>> {
    match ends_at {
        Some(end) if end <= start => Err(RollcallError::validation(
            "ends_at must be after the scheduled start",
        )),
        Some(end) => Ok(end),
        None => Ok(start + default_window),
    }
}

/// Whether a read at `now` must stamp the auto-open timestamp
pub fn needs_auto_open(session: &Session, now: DateTime<Utc>) -> bool {
    session.is_active
        && session.attendance_opened_at.is_none()
        && session.attendance_closed_at.is_none()
        && session.scheduled_start() <= now
}

/// Code expiry to write with the auto-open stamp
///
/// A code window that lapsed before the first read is restarted at `now`,
/// so an auto-opened session is OPEN rather than immediately CLOSED.
pub fn auto_open_expiry(
    session: &Session,
    now: DateTime<Utc>,
    window: Duration,
) -> Option<DateTime<Utc>> {
    (session.code_expires_at <= now).then(|| now + window)
}

/// Write required to open attendance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenTransition {
    /// Already open, nothing to persist
    Unchanged,
    /// Stamp `opened_at`, clear the close stamp and optionally extend the code window
    Open {
        opened_at: DateTime<Utc>,
        code_expires_at: Option<DateTime<Utc>>,
    },
}

/// Plan an explicit open (or reopen) of a session
pub fn plan_open(
    session: &Session,
    now: DateTime<Utc>,
    reopen_window: Duration,
) -> Result<OpenTransition> {
    match session.status_at(now) {
        SessionStatus::Open => Ok(OpenTransition::Unchanged),
        SessionStatus::Pending if session.scheduled_start() > now => {
            Err(RollcallError::validation(format!(
                "Session {} is scheduled to start at {} and cannot be opened yet",
                session.id,
                session.scheduled_start()
            )))
        }
        _ => {
            // Reopening after the code lapsed would otherwise leave it closed.
            let code_expires_at = (session.code_expires_at <= now).then(|| now + reopen_window);
            Ok(OpenTransition::Open {
                opened_at: now,
                code_expires_at,
            })
        }
    }
}

/// Write required to close attendance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTransition {
    /// Already closed, nothing to persist
    Unchanged,
    Close { closed_at: DateTime<Utc> },
}

/// Plan an explicit close of a session
pub fn plan_close(session: &Session, now: DateTime<Utc>) -> Result<CloseTransition> {
    match session.status_at(now) {
        SessionStatus::Closed => Ok(CloseTransition::Unchanged),
        SessionStatus::Open => Ok(CloseTransition::Close { closed_at: now }),
        SessionStatus::Pending => Err(RollcallError::validation(format!(
            "Attendance for session {} has not been opened",
            session.id
        ))),
    }
}
