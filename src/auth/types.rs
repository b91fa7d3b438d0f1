//! Authorization decision types

use crate::core::models::{OfferingId, SessionId, TeamId};
use serde::{Deserialize, Serialize};

/// Why an authenticated caller was turned away
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenialReason {
    /// No channel grants the permission code in the requested scope
    MissingPermission { code: String },
    /// Session mutations are reserved for the creator
    NotOwner { session_id: SessionId },
    /// Neither `sessions.create` nor leadership of a team in the offering
    NotEligibleToCreate { offering_id: OfferingId },
    /// A leader named a team they do not lead
    NotTeamLeader { team_id: TeamId },
    /// Caller holds no viewing standing in the offering
    NotOfferingMember { offering_id: OfferingId },
    /// Team-scoped session and the caller has no active membership in the team
    NotTeamMember { team_id: TeamId },
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenialReason::MissingPermission { code } => write!(f, "missing permission {}", code),
            DenialReason::NotOwner { session_id } => {
                write!(f, "caller is not the creator of session {}", session_id)
            }
            DenialReason::NotEligibleToCreate { offering_id } => {
                write!(f, "caller may not create sessions in offering {}", offering_id)
            }
            DenialReason::NotTeamLeader { team_id } => {
                write!(f, "caller does not lead team {}", team_id)
            }
            DenialReason::NotOfferingMember { offering_id } => {
                write!(f, "caller is not a member of offering {}", offering_id)
            }
            DenialReason::NotTeamMember { team_id } => {
                write!(f, "caller is not a member of team {}", team_id)
            }
        }
    }
}

/// Outcome of the two mutation predicates, kept apart so each can be inspected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationCheck {
    pub session_id: SessionId,
    pub code: &'static str,
    /// Caller created the session
    pub is_owner: bool,
    /// Caller holds `code` in the session's offering and team scope
    pub holds_permission: bool,
}

impl MutationCheck {
    pub fn allowed(&self) -> bool {
        self.is_owner && self.holds_permission
    }

    /// First failing predicate, ownership before permission
    pub fn denial(&self) -> Option<DenialReason> {
        if !self.is_owner {
            Some(DenialReason::NotOwner {
                session_id: self.session_id,
            })
        } else if !self.holds_permission {
            Some(DenialReason::MissingPermission {
                code: self.code.to_string(),
            })
        } else {
            None
        }
    }
}

/// Team scope decided for a new session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateScope {
    /// Creator holds `sessions.create`; the requested team (if any) is kept
    Staff { team_id: Option<TeamId> },
    /// Creator leads a team; the session is pinned to it
    TeamLeader { team_id: TeamId },
}

impl CreateScope {
    pub fn team_id(&self) -> Option<TeamId> {
        match self {
            CreateScope::Staff { team_id } => *team_id,
            CreateScope::TeamLeader { team_id } => Some(*team_id),
        }
    }
}
