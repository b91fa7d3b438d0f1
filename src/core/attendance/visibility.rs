//! Team-based visibility of sessions

use crate::core::models::{Session, TeamId};
use std::collections::HashSet;

/// Visibility of sessions for one user within one offering
///
/// Course-wide sessions are visible to every member of the offering. A
/// team-scoped session is visible only while the user holds an active
/// membership in that team; there is no retained access after leaving.
#[derive(Debug, Clone, Default)]
pub struct VisibilityFilter {
    active_teams: HashSet<TeamId>,
}

impl VisibilityFilter {
    /// Build a filter from the user's currently active team memberships
    pub fn new(active_teams: impl IntoIterator<Item = TeamId>) -> Self {
        Self {
            active_teams: active_teams.into_iter().collect(),
        }
    }

    pub fn is_visible(&self, session: &Session) -> bool {
        match session.team_id {
            None => true,
            Some(team_id) => self.active_teams.contains(&team_id),
        }
    }

    /// Keep only the sessions the user may enumerate
    pub fn apply(&self, sessions: Vec<Session>) -> Vec<Session> {
        sessions
            .into_iter()
            .filter(|session| self.is_visible(session))
            .collect()
    }
}
