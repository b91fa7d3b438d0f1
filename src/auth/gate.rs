//! Authorization gate for session operations
//!
//! Mutations pass two independent predicates: the caller created the session,
//! and the caller holds the operation's permission code in the session's
//! scope. Both must hold.

use crate::core::models::{
    OfferingId, PermissionScopeRef, Session, TeamId, UserId, codes,
};
use crate::storage::Database;
use crate::utils::error::{Result, RollcallError};
use crate::utils::logging::SecurityLogger;
use std::sync::Arc;
use tracing::debug;

use super::rbac::PermissionResolver;
use super::types::{CreateScope, DenialReason, MutationCheck};

/// Permission resolver plus ownership checks
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    resolver: PermissionResolver,
    db: Arc<Database>,
}

impl AuthorizationGate {
    pub fn new(resolver: PermissionResolver, db: Arc<Database>) -> Self {
        Self { resolver, db }
    }

    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// Ownership predicate
    pub fn is_owner(session: &Session, user_id: UserId) -> bool {
        session.created_by == user_id
    }

    /// Permission predicate, evaluated in the session's offering and team scope
    pub async fn holds(&self, user_id: UserId, code: &str, session: &Session) -> Result<bool> {
        self.resolver
            .check(user_id, code, session_scope(session))
            .await
    }

    /// Evaluate both mutation predicates without deciding
    pub async fn check_mutation(
        &self,
        user_id: UserId,
        session: &Session,
        code: &'static str,
    ) -> Result<MutationCheck> {
        Ok(MutationCheck {
            session_id: session.id,
            code,
            is_owner: Self::is_owner(session, user_id),
            holds_permission: self.holds(user_id, code, session).await?,
        })
    }

    /// Allow the mutation or fail with `Forbidden`
    pub async fn authorize_mutation(
        &self,
        user_id: UserId,
        session: &Session,
        code: &'static str,
    ) -> Result<()> {
        let check = self.check_mutation(user_id, session, code).await?;
        let resource = format!("session:{}", session.id);
        match check.denial() {
            None => {
                SecurityLogger::log_authz_event(user_id, &resource, code, true, None);
                Ok(())
            }
            Some(reason) => {
                SecurityLogger::log_authz_event(user_id, &resource, code, false, Some(&reason));
                Err(RollcallError::forbidden(reason))
            }
        }
    }

    /// Decide the team scope of a session `user_id` wants to create
    ///
    /// Holders of `sessions.create` keep the requested team, which must belong
    /// to the offering. Otherwise the caller must lead a team in the offering
    /// and the session is pinned to it.
    pub async fn resolve_create_scope(
        &self,
        user_id: UserId,
        offering_id: OfferingId,
        requested_team: Option<TeamId>,
    ) -> Result<CreateScope> {
        let resource = create_resource(offering_id, None);

        if self
            .resolver
            .check(user_id, codes::SESSIONS_CREATE, PermissionScopeRef::offering(offering_id))
            .await?
        {
            if let Some(team_id) = requested_team {
                self.require_team_in_offering(team_id, offering_id).await?;
            }
            SecurityLogger::log_authz_event(
                user_id,
                &resource,
                codes::SESSIONS_CREATE,
                true,
                None,
            );
            return Ok(CreateScope::Staff {
                team_id: requested_team,
            });
        }

        let led = self.db.led_team_ids(user_id, offering_id).await?;
        debug!(
            "User {} leads {} team(s) in offering {}",
            user_id,
            led.len(),
            offering_id
        );

        let decision = match (requested_team, led.as_slice()) {
            (_, []) => Err(DenialReason::NotEligibleToCreate { offering_id }),
            (Some(team_id), led) if led.contains(&team_id) => Ok(team_id),
            (Some(team_id), _) => Err(DenialReason::NotTeamLeader { team_id }),
            (None, [only]) => Ok(*only),
            (None, _) => {
                return Err(RollcallError::validation(format!(
                    "User {} leads several teams in offering {}; team_id is required",
                    user_id, offering_id
                )));
            }
        };

        match decision {
            Ok(team_id) => {
                SecurityLogger::log_authz_event(
                    user_id,
                    &create_resource(offering_id, Some(team_id)),
                    codes::SESSIONS_CREATE,
                    true,
                    None,
                );
                Ok(CreateScope::TeamLeader { team_id })
            }
            Err(reason) => {
                SecurityLogger::log_authz_event(
                    user_id,
                    &resource,
                    codes::SESSIONS_CREATE,
                    false,
                    Some(&reason),
                );
                Err(RollcallError::forbidden(reason))
            }
        }
    }

    /// Whether `user_id` could create some session in the offering
    pub async fn user_can_create_session(
        &self,
        user_id: UserId,
        offering_id: OfferingId,
    ) -> Result<bool> {
        if self
            .resolver
            .check(user_id, codes::SESSIONS_CREATE, PermissionScopeRef::offering(offering_id))
            .await?
        {
            return Ok(true);
        }
        Ok(!self.db.led_team_ids(user_id, offering_id).await?.is_empty())
    }

    /// Listing requires `sessions.view` in the offering scope
    pub async fn authorize_listing(&self, user_id: UserId, offering_id: OfferingId) -> Result<()> {
        let resource = format!("offering:{}", offering_id);
        let granted = self
            .resolver
            .check(user_id, codes::SESSIONS_VIEW, PermissionScopeRef::offering(offering_id))
            .await?;

        if granted {
            SecurityLogger::log_authz_event(user_id, &resource, codes::SESSIONS_VIEW, true, None);
            Ok(())
        } else {
            let reason = DenialReason::NotOfferingMember { offering_id };
            SecurityLogger::log_authz_event(
                user_id,
                &resource,
                codes::SESSIONS_VIEW,
                false,
                Some(&reason),
            );
            Err(RollcallError::forbidden(reason))
        }
    }

    async fn require_team_in_offering(&self, team_id: TeamId, offering_id: OfferingId) -> Result<()> {
        match self.db.find_team(team_id).await? {
            Some(team) if team.offering_id == offering_id => Ok(()),
            Some(_) => Err(RollcallError::validation(format!(
                "Team {} does not belong to offering {}",
                team_id, offering_id
            ))),
            None => Err(RollcallError::not_found(format!("Team {} not found", team_id))),
        }
    }
}

/// Scope a session's permission checks run in
pub fn session_scope(session: &Session) -> PermissionScopeRef {
    PermissionScopeRef::new(Some(session.offering_id), session.team_id)
}

/// Resource label of a create decision; leader grants name the pinned team
fn create_resource(offering_id: OfferingId, team_id: Option<TeamId>) -> String {
    match team_id {
        Some(team_id) => format!("offering:{}/team:{}", offering_id, team_id),
        None => format!("offering:{}", offering_id),
    }
}
