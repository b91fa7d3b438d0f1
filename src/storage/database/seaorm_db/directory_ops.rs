use crate::core::models::{
    Enrollment, GlobalRole, Offering, OfferingId, Team, TeamId, TeamMembership, User, UserId,
    UserStatus, team_roles,
};
use crate::utils::error::{Result, RollcallError};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{
    self, enrollment, offering, offering_staff, team, team_membership, user,
};
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Create an active user
    pub async fn create_user(
        &self,
        username: &str,
        display_name: Option<&str>,
        role: GlobalRole,
    ) -> Result<User> {
        debug!("Creating user: {}", username);

        let model = user::Model::new_active(username, display_name, role, Utc::now())
            .insert(&self.db)
            .await?;

        Ok(model.to_domain_user())
    }

    /// Find user by ID
    pub async fn find_user(&self, user_id: UserId) -> Result<Option<User>> {
        debug!("Finding user by ID: {}", user_id);

        let user_model = entities::User::find_by_id(user_id).one(&self.db).await?;
        Ok(user_model.map(|model| model.to_domain_user()))
    }

    /// Find user by username
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        debug!("Finding user by username: {}", username);

        let user_model = entities::User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(user_model.map(|model| model.to_domain_user()))
    }

    /// Change a user's global role
    pub async fn set_global_role(&self, user_id: UserId, role: GlobalRole) -> Result<()> {
        debug!("Setting global role of user {} to {}", user_id, role);

        let mut user: user::ActiveModel = self.user_model(user_id).await?.into();
        user.global_role = Set(role.to_string());
        user.updated_at = Set(Utc::now().into());
        user.update(&self.db).await?;
        Ok(())
    }

    /// Change a user's account status
    pub async fn set_user_status(&self, user_id: UserId, status: UserStatus) -> Result<()> {
        debug!("Setting status of user {} to {}", user_id, status);

        let mut user: user::ActiveModel = self.user_model(user_id).await?.into();
        user.status = Set(status.to_string());
        user.updated_at = Set(Utc::now().into());
        user.update(&self.db).await?;
        Ok(())
    }

    async fn user_model(&self, user_id: UserId) -> Result<user::Model> {
        entities::User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| RollcallError::not_found(format!("User {} not found", user_id)))
    }

    /// Create a course offering
    pub async fn create_offering(
        &self,
        course_code: &str,
        title: &str,
        term: &str,
        year: i32,
    ) -> Result<Offering> {
        debug!("Creating offering: {} {} {}", course_code, term, year);

        let model = offering::ActiveModel {
            course_code: Set(course_code.to_string()),
            title: Set(title.to_string()),
            term: Set(term.to_string()),
            year: Set(year),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(model.to_domain())
    }

    pub async fn find_offering(&self, offering_id: OfferingId) -> Result<Option<Offering>> {
        let model = entities::Offering::find_by_id(offering_id).one(&self.db).await?;
        Ok(model.map(|m| m.to_domain()))
    }

    /// Enroll a user, or change the course role of an existing enrollment
    pub async fn enroll_user(
        &self,
        user_id: UserId,
        offering_id: OfferingId,
        course_role: &str,
    ) -> Result<Enrollment> {
        debug!(
            "Enrolling user {} in offering {} as {}",
            user_id, offering_id, course_role
        );

        let existing = entities::Enrollment::find()
            .filter(enrollment::Column::UserId.eq(user_id))
            .filter(enrollment::Column::OfferingId.eq(offering_id))
            .one(&self.db)
            .await?;

        let model = match existing {
            Some(model) => {
                let mut active: enrollment::ActiveModel = model.into();
                active.course_role = Set(course_role.to_string());
                active.update(&self.db).await?
            }
            None => {
                enrollment::ActiveModel {
                    user_id: Set(user_id),
                    offering_id: Set(offering_id),
                    course_role: Set(course_role.to_string()),
                    enrolled_at: Set(Utc::now().into()),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?
            }
        };

        Ok(model.to_domain())
    }

    /// Remove a user's enrollment; returns whether a row was removed
    pub async fn unenroll_user(&self, user_id: UserId, offering_id: OfferingId) -> Result<bool> {
        let result = entities::Enrollment::delete_many()
            .filter(enrollment::Column::UserId.eq(user_id))
            .filter(enrollment::Column::OfferingId.eq(offering_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Assign a staff role independent of the enrollment role
    pub async fn assign_staff_role(
        &self,
        user_id: UserId,
        offering_id: OfferingId,
        staff_role: &str,
    ) -> Result<()> {
        debug!(
            "Assigning staff role {} to user {} in offering {}",
            staff_role, user_id, offering_id
        );

        offering_staff::ActiveModel {
            user_id: Set(user_id),
            offering_id: Set(offering_id),
            staff_role: Set(staff_role.to_string()),
            assigned_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    pub async fn create_team(&self, offering_id: OfferingId, name: &str) -> Result<Team> {
        debug!("Creating team {} in offering {}", name, offering_id);

        let model = team::ActiveModel {
            offering_id: Set(offering_id),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(model.to_domain())
    }

    pub async fn find_team(&self, team_id: TeamId) -> Result<Option<Team>> {
        let model = entities::Team::find_by_id(team_id).one(&self.db).await?;
        Ok(model.map(|m| m.to_domain()))
    }

    /// Add an active membership; a user already active in the team is a conflict
    pub async fn add_team_member(
        &self,
        team_id: TeamId,
        user_id: UserId,
        team_role: &str,
    ) -> Result<TeamMembership> {
        debug!("Adding user {} to team {} as {}", user_id, team_id, team_role);

        if self.active_membership(team_id, user_id).await?.is_some() {
            return Err(RollcallError::conflict(format!(
                "User {} is already a member of team {}",
                user_id, team_id
            )));
        }

        let model = team_membership::ActiveModel {
            team_id: Set(team_id),
            user_id: Set(user_id),
            team_role: Set(team_role.to_string()),
            joined_at: Set(Utc::now().into()),
            left_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(model.to_domain())
    }

    /// Mark the active membership as left; returns whether one existed
    pub async fn leave_team(&self, team_id: TeamId, user_id: UserId) -> Result<bool> {
        debug!("User {} leaving team {}", user_id, team_id);

        let result = entities::TeamMembership::update_many()
            .col_expr(
                team_membership::Column::LeftAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(team_membership::Column::TeamId.eq(team_id))
            .filter(team_membership::Column::UserId.eq(user_id))
            .filter(team_membership::Column::LeftAt.is_null())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn active_membership(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> Result<Option<TeamMembership>> {
        let model = entities::TeamMembership::find()
            .filter(team_membership::Column::TeamId.eq(team_id))
            .filter(team_membership::Column::UserId.eq(user_id))
            .filter(team_membership::Column::LeftAt.is_null())
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.to_domain()))
    }

    /// Teams of the offering in which the user holds an active membership
    pub async fn active_team_ids(
        &self,
        user_id: UserId,
        offering_id: OfferingId,
    ) -> Result<Vec<TeamId>> {
        self.membership_team_ids(user_id, offering_id, None).await
    }

    /// Teams of the offering the user actively leads
    pub async fn led_team_ids(
        &self,
        user_id: UserId,
        offering_id: OfferingId,
    ) -> Result<Vec<TeamId>> {
        self.membership_team_ids(user_id, offering_id, Some(team_roles::LEADER))
            .await
    }

    /// Deleted users hold no memberships for resolution purposes
    async fn membership_team_ids(
        &self,
        user_id: UserId,
        offering_id: OfferingId,
        role: Option<&str>,
    ) -> Result<Vec<TeamId>> {
        let mut query = entities::TeamMembership::find()
            .select_only()
            .column(team_membership::Column::TeamId)
            .inner_join(entities::Team)
            .inner_join(entities::User)
            .filter(team_membership::Column::UserId.eq(user_id))
            .filter(team_membership::Column::LeftAt.is_null())
            .filter(team::Column::OfferingId.eq(offering_id))
            .filter(user::Column::Status.ne(UserStatus::Deleted.to_string()));

        if let Some(role) = role {
            query = query.filter(team_membership::Column::TeamRole.eq(role));
        }

        let mut ids: Vec<TeamId> = query.into_tuple().all(&self.db).await?;
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}
