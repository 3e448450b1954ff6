//! Port for tenancy persistence: teams, memberships, installer groups.

use async_trait::async_trait;

use crate::domain::ids::{InstallerGroupId, TeamId, UserId};
use crate::domain::team::{InstallerGroup, Team, TeamMember};

use super::define_port_error;

define_port_error! {
    /// Errors raised by team repository adapters.
    pub enum TeamRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "team repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "team repository query failed: {message}",
    }
}

/// Port for tenancy storage and retrieval.
///
/// Membership lookups drive authorization: a `None` membership means the
/// caller has no standing in the team and the resource is reported missing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Insert a team and enrol its creator as admin.
    async fn create_team(&self, team: &Team, creator: &UserId)
    -> Result<(), TeamRepositoryError>;

    /// Teams the user belongs to, newest first.
    async fn teams_for_user(&self, user_id: &UserId) -> Result<Vec<Team>, TeamRepositoryError>;

    /// The user's membership in a team, if any.
    async fn membership(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<Option<TeamMember>, TeamRepositoryError>;

    /// Upsert a membership (role changes overwrite).
    async fn upsert_member(&self, member: &TeamMember) -> Result<(), TeamRepositoryError>;

    /// All members of a team.
    async fn members(&self, team_id: &TeamId) -> Result<Vec<TeamMember>, TeamRepositoryError>;

    /// Insert an installer group.
    async fn create_installer_group(
        &self,
        group: &InstallerGroup,
    ) -> Result<(), TeamRepositoryError>;

    /// Installer groups within a team, by name.
    async fn installer_groups(
        &self,
        team_id: &TeamId,
    ) -> Result<Vec<InstallerGroup>, TeamRepositoryError>;

    /// Find one installer group within a team.
    async fn find_installer_group(
        &self,
        team_id: &TeamId,
        group_id: &InstallerGroupId,
    ) -> Result<Option<InstallerGroup>, TeamRepositoryError>;
}

/// Fixture implementation for testing without a real database.
///
/// Lookups return empty results and mutations are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTeamRepository;

#[async_trait]
impl TeamRepository for FixtureTeamRepository {
    async fn create_team(
        &self,
        _team: &Team,
        _creator: &UserId,
    ) -> Result<(), TeamRepositoryError> {
        Ok(())
    }

    async fn teams_for_user(&self, _user_id: &UserId) -> Result<Vec<Team>, TeamRepositoryError> {
        Ok(Vec::new())
    }

    async fn membership(
        &self,
        _team_id: &TeamId,
        _user_id: &UserId,
    ) -> Result<Option<TeamMember>, TeamRepositoryError> {
        Ok(None)
    }

    async fn upsert_member(&self, _member: &TeamMember) -> Result<(), TeamRepositoryError> {
        Ok(())
    }

    async fn members(&self, _team_id: &TeamId) -> Result<Vec<TeamMember>, TeamRepositoryError> {
        Ok(Vec::new())
    }

    async fn create_installer_group(
        &self,
        _group: &InstallerGroup,
    ) -> Result<(), TeamRepositoryError> {
        Ok(())
    }

    async fn installer_groups(
        &self,
        _team_id: &TeamId,
    ) -> Result<Vec<InstallerGroup>, TeamRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_installer_group(
        &self,
        _team_id: &TeamId,
        _group_id: &InstallerGroupId,
    ) -> Result<Option<InstallerGroup>, TeamRepositoryError> {
        Ok(None)
    }
}
