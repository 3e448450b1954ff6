//! Driving ports for tenancy operations.
//!
//! HTTP handlers call [`TeamsCommand`] to create teams, enrol members, and
//! add installer groups, and [`TeamsQuery`] to read the caller's tenancy.
//! Every operation authorizes against the caller's verified membership.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, InstallerGroup, Team, TeamId, TeamMember, TeamRole, UserId};

/// Request to create a team; the caller becomes its first admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    pub name: String,
}

/// Request to add or re-role a member. Admin only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = String)]
    pub member_user_id: UserId,
    pub role: TeamRole,
}

/// Request to create an installer group inside a team. Admin only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstallerGroupRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    pub name: String,
}

/// Driving port for tenancy mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamsCommand: Send + Sync {
    /// Create a team with the caller enrolled as admin.
    async fn create_team(&self, request: CreateTeamRequest) -> Result<Team, Error>;

    /// Add a member or overwrite an existing member's role.
    async fn add_member(&self, request: AddMemberRequest) -> Result<TeamMember, Error>;

    /// Create an installer group within the team.
    async fn create_installer_group(
        &self,
        request: CreateInstallerGroupRequest,
    ) -> Result<InstallerGroup, Error>;
}

/// Driving port for tenancy reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamsQuery: Send + Sync {
    /// Teams the caller belongs to.
    async fn list_teams(&self, caller: UserId) -> Result<Vec<Team>, Error>;

    /// Members of a team the caller belongs to.
    async fn list_members(&self, caller: UserId, team_id: TeamId)
    -> Result<Vec<TeamMember>, Error>;

    /// Installer groups of a team the caller belongs to.
    async fn list_installer_groups(
        &self,
        caller: UserId,
        team_id: TeamId,
    ) -> Result<Vec<InstallerGroup>, Error>;
}

/// Fixture implementation returning freshly constructed aggregates.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTeamsCommand;

#[async_trait]
impl TeamsCommand for FixtureTeamsCommand {
    async fn create_team(&self, request: CreateTeamRequest) -> Result<Team, Error> {
        Ok(Team::new(request.name))
    }

    async fn add_member(&self, request: AddMemberRequest) -> Result<TeamMember, Error> {
        Ok(TeamMember {
            team_id: request.team_id,
            user_id: request.member_user_id,
            role: request.role,
            created_at: chrono::Utc::now(),
        })
    }

    async fn create_installer_group(
        &self,
        request: CreateInstallerGroupRequest,
    ) -> Result<InstallerGroup, Error> {
        Ok(InstallerGroup::new(request.team_id, request.name))
    }
}

/// Fixture implementation returning empty tenancy.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTeamsQuery;

#[async_trait]
impl TeamsQuery for FixtureTeamsQuery {
    async fn list_teams(&self, _caller: UserId) -> Result<Vec<Team>, Error> {
        Ok(Vec::new())
    }

    async fn list_members(
        &self,
        _caller: UserId,
        _team_id: TeamId,
    ) -> Result<Vec<TeamMember>, Error> {
        Ok(Vec::new())
    }

    async fn list_installer_groups(
        &self,
        _caller: UserId,
        _team_id: TeamId,
    ) -> Result<Vec<InstallerGroup>, Error> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn fixture_command_echoes_request_fields() {
        let command = FixtureTeamsCommand;
        let team = command
            .create_team(CreateTeamRequest {
                caller: UserId::random(),
                name: "Helios Solar".to_owned(),
            })
            .await
            .expect("create team");
        assert_eq!(team.name, "Helios Solar");

        let group = command
            .create_installer_group(CreateInstallerGroupRequest {
                caller: UserId::random(),
                team_id: team.id,
                name: "North crew".to_owned(),
            })
            .await
            .expect("create group");
        assert_eq!(group.team_id, team.id);
    }

    #[tokio::test]
    async fn fixture_query_returns_empty_tenancy() {
        let query = FixtureTeamsQuery;
        let caller = UserId::random();
        assert!(query.list_teams(caller).await.expect("list").is_empty());
        assert!(
            query
                .list_members(caller, TeamId::random())
                .await
                .expect("list")
                .is_empty()
        );
    }
}
