//! Tenancy domain service.
//!
//! Implements the teams driving ports on top of the team repository. Team
//! creation enrols the caller as admin in the same repository call; member
//! and installer-group management require the admin role.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::access::{map_team_error, require_admin, resolve_member};
use crate::domain::ports::{
    AddMemberRequest, CreateInstallerGroupRequest, CreateTeamRequest, TeamRepository, TeamsCommand,
    TeamsQuery,
};
use crate::domain::{Error, InstallerGroup, Team, TeamId, TeamMember, UserId};

/// Tenancy service implementing the driving ports.
#[derive(Clone)]
pub struct TeamsService<R> {
    teams: Arc<R>,
}

impl<R> TeamsService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(teams: Arc<R>) -> Self {
        Self { teams }
    }
}

fn require_name(name: &str, what: &str) -> Result<(), Error> {
    if name.trim().is_empty() {
        Err(Error::invalid_request(format!("{what} name must not be empty")))
    } else {
        Ok(())
    }
}

#[async_trait]
impl<R> TeamsCommand for TeamsService<R>
where
    R: TeamRepository,
{
    async fn create_team(&self, request: CreateTeamRequest) -> Result<Team, Error> {
        require_name(&request.name, "team")?;
        let team = Team::new(request.name);
        self.teams
            .create_team(&team, &request.caller)
            .await
            .map_err(map_team_error)?;
        Ok(team)
    }

    async fn add_member(&self, request: AddMemberRequest) -> Result<TeamMember, Error> {
        let caller = resolve_member(self.teams.as_ref(), &request.team_id, &request.caller).await?;
        require_admin(&caller)?;

        let member = TeamMember {
            team_id: request.team_id,
            user_id: request.member_user_id,
            role: request.role,
            created_at: Utc::now(),
        };
        self.teams
            .upsert_member(&member)
            .await
            .map_err(map_team_error)?;
        Ok(member)
    }

    async fn create_installer_group(
        &self,
        request: CreateInstallerGroupRequest,
    ) -> Result<InstallerGroup, Error> {
        let caller = resolve_member(self.teams.as_ref(), &request.team_id, &request.caller).await?;
        require_admin(&caller)?;
        require_name(&request.name, "installer group")?;

        let group = InstallerGroup::new(request.team_id, request.name);
        self.teams
            .create_installer_group(&group)
            .await
            .map_err(map_team_error)?;
        Ok(group)
    }
}

#[async_trait]
impl<R> TeamsQuery for TeamsService<R>
where
    R: TeamRepository,
{
    async fn list_teams(&self, caller: UserId) -> Result<Vec<Team>, Error> {
        self.teams
            .teams_for_user(&caller)
            .await
            .map_err(map_team_error)
    }

    async fn list_members(
        &self,
        caller: UserId,
        team_id: TeamId,
    ) -> Result<Vec<TeamMember>, Error> {
        resolve_member(self.teams.as_ref(), &team_id, &caller).await?;
        self.teams.members(&team_id).await.map_err(map_team_error)
    }

    async fn list_installer_groups(
        &self,
        caller: UserId,
        team_id: TeamId,
    ) -> Result<Vec<InstallerGroup>, Error> {
        resolve_member(self.teams.as_ref(), &team_id, &caller).await?;
        self.teams
            .installer_groups(&team_id)
            .await
            .map_err(map_team_error)
    }
}
