//! PostgreSQL-backed `TeamRepository` implementation using Diesel ORM.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl, scoped_futures::ScopedFutureExt};
use tracing::warn;

use crate::domain::ports::{TeamRepository, TeamRepositoryError};
use crate::domain::team::{InstallerGroup, Team, TeamMember, TeamRole};
use crate::domain::{InstallerGroupId, TeamId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    InstallerGroupRow, NewInstallerGroupRow, NewTeamMemberRow, NewTeamRow, TeamMemberRow, TeamRow,
};
use super::pool::DbPool;
use super::schema::{installer_groups, team_members, teams};

/// Diesel-backed implementation of the `TeamRepository` port.
#[derive(Clone)]
pub struct DieselTeamRepository {
    pool: DbPool,
}

impl DieselTeamRepository {
    /// Create a repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: super::pool::PoolError) -> TeamRepositoryError {
    map_pool_error(error, TeamRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> TeamRepositoryError {
    map_diesel_error(
        error,
        TeamRepositoryError::query,
        TeamRepositoryError::connection,
    )
}

fn row_to_team(row: TeamRow) -> Team {
    Team {
        id: TeamId::from_uuid(row.id),
        name: row.name,
        created_at: row.created_at,
    }
}

fn row_to_member(row: TeamMemberRow) -> TeamMember {
    let role = TeamRole::from_str(&row.role).unwrap_or_else(|_| {
        warn!(
            value = %row.role,
            user_id = %row.user_id,
            "unrecognised role value, defaulting to viewer"
        );
        TeamRole::Viewer
    });
    TeamMember {
        team_id: TeamId::from_uuid(row.team_id),
        user_id: UserId::from_uuid(row.user_id),
        role,
        created_at: row.created_at,
    }
}

fn row_to_group(row: InstallerGroupRow) -> InstallerGroup {
    InstallerGroup {
        id: InstallerGroupId::from_uuid(row.id),
        team_id: TeamId::from_uuid(row.team_id),
        name: row.name,
        created_at: row.created_at,
    }
}

#[async_trait]
impl TeamRepository for DieselTeamRepository {
    async fn create_team(
        &self,
        team: &Team,
        creator: &UserId,
    ) -> Result<(), TeamRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let team_row = NewTeamRow {
            id: *team.id.as_uuid(),
            name: &team.name,
            created_at: team.created_at,
        };
        let member_row = NewTeamMemberRow {
            team_id: *team.id.as_uuid(),
            user_id: *creator.as_uuid(),
            role: TeamRole::Admin.as_str(),
            created_at: team.created_at,
        };

        // Team and founding membership land together or not at all.
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(teams::table)
                    .values(&team_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(team_members::table)
                    .values(&member_row)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel)
    }

    async fn teams_for_user(&self, user_id: &UserId) -> Result<Vec<Team>, TeamRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let team_ids: Vec<uuid::Uuid> = team_members::table
            .filter(team_members::user_id.eq(user_id.as_uuid()))
            .select(team_members::team_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        let rows: Vec<TeamRow> = teams::table
            .filter(teams::id.eq_any(team_ids))
            .order(teams::created_at.desc())
            .select(TeamRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(row_to_team).collect())
    }

    async fn membership(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<Option<TeamMember>, TeamRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<TeamMemberRow> = team_members::table
            .filter(
                team_members::team_id
                    .eq(team_id.as_uuid())
                    .and(team_members::user_id.eq(user_id.as_uuid())),
            )
            .select(TeamMemberRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(row_to_member))
    }

    async fn upsert_member(&self, member: &TeamMember) -> Result<(), TeamRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = NewTeamMemberRow {
            team_id: *member.team_id.as_uuid(),
            user_id: *member.user_id.as_uuid(),
            role: member.role.as_str(),
            created_at: member.created_at,
        };

        diesel::insert_into(team_members::table)
            .values(&row)
            .on_conflict((team_members::team_id, team_members::user_id))
            .do_update()
            .set(team_members::role.eq(member.role.as_str()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn members(&self, team_id: &TeamId) -> Result<Vec<TeamMember>, TeamRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<TeamMemberRow> = team_members::table
            .filter(team_members::team_id.eq(team_id.as_uuid()))
            .order(team_members::created_at.asc())
            .select(TeamMemberRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(row_to_member).collect())
    }

    async fn create_installer_group(
        &self,
        group: &InstallerGroup,
    ) -> Result<(), TeamRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = NewInstallerGroupRow {
            id: *group.id.as_uuid(),
            team_id: *group.team_id.as_uuid(),
            name: &group.name,
            created_at: group.created_at,
        };

        diesel::insert_into(installer_groups::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn installer_groups(
        &self,
        team_id: &TeamId,
    ) -> Result<Vec<InstallerGroup>, TeamRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<InstallerGroupRow> = installer_groups::table
            .filter(installer_groups::team_id.eq(team_id.as_uuid()))
            .order(installer_groups::name.asc())
            .select(InstallerGroupRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(row_to_group).collect())
    }

    async fn find_installer_group(
        &self,
        team_id: &TeamId,
        group_id: &InstallerGroupId,
    ) -> Result<Option<InstallerGroup>, TeamRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<InstallerGroupRow> = installer_groups::table
            .filter(
                installer_groups::id
                    .eq(group_id.as_uuid())
                    .and(installer_groups::team_id.eq(team_id.as_uuid())),
            )
            .select(InstallerGroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(row_to_group))
    }
}
