//! PostgreSQL-backed `LeadRepository` implementation using Diesel ORM.
//!
//! All lead reads and the status update filter on the caller's scope, so a
//! lead outside the tenancy behaves exactly like a missing row.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::lead::{Lead, LeadNote, LeadStatus, LeadTask};
use crate::domain::ports::{LeadRepository, LeadRepositoryError};
use crate::domain::team::TeamScope;
use crate::domain::{InstallerGroupId, LeadId, TeamId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{LeadNoteRow, LeadRow, LeadTaskRow, NewLeadNoteRow, NewLeadRow, NewLeadTaskRow};
use super::pool::DbPool;
use super::schema::{lead_notes, lead_tasks, leads};

/// Diesel-backed implementation of the `LeadRepository` port.
#[derive(Clone)]
pub struct DieselLeadRepository {
    pool: DbPool,
}

impl DieselLeadRepository {
    /// Create a repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: super::pool::PoolError) -> LeadRepositoryError {
    map_pool_error(error, LeadRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> LeadRepositoryError {
    map_diesel_error(
        error,
        LeadRepositoryError::query,
        LeadRepositoryError::connection,
    )
}

fn row_to_lead(row: LeadRow) -> Lead {
    let status = LeadStatus::try_from_code(row.status).unwrap_or_else(|_| {
        warn!(
            code = row.status,
            lead_id = %row.id,
            "unrecognised status code, defaulting to cold call"
        );
        LeadStatus::ColdCall
    });
    Lead {
        id: LeadId::from_uuid(row.id),
        team_id: TeamId::from_uuid(row.team_id),
        installer_group_id: InstallerGroupId::from_uuid(row.installer_group_id),
        name: row.name,
        email: row.email,
        phone: row.phone,
        address: row.address,
        status,
        source: row.source,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn lead_to_row(lead: &Lead) -> NewLeadRow<'_> {
    NewLeadRow {
        id: *lead.id.as_uuid(),
        team_id: *lead.team_id.as_uuid(),
        installer_group_id: *lead.installer_group_id.as_uuid(),
        name: &lead.name,
        email: &lead.email,
        phone: &lead.phone,
        address: &lead.address,
        status: lead.status.code(),
        source: &lead.source,
        created_at: lead.created_at,
        updated_at: lead.updated_at,
    }
}

fn row_to_task(row: LeadTaskRow) -> LeadTask {
    LeadTask {
        id: row.id,
        lead_id: LeadId::from_uuid(row.lead_id),
        title: row.title,
        due_at: row.due_at,
        done: row.done,
        created_at: row.created_at,
    }
}

fn row_to_note(row: LeadNoteRow) -> LeadNote {
    LeadNote {
        id: row.id,
        lead_id: LeadId::from_uuid(row.lead_id),
        author_user_id: UserId::from_uuid(row.author_user_id),
        body: row.body,
        created_at: row.created_at,
    }
}

/// Boxed scope filter shared by the lead queries.
macro_rules! scoped_leads {
    ($scope:expr) => {{
        let mut query = leads::table
            .filter(leads::team_id.eq($scope.team_id.as_uuid()))
            .into_boxed();
        if let Some(group_id) = &$scope.installer_group_id {
            query = query.filter(leads::installer_group_id.eq(group_id.as_uuid()));
        }
        query
    }};
}

#[async_trait]
impl LeadRepository for DieselLeadRepository {
    async fn insert(&self, lead: &Lead) -> Result<(), LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        diesel::insert_into(leads::table)
            .values(&lead_to_row(lead))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn insert_batch(&self, batch: &[Lead]) -> Result<usize, LeadRepositoryError> {
        if batch.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<NewLeadRow<'_>> = batch.iter().map(lead_to_row).collect();
        diesel::insert_into(leads::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(map_diesel)
    }

    async fn find(
        &self,
        scope: &TeamScope,
        lead_id: &LeadId,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<LeadRow> = scoped_leads!(scope)
            .filter(leads::id.eq(lead_id.as_uuid()))
            .select(LeadRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(row_to_lead))
    }

    async fn list(&self, scope: &TeamScope) -> Result<Vec<Lead>, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<LeadRow> = scoped_leads!(scope)
            .order(leads::created_at.desc())
            .select(LeadRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(row_to_lead).collect())
    }

    async fn list_by_status(
        &self,
        scope: &TeamScope,
        status: LeadStatus,
    ) -> Result<Vec<Lead>, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<LeadRow> = scoped_leads!(scope)
            .filter(leads::status.eq(status.code()))
            .order(leads::created_at.asc())
            .select(LeadRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(row_to_lead).collect())
    }

    async fn update_status(
        &self,
        scope: &TeamScope,
        lead_id: &LeadId,
        status: LeadStatus,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        // Update statements cannot be boxed, so the optional group filter
        // takes two branches.
        let changes = (leads::status.eq(status.code()), leads::updated_at.eq(Utc::now()));
        let in_team = leads::id
            .eq(lead_id.as_uuid())
            .and(leads::team_id.eq(scope.team_id.as_uuid()));
        let result = match &scope.installer_group_id {
            Some(group_id) => {
                diesel::update(leads::table)
                    .filter(in_team.and(leads::installer_group_id.eq(group_id.as_uuid())))
                    .set(changes)
                    .returning(LeadRow::as_select())
                    .get_result(&mut conn)
                    .await
            }
            None => {
                diesel::update(leads::table)
                    .filter(in_team)
                    .set(changes)
                    .returning(LeadRow::as_select())
                    .get_result(&mut conn)
                    .await
            }
        };

        let row: Option<LeadRow> = result.optional().map_err(map_diesel)?;
        Ok(row.map(row_to_lead))
    }

    async fn insert_task(&self, task: &LeadTask) -> Result<(), LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = NewLeadTaskRow {
            id: task.id,
            lead_id: *task.lead_id.as_uuid(),
            title: &task.title,
            due_at: task.due_at,
            done: task.done,
            created_at: task.created_at,
        };

        diesel::insert_into(lead_tasks::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn tasks(&self, lead_id: &LeadId) -> Result<Vec<LeadTask>, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<LeadTaskRow> = lead_tasks::table
            .filter(lead_tasks::lead_id.eq(lead_id.as_uuid()))
            .order(lead_tasks::created_at.asc())
            .select(LeadTaskRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(row_to_task).collect())
    }

    async fn complete_task(
        &self,
        lead_id: &LeadId,
        task_id: &Uuid,
    ) -> Result<bool, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let updated = diesel::update(lead_tasks::table)
            .filter(
                lead_tasks::id
                    .eq(task_id)
                    .and(lead_tasks::lead_id.eq(lead_id.as_uuid())),
            )
            .set(lead_tasks::done.eq(true))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(updated > 0)
    }

    async fn insert_note(&self, note: &LeadNote) -> Result<(), LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = NewLeadNoteRow {
            id: note.id,
            lead_id: *note.lead_id.as_uuid(),
            author_user_id: *note.author_user_id.as_uuid(),
            body: &note.body,
            created_at: note.created_at,
        };

        diesel::insert_into(lead_notes::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn notes(&self, lead_id: &LeadId) -> Result<Vec<LeadNote>, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<LeadNoteRow> = lead_notes::table
            .filter(lead_notes::lead_id.eq(lead_id.as_uuid()))
            .order(lead_notes::created_at.desc())
            .select(LeadNoteRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(row_to_note).collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversions.
    use super::*;

    fn sample_row(status: i16) -> LeadRow {
        let now = Utc::now();
        LeadRow {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            installer_group_id: Uuid::new_v4(),
            name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            phone: "-".to_owned(),
            address: "1 Analytical Way".to_owned(),
            status,
            source: "import".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn rows_round_trip_every_stage_code() {
        for status in LeadStatus::PIPELINE {
            let lead = row_to_lead(sample_row(status.code()));
            assert_eq!(lead.status, status);
        }
    }

    #[test]
    fn unknown_stage_codes_fall_back_to_cold_call() {
        let lead = row_to_lead(sample_row(99));
        assert_eq!(lead.status, LeadStatus::ColdCall);
    }
}
