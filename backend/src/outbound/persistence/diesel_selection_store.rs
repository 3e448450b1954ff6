//! PostgreSQL-backed `SelectionStore` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SelectionStore, SelectionStoreError};
use crate::domain::selection::WorkspaceSelection;
use crate::domain::{InstallerGroupId, TeamId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{UpsertWorkspaceSelectionRow, WorkspaceSelectionRow};
use super::pool::DbPool;
use super::schema::workspace_selections;

/// Diesel-backed implementation of the `SelectionStore` port.
#[derive(Clone)]
pub struct DieselSelectionStore {
    pool: DbPool,
}

impl DieselSelectionStore {
    /// Create a store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: super::pool::PoolError) -> SelectionStoreError {
    map_pool_error(error, SelectionStoreError::connection)
}

fn map_diesel(error: diesel::result::Error) -> SelectionStoreError {
    map_diesel_error(
        error,
        SelectionStoreError::query,
        SelectionStoreError::connection,
    )
}

fn row_to_selection(row: WorkspaceSelectionRow) -> WorkspaceSelection {
    WorkspaceSelection {
        user_id: UserId::from_uuid(row.user_id),
        team_id: TeamId::from_uuid(row.team_id),
        installer_group_id: row.installer_group_id.map(InstallerGroupId::from_uuid),
        updated_at: row.updated_at,
    }
}

#[async_trait]
impl SelectionStore for DieselSelectionStore {
    async fn fetch(
        &self,
        user_id: &UserId,
    ) -> Result<Option<WorkspaceSelection>, SelectionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<WorkspaceSelectionRow> = workspace_selections::table
            .filter(workspace_selections::user_id.eq(user_id.as_uuid()))
            .select(WorkspaceSelectionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(row_to_selection))
    }

    async fn save(&self, selection: &WorkspaceSelection) -> Result<(), SelectionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = UpsertWorkspaceSelectionRow {
            user_id: *selection.user_id.as_uuid(),
            team_id: *selection.team_id.as_uuid(),
            installer_group_id: selection
                .installer_group_id
                .as_ref()
                .map(|id| *id.as_uuid()),
            updated_at: selection.updated_at,
        };

        diesel::insert_into(workspace_selections::table)
            .values(&row)
            .on_conflict(workspace_selections::user_id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }
}
