//! Workspace selection domain service.
//!
//! Validates the requested team and installer group against the caller's
//! tenancy before persisting the selection as a single upserted row.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::access::{map_team_error, resolve_member};
use crate::domain::ports::{
    SaveSelectionRequest, SelectionCommand, SelectionQuery, SelectionStore, SelectionStoreError,
    TeamRepository,
};
use crate::domain::{Error, UserId, WorkspaceSelection};

/// Workspace selection service implementing the driving ports.
#[derive(Clone)]
pub struct SelectionService<T, S> {
    teams: Arc<T>,
    store: Arc<S>,
}

impl<T, S> SelectionService<T, S> {
    /// Create a new service with the given repositories.
    pub fn new(teams: Arc<T>, store: Arc<S>) -> Self {
        Self { teams, store }
    }
}

fn map_store_error(error: SelectionStoreError) -> Error {
    match error {
        SelectionStoreError::Connection { message } => {
            Error::service_unavailable(format!("selection store unavailable: {message}"))
        }
        SelectionStoreError::Query { message } => {
            Error::internal(format!("selection store error: {message}"))
        }
    }
}

#[async_trait]
impl<T, S> SelectionCommand for SelectionService<T, S>
where
    T: TeamRepository,
    S: SelectionStore,
{
    async fn save(&self, request: SaveSelectionRequest) -> Result<WorkspaceSelection, Error> {
        resolve_member(self.teams.as_ref(), &request.team_id, &request.caller).await?;
        if let Some(group_id) = &request.installer_group_id {
            self.teams
                .find_installer_group(&request.team_id, group_id)
                .await
                .map_err(map_team_error)?
                .ok_or_else(|| Error::not_found("installer group not found"))?;
        }

        let selection = WorkspaceSelection {
            user_id: request.caller,
            team_id: request.team_id,
            installer_group_id: request.installer_group_id,
            updated_at: Utc::now(),
        };
        self.store
            .save(&selection)
            .await
            .map_err(map_store_error)?;
        Ok(selection)
    }
}

#[async_trait]
impl<T, S> SelectionQuery for SelectionService<T, S>
where
    T: TeamRepository,
    S: SelectionStore,
{
    async fn fetch(&self, caller: UserId) -> Result<Option<WorkspaceSelection>, Error> {
        self.store.fetch(&caller).await.map_err(map_store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockSelectionStore, MockTeamRepository};
    use crate::domain::team::{InstallerGroup, TeamMember, TeamRole};
    use crate::domain::{InstallerGroupId, TeamId};

    #[tokio::test]
    async fn saving_a_foreign_team_reads_as_not_found() {
        let mut teams = MockTeamRepository::new();
        teams.expect_membership().return_once(|_, _| Ok(None));

        let service = SelectionService::new(Arc::new(teams), Arc::new(MockSelectionStore::new()));
        let error = service
            .save(SaveSelectionRequest {
                caller: UserId::random(),
                team_id: TeamId::random(),
                installer_group_id: None,
            })
            .await
            .expect_err("foreign team");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn saving_validates_the_installer_group() {
        let team_id = TeamId::random();
        let caller = UserId::random();
        let group_id = InstallerGroupId::random();
        let mut teams = MockTeamRepository::new();
        teams.expect_membership().return_once(move |_, _| {
            Ok(Some(TeamMember {
                team_id,
                user_id: caller,
                role: TeamRole::Installer,
                created_at: Utc::now(),
            }))
        });
        teams.expect_find_installer_group().return_once(|t, g| {
            Ok(Some(InstallerGroup {
                id: *g,
                team_id: *t,
                name: "North crew".to_owned(),
                created_at: Utc::now(),
            }))
        });
        let mut store = MockSelectionStore::new();
        store
            .expect_save()
            .withf(move |selection| selection.installer_group_id == Some(group_id))
            .times(1)
            .return_once(|_| Ok(()));

        let service = SelectionService::new(Arc::new(teams), Arc::new(store));
        let selection = service
            .save(SaveSelectionRequest {
                caller,
                team_id,
                installer_group_id: Some(group_id),
            })
            .await
            .expect("save selection");
        assert_eq!(selection.team_id, team_id);
    }

    #[tokio::test]
    async fn fetch_passes_through_the_stored_selection() {
        let caller = UserId::random();
        let mut store = MockSelectionStore::new();
        store.expect_fetch().return_once(move |user_id| {
            Ok(Some(WorkspaceSelection {
                user_id: *user_id,
                team_id: TeamId::random(),
                installer_group_id: None,
                updated_at: Utc::now(),
            }))
        });

        let service =
            SelectionService::new(Arc::new(MockTeamRepository::new()), Arc::new(store));
        let selection = service.fetch(caller).await.expect("fetch");
        assert_eq!(selection.expect("stored").user_id, caller);
    }
}
