//! Driving ports for the per-user workspace selection.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, InstallerGroupId, TeamId, UserId, WorkspaceSelection};

/// Request to set the caller's current workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveSelectionRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = Option<String>)]
    pub installer_group_id: Option<InstallerGroupId>,
}

/// Driving port for workspace selection mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SelectionCommand: Send + Sync {
    /// Validate against the caller's tenancy and store the selection.
    async fn save(&self, request: SaveSelectionRequest) -> Result<WorkspaceSelection, Error>;
}

/// Driving port for workspace selection reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SelectionQuery: Send + Sync {
    /// The caller's stored selection, if any.
    async fn fetch(&self, caller: UserId) -> Result<Option<WorkspaceSelection>, Error>;
}

/// Fixture implementation echoing the request without persisting it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSelectionCommand;

#[async_trait]
impl SelectionCommand for FixtureSelectionCommand {
    async fn save(&self, request: SaveSelectionRequest) -> Result<WorkspaceSelection, Error> {
        Ok(WorkspaceSelection {
            user_id: request.caller,
            team_id: request.team_id,
            installer_group_id: request.installer_group_id,
            updated_at: chrono::Utc::now(),
        })
    }
}

/// Fixture implementation with no stored selection.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSelectionQuery;

#[async_trait]
impl SelectionQuery for FixtureSelectionQuery {
    async fn fetch(&self, _caller: UserId) -> Result<Option<WorkspaceSelection>, Error> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn fixture_save_echoes_the_selection() {
        let command = FixtureSelectionCommand;
        let caller = UserId::random();
        let team_id = TeamId::random();
        let saved = command
            .save(SaveSelectionRequest {
                caller,
                team_id,
                installer_group_id: None,
            })
            .await
            .expect("save");
        assert_eq!(saved.user_id, caller);
        assert_eq!(saved.team_id, team_id);
        assert!(saved.installer_group_id.is_none());
    }
}
