//! Port for per-user workspace selection persistence.

use async_trait::async_trait;

use crate::domain::ids::UserId;
use crate::domain::selection::WorkspaceSelection;

use super::define_port_error;

define_port_error! {
    /// Errors raised by selection store adapters.
    pub enum SelectionStoreError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "selection store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "selection store query failed: {message}",
    }
}

/// Port for the key-value record of each user's current workspace.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SelectionStore: Send + Sync {
    /// Fetch the stored selection, if the user has one.
    async fn fetch(
        &self,
        user_id: &UserId,
    ) -> Result<Option<WorkspaceSelection>, SelectionStoreError>;

    /// Insert or replace the stored selection.
    async fn save(&self, selection: &WorkspaceSelection) -> Result<(), SelectionStoreError>;
}

/// Fixture implementation for testing without a real database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSelectionStore;

#[async_trait]
impl SelectionStore for FixtureSelectionStore {
    async fn fetch(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<WorkspaceSelection>, SelectionStoreError> {
        Ok(None)
    }

    async fn save(&self, _selection: &WorkspaceSelection) -> Result<(), SelectionStoreError> {
        Ok(())
    }
}
