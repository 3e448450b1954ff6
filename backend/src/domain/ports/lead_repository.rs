//! Port for lead persistence, including tasks and notes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ids::LeadId;
use crate::domain::lead::{Lead, LeadNote, LeadStatus, LeadTask};
use crate::domain::team::TeamScope;

use super::define_port_error;

define_port_error! {
    /// Errors raised by lead repository adapters.
    pub enum LeadRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "lead repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "lead repository query failed: {message}",
    }
}

/// Port for lead storage and retrieval.
///
/// Every operation takes a [`TeamScope`]; adapters filter on it so leads
/// outside the caller's tenancy are indistinguishable from missing rows.
/// Status updates are last-write-wins: there is deliberately no conflict
/// detection for concurrent movers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Insert a single lead.
    async fn insert(&self, lead: &Lead) -> Result<(), LeadRepositoryError>;

    /// Insert a batch of imported leads; returns the number inserted.
    async fn insert_batch(&self, leads: &[Lead]) -> Result<usize, LeadRepositoryError>;

    /// Find one lead within the scope.
    async fn find(
        &self,
        scope: &TeamScope,
        lead_id: &LeadId,
    ) -> Result<Option<Lead>, LeadRepositoryError>;

    /// All leads within the scope, newest first.
    async fn list(&self, scope: &TeamScope) -> Result<Vec<Lead>, LeadRepositoryError>;

    /// Leads in one pipeline stage within the scope, oldest first.
    async fn list_by_status(
        &self,
        scope: &TeamScope,
        status: LeadStatus,
    ) -> Result<Vec<Lead>, LeadRepositoryError>;

    /// Set a lead's stage. Returns the updated lead, or `None` when the lead
    /// is not visible in the scope.
    async fn update_status(
        &self,
        scope: &TeamScope,
        lead_id: &LeadId,
        status: LeadStatus,
    ) -> Result<Option<Lead>, LeadRepositoryError>;

    /// Insert a task for a lead.
    async fn insert_task(&self, task: &LeadTask) -> Result<(), LeadRepositoryError>;

    /// Tasks attached to a lead, oldest first.
    async fn tasks(&self, lead_id: &LeadId) -> Result<Vec<LeadTask>, LeadRepositoryError>;

    /// Mark a task done. Returns false when the task does not belong to the
    /// lead.
    async fn complete_task(
        &self,
        lead_id: &LeadId,
        task_id: &Uuid,
    ) -> Result<bool, LeadRepositoryError>;

    /// Insert a note for a lead.
    async fn insert_note(&self, note: &LeadNote) -> Result<(), LeadRepositoryError>;

    /// Notes attached to a lead, newest first.
    async fn notes(&self, lead_id: &LeadId) -> Result<Vec<LeadNote>, LeadRepositoryError>;
}

/// Fixture implementation for testing without a real database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLeadRepository;

#[async_trait]
impl LeadRepository for FixtureLeadRepository {
    async fn insert(&self, _lead: &Lead) -> Result<(), LeadRepositoryError> {
        Ok(())
    }

    async fn insert_batch(&self, leads: &[Lead]) -> Result<usize, LeadRepositoryError> {
        Ok(leads.len())
    }

    async fn find(
        &self,
        _scope: &TeamScope,
        _lead_id: &LeadId,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        Ok(None)
    }

    async fn list(&self, _scope: &TeamScope) -> Result<Vec<Lead>, LeadRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_by_status(
        &self,
        _scope: &TeamScope,
        _status: LeadStatus,
    ) -> Result<Vec<Lead>, LeadRepositoryError> {
        Ok(Vec::new())
    }

    async fn update_status(
        &self,
        _scope: &TeamScope,
        _lead_id: &LeadId,
        _status: LeadStatus,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        Ok(None)
    }

    async fn insert_task(&self, _task: &LeadTask) -> Result<(), LeadRepositoryError> {
        Ok(())
    }

    async fn tasks(&self, _lead_id: &LeadId) -> Result<Vec<LeadTask>, LeadRepositoryError> {
        Ok(Vec::new())
    }

    async fn complete_task(
        &self,
        _lead_id: &LeadId,
        _task_id: &Uuid,
    ) -> Result<bool, LeadRepositoryError> {
        Ok(false)
    }

    async fn insert_note(&self, _note: &LeadNote) -> Result<(), LeadRepositoryError> {
        Ok(())
    }

    async fn notes(&self, _lead_id: &LeadId) -> Result<Vec<LeadNote>, LeadRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::TeamId;

    #[tokio::test]
    async fn fixture_batch_insert_reports_row_count() {
        let repo = FixtureLeadRepository;
        let count = repo.insert_batch(&[]).await.expect("insert");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn fixture_lookup_returns_none() {
        let repo = FixtureLeadRepository;
        let scope = TeamScope::team(TeamId::random());
        assert!(
            repo.find(&scope, &LeadId::random())
                .await
                .expect("lookup")
                .is_none()
        );
    }
}
