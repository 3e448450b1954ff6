//! Port for estimate persistence.

use async_trait::async_trait;

use crate::domain::estimate::Estimate;
use crate::domain::ids::LeadId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by estimate repository adapters.
    pub enum EstimateRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "estimate repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "estimate repository query failed: {message}",
    }
}

/// Port for estimate storage. Saves are upserts keyed by lead id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EstimateRepository: Send + Sync {
    /// Insert or replace the estimate for a lead.
    async fn upsert(&self, estimate: &Estimate) -> Result<(), EstimateRepositoryError>;

    /// Fetch the estimate for a lead, if any.
    async fn find(&self, lead_id: &LeadId) -> Result<Option<Estimate>, EstimateRepositoryError>;
}

/// Fixture implementation for testing without a real database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEstimateRepository;

#[async_trait]
impl EstimateRepository for FixtureEstimateRepository {
    async fn upsert(&self, _estimate: &Estimate) -> Result<(), EstimateRepositoryError> {
        Ok(())
    }

    async fn find(&self, _lead_id: &LeadId) -> Result<Option<Estimate>, EstimateRepositoryError> {
        Ok(None)
    }
}
