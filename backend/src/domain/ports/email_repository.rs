//! Ports for the mailbox token cache and the local message archive.

use async_trait::async_trait;

use crate::domain::email::{EmailAccount, EmailMessage};
use crate::domain::ids::{LeadId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by email persistence adapters.
    pub enum EmailRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "email repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "email repository query failed: {message}",
    }
}

/// Port for the per-user OAuth token cache.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailAccountRepository: Send + Sync {
    /// Fetch the cached credentials for a user, if connected.
    async fn find(&self, user_id: &UserId) -> Result<Option<EmailAccount>, EmailRepositoryError>;

    /// Insert or replace the cached credentials.
    async fn save(&self, account: &EmailAccount) -> Result<(), EmailRepositoryError>;
}

/// Port for the local archive of sent Graph messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailMessageRepository: Send + Sync {
    /// Archive a sent message reference.
    async fn insert(&self, message: &EmailMessage) -> Result<(), EmailRepositoryError>;

    /// Archived correspondence for a lead, newest first.
    async fn list_for_lead(
        &self,
        lead_id: &LeadId,
    ) -> Result<Vec<EmailMessage>, EmailRepositoryError>;
}

/// Fixture token-cache implementation for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEmailAccountRepository;

#[async_trait]
impl EmailAccountRepository for FixtureEmailAccountRepository {
    async fn find(&self, _user_id: &UserId) -> Result<Option<EmailAccount>, EmailRepositoryError> {
        Ok(None)
    }

    async fn save(&self, _account: &EmailAccount) -> Result<(), EmailRepositoryError> {
        Ok(())
    }
}

/// Fixture archive implementation for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEmailMessageRepository;

#[async_trait]
impl EmailMessageRepository for FixtureEmailMessageRepository {
    async fn insert(&self, _message: &EmailMessage) -> Result<(), EmailRepositoryError> {
        Ok(())
    }

    async fn list_for_lead(
        &self,
        _lead_id: &LeadId,
    ) -> Result<Vec<EmailMessage>, EmailRepositoryError> {
        Ok(Vec::new())
    }
}
