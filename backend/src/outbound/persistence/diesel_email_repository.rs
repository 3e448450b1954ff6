//! PostgreSQL-backed email persistence: the per-user token cache and the
//! local archive of sent messages.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::email::{EmailAccount, EmailMessage, TokenSecret};
use crate::domain::ports::{
    EmailAccountRepository, EmailMessageRepository, EmailRepositoryError,
};
use crate::domain::{LeadId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    EmailAccountRow, EmailMessageRow, NewEmailMessageRow, UpsertEmailAccountRow,
};
use super::pool::DbPool;
use super::schema::{email_accounts, email_messages};

fn map_pool(error: super::pool::PoolError) -> EmailRepositoryError {
    map_pool_error(error, EmailRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> EmailRepositoryError {
    map_diesel_error(
        error,
        EmailRepositoryError::query,
        EmailRepositoryError::connection,
    )
}

fn row_to_account(row: EmailAccountRow) -> EmailAccount {
    EmailAccount {
        user_id: UserId::from_uuid(row.user_id),
        address: row.address,
        access_token: TokenSecret::new(row.access_token),
        refresh_token: TokenSecret::new(row.refresh_token),
        expires_at: row.expires_at,
        updated_at: row.updated_at,
    }
}

fn row_to_message(row: EmailMessageRow) -> EmailMessage {
    EmailMessage {
        id: row.id,
        lead_id: LeadId::from_uuid(row.lead_id),
        graph_message_id: row.graph_message_id,
        internet_message_id: row.internet_message_id,
        subject: row.subject,
        sent_at: row.sent_at,
    }
}

/// Diesel-backed implementation of the `EmailAccountRepository` port.
#[derive(Clone)]
pub struct DieselEmailAccountRepository {
    pool: DbPool,
}

impl DieselEmailAccountRepository {
    /// Create a repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmailAccountRepository for DieselEmailAccountRepository {
    async fn find(&self, user_id: &UserId) -> Result<Option<EmailAccount>, EmailRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<EmailAccountRow> = email_accounts::table
            .filter(email_accounts::user_id.eq(user_id.as_uuid()))
            .select(EmailAccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(row_to_account))
    }

    async fn save(&self, account: &EmailAccount) -> Result<(), EmailRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = UpsertEmailAccountRow {
            user_id: *account.user_id.as_uuid(),
            address: &account.address,
            access_token: account.access_token.expose(),
            refresh_token: account.refresh_token.expose(),
            expires_at: account.expires_at,
            updated_at: account.updated_at,
        };

        diesel::insert_into(email_accounts::table)
            .values(&row)
            .on_conflict(email_accounts::user_id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }
}

/// Diesel-backed implementation of the `EmailMessageRepository` port.
#[derive(Clone)]
pub struct DieselEmailMessageRepository {
    pool: DbPool,
}

impl DieselEmailMessageRepository {
    /// Create a repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmailMessageRepository for DieselEmailMessageRepository {
    async fn insert(&self, message: &EmailMessage) -> Result<(), EmailRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = NewEmailMessageRow {
            id: message.id,
            lead_id: *message.lead_id.as_uuid(),
            graph_message_id: &message.graph_message_id,
            internet_message_id: &message.internet_message_id,
            subject: &message.subject,
            sent_at: message.sent_at,
        };

        diesel::insert_into(email_messages::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn list_for_lead(
        &self,
        lead_id: &LeadId,
    ) -> Result<Vec<EmailMessage>, EmailRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<EmailMessageRow> = email_messages::table
            .filter(email_messages::lead_id.eq(lead_id.as_uuid()))
            .order(email_messages::sent_at.desc())
            .select(EmailMessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(row_to_message).collect())
    }
}
