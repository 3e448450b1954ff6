//! PostgreSQL-backed `TokenVerifier` implementation using Diesel ORM.
//!
//! Tokens live in the `api_tokens` table; a revoked token is kept for audit
//! but no longer authenticates.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::ports::{TokenVerifier, TokenVerifierError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::schema::api_tokens;

/// Diesel-backed implementation of the `TokenVerifier` port.
#[derive(Clone)]
pub struct DieselTokenVerifier {
    pool: DbPool,
}

impl DieselTokenVerifier {
    /// Create a verifier with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: super::pool::PoolError) -> TokenVerifierError {
    map_pool_error(error, TokenVerifierError::connection)
}

fn map_diesel(error: diesel::result::Error) -> TokenVerifierError {
    map_diesel_error(
        error,
        TokenVerifierError::query,
        TokenVerifierError::connection,
    )
}

#[async_trait]
impl TokenVerifier for DieselTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Option<UserId>, TokenVerifierError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let user_id: Option<Uuid> = api_tokens::table
            .filter(
                api_tokens::token
                    .eq(token)
                    .and(api_tokens::revoked_at.is_null()),
            )
            .select(api_tokens::user_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(user_id.map(UserId::from_uuid))
    }
}
