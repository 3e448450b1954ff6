//! PostgreSQL-backed `EstimateRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::estimate::Estimate;
use crate::domain::ports::{EstimateRepository, EstimateRepositoryError};
use crate::domain::LeadId;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{EstimateRow, UpsertEstimateRow};
use super::pool::DbPool;
use super::schema::estimates;

/// Diesel-backed implementation of the `EstimateRepository` port.
#[derive(Clone)]
pub struct DieselEstimateRepository {
    pool: DbPool,
}

impl DieselEstimateRepository {
    /// Create a repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: super::pool::PoolError) -> EstimateRepositoryError {
    map_pool_error(error, EstimateRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> EstimateRepositoryError {
    map_diesel_error(
        error,
        EstimateRepositoryError::query,
        EstimateRepositoryError::connection,
    )
}

fn row_to_estimate(row: EstimateRow) -> Estimate {
    Estimate {
        lead_id: LeadId::from_uuid(row.lead_id),
        panel_count: row.panel_count,
        roof_type: row.roof_type,
        annual_consumption_kwh: row.annual_consumption_kwh,
        system_size_kw: row.system_size_kw,
        quoted_total: row.quoted_total,
        updated_at: row.updated_at,
    }
}

#[async_trait]
impl EstimateRepository for DieselEstimateRepository {
    async fn upsert(&self, estimate: &Estimate) -> Result<(), EstimateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = UpsertEstimateRow {
            lead_id: *estimate.lead_id.as_uuid(),
            panel_count: estimate.panel_count,
            roof_type: &estimate.roof_type,
            annual_consumption_kwh: estimate.annual_consumption_kwh,
            system_size_kw: estimate.system_size_kw,
            quoted_total: estimate.quoted_total,
            updated_at: estimate.updated_at,
        };

        diesel::insert_into(estimates::table)
            .values(&row)
            .on_conflict(estimates::lead_id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn find(&self, lead_id: &LeadId) -> Result<Option<Estimate>, EstimateRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<EstimateRow> = estimates::table
            .filter(estimates::lead_id.eq(lead_id.as_uuid()))
            .select(EstimateRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(row_to_estimate))
    }
}
