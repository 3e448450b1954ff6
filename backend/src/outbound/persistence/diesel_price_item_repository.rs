//! PostgreSQL-backed `PriceItemRepository` implementation using Diesel ORM.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::InstallerGroupId;
use crate::domain::ports::{PriceItemRepository, PriceItemRepositoryError};
use crate::domain::pricing::{PriceCategory, PriceItem};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{PriceItemRow, UpsertPriceItemRow};
use super::pool::DbPool;
use super::schema::price_items;

/// Diesel-backed implementation of the `PriceItemRepository` port.
#[derive(Clone)]
pub struct DieselPriceItemRepository {
    pool: DbPool,
}

impl DieselPriceItemRepository {
    /// Create a repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: super::pool::PoolError) -> PriceItemRepositoryError {
    map_pool_error(error, PriceItemRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> PriceItemRepositoryError {
    map_diesel_error(
        error,
        PriceItemRepositoryError::query,
        PriceItemRepositoryError::connection,
    )
}

fn row_to_item(row: PriceItemRow) -> PriceItem {
    let category = PriceCategory::from_str(&row.category).unwrap_or_else(|_| {
        warn!(
            value = %row.category,
            group_id = %row.installer_group_id,
            "unrecognised price category, defaulting to additional"
        );
        PriceCategory::Additional
    });
    PriceItem {
        installer_group_id: InstallerGroupId::from_uuid(row.installer_group_id),
        category,
        name: row.name,
        cost: row.cost,
        markup_percent: row.markup_percent,
        updated_at: row.updated_at,
    }
}

#[async_trait]
impl PriceItemRepository for DieselPriceItemRepository {
    async fn upsert(&self, item: &PriceItem) -> Result<(), PriceItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = UpsertPriceItemRow {
            installer_group_id: *item.installer_group_id.as_uuid(),
            category: item.category.as_str(),
            name: &item.name,
            cost: item.cost,
            markup_percent: item.markup_percent,
            updated_at: item.updated_at,
        };

        diesel::insert_into(price_items::table)
            .values(&row)
            .on_conflict((
                price_items::installer_group_id,
                price_items::category,
                price_items::name,
            ))
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn list(
        &self,
        installer_group_id: &InstallerGroupId,
    ) -> Result<Vec<PriceItem>, PriceItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<PriceItemRow> = price_items::table
            .filter(price_items::installer_group_id.eq(installer_group_id.as_uuid()))
            .order((price_items::category.asc(), price_items::name.asc()))
            .select(PriceItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(row_to_item).collect())
    }
}
