//! Driving ports for price-table operations.
//!
//! Cost and markup figures arrive as raw form strings; the implementation
//! coerces them with the forgiving spreadsheet rules (comma decimals
//! accepted, malformed input becomes zero) before computing the breakdown.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, InstallerGroupId, PriceCategory, PriceItem, PriceTable, TeamId, UserId};

/// Request to save one price row. Admin only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavePriceItemRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = String)]
    pub installer_group_id: InstallerGroupId,
    pub category: PriceCategory,
    pub name: String,
    /// Raw cost figure as typed; coerced, never rejected.
    pub cost: String,
    /// Raw markup percentage as typed; coerced, never rejected.
    pub markup_percent: String,
}

/// Request for an installer group's computed price table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceTableRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = String)]
    pub installer_group_id: InstallerGroupId,
}

/// Driving port for price-row mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PricingCommand: Send + Sync {
    /// Insert or replace one price row on its natural key.
    async fn save_price_item(&self, request: SavePriceItemRequest) -> Result<PriceItem, Error>;
}

/// Driving port for price-table reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PricingQuery: Send + Sync {
    /// The computed price table for an installer group.
    async fn price_table(&self, request: PriceTableRequest) -> Result<PriceTable, Error>;
}

/// Fixture implementation coercing figures without persisting anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePricingCommand;

#[async_trait]
impl PricingCommand for FixturePricingCommand {
    async fn save_price_item(&self, request: SavePriceItemRequest) -> Result<PriceItem, Error> {
        Ok(PriceItem {
            installer_group_id: request.installer_group_id,
            category: request.category,
            name: request.name,
            cost: crate::domain::pricing::coerce_amount(&request.cost),
            markup_percent: crate::domain::pricing::coerce_amount(&request.markup_percent),
            updated_at: chrono::Utc::now(),
        })
    }
}

/// Fixture implementation returning an empty table.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePricingQuery;

#[async_trait]
impl PricingQuery for FixturePricingQuery {
    async fn price_table(&self, request: PriceTableRequest) -> Result<PriceTable, Error> {
        Ok(PriceTable::compute(request.installer_group_id, Vec::new()))
    }
}
