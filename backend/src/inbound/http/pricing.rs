//! Price table HTTP handlers.

use actix_web::{HttpResponse, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{PriceTableRequest, SavePriceItemRequest};
use crate::domain::{Error, PriceCategory, PriceItem, PriceTable};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_group_id, parse_team_id,
};

/// Request payload for saving one price row.
///
/// Cost and markup arrive as raw form strings and are coerced downstream,
/// so a stray comma decimal or empty cell never rejects the row.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavePriceItemPayload {
    pub category: Option<PriceCategory>,
    pub name: Option<String>,
    pub cost: Option<String>,
    pub markup_percent: Option<String>,
}

/// Insert or replace a price row. Admin only.
#[utoipa::path(
    put,
    path = "/api/v1/teams/{team_id}/installer-groups/{group_id}/price-items",
    params(
        ("team_id" = String, Path, description = "Team identifier"),
        ("group_id" = String, Path, description = "Installer group identifier")
    ),
    request_body = SavePriceItemPayload,
    responses(
        (status = 200, description = "Price row saved", body = PriceItem),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 404, description = "Team or installer group not found", body = Error)
    ),
    tags = ["pricing"],
    operation_id = "savePriceItem"
)]
#[put("/teams/{team_id}/installer-groups/{group_id}/price-items")]
pub async fn save_price_item(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(String, String)>,
    payload: web::Json<SavePriceItemPayload>,
) -> ApiResult<HttpResponse> {
    let (team_id, group_id) = path.into_inner();
    let payload = payload.into_inner();
    let category = payload
        .category
        .ok_or_else(|| missing_field_error(FieldName::new("category")))?;
    let name = payload
        .name
        .ok_or_else(|| missing_field_error(FieldName::new("name")))?;

    let item = state
        .pricing
        .save_price_item(SavePriceItemRequest {
            caller: caller.user_id,
            team_id: parse_team_id(&team_id)?,
            installer_group_id: parse_group_id(&group_id)?,
            category,
            name,
            cost: payload.cost.unwrap_or_default(),
            markup_percent: payload.markup_percent.unwrap_or_default(),
        })
        .await?;
    Ok(HttpResponse::Ok().json(item))
}

/// The computed price table: per-row markup and VAT-inclusive totals plus
/// the quote total across the group.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/installer-groups/{group_id}/price-table",
    params(
        ("team_id" = String, Path, description = "Team identifier"),
        ("group_id" = String, Path, description = "Installer group identifier")
    ),
    responses(
        (status = 200, description = "The price table", body = PriceTable),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Team or installer group not found", body = Error)
    ),
    tags = ["pricing"],
    operation_id = "priceTable"
)]
#[get("/teams/{team_id}/installer-groups/{group_id}/price-table")]
pub async fn price_table(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<PriceTable>> {
    let (team_id, group_id) = path.into_inner();
    let table = state
        .pricing_query
        .price_table(PriceTableRequest {
            caller: caller.user_id,
            team_id: parse_team_id(&team_id)?,
            installer_group_id: parse_group_id(&group_id)?,
        })
        .await?;
    Ok(web::Json(table))
}
