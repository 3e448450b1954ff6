//! Workspace selection HTTP handlers.
//!
//! The selection is server-side state: clients read it back on startup
//! instead of remembering the last team locally.

use actix_web::{HttpResponse, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::SaveSelectionRequest;
use crate::domain::{Error, WorkspaceSelection};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_group_id, parse_team_id,
};

/// Request payload for setting the caller's workspace.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveSelectionPayload {
    pub team_id: Option<String>,
    pub installer_group_id: Option<String>,
}

/// Set the caller's current workspace.
#[utoipa::path(
    put,
    path = "/api/v1/workspace",
    request_body = SaveSelectionPayload,
    responses(
        (status = 200, description = "Selection saved", body = WorkspaceSelection),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Team or installer group not found", body = Error)
    ),
    tags = ["workspace"],
    operation_id = "saveWorkspaceSelection"
)]
#[put("/workspace")]
pub async fn save(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<SaveSelectionPayload>,
) -> ApiResult<web::Json<WorkspaceSelection>> {
    let payload = payload.into_inner();
    let team_id = payload
        .team_id
        .ok_or_else(|| missing_field_error(FieldName::new("teamId")))
        .and_then(|raw| parse_team_id(&raw))?;
    let installer_group_id = payload
        .installer_group_id
        .as_deref()
        .map(parse_group_id)
        .transpose()?;

    let selection = state
        .selection
        .save(SaveSelectionRequest {
            caller: caller.user_id,
            team_id,
            installer_group_id,
        })
        .await?;
    Ok(web::Json(selection))
}

/// The caller's stored workspace, or 204 when none is stored yet.
#[utoipa::path(
    get,
    path = "/api/v1/workspace",
    responses(
        (status = 200, description = "The stored selection", body = WorkspaceSelection),
        (status = 204, description = "No selection stored"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["workspace"],
    operation_id = "getWorkspaceSelection"
)]
#[get("/workspace")]
pub async fn fetch(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let selection = state.selection_query.fetch(caller.user_id).await?;
    Ok(match selection {
        Some(selection) => HttpResponse::Ok().json(selection),
        None => HttpResponse::NoContent().finish(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockTokenVerifier;
    use crate::domain::{TeamId, UserId};
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn permissive_state() -> HttpState {
        let mut verifier = MockTokenVerifier::new();
        verifier
            .expect_verify()
            .returning(|_| Ok(Some(UserId::random())));
        HttpState {
            token_verifier: Arc::new(verifier),
            ..HttpState::fixture()
        }
    }

    #[actix_web::test]
    async fn no_stored_selection_yields_no_content() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(permissive_state()))
                .service(fetch),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/workspace")
                .insert_header((header::AUTHORIZATION, "Bearer test-token"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn saved_selection_echoes_the_team() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(permissive_state()))
                .service(save),
        )
        .await;

        let team_id = TeamId::random();
        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/workspace")
                .insert_header((header::AUTHORIZATION, "Bearer test-token"))
                .set_json(json!({"teamId": team_id.to_string()}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(
            body.get("teamId").and_then(Value::as_str),
            Some(team_id.to_string().as_str())
        );
    }

    #[actix_web::test]
    async fn missing_team_id_is_a_field_error() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(permissive_state()))
                .service(save),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/workspace")
                .insert_header((header::AUTHORIZATION, "Bearer test-token"))
                .set_json(json!({}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/details/field").and_then(Value::as_str),
            Some("teamId")
        );
    }
}
