//! Lead pipeline HTTP handlers.
//!
//! Everything under `/teams/{team_id}/leads` is scoped: the service layer
//! resolves the caller's membership first, so a foreign team id yields 404
//! rather than leaking existence.

use actix_web::{HttpResponse, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    AddNoteRequest, AddTaskRequest, BoardRequest, CompleteTaskRequest, CreateLeadRequest,
    GetLeadRequest, ImportLeadsRequest, ImportLeadsResponse, LeadBoard, LeadDetail,
    SaveEstimateRequest, UpdateLeadStatusRequest,
};
use crate::domain::{Error, Estimate, ImportRow, Lead, LeadNote, LeadStatus, LeadTask};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_group_id, parse_lead_id,
    parse_optional_rfc3339_timestamp, parse_team_id, parse_uuid,
};

/// Query string accepted by the board and cold-call reads.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardParams {
    pub installer_group_id: Option<String>,
}

/// Request payload for creating a lead by hand.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    pub installer_group_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Request payload for a bulk spreadsheet import.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportLeadsPayload {
    pub installer_group_id: Option<String>,
    pub rows: Option<Vec<ImportRow>>,
}

/// Request payload for a pipeline move.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    pub status: Option<LeadStatus>,
}

/// Request payload for attaching a task.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTaskPayload {
    pub title: Option<String>,
    /// RFC 3339 due date, if any.
    pub due_at: Option<String>,
}

/// Request payload for attaching a note.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddNotePayload {
    pub body: Option<String>,
}

/// Request payload for the installation estimate.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveEstimatePayload {
    pub panel_count: Option<i32>,
    pub roof_type: Option<String>,
    pub annual_consumption_kwh: Option<f64>,
    pub quoted_total: Option<f64>,
}

fn board_request(
    caller: Authenticated,
    team_id: &str,
    params: BoardParams,
) -> Result<BoardRequest, Error> {
    Ok(BoardRequest {
        caller: caller.user_id,
        team_id: parse_team_id(team_id)?,
        installer_group_id: params
            .installer_group_id
            .as_deref()
            .map(parse_group_id)
            .transpose()?,
    })
}

/// The pipeline board: one column per stage.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/leads/board",
    params(
        ("team_id" = String, Path, description = "Team identifier"),
        ("installerGroupId" = Option<String>, Query, description = "Narrow to one installer group")
    ),
    responses(
        (status = 200, description = "The board", body = LeadBoard),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Team not found", body = Error)
    ),
    tags = ["leads"],
    operation_id = "leadBoard"
)]
#[get("/teams/{team_id}/leads/board")]
pub async fn board(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    params: web::Query<BoardParams>,
) -> ApiResult<web::Json<LeadBoard>> {
    let request = board_request(caller, &path.into_inner(), params.into_inner())?;
    let board = state.leads_query.board(request).await?;
    Ok(web::Json(board))
}

/// The cold-call queue, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/leads/cold-calls",
    params(
        ("team_id" = String, Path, description = "Team identifier"),
        ("installerGroupId" = Option<String>, Query, description = "Narrow to one installer group")
    ),
    responses(
        (status = 200, description = "Leads awaiting a first call", body = [Lead]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Team not found", body = Error)
    ),
    tags = ["leads"],
    operation_id = "coldCallQueue"
)]
#[get("/teams/{team_id}/leads/cold-calls")]
pub async fn cold_calls(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    params: web::Query<BoardParams>,
) -> ApiResult<web::Json<Vec<Lead>>> {
    let request = board_request(caller, &path.into_inner(), params.into_inner())?;
    let leads = state.leads_query.cold_calls(request).await?;
    Ok(web::Json(leads))
}

/// Create a lead by hand. It enters the pipeline in the new stage.
#[utoipa::path(
    post,
    path = "/api/v1/teams/{team_id}/leads",
    params(("team_id" = String, Path, description = "Team identifier")),
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead created", body = Lead),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller cannot edit leads", body = Error),
        (status = 404, description = "Team or installer group not found", body = Error)
    ),
    tags = ["leads"],
    operation_id = "createLead"
)]
#[post("/teams/{team_id}/leads")]
pub async fn create_lead(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<CreateLeadPayload>,
) -> ApiResult<HttpResponse> {
    let team_id = parse_team_id(&path.into_inner())?;
    let payload = payload.into_inner();
    let installer_group_id = payload
        .installer_group_id
        .ok_or_else(|| missing_field_error(FieldName::new("installerGroupId")))
        .and_then(|raw| parse_group_id(&raw))?;
    let name = payload
        .name
        .ok_or_else(|| missing_field_error(FieldName::new("name")))?;

    let lead = state
        .leads
        .create_lead(CreateLeadRequest {
            caller: caller.user_id,
            team_id,
            installer_group_id,
            name,
            email: payload.email.unwrap_or_default(),
            phone: payload.phone.unwrap_or_default(),
            address: payload.address.unwrap_or_default(),
        })
        .await?;
    Ok(HttpResponse::Created().json(lead))
}

/// Import parsed spreadsheet rows as cold-call leads.
#[utoipa::path(
    post,
    path = "/api/v1/teams/{team_id}/leads/import",
    params(("team_id" = String, Path, description = "Team identifier")),
    request_body = ImportLeadsPayload,
    responses(
        (status = 200, description = "Rows imported", body = ImportLeadsResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller cannot edit leads", body = Error),
        (status = 404, description = "Team or installer group not found", body = Error)
    ),
    tags = ["leads"],
    operation_id = "importLeads"
)]
#[post("/teams/{team_id}/leads/import")]
pub async fn import_leads(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<ImportLeadsPayload>,
) -> ApiResult<web::Json<ImportLeadsResponse>> {
    let team_id = parse_team_id(&path.into_inner())?;
    let payload = payload.into_inner();
    let installer_group_id = payload
        .installer_group_id
        .ok_or_else(|| missing_field_error(FieldName::new("installerGroupId")))
        .and_then(|raw| parse_group_id(&raw))?;
    let rows = payload
        .rows
        .ok_or_else(|| missing_field_error(FieldName::new("rows")))?;

    let response = state
        .leads
        .import_leads(ImportLeadsRequest {
            caller: caller.user_id,
            team_id,
            installer_group_id,
            rows,
        })
        .await?;
    Ok(web::Json(response))
}

/// One lead with its tasks, notes, and estimate.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/leads/{lead_id}",
    params(
        ("team_id" = String, Path, description = "Team identifier"),
        ("lead_id" = String, Path, description = "Lead identifier")
    ),
    responses(
        (status = 200, description = "The lead", body = LeadDetail),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Team or lead not found", body = Error)
    ),
    tags = ["leads"],
    operation_id = "getLead"
)]
#[get("/teams/{team_id}/leads/{lead_id}")]
pub async fn get_lead(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<LeadDetail>> {
    let (team_id, lead_id) = path.into_inner();
    let detail = state
        .leads_query
        .get_lead(GetLeadRequest {
            caller: caller.user_id,
            team_id: parse_team_id(&team_id)?,
            lead_id: parse_lead_id(&lead_id)?,
        })
        .await?;
    Ok(web::Json(detail))
}

/// Move a lead to another pipeline stage. Last write wins.
#[utoipa::path(
    patch,
    path = "/api/v1/teams/{team_id}/leads/{lead_id}/status",
    params(
        ("team_id" = String, Path, description = "Team identifier"),
        ("lead_id" = String, Path, description = "Lead identifier")
    ),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Lead moved", body = Lead),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller cannot edit leads", body = Error),
        (status = 404, description = "Team or lead not found", body = Error)
    ),
    tags = ["leads"],
    operation_id = "updateLeadStatus"
)]
#[patch("/teams/{team_id}/leads/{lead_id}/status")]
pub async fn update_status(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdateStatusPayload>,
) -> ApiResult<web::Json<Lead>> {
    let (team_id, lead_id) = path.into_inner();
    let status = payload
        .into_inner()
        .status
        .ok_or_else(|| missing_field_error(FieldName::new("status")))?;
    let lead = state
        .leads
        .update_status(UpdateLeadStatusRequest {
            caller: caller.user_id,
            team_id: parse_team_id(&team_id)?,
            lead_id: parse_lead_id(&lead_id)?,
            status,
        })
        .await?;
    Ok(web::Json(lead))
}

/// Attach a follow-up task to a lead.
#[utoipa::path(
    post,
    path = "/api/v1/teams/{team_id}/leads/{lead_id}/tasks",
    params(
        ("team_id" = String, Path, description = "Team identifier"),
        ("lead_id" = String, Path, description = "Lead identifier")
    ),
    request_body = AddTaskPayload,
    responses(
        (status = 201, description = "Task created", body = LeadTask),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller cannot edit leads", body = Error),
        (status = 404, description = "Team or lead not found", body = Error)
    ),
    tags = ["leads"],
    operation_id = "addLeadTask"
)]
#[post("/teams/{team_id}/leads/{lead_id}/tasks")]
pub async fn add_task(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(String, String)>,
    payload: web::Json<AddTaskPayload>,
) -> ApiResult<HttpResponse> {
    let (team_id, lead_id) = path.into_inner();
    let payload = payload.into_inner();
    let title = payload
        .title
        .ok_or_else(|| missing_field_error(FieldName::new("title")))?;
    let due_at = parse_optional_rfc3339_timestamp(payload.due_at, FieldName::new("dueAt"))?;

    let task = state
        .leads
        .add_task(AddTaskRequest {
            caller: caller.user_id,
            team_id: parse_team_id(&team_id)?,
            lead_id: parse_lead_id(&lead_id)?,
            title,
            due_at,
        })
        .await?;
    Ok(HttpResponse::Created().json(task))
}

/// Mark a task done.
#[utoipa::path(
    post,
    path = "/api/v1/teams/{team_id}/leads/{lead_id}/tasks/{task_id}/complete",
    params(
        ("team_id" = String, Path, description = "Team identifier"),
        ("lead_id" = String, Path, description = "Lead identifier"),
        ("task_id" = String, Path, description = "Task identifier")
    ),
    responses(
        (status = 204, description = "Task completed"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller cannot edit leads", body = Error),
        (status = 404, description = "Team, lead, or task not found", body = Error)
    ),
    tags = ["leads"],
    operation_id = "completeLeadTask"
)]
#[post("/teams/{team_id}/leads/{lead_id}/tasks/{task_id}/complete")]
pub async fn complete_task(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(String, String, String)>,
) -> ApiResult<HttpResponse> {
    let (team_id, lead_id, task_id) = path.into_inner();
    state
        .leads
        .complete_task(CompleteTaskRequest {
            caller: caller.user_id,
            team_id: parse_team_id(&team_id)?,
            lead_id: parse_lead_id(&lead_id)?,
            task_id: parse_uuid(&task_id, FieldName::new("taskId"))?,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Attach a note to a lead.
#[utoipa::path(
    post,
    path = "/api/v1/teams/{team_id}/leads/{lead_id}/notes",
    params(
        ("team_id" = String, Path, description = "Team identifier"),
        ("lead_id" = String, Path, description = "Lead identifier")
    ),
    request_body = AddNotePayload,
    responses(
        (status = 201, description = "Note created", body = LeadNote),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller cannot edit leads", body = Error),
        (status = 404, description = "Team or lead not found", body = Error)
    ),
    tags = ["leads"],
    operation_id = "addLeadNote"
)]
#[post("/teams/{team_id}/leads/{lead_id}/notes")]
pub async fn add_note(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(String, String)>,
    payload: web::Json<AddNotePayload>,
) -> ApiResult<HttpResponse> {
    let (team_id, lead_id) = path.into_inner();
    let body = payload
        .into_inner()
        .body
        .ok_or_else(|| missing_field_error(FieldName::new("body")))?;
    let note = state
        .leads
        .add_note(AddNoteRequest {
            caller: caller.user_id,
            team_id: parse_team_id(&team_id)?,
            lead_id: parse_lead_id(&lead_id)?,
            body,
        })
        .await?;
    Ok(HttpResponse::Created().json(note))
}

/// Insert or replace the lead's installation estimate.
#[utoipa::path(
    put,
    path = "/api/v1/teams/{team_id}/leads/{lead_id}/estimate",
    params(
        ("team_id" = String, Path, description = "Team identifier"),
        ("lead_id" = String, Path, description = "Lead identifier")
    ),
    request_body = SaveEstimatePayload,
    responses(
        (status = 200, description = "Estimate saved", body = Estimate),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller cannot edit leads", body = Error),
        (status = 404, description = "Team or lead not found", body = Error)
    ),
    tags = ["leads"],
    operation_id = "saveLeadEstimate"
)]
#[put("/teams/{team_id}/leads/{lead_id}/estimate")]
pub async fn save_estimate(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(String, String)>,
    payload: web::Json<SaveEstimatePayload>,
) -> ApiResult<web::Json<Estimate>> {
    let (team_id, lead_id) = path.into_inner();
    let payload = payload.into_inner();
    let panel_count = payload
        .panel_count
        .ok_or_else(|| missing_field_error(FieldName::new("panelCount")))?;
    let roof_type = payload
        .roof_type
        .ok_or_else(|| missing_field_error(FieldName::new("roofType")))?;

    let estimate = state
        .leads
        .save_estimate(SaveEstimateRequest {
            caller: caller.user_id,
            team_id: parse_team_id(&team_id)?,
            lead_id: parse_lead_id(&lead_id)?,
            panel_count,
            roof_type,
            annual_consumption_kwh: payload.annual_consumption_kwh.unwrap_or_default(),
            quoted_total: payload.quoted_total.unwrap_or_default(),
        })
        .await?;
    Ok(web::Json(estimate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TeamId;
    use crate::domain::ports::MockLeadsCommand;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn fixture_app_state() -> web::Data<HttpState> {
        web::Data::new(HttpState::fixture())
    }

    fn authorized() -> test::TestRequest {
        // FixtureTokenVerifier rejects everything, so tests that need a
        // caller swap in a permissive verifier below.
        test::TestRequest::default().insert_header((header::AUTHORIZATION, "Bearer test-token"))
    }

    fn permissive_state() -> HttpState {
        use crate::domain::UserId;
        use crate::domain::ports::MockTokenVerifier;

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
    async fn board_requires_a_bearer_token() {
        let app = test::init_service(
            App::new().app_data(fixture_app_state()).service(board),
        )
        .await;

        let team_id = TeamId::random();
        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/teams/{team_id}/leads/board"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn board_rejects_malformed_team_ids() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(permissive_state()))
                .service(board),
        )
        .await;

        let response = test::call_service(
            &app,
            authorized().uri("/teams/not-a-uuid/leads/board").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/details/field").and_then(Value::as_str),
            Some("teamId")
        );
    }

    #[actix_web::test]
    async fn board_returns_a_column_per_stage() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(permissive_state()))
                .service(board),
        )
        .await;

        let team_id = TeamId::random();
        let response = test::call_service(
            &app,
            authorized()
                .uri(&format!("/teams/{team_id}/leads/board"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = test::read_body_json(response).await;
        let columns = body.get("columns").and_then(Value::as_array).expect("columns");
        assert_eq!(columns.len(), LeadStatus::PIPELINE.len());
    }

    #[actix_web::test]
    async fn import_forwards_every_row() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(permissive_state()))
                .service(import_leads),
        )
        .await;

        let team_id = TeamId::random();
        let response = test::call_service(
            &app,
            authorized()
                .uri(&format!("/teams/{team_id}/leads/import"))
                .method(actix_web::http::Method::POST)
                .set_json(json!({
                    "installerGroupId": uuid::Uuid::new_v4().to_string(),
                    "rows": [
                        {"name": "Ada"},
                        {"email": "grace@example.com"},
                        {}
                    ]
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body.get("imported").and_then(Value::as_u64), Some(3));
    }

    #[actix_web::test]
    async fn missing_status_is_a_field_error() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(permissive_state()))
                .service(update_status),
        )
        .await;

        let team_id = TeamId::random();
        let lead_id = uuid::Uuid::new_v4();
        let response = test::call_service(
            &app,
            authorized()
                .uri(&format!("/teams/{team_id}/leads/{lead_id}/status"))
                .method(actix_web::http::Method::PATCH)
                .set_json(json!({}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/details/field").and_then(Value::as_str),
            Some("status")
        );
    }

    #[actix_web::test]
    async fn scoped_not_found_surfaces_as_404() {
        let mut leads = MockLeadsCommand::new();
        leads
            .expect_update_status()
            .return_once(|_| Err(Error::not_found("team not found")));
        let state = HttpState {
            leads: Arc::new(leads),
            ..permissive_state()
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(update_status),
        )
        .await;

        let team_id = TeamId::random();
        let lead_id = uuid::Uuid::new_v4();
        let response = test::call_service(
            &app,
            authorized()
                .uri(&format!("/teams/{team_id}/leads/{lead_id}/status"))
                .method(actix_web::http::Method::PATCH)
                .set_json(json!({"status": "contacted"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn complete_task_returns_no_content() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(permissive_state()))
                .service(complete_task),
        )
        .await;

        let team_id = TeamId::random();
        let lead_id = uuid::Uuid::new_v4();
        let task_id = uuid::Uuid::new_v4();
        let response = test::call_service(
            &app,
            authorized()
                .uri(&format!(
                    "/teams/{team_id}/leads/{lead_id}/tasks/{task_id}/complete"
                ))
                .method(actix_web::http::Method::POST)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn malformed_due_dates_are_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(permissive_state()))
                .service(add_task),
        )
        .await;

        let team_id = TeamId::random();
        let lead_id = uuid::Uuid::new_v4();
        let response = test::call_service(
            &app,
            authorized()
                .uri(&format!("/teams/{team_id}/leads/{lead_id}/tasks"))
                .method(actix_web::http::Method::POST)
                .set_json(json!({"title": "Call back", "dueAt": "next Tuesday"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/details/code").and_then(Value::as_str),
            Some("invalid_timestamp")
        );
    }
}
