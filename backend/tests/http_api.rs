//! End-to-end tests over the HTTP surface with fixture-backed ports.
//!
//! These tests exercise the full actix stack: trace middleware, bearer
//! authentication, routing, and the JSON error envelope. Persistence and
//! Graph adapters are covered by their own suites; here every port is a
//! fixture so behaviour is deterministic.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};
use uuid::Uuid;

use solarcrm_backend::Trace;
use solarcrm_backend::domain::lead::LeadStatus;
use solarcrm_backend::domain::ports::{TokenVerifier, TokenVerifierError};
use solarcrm_backend::domain::{TRACE_ID_HEADER, UserId};
use solarcrm_backend::inbound::http::health::{HealthState, live, ready};
use solarcrm_backend::inbound::http::state::HttpState;
use solarcrm_backend::inbound::http::{leads, mail, selection, teams};

/// Verifier accepting every token as the same user.
struct StaticTokenVerifier {
    user_id: UserId,
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, _token: &str) -> Result<Option<UserId>, TokenVerifierError> {
        Ok(Some(self.user_id))
    }
}

fn authed_state() -> web::Data<HttpState> {
    web::Data::new(HttpState {
        token_verifier: Arc::new(StaticTokenVerifier {
            user_id: UserId::random(),
        }),
        ..HttpState::fixture()
    })
}

macro_rules! api_app {
    ($state:expr) => {
        test::init_service(
            App::new().app_data($state).wrap(Trace).service(
                web::scope("/api/v1")
                    .service(teams::list_teams)
                    .service(leads::board)
                    .service(leads::import_leads)
                    .service(mail::status)
                    .service(selection::save)
                    .service(selection::fetch),
            ),
        )
        .await
    };
}

#[actix_web::test]
async fn missing_bearer_tokens_get_the_error_envelope() {
    let app = api_app!(web::Data::new(HttpState::fixture()));

    let response = test::call_service(&app, test::TestRequest::get().uri("/api/v1/teams").to_request())
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let trace_header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .expect("trace header")
        .to_str()
        .expect("ascii")
        .to_owned();

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["traceId"], Value::String(trace_header));
}

#[actix_web::test]
async fn unknown_tokens_are_rejected() {
    // The fixture verifier resolves no token at all.
    let app = api_app!(web::Data::new(HttpState::fixture()));

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/teams")
            .insert_header((header::AUTHORIZATION, "Bearer stale-token"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn board_lists_a_column_per_pipeline_stage() {
    let app = api_app!(authed_state());

    let uri = format!("/api/v1/teams/{}/leads/board", Uuid::new_v4());
    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, "Bearer test-token"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    let columns = body["columns"].as_array().expect("columns");
    assert_eq!(columns.len(), LeadStatus::PIPELINE.len());
}

#[actix_web::test]
async fn imports_report_the_accepted_row_count() {
    let app = api_app!(authed_state());

    let uri = format!("/api/v1/teams/{}/leads/import", Uuid::new_v4());
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, "Bearer test-token"))
            .set_json(json!({
                "installerGroupId": Uuid::new_v4().to_string(),
                "rows": [
                    { "name": "Avery Larsen", "email": "avery@example.com" },
                    { "name": "Noor Haddad", "phone": "+4512345678" }
                ]
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["imported"], 2);
}

#[actix_web::test]
async fn imports_without_a_group_are_rejected() {
    let app = api_app!(authed_state());

    let uri = format!("/api/v1/teams/{}/leads/import", Uuid::new_v4());
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, "Bearer test-token"))
            .set_json(json!({ "rows": [{ "name": "Avery Larsen" }] }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body.pointer("/details/field").and_then(Value::as_str),
        Some("installerGroupId")
    );
}

#[actix_web::test]
async fn workspace_save_echoes_and_empty_fetch_is_no_content() {
    let app = api_app!(authed_state());

    let team_id = Uuid::new_v4().to_string();
    let saved = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/workspace")
            .insert_header((header::AUTHORIZATION, "Bearer test-token"))
            .set_json(json!({ "teamId": team_id }))
            .to_request(),
    )
    .await;
    assert_eq!(saved.status(), StatusCode::OK);
    let body: Value = test::read_body_json(saved).await;
    assert_eq!(body["teamId"], Value::String(team_id));

    // The fixture store never retains anything.
    let fetched = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/workspace")
            .insert_header((header::AUTHORIZATION, "Bearer test-token"))
            .to_request(),
    )
    .await;
    assert_eq!(fetched.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn mailbox_status_defaults_to_disconnected() {
    let app = api_app!(authed_state());

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/mail/status")
            .insert_header((header::AUTHORIZATION, "Bearer test-token"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["connected"], Value::Bool(false));
}

#[actix_web::test]
async fn readiness_probe_flips_once_marked() {
    let health = web::Data::new(HealthState::new());
    let app = test::init_service(
        App::new()
            .app_data(health.clone())
            .service(ready)
            .service(live),
    )
    .await;

    let before = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
        .await;
    assert_eq!(before.status(), StatusCode::SERVICE_UNAVAILABLE);

    health.mark_ready();
    let after = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
        .await;
    assert_eq!(after.status(), StatusCode::OK);

    let alive = test::call_service(&app, test::TestRequest::get().uri("/health/live").to_request())
        .await;
    assert_eq!(alive.status(), StatusCode::OK);
}
