//! Outlook mailbox HTTP handlers.
//!
//! Connecting exchanges an OAuth authorization code for tokens; sending
//! drives the draft/send flow and archives the sent copy once the provider
//! reports it. A delayed confirmation is still a 200: the mail left the
//! outbox, only the archive entry is pending.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    ConnectMailboxRequest, LeadMailRequest, MailboxStatus, SendMailRequest,
};
use crate::domain::{EmailMessage, Error, SendOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_lead_id, parse_team_id,
};

/// Request payload for connecting the caller's mailbox.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectMailboxPayload {
    pub address: Option<String>,
    pub code: Option<String>,
}

/// Request payload for sending a mail to a lead.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMailPayload {
    pub subject: Option<String>,
    pub body_html: Option<String>,
    /// Override recipient; defaults to the lead's email address.
    pub to: Option<String>,
}

/// Connect the caller's mailbox from an OAuth authorization code.
#[utoipa::path(
    post,
    path = "/api/v1/mail/connect",
    request_body = ConnectMailboxPayload,
    responses(
        (status = 200, description = "Mailbox connected", body = MailboxStatus),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Identity platform unreachable", body = Error)
    ),
    tags = ["mail"],
    operation_id = "connectMailbox"
)]
#[post("/mail/connect")]
pub async fn connect(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<ConnectMailboxPayload>,
) -> ApiResult<web::Json<MailboxStatus>> {
    let payload = payload.into_inner();
    let address = payload
        .address
        .ok_or_else(|| missing_field_error(FieldName::new("address")))?;
    let code = payload
        .code
        .ok_or_else(|| missing_field_error(FieldName::new("code")))?;

    let mailbox_status = state
        .mail
        .connect(ConnectMailboxRequest {
            caller: caller.user_id,
            address,
            code,
        })
        .await?;
    Ok(web::Json(mailbox_status))
}

/// Whether the caller's mailbox is connected and until when.
#[utoipa::path(
    get,
    path = "/api/v1/mail/status",
    responses(
        (status = 200, description = "Mailbox connection status", body = MailboxStatus),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["mail"],
    operation_id = "mailboxStatus"
)]
#[get("/mail/status")]
pub async fn status(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<MailboxStatus>> {
    let mailbox_status = state.mail_query.status(caller.user_id).await?;
    Ok(web::Json(mailbox_status))
}

/// Send a mail to a lead through the caller's mailbox.
#[utoipa::path(
    post,
    path = "/api/v1/teams/{team_id}/leads/{lead_id}/mail",
    params(
        ("team_id" = String, Path, description = "Team identifier"),
        ("lead_id" = String, Path, description = "Lead identifier")
    ),
    request_body = SendMailPayload,
    responses(
        (status = 200, description = "Mail sent; outcome says whether the sent copy was archived", body = SendOutcome),
        (status = 400, description = "Invalid request or mailbox not connected", body = Error),
        (status = 401, description = "Unauthorised or mailbox tokens rejected", body = Error),
        (status = 404, description = "Team or lead not found", body = Error),
        (status = 503, description = "Mail provider unreachable", body = Error)
    ),
    tags = ["mail"],
    operation_id = "sendLeadMail"
)]
#[post("/teams/{team_id}/leads/{lead_id}/mail")]
pub async fn send(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(String, String)>,
    payload: web::Json<SendMailPayload>,
) -> ApiResult<HttpResponse> {
    let (team_id, lead_id) = path.into_inner();
    let payload = payload.into_inner();
    let subject = payload
        .subject
        .ok_or_else(|| missing_field_error(FieldName::new("subject")))?;

    let outcome = state
        .mail
        .send(SendMailRequest {
            caller: caller.user_id,
            team_id: parse_team_id(&team_id)?,
            lead_id: parse_lead_id(&lead_id)?,
            subject,
            body_html: payload.body_html.unwrap_or_default(),
            to: payload.to,
        })
        .await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Archived correspondence for a lead, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/leads/{lead_id}/mail",
    params(
        ("team_id" = String, Path, description = "Team identifier"),
        ("lead_id" = String, Path, description = "Lead identifier")
    ),
    responses(
        (status = 200, description = "Archived messages", body = [EmailMessage]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Team or lead not found", body = Error)
    ),
    tags = ["mail"],
    operation_id = "leadMailHistory"
)]
#[get("/teams/{team_id}/leads/{lead_id}/mail")]
pub async fn list_for_lead(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Vec<EmailMessage>>> {
    let (team_id, lead_id) = path.into_inner();
    let messages = state
        .mail_query
        .list_for_lead(LeadMailRequest {
            caller: caller.user_id,
            team_id: parse_team_id(&team_id)?,
            lead_id: parse_lead_id(&lead_id)?,
        })
        .await?;
    Ok(web::Json(messages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockMailCommand, MockTokenVerifier};
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
    async fn status_reports_disconnected_by_default() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(permissive_state()))
                .service(status),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/mail/status")
                .insert_header((header::AUTHORIZATION, "Bearer test-token"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body.get("connected").and_then(Value::as_bool), Some(false));
    }

    #[actix_web::test]
    async fn connect_reports_the_connected_mailbox() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(permissive_state()))
                .service(connect),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/mail/connect")
                .insert_header((header::AUTHORIZATION, "Bearer test-token"))
                .set_json(json!({"address": "sales@example.com", "code": "auth-code"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body.get("connected").and_then(Value::as_bool), Some(true));
        assert_eq!(
            body.get("address").and_then(Value::as_str),
            Some("sales@example.com")
        );
    }

    #[actix_web::test]
    async fn connect_requires_an_authorization_code() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(permissive_state()))
                .service(connect),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/mail/connect")
                .insert_header((header::AUTHORIZATION, "Bearer test-token"))
                .set_json(json!({"address": "sales@example.com"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(
            body.pointer("/details/field").and_then(Value::as_str),
            Some("code")
        );
    }

    #[actix_web::test]
    async fn send_without_a_connected_mailbox_is_invalid() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(permissive_state()))
                .service(send),
        )
        .await;

        let team_id = TeamId::random();
        let lead_id = uuid::Uuid::new_v4();
        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/teams/{team_id}/leads/{lead_id}/mail"))
                .insert_header((header::AUTHORIZATION, "Bearer test-token"))
                .set_json(json!({"subject": "Your solar quote"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn delayed_confirmation_is_still_a_200() {
        let mut mail = MockMailCommand::new();
        mail.expect_send().return_once(|request| {
            assert_eq!(request.subject, "Your solar quote");
            Ok(SendOutcome::DelayedConfirmation {
                internet_message_id: "<id@solarcrm>".to_owned(),
            })
        });
        let state = HttpState {
            mail: Arc::new(mail),
            ..permissive_state()
        };
        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).service(send),
        )
        .await;

        let team_id = TeamId::random();
        let lead_id = uuid::Uuid::new_v4();
        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/teams/{team_id}/leads/{lead_id}/mail"))
                .insert_header((header::AUTHORIZATION, "Bearer test-token"))
                .set_json(json!({"subject": "Your solar quote", "bodyHtml": "<p>Hi</p>"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(
            body.get("outcome").and_then(Value::as_str),
            Some("delayedConfirmation")
        );
    }
}
