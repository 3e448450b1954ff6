//! Bearer-token authentication for HTTP handlers.
//!
//! [`Authenticated`] is an extractor resolving the `Authorization: Bearer`
//! header to a [`UserId`] through the token verifier port. Handlers take it
//! as an argument; requests without a valid token are rejected with 401
//! before the handler body runs.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::ports::TokenVerifierError;
use crate::domain::{Error, UserId};
use crate::inbound::http::state::HttpState;

/// The authenticated caller of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated {
    pub user_id: UserId,
}

fn bearer_token(header_value: Option<&str>) -> Result<&str, Error> {
    let raw = header_value.ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    raw.strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))
}

fn map_verifier_error(error: TokenVerifierError) -> Error {
    match error {
        TokenVerifierError::Connection { message } => {
            Error::service_unavailable(format!("token verifier unavailable: {message}"))
        }
        TokenVerifierError::Query { message } => {
            Error::internal(format!("token verifier error: {message}"))
        }
    }
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let header_value = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("http state is not configured"))?;
            let token = bearer_token(header_value.as_deref())?;
            let user_id = state
                .token_verifier
                .verify(token)
                .await
                .map_err(map_verifier_error)?
                .ok_or_else(|| Error::unauthorized("invalid bearer token"))?;
            Ok(Self { user_id })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockTokenVerifier;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse};
    use rstest::rstest;
    use std::sync::Arc;

    #[rstest]
    #[case(None)]
    #[case(Some("Basic dXNlcjpwYXNz"))]
    #[case(Some("Bearer "))]
    fn malformed_headers_are_unauthorized(#[case] header_value: Option<&str>) {
        let error = bearer_token(header_value).expect_err("rejected");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn bearer_scheme_extracts_the_token() {
        assert_eq!(bearer_token(Some("Bearer abc123")).expect("token"), "abc123");
    }

    async fn call_with_state(state: HttpState, authorization: Option<&str>) -> StatusCode {
        let app = actix_web::test::init_service(
            App::new().app_data(web::Data::new(state)).route(
                "/probe",
                web::get().to(|caller: Authenticated| async move {
                    HttpResponse::Ok().body(caller.user_id.to_string())
                }),
            ),
        )
        .await;

        let mut request = actix_web::test::TestRequest::get().uri("/probe");
        if let Some(value) = authorization {
            request = request.insert_header((header::AUTHORIZATION, value));
        }
        actix_web::test::call_service(&app, request.to_request())
            .await
            .status()
    }

    #[actix_web::test]
    async fn unknown_tokens_receive_401() {
        let status = call_with_state(HttpState::fixture(), Some("Bearer nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn known_tokens_resolve_the_caller() {
        let user_id = UserId::random();
        let mut verifier = MockTokenVerifier::new();
        verifier
            .expect_verify()
            .withf(|token| token == "s3cret")
            .return_once(move |_| Ok(Some(user_id)));
        let state = HttpState {
            token_verifier: Arc::new(verifier),
            ..HttpState::fixture()
        };

        let status = call_with_state(state, Some("Bearer s3cret")).await;
        assert_eq!(status, StatusCode::OK);
    }
}
