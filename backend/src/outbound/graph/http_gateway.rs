//! Reqwest-backed Microsoft Graph mail gateway.
//!
//! Owns transport only: the OAuth token endpoints, the draft/send flow, and
//! the sent-copy lookup by internet message id. Graph URLs and payload
//! shapes never leave this module.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::email::{OutgoingMail, TokenGrant};
use crate::domain::ports::{MailGateway, MailGatewayError, SentMessageRef};

use super::dto::{
    CreateDraftDto, DraftBodyDto, DraftResponseDto, MessageListDto, PatchDraftDto,
    TokenResponseDto,
};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const GRAPH_SCOPE: &str = "offline_access Mail.ReadWrite Mail.Send";

/// OAuth application settings for the Microsoft identity platform.
#[derive(Debug, Clone)]
pub struct GraphOAuthConfig {
    pub tenant: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Graph gateway adapter performing HTTPS requests against one tenant.
pub struct GraphHttpGateway {
    client: Client,
    token_endpoint: Url,
    graph_base: Url,
    config: GraphOAuthConfig,
}

impl GraphHttpGateway {
    /// Build a gateway against the public Microsoft endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// tenant produces an invalid token endpoint URL.
    pub fn new(config: GraphOAuthConfig) -> Result<Self, GatewayBuildError> {
        let token_endpoint = Url::parse(&format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
            config.tenant
        ))
        .map_err(|err| GatewayBuildError::Endpoint(err.to_string()))?;
        let graph_base = Url::parse("https://graph.microsoft.com/v1.0/")
            .map_err(|err| GatewayBuildError::Endpoint(err.to_string()))?;
        Self::with_endpoints(config, token_endpoint, graph_base)
    }

    /// Build a gateway with explicit endpoints; used by tests to point at a
    /// local server.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_endpoints(
        config: GraphOAuthConfig,
        token_endpoint: Url,
        graph_base: Url,
    ) -> Result<Self, GatewayBuildError> {
        let client = Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|err| GatewayBuildError::Client(err.to_string()))?;
        Ok(Self {
            client,
            token_endpoint,
            graph_base,
            config,
        })
    }

    fn messages_url(&self, suffix: &str) -> Result<Url, MailGatewayError> {
        self.graph_base
            .join(suffix)
            .map_err(|err| MailGatewayError::invalid_request(err.to_string()))
    }

    async fn token_request(
        &self,
        form: &[(&str, &str)],
    ) -> Result<TokenGrant, MailGatewayError> {
        let response = self
            .client
            .post(self.token_endpoint.clone())
            .form(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded: TokenResponseDto = serde_json::from_slice(body.as_ref()).map_err(|err| {
            MailGatewayError::decode(format!("invalid token response: {err}"))
        })?;
        Ok(decoded.into_grant())
    }
}

/// Errors raised while constructing the gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayBuildError {
    #[error("invalid Graph endpoint: {0}")]
    Endpoint(String),
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

#[async_trait]
impl MailGateway for GraphHttpGateway {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, MailGatewayError> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
            ("redirect_uri", &self.config.redirect_uri),
            ("scope", GRAPH_SCOPE),
        ])
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, MailGatewayError> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
            ("scope", GRAPH_SCOPE),
        ])
        .await
    }

    async fn create_draft(
        &self,
        access_token: &str,
        mail: &OutgoingMail,
    ) -> Result<String, MailGatewayError> {
        let url = self.messages_url("me/messages")?;
        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .json(&CreateDraftDto::from_mail(mail))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded: DraftResponseDto = serde_json::from_slice(body.as_ref()).map_err(|err| {
            MailGatewayError::decode(format!("invalid draft response: {err}"))
        })?;
        Ok(decoded.id)
    }

    async fn patch_draft(
        &self,
        access_token: &str,
        draft_id: &str,
        mail: &OutgoingMail,
    ) -> Result<(), MailGatewayError> {
        let url = self.messages_url(&format!("me/messages/{draft_id}"))?;
        let response = self
            .client
            .patch(url)
            .bearer_auth(access_token)
            .json(&PatchDraftDto {
                body: DraftBodyDto {
                    content_type: "HTML",
                    content: &mail.body_html,
                },
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(map_transport_error)?;
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(())
    }

    async fn send_draft(
        &self,
        access_token: &str,
        draft_id: &str,
    ) -> Result<(), MailGatewayError> {
        let url = self.messages_url(&format!("me/messages/{draft_id}/send"))?;
        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(map_transport_error)?;
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(())
    }

    async fn find_sent_message(
        &self,
        access_token: &str,
        internet_message_id: &str,
    ) -> Result<Option<SentMessageRef>, MailGatewayError> {
        let mut url = self.messages_url("me/messages")?;
        // Graph requires single quotes inside the id to be doubled.
        let escaped = internet_message_id.replace('\'', "''");
        url.query_pairs_mut()
            .append_pair("$filter", &format!("internetMessageId eq '{escaped}'"))
            .append_pair("$select", "id,subject,sentDateTime")
            .append_pair("$top", "1");

        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded: MessageListDto = serde_json::from_slice(body.as_ref()).map_err(|err| {
            MailGatewayError::decode(format!("invalid message listing: {err}"))
        })?;
        Ok(decoded
            .value
            .into_iter()
            .next()
            .map(super::dto::MessageDto::into_sent_ref))
    }
}

fn map_transport_error(error: reqwest::Error) -> MailGatewayError {
    if error.is_timeout() {
        MailGatewayError::timeout(error.to_string())
    } else {
        MailGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MailGatewayError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            MailGatewayError::unauthorized(message)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            MailGatewayError::timeout(message)
        }
        _ if status.is_client_error() => MailGatewayError::invalid_request(message),
        _ => MailGatewayError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::unauthorized(StatusCode::UNAUTHORIZED)]
    #[case::forbidden(StatusCode::FORBIDDEN)]
    fn credential_rejections_map_to_unauthorized(#[case] status: StatusCode) {
        let error = map_status_error(status, b"{\"error\":\"invalid_grant\"}");
        assert!(matches!(error, MailGatewayError::Unauthorized { .. }));
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT)]
    fn timeout_statuses_map_to_timeout(#[case] status: StatusCode) {
        let error = map_status_error(status, b"");
        assert!(matches!(error, MailGatewayError::Timeout { .. }));
    }

    #[test]
    fn client_errors_map_to_invalid_request() {
        let error = map_status_error(StatusCode::BAD_REQUEST, b"bad payload");
        assert!(matches!(error, MailGatewayError::InvalidRequest { .. }));
        assert!(error.to_string().contains("bad payload"));
    }

    #[test]
    fn server_errors_map_to_transport() {
        let error = map_status_error(StatusCode::BAD_GATEWAY, b"");
        assert!(matches!(error, MailGatewayError::Transport { .. }));
    }

    #[test]
    fn long_bodies_are_truncated_in_messages() {
        let body = "x".repeat(500);
        let error = map_status_error(StatusCode::INTERNAL_SERVER_ERROR, body.as_bytes());
        assert!(error.to_string().contains("..."));
    }

    #[test]
    fn tenant_shapes_the_token_endpoint() {
        let gateway = GraphHttpGateway::new(GraphOAuthConfig {
            tenant: "common".to_owned(),
            client_id: "app".to_owned(),
            client_secret: "secret".to_owned(),
            redirect_uri: "https://app.example.com/callback".to_owned(),
        })
        .expect("gateway");
        assert_eq!(
            gateway.token_endpoint.as_str(),
            "https://login.microsoftonline.com/common/oauth2/v2.0/token"
        );
    }
}
