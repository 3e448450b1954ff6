//! Port for the Microsoft Graph mail gateway.
//!
//! The adapter owns transport only: token grants, the draft/send flow, and
//! locating a sent message by its internet message id. All Graph specifics
//! (URLs, payload shapes) stay behind this boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::email::{OutgoingMail, TokenGrant};

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail gateway adapters.
    pub enum MailGatewayError {
        /// The HTTP transport failed before a response arrived.
        Transport { message: String } =>
            "mail gateway transport failed: {message}",
        /// The request timed out.
        Timeout { message: String } =>
            "mail gateway request timed out: {message}",
        /// Graph rejected the credentials.
        Unauthorized { message: String } =>
            "mail gateway rejected credentials: {message}",
        /// Graph rejected the request payload.
        InvalidRequest { message: String } =>
            "mail gateway rejected request: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "mail gateway response could not be decoded: {message}",
    }
}

/// Reference to a sent message located in the mailbox.
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessageRef {
    pub graph_message_id: String,
    pub subject: String,
    pub sent_at: DateTime<Utc>,
}

/// Port for mailbox operations against Microsoft Graph.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailGateway: Send + Sync {
    /// Exchange an OAuth authorization code for a token grant.
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, MailGatewayError>;

    /// Exchange a refresh token for a fresh grant.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, MailGatewayError>;

    /// Create a draft message; returns the Graph draft id.
    async fn create_draft(
        &self,
        access_token: &str,
        mail: &OutgoingMail,
    ) -> Result<String, MailGatewayError>;

    /// Patch the body of an existing draft.
    async fn patch_draft(
        &self,
        access_token: &str,
        draft_id: &str,
        mail: &OutgoingMail,
    ) -> Result<(), MailGatewayError>;

    /// Send a previously created draft.
    async fn send_draft(&self, access_token: &str, draft_id: &str)
    -> Result<(), MailGatewayError>;

    /// Look for the sent copy by its internet message id.
    async fn find_sent_message(
        &self,
        access_token: &str,
        internet_message_id: &str,
    ) -> Result<Option<SentMessageRef>, MailGatewayError>;
}
