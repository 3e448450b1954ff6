//! Driving ports for Outlook mailbox operations.
//!
//! [`MailCommand`] connects a mailbox via the OAuth authorization-code flow
//! and sends mail to leads through the draft/send flow. [`MailQuery`] exposes
//! connection status and the archived correspondence of a lead.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EmailMessage, Error, LeadId, SendOutcome, TeamId, UserId};

/// Request to connect the caller's mailbox from an OAuth authorization code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectMailboxRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    /// Mailbox address the tokens are bound to.
    pub address: String,
    /// Authorization code returned by the identity platform redirect.
    pub code: String,
}

/// Request to send a mail to a lead through the caller's mailbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMailRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = String)]
    pub lead_id: LeadId,
    pub subject: String,
    /// HTML body; an empty body sends the bare draft unchanged.
    pub body_html: String,
    /// Override recipient; defaults to the lead's email address.
    pub to: Option<String>,
}

/// Connection status of the caller's mailbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MailboxStatus {
    pub connected: bool,
    pub address: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Request for a lead's archived correspondence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadMailRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = String)]
    pub lead_id: LeadId,
}

/// Driving port for mailbox mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailCommand: Send + Sync {
    /// Exchange the authorization code and cache the resulting tokens.
    async fn connect(&self, request: ConnectMailboxRequest) -> Result<MailboxStatus, Error>;

    /// Send a mail to a lead and archive the sent copy when it appears.
    async fn send(&self, request: SendMailRequest) -> Result<SendOutcome, Error>;
}

/// Driving port for mailbox reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailQuery: Send + Sync {
    /// Whether the caller's mailbox is connected and until when.
    async fn status(&self, caller: UserId) -> Result<MailboxStatus, Error>;

    /// Archived correspondence for a lead, newest first.
    async fn list_for_lead(&self, request: LeadMailRequest) -> Result<Vec<EmailMessage>, Error>;
}

/// Fixture implementation reporting a disconnected mailbox.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMailCommand;

#[async_trait]
impl MailCommand for FixtureMailCommand {
    async fn connect(&self, request: ConnectMailboxRequest) -> Result<MailboxStatus, Error> {
        Ok(MailboxStatus {
            connected: true,
            address: Some(request.address),
            expires_at: Some(Utc::now() + chrono::Duration::hours(1)),
        })
    }

    async fn send(&self, _request: SendMailRequest) -> Result<SendOutcome, Error> {
        Err(Error::invalid_request("mailbox not connected"))
    }
}

/// Fixture implementation with nothing connected or archived.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMailQuery;

#[async_trait]
impl MailQuery for FixtureMailQuery {
    async fn status(&self, _caller: UserId) -> Result<MailboxStatus, Error> {
        Ok(MailboxStatus {
            connected: false,
            address: None,
            expires_at: None,
        })
    }

    async fn list_for_lead(&self, _request: LeadMailRequest) -> Result<Vec<EmailMessage>, Error> {
        Ok(Vec::new())
    }
}
