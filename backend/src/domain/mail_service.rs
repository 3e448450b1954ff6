//! Outlook mail domain service.
//!
//! Implements the mail driving ports over the Graph gateway and the token
//! cache. Sending works through the draft flow: create a draft, patch the
//! body when one was supplied, send, then poll the mailbox for the sent copy
//! by its client-generated internet message id so it can be archived against
//! the lead. Polling is bounded; running out of attempts is a delayed
//! confirmation, not a failure.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::access::{require_lead_editor, resolve_member};
use crate::domain::email::{
    EmailAccount, EmailMessage, OutgoingMail, needs_refresh, new_internet_message_id,
};
use crate::domain::ports::{
    ConnectMailboxRequest, EmailAccountRepository, EmailMessageRepository, EmailRepositoryError,
    LeadMailRequest, LeadRepository, LeadRepositoryError, MailCommand, MailGateway,
    MailGatewayError, MailQuery, MailboxStatus, SendMailRequest, TeamRepository,
};
use crate::domain::{Error, Lead, SendOutcome, TeamScope, UserId};

/// Number of times the sent copy is looked up after a send.
pub const SENT_POLL_ATTEMPTS: u32 = 8;

/// Spacing between sent-copy lookups.
pub const SENT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Mail service implementing the driving ports.
#[derive(Clone)]
pub struct MailService<T, L, A, M, G> {
    teams: Arc<T>,
    leads: Arc<L>,
    accounts: Arc<A>,
    messages: Arc<M>,
    gateway: Arc<G>,
}

impl<T, L, A, M, G> MailService<T, L, A, M, G> {
    /// Create a new service with the given repositories and gateway.
    pub fn new(
        teams: Arc<T>,
        leads: Arc<L>,
        accounts: Arc<A>,
        messages: Arc<M>,
        gateway: Arc<G>,
    ) -> Self {
        Self {
            teams,
            leads,
            accounts,
            messages,
            gateway,
        }
    }
}

fn map_gateway_error(error: MailGatewayError) -> Error {
    match error {
        MailGatewayError::Transport { message } => {
            Error::service_unavailable(format!("mail gateway unreachable: {message}"))
        }
        MailGatewayError::Timeout { message } => {
            Error::service_unavailable(format!("mail gateway timed out: {message}"))
        }
        MailGatewayError::Unauthorized { message } => {
            Error::unauthorized(format!("mailbox credentials rejected: {message}"))
        }
        MailGatewayError::InvalidRequest { message } => {
            Error::invalid_request(format!("mail gateway rejected request: {message}"))
        }
        MailGatewayError::Decode { message } => {
            Error::internal(format!("mail gateway response invalid: {message}"))
        }
    }
}

fn map_email_error(error: EmailRepositoryError) -> Error {
    match error {
        EmailRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("email repository unavailable: {message}"))
        }
        EmailRepositoryError::Query { message } => {
            Error::internal(format!("email repository error: {message}"))
        }
    }
}

fn map_lead_error(error: LeadRepositoryError) -> Error {
    match error {
        LeadRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("lead repository unavailable: {message}"))
        }
        LeadRepositoryError::Query { message } => {
            Error::internal(format!("lead repository error: {message}"))
        }
    }
}

fn status_of(account: &EmailAccount) -> MailboxStatus {
    MailboxStatus {
        connected: true,
        address: Some(account.address.clone()),
        expires_at: Some(account.expires_at),
    }
}

impl<T, L, A, M, G> MailService<T, L, A, M, G>
where
    T: TeamRepository,
    L: LeadRepository,
    A: EmailAccountRepository,
    M: EmailMessageRepository,
    G: MailGateway,
{
    /// Fetch the caller's cached credentials, refreshing them when fewer than
    /// five minutes of validity remain.
    async fn fresh_account(&self, caller: &UserId) -> Result<EmailAccount, Error> {
        let account = self
            .accounts
            .find(caller)
            .await
            .map_err(map_email_error)?
            .ok_or_else(|| Error::invalid_request("mailbox not connected"))?;

        let now = Utc::now();
        if !needs_refresh(account.expires_at, now) {
            return Ok(account);
        }

        let grant = self
            .gateway
            .refresh(account.refresh_token.expose())
            .await
            .map_err(map_gateway_error)?;
        let account = account.with_grant(grant, now);
        self.accounts
            .save(&account)
            .await
            .map_err(map_email_error)?;
        Ok(account)
    }

    async fn scoped_lead(&self, request: &SendMailRequest) -> Result<Lead, Error> {
        let member =
            resolve_member(self.teams.as_ref(), &request.team_id, &request.caller).await?;
        require_lead_editor(&member)?;

        let scope = TeamScope::team(request.team_id);
        self.leads
            .find(&scope, &request.lead_id)
            .await
            .map_err(map_lead_error)?
            .ok_or_else(|| Error::not_found("lead not found"))
    }

    /// Poll the mailbox for the sent copy and archive it when it appears.
    async fn archive_sent(
        &self,
        access_token: &str,
        mail: &OutgoingMail,
    ) -> Result<SendOutcome, Error> {
        for _ in 0..SENT_POLL_ATTEMPTS {
            tokio::time::sleep(SENT_POLL_INTERVAL).await;
            let found = self
                .gateway
                .find_sent_message(access_token, &mail.internet_message_id)
                .await
                .map_err(map_gateway_error)?;
            if let Some(sent) = found {
                let message = EmailMessage {
                    id: Uuid::new_v4(),
                    lead_id: mail.lead_id,
                    graph_message_id: sent.graph_message_id,
                    internet_message_id: mail.internet_message_id.clone(),
                    subject: sent.subject,
                    sent_at: sent.sent_at,
                };
                self.messages
                    .insert(&message)
                    .await
                    .map_err(map_email_error)?;
                info!(lead_id = %mail.lead_id, "archived sent mail");
                return Ok(SendOutcome::Archived { message });
            }
        }

        warn!(
            lead_id = %mail.lead_id,
            internet_message_id = %mail.internet_message_id,
            "sent copy not visible yet; archival will lag"
        );
        Ok(SendOutcome::DelayedConfirmation {
            internet_message_id: mail.internet_message_id.clone(),
        })
    }
}

#[async_trait]
impl<T, L, A, M, G> MailCommand for MailService<T, L, A, M, G>
where
    T: TeamRepository,
    L: LeadRepository,
    A: EmailAccountRepository,
    M: EmailMessageRepository,
    G: MailGateway,
{
    async fn connect(&self, request: ConnectMailboxRequest) -> Result<MailboxStatus, Error> {
        if request.code.trim().is_empty() {
            return Err(Error::invalid_request("authorization code must not be empty"));
        }

        let now = Utc::now();
        let grant = self
            .gateway
            .exchange_code(&request.code)
            .await
            .map_err(map_gateway_error)?;
        let account = EmailAccount {
            user_id: request.caller,
            address: request.address,
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            expires_at: now + chrono::Duration::seconds(grant.expires_in_secs),
            updated_at: now,
        };
        self.accounts
            .save(&account)
            .await
            .map_err(map_email_error)?;
        Ok(status_of(&account))
    }

    async fn send(&self, request: SendMailRequest) -> Result<SendOutcome, Error> {
        let lead = self.scoped_lead(&request).await?;
        let account = self.fresh_account(&request.caller).await?;

        let mail = OutgoingMail {
            lead_id: lead.id,
            to: request.to.unwrap_or(lead.email),
            subject: request.subject,
            body_html: request.body_html,
            internet_message_id: new_internet_message_id(),
        };

        let token = account.access_token.expose();
        let draft_id = self
            .gateway
            .create_draft(token, &mail)
            .await
            .map_err(map_gateway_error)?;
        if !mail.body_html.is_empty() {
            self.gateway
                .patch_draft(token, &draft_id, &mail)
                .await
                .map_err(map_gateway_error)?;
        }
        self.gateway
            .send_draft(token, &draft_id)
            .await
            .map_err(map_gateway_error)?;

        self.archive_sent(token, &mail).await
    }
}

#[async_trait]
impl<T, L, A, M, G> MailQuery for MailService<T, L, A, M, G>
where
    T: TeamRepository,
    L: LeadRepository,
    A: EmailAccountRepository,
    M: EmailMessageRepository,
    G: MailGateway,
{
    async fn status(&self, caller: UserId) -> Result<MailboxStatus, Error> {
        let account = self.accounts.find(&caller).await.map_err(map_email_error)?;
        Ok(account.as_ref().map_or(
            MailboxStatus {
                connected: false,
                address: None,
                expires_at: None,
            },
            status_of,
        ))
    }

    async fn list_for_lead(&self, request: LeadMailRequest) -> Result<Vec<EmailMessage>, Error> {
        resolve_member(self.teams.as_ref(), &request.team_id, &request.caller).await?;
        let scope = TeamScope::team(request.team_id);
        self.leads
            .find(&scope, &request.lead_id)
            .await
            .map_err(map_lead_error)?
            .ok_or_else(|| Error::not_found("lead not found"))?;
        self.messages
            .list_for_lead(&request.lead_id)
            .await
            .map_err(map_email_error)
    }
}
