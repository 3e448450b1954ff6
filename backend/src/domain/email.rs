//! Mailbox domain: OAuth token cache, outgoing mail, and archived messages.
//!
//! Tokens come from the Microsoft identity platform; the cache stores the
//! current access/refresh pair per user and decides when a refresh is due.
//! Token material is held in [`TokenSecret`], which wipes its buffer on drop.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::ids::{LeadId, UserId};

/// Seconds of remaining validity below which a cached token is refreshed.
pub const REFRESH_WINDOW_SECS: i64 = 300;

/// OAuth token material that is zeroised when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct TokenSecret(String);

impl TokenSecret {
    /// Wrap raw token material.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw token for an outbound request.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenSecret(..)")
    }
}

/// Decide whether a cached token must be refreshed before use.
///
/// Refresh occurs iff fewer than [`REFRESH_WINDOW_SECS`] remain; an already
/// expired token also falls in this window.
#[must_use]
pub fn needs_refresh(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at - now < Duration::seconds(REFRESH_WINDOW_SECS)
}

/// Cached OAuth credentials for one user's mailbox.
#[derive(Debug, Clone)]
pub struct EmailAccount {
    pub user_id: UserId,
    /// Mailbox address the tokens are bound to.
    pub address: String,
    pub access_token: TokenSecret,
    pub refresh_token: TokenSecret,
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmailAccount {
    /// Apply a fresh token grant to the cache.
    #[must_use]
    pub fn with_grant(mut self, grant: TokenGrant, now: DateTime<Utc>) -> Self {
        self.access_token = grant.access_token;
        self.refresh_token = grant.refresh_token;
        self.expires_at = now + Duration::seconds(grant.expires_in_secs);
        self.updated_at = now;
        self
    }
}

/// Access/refresh pair returned by a token grant.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access_token: TokenSecret,
    pub refresh_token: TokenSecret,
    pub expires_in_secs: i64,
}

/// An outgoing mail assembled for a lead.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub lead_id: LeadId,
    pub to: String,
    pub subject: String,
    pub body_html: String,
    /// Client-generated id used to locate the sent copy afterwards.
    pub internet_message_id: String,
}

/// Generate an RFC 5322 style message id unique to this send attempt.
#[must_use]
pub fn new_internet_message_id() -> String {
    format!("<{}@solarcrm>", Uuid::new_v4())
}

/// Locally archived reference to a sent Graph message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = String)]
    pub lead_id: LeadId,
    pub graph_message_id: String,
    pub internet_message_id: String,
    pub subject: String,
    pub sent_at: DateTime<Utc>,
}

/// Outcome of a mail send.
///
/// Failing to locate the sent copy within the polling budget is a delayed
/// confirmation, not an error: the mail has been handed to Graph.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum SendOutcome {
    /// Sent copy located and archived locally.
    Archived { message: EmailMessage },
    /// Sent, but the copy was not yet visible; archival will lag.
    DelayedConfirmation { internet_message_id: String },
}
