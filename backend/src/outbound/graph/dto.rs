//! Wire types for the Microsoft identity platform and Graph mail endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::email::{OutgoingMail, TokenGrant, TokenSecret};
use crate::domain::ports::SentMessageRef;

/// Token endpoint response for both the code exchange and the refresh grant.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

impl TokenResponseDto {
    pub(super) fn into_grant(self) -> TokenGrant {
        TokenGrant {
            access_token: TokenSecret::new(self.access_token),
            refresh_token: TokenSecret::new(self.refresh_token),
            expires_in_secs: self.expires_in,
        }
    }
}

/// Request body for creating or patching a draft message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DraftBodyDto<'a> {
    pub content_type: &'static str,
    pub content: &'a str,
}

/// Recipient wrapper as Graph expects it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RecipientDto<'a> {
    pub email_address: EmailAddressDto<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct EmailAddressDto<'a> {
    pub address: &'a str,
}

/// Draft creation payload. The internet message id is set up front so the
/// sent copy can be located afterwards.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateDraftDto<'a> {
    pub subject: &'a str,
    pub body: DraftBodyDto<'a>,
    pub to_recipients: [RecipientDto<'a>; 1],
    pub internet_message_id: &'a str,
}

impl<'a> CreateDraftDto<'a> {
    pub(super) fn from_mail(mail: &'a OutgoingMail) -> Self {
        Self {
            subject: &mail.subject,
            body: DraftBodyDto {
                content_type: "HTML",
                content: "",
            },
            to_recipients: [RecipientDto {
                email_address: EmailAddressDto { address: &mail.to },
            }],
            internet_message_id: &mail.internet_message_id,
        }
    }
}

/// Draft patch payload carrying only the body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PatchDraftDto<'a> {
    pub body: DraftBodyDto<'a>,
}

/// Draft creation response; only the Graph id matters.
#[derive(Debug, Deserialize)]
pub(super) struct DraftResponseDto {
    pub id: String,
}

/// Message listing response for the sent-copy lookup.
#[derive(Debug, Deserialize)]
pub(super) struct MessageListDto {
    #[serde(default)]
    pub value: Vec<MessageDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MessageDto {
    pub id: String,
    #[serde(default)]
    pub subject: String,
    pub sent_date_time: DateTime<Utc>,
}

impl MessageDto {
    pub(super) fn into_sent_ref(self) -> SentMessageRef {
        SentMessageRef {
            graph_message_id: self.id,
            subject: self.subject,
            sent_at: self.sent_date_time,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for wire decoding.
    use super::*;

    #[test]
    fn token_responses_decode_into_grants() {
        let body = r#"{
            "token_type": "Bearer",
            "access_token": "at",
            "refresh_token": "rt",
            "expires_in": 3600
        }"#;
        let dto: TokenResponseDto = serde_json::from_str(body).expect("decode");
        let grant = dto.into_grant();
        assert_eq!(grant.access_token.expose(), "at");
        assert_eq!(grant.expires_in_secs, 3600);
    }

    #[test]
    fn message_listings_tolerate_missing_fields() {
        let body = r#"{
            "value": [
                {"id": "AAMk", "sentDateTime": "2026-08-27T10:15:00Z"}
            ]
        }"#;
        let dto: MessageListDto = serde_json::from_str(body).expect("decode");
        let sent = dto.value.into_iter().next().expect("one message").into_sent_ref();
        assert_eq!(sent.graph_message_id, "AAMk");
        assert!(sent.subject.is_empty());
    }

    #[test]
    fn empty_listings_decode() {
        let dto: MessageListDto = serde_json::from_str("{}").expect("decode");
        assert!(dto.value.is_empty());
    }
}
