//! Lead aggregate and the fixed sales pipeline.
//!
//! A lead is a prospective customer record moving through a fixed pipeline of
//! stages. The stage is persisted as a small integer code; the mapping is
//! part of the wire contract with existing data and must stay stable.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ids::{InstallerGroupId, LeadId, TeamId, UserId};

/// Placeholder applied to a missing lead name during import.
pub const PLACEHOLDER_NAME: &str = "Unknown";
/// Placeholder applied to missing optional contact fields during import.
pub const PLACEHOLDER_FIELD: &str = "-";

/// Pipeline stage of a lead, persisted as a stable integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    ColdCall,
    New,
    Contacted,
    OfferSent,
    Accepted,
    Installation,
    Completed,
    Lost,
}

impl LeadStatus {
    /// Every stage in board column order.
    pub const PIPELINE: [Self; 8] = [
        Self::ColdCall,
        Self::New,
        Self::Contacted,
        Self::OfferSent,
        Self::Accepted,
        Self::Installation,
        Self::Completed,
        Self::Lost,
    ];

    /// Stable integer code stored in the database.
    #[must_use]
    pub fn code(self) -> i16 {
        match self {
            Self::ColdCall => 0,
            Self::New => 1,
            Self::Contacted => 2,
            Self::OfferSent => 3,
            Self::Accepted => 4,
            Self::Installation => 5,
            Self::Completed => 6,
            Self::Lost => 7,
        }
    }

    /// Map a stored code back to a stage.
    pub fn try_from_code(code: i16) -> Result<Self, UnknownStatusCode> {
        match code {
            0 => Ok(Self::ColdCall),
            1 => Ok(Self::New),
            2 => Ok(Self::Contacted),
            3 => Ok(Self::OfferSent),
            4 => Ok(Self::Accepted),
            5 => Ok(Self::Installation),
            6 => Ok(Self::Completed),
            7 => Ok(Self::Lost),
            other => Err(UnknownStatusCode(other)),
        }
    }

    /// Human-readable column label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ColdCall => "Cold call",
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::OfferSent => "Offer sent",
            Self::Accepted => "Accepted",
            Self::Installation => "Installation",
            Self::Completed => "Completed",
            Self::Lost => "Lost",
        }
    }
}

/// Error raised when a stored status code has no pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownStatusCode(pub i16);

impl fmt::Display for UnknownStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown lead status code: {}", self.0)
    }
}

impl std::error::Error for UnknownStatusCode {}

/// A prospective customer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[schema(value_type = String)]
    pub id: LeadId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = String)]
    pub installer_group_id: InstallerGroupId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: LeadStatus,
    /// Free-form origin marker, e.g. "import" or "manual".
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A follow-up task attached to a lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadTask {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = String)]
    pub lead_id: LeadId,
    pub title: String,
    pub due_at: Option<DateTime<Utc>>,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

/// A comment attached to a lead by a team member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadNote {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = String)]
    pub lead_id: LeadId,
    #[schema(value_type = String)]
    pub author_user_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// One parsed spreadsheet row submitted to the bulk import.
///
/// Every field is optional: the importer substitutes placeholders so a batch
/// of N rows always produces N leads.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportRow {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Pipeline stage named by the sheet; imported leads default to cold call.
    pub status: Option<LeadStatus>,
}

impl ImportRow {
    /// Materialise a lead from this row within the given scope.
    #[must_use]
    pub fn into_lead(self, team_id: TeamId, installer_group_id: InstallerGroupId) -> Lead {
        let now = Utc::now();
        Lead {
            id: LeadId::random(),
            team_id,
            installer_group_id,
            name: non_blank_or(self.name, PLACEHOLDER_NAME),
            email: non_blank_or(self.email, PLACEHOLDER_FIELD),
            phone: non_blank_or(self.phone, PLACEHOLDER_FIELD),
            address: non_blank_or(self.address, PLACEHOLDER_FIELD),
            status: self.status.unwrap_or(LeadStatus::ColdCall),
            source: "import".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }
}

fn non_blank_or(value: Option<String>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => placeholder.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[test]
    fn status_codes_round_trip() {
        for status in LeadStatus::PIPELINE {
            assert_eq!(
                LeadStatus::try_from_code(status.code()).expect("known code"),
                status
            );
        }
    }

    #[test]
    fn unknown_status_code_is_rejected() {
        let err = LeadStatus::try_from_code(42).expect_err("unknown code");
        assert_eq!(err, UnknownStatusCode(42));
    }

    #[test]
    fn pipeline_codes_are_dense_and_ordered() {
        let codes: Vec<i16> = LeadStatus::PIPELINE.iter().map(|s| s.code()).collect();
        assert_eq!(codes, (0..8).collect::<Vec<i16>>());
    }

    #[rstest]
    #[case(None, None, None, None)]
    #[case(Some("  ".to_owned()), Some(String::new()), None, None)]
    fn import_row_defaults_missing_fields(
        #[case] name: Option<String>,
        #[case] email: Option<String>,
        #[case] phone: Option<String>,
        #[case] address: Option<String>,
    ) {
        let row = ImportRow {
            name,
            email,
            phone,
            address,
            status: None,
        };
        let lead = row.into_lead(TeamId::random(), InstallerGroupId::random());
        assert_eq!(lead.name, PLACEHOLDER_NAME);
        assert_eq!(lead.email, PLACEHOLDER_FIELD);
        assert_eq!(lead.phone, PLACEHOLDER_FIELD);
        assert_eq!(lead.address, PLACEHOLDER_FIELD);
        assert_eq!(lead.status, LeadStatus::ColdCall);
        assert_eq!(lead.source, "import");
    }

    #[test]
    fn import_row_keeps_provided_fields() {
        let row = ImportRow {
            name: Some("Astrid Berg".to_owned()),
            email: Some("astrid@example.com".to_owned()),
            phone: None,
            address: Some("Solvej 1".to_owned()),
            status: None,
        };
        let lead = row.into_lead(TeamId::random(), InstallerGroupId::random());
        assert_eq!(lead.name, "Astrid Berg");
        assert_eq!(lead.email, "astrid@example.com");
        assert_eq!(lead.phone, PLACEHOLDER_FIELD);
        assert_eq!(lead.address, "Solvej 1");
    }

    #[test]
    fn import_row_may_name_a_pipeline_stage() {
        let row = ImportRow {
            status: Some(LeadStatus::Contacted),
            ..ImportRow::default()
        };
        let lead = row.into_lead(TeamId::random(), InstallerGroupId::random());
        assert_eq!(lead.status, LeadStatus::Contacted);
    }
}
