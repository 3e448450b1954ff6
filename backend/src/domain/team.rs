//! Tenancy aggregates: teams, memberships, and installer groups.
//!
//! A team is the top-level tenant. Installer groups are sub-tenants inside a
//! team representing a physical installer business unit. Every lead belongs
//! to exactly one team and one installer group.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ids::{InstallerGroupId, TeamId, UserId};

/// Role a user holds within a team.
///
/// Admins manage the team, its members, and pricing. Members work leads and
/// correspondence. Installers see leads routed to their group. Viewers are
/// read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Admin,
    Member,
    Installer,
    Viewer,
}

impl TeamRole {
    /// Stable storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
            Self::Installer => "installer",
            Self::Viewer => "viewer",
        }
    }

    /// Whether the role may mutate leads, tasks, notes, and mail.
    #[must_use]
    pub fn can_edit_leads(self) -> bool {
        matches!(self, Self::Admin | Self::Member)
    }

    /// Whether the role may administer the team and its price tables.
    #[must_use]
    pub fn can_administer(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing an unknown role string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown team role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for TeamRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            "installer" => Ok(Self::Installer),
            "viewer" => Ok(Self::Viewer),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Top-level tenant grouping of users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: TeamId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Construct a new team with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TeamId::random(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// A user's membership within a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = String)]
    pub user_id: UserId,
    pub role: TeamRole,
    pub created_at: DateTime<Utc>,
}

/// Sub-tenant within a team representing a physical installer business unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallerGroup {
    #[schema(value_type = String)]
    pub id: InstallerGroupId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl InstallerGroup {
    /// Construct a new installer group under the given team.
    #[must_use]
    pub fn new(team_id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id: InstallerGroupId::random(),
            team_id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Scope every repository query is filtered by.
///
/// Built from the caller's verified membership, never from raw request input.
/// Queries that filter on this scope surface foreign ids as "not found"
/// rather than leaking other tenants' rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamScope {
    pub team_id: TeamId,
    pub installer_group_id: Option<InstallerGroupId>,
}

impl TeamScope {
    /// Scope covering the whole team.
    #[must_use]
    pub fn team(team_id: TeamId) -> Self {
        Self {
            team_id,
            installer_group_id: None,
        }
    }

    /// Scope narrowed to a single installer group.
    #[must_use]
    pub fn group(team_id: TeamId, installer_group_id: InstallerGroupId) -> Self {
        Self {
            team_id,
            installer_group_id: Some(installer_group_id),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TeamRole::Admin, "admin")]
    #[case(TeamRole::Member, "member")]
    #[case(TeamRole::Installer, "installer")]
    #[case(TeamRole::Viewer, "viewer")]
    fn roles_round_trip_through_strings(#[case] role: TeamRole, #[case] repr: &str) {
        assert_eq!(role.as_str(), repr);
        assert_eq!(repr.parse::<TeamRole>().expect("parse role"), role);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = "owner".parse::<TeamRole>().expect_err("unknown role");
        assert!(err.to_string().contains("owner"));
    }

    #[rstest]
    #[case(TeamRole::Admin, true, true)]
    #[case(TeamRole::Member, true, false)]
    #[case(TeamRole::Installer, false, false)]
    #[case(TeamRole::Viewer, false, false)]
    fn role_capabilities(#[case] role: TeamRole, #[case] edits: bool, #[case] admin: bool) {
        assert_eq!(role.can_edit_leads(), edits);
        assert_eq!(role.can_administer(), admin);
    }

    #[test]
    fn group_scope_narrows_team_scope() {
        let team_id = TeamId::random();
        let group_id = InstallerGroupId::random();
        assert_eq!(TeamScope::team(team_id).installer_group_id, None);
        assert_eq!(
            TeamScope::group(team_id, group_id).installer_group_id,
            Some(group_id)
        );
    }
}
