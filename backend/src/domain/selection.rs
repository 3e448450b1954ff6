//! Per-user workspace selection.
//!
//! The original client kept the "current team / current installer group"
//! choice in browser local storage; here it is a server-side key-value
//! record so any client of the API sees the same selection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ids::{InstallerGroupId, TeamId, UserId};

/// The team and installer group a user is currently working in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSelection {
    #[schema(value_type = String)]
    pub user_id: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = Option<String>)]
    pub installer_group_id: Option<InstallerGroupId>,
    pub updated_at: DateTime<Utc>,
}
