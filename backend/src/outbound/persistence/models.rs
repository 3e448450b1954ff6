//! Internal Diesel row structs for database operations.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain. Adapters translate between these rows and domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    email_accounts, email_messages, estimates, installer_groups, lead_notes, lead_tasks, leads,
    price_items, team_members, teams, workspace_selections,
};

/// Row struct for reading from the teams table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TeamRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating teams.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = teams)]
pub(crate) struct NewTeamRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the team_members table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = team_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TeamMemberRow {
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for membership upserts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = team_members)]
pub(crate) struct NewTeamMemberRow<'a> {
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the installer_groups table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = installer_groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InstallerGroupRow {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating installer groups.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = installer_groups)]
pub(crate) struct NewInstallerGroupRow<'a> {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the leads table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = leads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LeadRow {
    pub id: Uuid,
    pub team_id: Uuid,
    pub installer_group_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: i16,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating leads, singly or in batches.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = leads)]
pub(crate) struct NewLeadRow<'a> {
    pub id: Uuid,
    pub team_id: Uuid,
    pub installer_group_id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub status: i16,
    pub source: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the lead_tasks table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = lead_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LeadTaskRow {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub title: String,
    pub due_at: Option<DateTime<Utc>>,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating tasks.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = lead_tasks)]
pub(crate) struct NewLeadTaskRow<'a> {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub title: &'a str,
    pub due_at: Option<DateTime<Utc>>,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the lead_notes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = lead_notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LeadNoteRow {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub author_user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating notes.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = lead_notes)]
pub(crate) struct NewLeadNoteRow<'a> {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub author_user_id: Uuid,
    pub body: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the estimates table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = estimates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EstimateRow {
    pub lead_id: Uuid,
    pub panel_count: i32,
    pub roof_type: String,
    pub annual_consumption_kwh: f64,
    pub system_size_kw: f64,
    pub quoted_total: f64,
    pub updated_at: DateTime<Utc>,
}

/// Upsert struct for estimates; doubles as insert values and changeset.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = estimates)]
pub(crate) struct UpsertEstimateRow<'a> {
    pub lead_id: Uuid,
    pub panel_count: i32,
    pub roof_type: &'a str,
    pub annual_consumption_kwh: f64,
    pub system_size_kw: f64,
    pub quoted_total: f64,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the price_items table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = price_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PriceItemRow {
    pub installer_group_id: Uuid,
    pub category: String,
    pub name: String,
    pub cost: f64,
    pub markup_percent: f64,
    pub updated_at: DateTime<Utc>,
}

/// Upsert struct for price rows keyed by (group, category, name).
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = price_items)]
pub(crate) struct UpsertPriceItemRow<'a> {
    pub installer_group_id: Uuid,
    pub category: &'a str,
    pub name: &'a str,
    pub cost: f64,
    pub markup_percent: f64,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the email_accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = email_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmailAccountRow {
    pub user_id: Uuid,
    pub address: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert struct for the token cache, one row per user.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = email_accounts)]
pub(crate) struct UpsertEmailAccountRow<'a> {
    pub user_id: Uuid,
    pub address: &'a str,
    pub access_token: &'a str,
    pub refresh_token: &'a str,
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the email_messages table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = email_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmailMessageRow {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub graph_message_id: String,
    pub internet_message_id: String,
    pub subject: String,
    pub sent_at: DateTime<Utc>,
}

/// Insertable struct for archiving sent messages.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = email_messages)]
pub(crate) struct NewEmailMessageRow<'a> {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub graph_message_id: &'a str,
    pub internet_message_id: &'a str,
    pub subject: &'a str,
    pub sent_at: DateTime<Utc>,
}

/// Row struct for reading from the workspace_selections table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workspace_selections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WorkspaceSelectionRow {
    pub user_id: Uuid,
    pub team_id: Uuid,
    pub installer_group_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert struct for the selection record.
///
/// `treat_none_as_null` so clearing the installer group persists instead of
/// being skipped by the changeset.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = workspace_selections)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UpsertWorkspaceSelectionRow {
    pub user_id: Uuid,
    pub team_id: Uuid,
    pub installer_group_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}
