//! Driving ports for lead operations.
//!
//! [`LeadsCommand`] covers mutations: manual creation, bulk import, pipeline
//! moves, tasks, notes, and estimates. [`LeadsQuery`] covers the board, the
//! cold-call queue, and the single-lead detail view. Implementations resolve
//! the caller's membership before touching any lead.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    Error, Estimate, ImportRow, InstallerGroupId, Lead, LeadId, LeadNote, LeadStatus, LeadTask,
    TeamId, UserId,
};

/// Request to create a lead by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = String)]
    pub installer_group_id: InstallerGroupId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Request to import a batch of parsed spreadsheet rows.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportLeadsRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = String)]
    pub installer_group_id: InstallerGroupId,
    pub rows: Vec<ImportRow>,
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportLeadsResponse {
    /// Number of leads created; always equals the number of submitted rows.
    pub imported: usize,
}

/// Request to move a lead to another pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadStatusRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = String)]
    pub lead_id: LeadId,
    pub status: LeadStatus,
}

/// Request to attach a follow-up task to a lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTaskRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = String)]
    pub lead_id: LeadId,
    pub title: String,
    pub due_at: Option<DateTime<Utc>>,
}

/// Request to mark a task done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTaskRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = String)]
    pub lead_id: LeadId,
    #[schema(value_type = String)]
    pub task_id: Uuid,
}

/// Request to attach a note to a lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddNoteRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = String)]
    pub lead_id: LeadId,
    pub body: String,
}

/// Request to save a lead's installation estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveEstimateRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = String)]
    pub lead_id: LeadId,
    pub panel_count: i32,
    pub roof_type: String,
    pub annual_consumption_kwh: f64,
    pub quoted_total: f64,
}

/// Driving port for lead mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadsCommand: Send + Sync {
    /// Create a single lead in the caller's scope.
    async fn create_lead(&self, request: CreateLeadRequest) -> Result<Lead, Error>;

    /// Import a batch of rows as cold-call leads, substituting placeholders
    /// for missing fields so no row is dropped.
    async fn import_leads(&self, request: ImportLeadsRequest)
    -> Result<ImportLeadsResponse, Error>;

    /// Move a lead to another pipeline stage. Last write wins.
    async fn update_status(&self, request: UpdateLeadStatusRequest) -> Result<Lead, Error>;

    /// Attach a follow-up task.
    async fn add_task(&self, request: AddTaskRequest) -> Result<LeadTask, Error>;

    /// Mark a task done.
    async fn complete_task(&self, request: CompleteTaskRequest) -> Result<(), Error>;

    /// Attach a note.
    async fn add_note(&self, request: AddNoteRequest) -> Result<LeadNote, Error>;

    /// Insert or replace the lead's estimate.
    async fn save_estimate(&self, request: SaveEstimateRequest) -> Result<Estimate, Error>;
}

/// Request for board and cold-call reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    /// Narrow the board to one installer group; `None` covers the team.
    #[schema(value_type = Option<String>)]
    pub installer_group_id: Option<InstallerGroupId>,
}

/// One pipeline column of the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub status: LeadStatus,
    pub label: String,
    pub leads: Vec<Lead>,
}

/// The full board: one column per pipeline stage, in pipeline order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadBoard {
    pub columns: Vec<BoardColumn>,
}

/// Request for the single-lead detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetLeadRequest {
    #[schema(value_type = String)]
    pub caller: UserId,
    #[schema(value_type = String)]
    pub team_id: TeamId,
    #[schema(value_type = String)]
    pub lead_id: LeadId,
}

/// A lead together with its tasks, notes, and estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadDetail {
    pub lead: Lead,
    pub tasks: Vec<LeadTask>,
    pub notes: Vec<LeadNote>,
    pub estimate: Option<Estimate>,
}

/// Driving port for lead reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadsQuery: Send + Sync {
    /// The pipeline board for the caller's scope.
    async fn board(&self, request: BoardRequest) -> Result<LeadBoard, Error>;

    /// The cold-call queue: leads still in the cold-call stage, oldest first.
    async fn cold_calls(&self, request: BoardRequest) -> Result<Vec<Lead>, Error>;

    /// One lead with its attachments.
    async fn get_lead(&self, request: GetLeadRequest) -> Result<LeadDetail, Error>;
}

/// Fixture implementation echoing requests back as fresh aggregates.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLeadsCommand;

#[async_trait]
impl LeadsCommand for FixtureLeadsCommand {
    async fn create_lead(&self, request: CreateLeadRequest) -> Result<Lead, Error> {
        let now = Utc::now();
        Ok(Lead {
            id: LeadId::random(),
            team_id: request.team_id,
            installer_group_id: request.installer_group_id,
            name: request.name,
            email: request.email,
            phone: request.phone,
            address: request.address,
            status: LeadStatus::New,
            source: "manual".to_owned(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn import_leads(
        &self,
        request: ImportLeadsRequest,
    ) -> Result<ImportLeadsResponse, Error> {
        Ok(ImportLeadsResponse {
            imported: request.rows.len(),
        })
    }

    async fn update_status(&self, request: UpdateLeadStatusRequest) -> Result<Lead, Error> {
        let now = Utc::now();
        Ok(Lead {
            id: request.lead_id,
            team_id: request.team_id,
            installer_group_id: InstallerGroupId::random(),
            name: "Fixture lead".to_owned(),
            email: "fixture@example.com".to_owned(),
            phone: "-".to_owned(),
            address: "-".to_owned(),
            status: request.status,
            source: "manual".to_owned(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn add_task(&self, request: AddTaskRequest) -> Result<LeadTask, Error> {
        Ok(LeadTask {
            id: Uuid::new_v4(),
            lead_id: request.lead_id,
            title: request.title,
            due_at: request.due_at,
            done: false,
            created_at: Utc::now(),
        })
    }

    async fn complete_task(&self, _request: CompleteTaskRequest) -> Result<(), Error> {
        Ok(())
    }

    async fn add_note(&self, request: AddNoteRequest) -> Result<LeadNote, Error> {
        Ok(LeadNote {
            id: Uuid::new_v4(),
            lead_id: request.lead_id,
            author_user_id: request.caller,
            body: request.body,
            created_at: Utc::now(),
        })
    }

    async fn save_estimate(&self, request: SaveEstimateRequest) -> Result<Estimate, Error> {
        Ok(Estimate {
            lead_id: request.lead_id,
            panel_count: request.panel_count,
            roof_type: request.roof_type,
            annual_consumption_kwh: request.annual_consumption_kwh,
            system_size_kw: 0.0,
            quoted_total: request.quoted_total,
            updated_at: Utc::now(),
        }
        .sized())
    }
}

/// Fixture implementation returning an empty board.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLeadsQuery;

#[async_trait]
impl LeadsQuery for FixtureLeadsQuery {
    async fn board(&self, _request: BoardRequest) -> Result<LeadBoard, Error> {
        let columns = LeadStatus::PIPELINE
            .into_iter()
            .map(|status| BoardColumn {
                status,
                label: status.label().to_owned(),
                leads: Vec::new(),
            })
            .collect();
        Ok(LeadBoard { columns })
    }

    async fn cold_calls(&self, _request: BoardRequest) -> Result<Vec<Lead>, Error> {
        Ok(Vec::new())
    }

    async fn get_lead(&self, request: GetLeadRequest) -> Result<LeadDetail, Error> {
        Err(Error::not_found(format!(
            "lead {} not found",
            request.lead_id
        )))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn fixture_import_counts_every_row() {
        let command = FixtureLeadsCommand;
        let response = command
            .import_leads(ImportLeadsRequest {
                caller: UserId::random(),
                team_id: TeamId::random(),
                installer_group_id: InstallerGroupId::random(),
                rows: vec![ImportRow::default(), ImportRow::default()],
            })
            .await
            .expect("import");
        assert_eq!(response.imported, 2);
    }

    #[tokio::test]
    async fn fixture_board_has_one_column_per_stage() {
        let query = FixtureLeadsQuery;
        let board = query
            .board(BoardRequest {
                caller: UserId::random(),
                team_id: TeamId::random(),
                installer_group_id: None,
            })
            .await
            .expect("board");
        assert_eq!(board.columns.len(), LeadStatus::PIPELINE.len());
        assert!(board.columns.iter().all(|column| column.leads.is_empty()));
    }

    #[tokio::test]
    async fn fixture_estimate_is_sized_from_panel_count() {
        let command = FixtureLeadsCommand;
        let estimate = command
            .save_estimate(SaveEstimateRequest {
                caller: UserId::random(),
                team_id: TeamId::random(),
                lead_id: LeadId::random(),
                panel_count: 10,
                roof_type: "tile".to_owned(),
                annual_consumption_kwh: 4000.0,
                quoted_total: 95_000.0,
            })
            .await
            .expect("estimate");
        assert_eq!(estimate.system_size_kw, 4.4);
    }
}
