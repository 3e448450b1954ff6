//! Lead pipeline domain service.
//!
//! Implements the leads driving ports: manual creation, bulk import, board
//! and cold-call reads, pipeline moves, tasks, notes, and estimates. Every
//! operation resolves the caller's membership first and works through a
//! [`TeamScope`] so foreign leads are indistinguishable from missing ones.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::access::{map_team_error, require_lead_editor, resolve_member};
use crate::domain::ports::{
    AddNoteRequest, AddTaskRequest, BoardColumn, BoardRequest, CompleteTaskRequest,
    CreateLeadRequest, EstimateRepository, EstimateRepositoryError, GetLeadRequest,
    ImportLeadsRequest, ImportLeadsResponse, LeadBoard, LeadDetail, LeadRepository,
    LeadRepositoryError, LeadsCommand, LeadsQuery, SaveEstimateRequest, TeamRepository,
    UpdateLeadStatusRequest,
};
use crate::domain::{
    Error, Estimate, InstallerGroupId, Lead, LeadId, LeadNote, LeadStatus, LeadTask, TeamId,
    TeamScope, UserId,
};

/// Lead pipeline service implementing the driving ports.
#[derive(Clone)]
pub struct LeadsService<T, L, E> {
    teams: Arc<T>,
    leads: Arc<L>,
    estimates: Arc<E>,
}

impl<T, L, E> LeadsService<T, L, E> {
    /// Create a new service with the given repositories.
    pub fn new(teams: Arc<T>, leads: Arc<L>, estimates: Arc<E>) -> Self {
        Self {
            teams,
            leads,
            estimates,
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

fn map_estimate_error(error: EstimateRepositoryError) -> Error {
    match error {
        EstimateRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("estimate repository unavailable: {message}"))
        }
        EstimateRepositoryError::Query { message } => {
            Error::internal(format!("estimate repository error: {message}"))
        }
    }
}

fn lead_not_found() -> Error {
    Error::not_found("lead not found")
}

impl<T, L, E> LeadsService<T, L, E>
where
    T: TeamRepository,
    L: LeadRepository,
    E: EstimateRepository,
{
    /// Verify the installer group belongs to the team before writing into it.
    async fn require_group(
        &self,
        team_id: &TeamId,
        group_id: &InstallerGroupId,
    ) -> Result<(), Error> {
        self.teams
            .find_installer_group(team_id, group_id)
            .await
            .map_err(map_team_error)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found("installer group not found"))
    }

    /// Authorize an edit and return the lead, scoped to the caller's team.
    async fn editable_lead(
        &self,
        caller: &UserId,
        team_id: &TeamId,
        lead_id: &LeadId,
    ) -> Result<Lead, Error> {
        let member = resolve_member(self.teams.as_ref(), team_id, caller).await?;
        require_lead_editor(&member)?;
        let scope = TeamScope::team(*team_id);
        self.leads
            .find(&scope, lead_id)
            .await
            .map_err(map_lead_error)?
            .ok_or_else(lead_not_found)
    }
}

#[async_trait]
impl<T, L, E> LeadsCommand for LeadsService<T, L, E>
where
    T: TeamRepository,
    L: LeadRepository,
    E: EstimateRepository,
{
    async fn create_lead(&self, request: CreateLeadRequest) -> Result<Lead, Error> {
        let member = resolve_member(self.teams.as_ref(), &request.team_id, &request.caller).await?;
        require_lead_editor(&member)?;
        self.require_group(&request.team_id, &request.installer_group_id)
            .await?;
        if request.name.trim().is_empty() {
            return Err(Error::invalid_request("lead name must not be empty"));
        }

        let now = Utc::now();
        let lead = Lead {
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
        };
        self.leads.insert(&lead).await.map_err(map_lead_error)?;
        Ok(lead)
    }

    async fn import_leads(
        &self,
        request: ImportLeadsRequest,
    ) -> Result<ImportLeadsResponse, Error> {
        let member = resolve_member(self.teams.as_ref(), &request.team_id, &request.caller).await?;
        require_lead_editor(&member)?;
        self.require_group(&request.team_id, &request.installer_group_id)
            .await?;

        let leads: Vec<Lead> = request
            .rows
            .into_iter()
            .map(|row| row.into_lead(request.team_id, request.installer_group_id))
            .collect();
        let imported = self
            .leads
            .insert_batch(&leads)
            .await
            .map_err(map_lead_error)?;
        Ok(ImportLeadsResponse { imported })
    }

    async fn update_status(&self, request: UpdateLeadStatusRequest) -> Result<Lead, Error> {
        let member = resolve_member(self.teams.as_ref(), &request.team_id, &request.caller).await?;
        require_lead_editor(&member)?;

        let scope = TeamScope::team(request.team_id);
        self.leads
            .update_status(&scope, &request.lead_id, request.status)
            .await
            .map_err(map_lead_error)?
            .ok_or_else(lead_not_found)
    }

    async fn add_task(&self, request: AddTaskRequest) -> Result<LeadTask, Error> {
        let lead = self
            .editable_lead(&request.caller, &request.team_id, &request.lead_id)
            .await?;
        if request.title.trim().is_empty() {
            return Err(Error::invalid_request("task title must not be empty"));
        }

        let task = LeadTask {
            id: Uuid::new_v4(),
            lead_id: lead.id,
            title: request.title,
            due_at: request.due_at,
            done: false,
            created_at: Utc::now(),
        };
        self.leads.insert_task(&task).await.map_err(map_lead_error)?;
        Ok(task)
    }

    async fn complete_task(&self, request: CompleteTaskRequest) -> Result<(), Error> {
        let lead = self
            .editable_lead(&request.caller, &request.team_id, &request.lead_id)
            .await?;
        let completed = self
            .leads
            .complete_task(&lead.id, &request.task_id)
            .await
            .map_err(map_lead_error)?;
        if completed {
            Ok(())
        } else {
            Err(Error::not_found("task not found"))
        }
    }

    async fn add_note(&self, request: AddNoteRequest) -> Result<LeadNote, Error> {
        let lead = self
            .editable_lead(&request.caller, &request.team_id, &request.lead_id)
            .await?;
        if request.body.trim().is_empty() {
            return Err(Error::invalid_request("note body must not be empty"));
        }

        let note = LeadNote {
            id: Uuid::new_v4(),
            lead_id: lead.id,
            author_user_id: request.caller,
            body: request.body,
            created_at: Utc::now(),
        };
        self.leads.insert_note(&note).await.map_err(map_lead_error)?;
        Ok(note)
    }

    async fn save_estimate(&self, request: SaveEstimateRequest) -> Result<Estimate, Error> {
        let lead = self
            .editable_lead(&request.caller, &request.team_id, &request.lead_id)
            .await?;

        let estimate = Estimate {
            lead_id: lead.id,
            panel_count: request.panel_count,
            roof_type: request.roof_type,
            annual_consumption_kwh: request.annual_consumption_kwh,
            system_size_kw: 0.0,
            quoted_total: request.quoted_total,
            updated_at: Utc::now(),
        }
        .sized();
        self.estimates
            .upsert(&estimate)
            .await
            .map_err(map_estimate_error)?;
        Ok(estimate)
    }
}

#[async_trait]
impl<T, L, E> LeadsQuery for LeadsService<T, L, E>
where
    T: TeamRepository,
    L: LeadRepository,
    E: EstimateRepository,
{
    async fn board(&self, request: BoardRequest) -> Result<LeadBoard, Error> {
        resolve_member(self.teams.as_ref(), &request.team_id, &request.caller).await?;
        let scope = match request.installer_group_id {
            Some(group_id) => TeamScope::group(request.team_id, group_id),
            None => TeamScope::team(request.team_id),
        };
        let leads = self.leads.list(&scope).await.map_err(map_lead_error)?;

        let columns = LeadStatus::PIPELINE
            .into_iter()
            .map(|status| BoardColumn {
                status,
                label: status.label().to_owned(),
                leads: leads
                    .iter()
                    .filter(|lead| lead.status == status)
                    .cloned()
                    .collect(),
            })
            .collect();
        Ok(LeadBoard { columns })
    }

    async fn cold_calls(&self, request: BoardRequest) -> Result<Vec<Lead>, Error> {
        resolve_member(self.teams.as_ref(), &request.team_id, &request.caller).await?;
        let scope = match request.installer_group_id {
            Some(group_id) => TeamScope::group(request.team_id, group_id),
            None => TeamScope::team(request.team_id),
        };
        self.leads
            .list_by_status(&scope, LeadStatus::ColdCall)
            .await
            .map_err(map_lead_error)
    }

    async fn get_lead(&self, request: GetLeadRequest) -> Result<LeadDetail, Error> {
        resolve_member(self.teams.as_ref(), &request.team_id, &request.caller).await?;
        let scope = TeamScope::team(request.team_id);
        let lead = self
            .leads
            .find(&scope, &request.lead_id)
            .await
            .map_err(map_lead_error)?
            .ok_or_else(lead_not_found)?;

        let tasks = self.leads.tasks(&lead.id).await.map_err(map_lead_error)?;
        let notes = self.leads.notes(&lead.id).await.map_err(map_lead_error)?;
        let estimate = self
            .estimates
            .find(&lead.id)
            .await
            .map_err(map_estimate_error)?;
        Ok(LeadDetail {
            lead,
            tasks,
            notes,
            estimate,
        })
    }
}
