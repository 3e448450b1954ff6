//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (teams, leads,
//!   pricing, mail, workspace, health)
//! - **Schemas**: Domain types and request payloads referenced by the paths
//! - **Security**: The bearer token authentication scheme
//!
//! The generated specification backs Swagger UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::email::{EmailMessage, SendOutcome};
use crate::domain::error::{Error, ErrorCode};
use crate::domain::estimate::Estimate;
use crate::domain::lead::{ImportRow, Lead, LeadNote, LeadStatus, LeadTask};
use crate::domain::ports::{
    BoardColumn, ImportLeadsResponse, LeadBoard, LeadDetail, MailboxStatus,
};
use crate::domain::pricing::{PriceBreakdown, PriceCategory, PriceItem, PriceRow, PriceTable};
use crate::domain::selection::WorkspaceSelection;
use crate::domain::team::{InstallerGroup, Team, TeamMember, TeamRole};
use crate::inbound::http::leads::{
    AddNotePayload, AddTaskPayload, CreateLeadPayload, ImportLeadsPayload, SaveEstimatePayload,
    UpdateStatusPayload,
};
use crate::inbound::http::mail::{ConnectMailboxPayload, SendMailPayload};
use crate::inbound::http::pricing::SavePriceItemPayload;
use crate::inbound::http::selection::SaveSelectionPayload;
use crate::inbound::http::teams::{
    AddMemberPayload, CreateInstallerGroupPayload, CreateTeamPayload,
};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Opaque API token presented as Authorization: Bearer."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Solar CRM backend API",
        description = "HTTP interface for lead, pricing, and mail workflows of \
                       solar installation teams."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::teams::create_team,
        crate::inbound::http::teams::list_teams,
        crate::inbound::http::teams::list_members,
        crate::inbound::http::teams::add_member,
        crate::inbound::http::teams::list_installer_groups,
        crate::inbound::http::teams::create_installer_group,
        crate::inbound::http::leads::board,
        crate::inbound::http::leads::cold_calls,
        crate::inbound::http::leads::create_lead,
        crate::inbound::http::leads::import_leads,
        crate::inbound::http::leads::get_lead,
        crate::inbound::http::leads::update_status,
        crate::inbound::http::leads::add_task,
        crate::inbound::http::leads::complete_task,
        crate::inbound::http::leads::add_note,
        crate::inbound::http::leads::save_estimate,
        crate::inbound::http::pricing::save_price_item,
        crate::inbound::http::pricing::price_table,
        crate::inbound::http::mail::connect,
        crate::inbound::http::mail::status,
        crate::inbound::http::mail::send,
        crate::inbound::http::mail::list_for_lead,
        crate::inbound::http::selection::save,
        crate::inbound::http::selection::fetch,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Team,
        TeamMember,
        TeamRole,
        InstallerGroup,
        Lead,
        LeadStatus,
        LeadTask,
        LeadNote,
        LeadBoard,
        BoardColumn,
        LeadDetail,
        ImportRow,
        ImportLeadsResponse,
        Estimate,
        PriceItem,
        PriceCategory,
        PriceRow,
        PriceBreakdown,
        PriceTable,
        MailboxStatus,
        EmailMessage,
        SendOutcome,
        WorkspaceSelection,
        CreateTeamPayload,
        AddMemberPayload,
        CreateInstallerGroupPayload,
        CreateLeadPayload,
        ImportLeadsPayload,
        UpdateStatusPayload,
        AddTaskPayload,
        AddNotePayload,
        SaveEstimatePayload,
        SavePriceItemPayload,
        ConnectMailboxPayload,
        SendMailPayload,
        SaveSelectionPayload,
    )),
    tags(
        (name = "teams", description = "Team, membership, and installer group management"),
        (name = "leads", description = "Lead pipeline, tasks, notes, and estimates"),
        (name = "pricing", description = "Per-group price tables"),
        (name = "mail", description = "Outlook mailbox connection and lead correspondence"),
        (name = "workspace", description = "Server-side workspace selection"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn openapi_lead_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let lead_schema = schemas.get("Lead").expect("Lead schema");

        assert_object_schema_has_field(lead_schema, "id");
        assert_object_schema_has_field(lead_schema, "status");
    }

    #[test]
    fn openapi_document_lists_every_surface() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/v1/teams",
            "/api/v1/teams/{team_id}/leads/board",
            "/api/v1/teams/{team_id}/installer-groups/{group_id}/price-table",
            "/api/v1/mail/status",
            "/api/v1/workspace",
            "/health/ready",
        ] {
            assert!(paths.contains_key(path), "missing path '{path}'");
        }
    }
}
