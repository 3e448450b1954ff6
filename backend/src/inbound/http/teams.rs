//! Tenancy HTTP handlers.
//!
//! ```text
//! POST /api/v1/teams
//! GET  /api/v1/teams
//! GET  /api/v1/teams/{team_id}/members
//! POST /api/v1/teams/{team_id}/members
//! GET  /api/v1/teams/{team_id}/installer-groups
//! POST /api/v1/teams/{team_id}/installer-groups
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{AddMemberRequest, CreateInstallerGroupRequest, CreateTeamRequest};
use crate::domain::team::TeamRole;
use crate::domain::{Error, InstallerGroup, Team, TeamMember};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, missing_field_error, parse_team_id, parse_user_id,
};

/// Request payload for creating a team.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamPayload {
    pub name: Option<String>,
}

/// Request payload for adding or re-roling a member.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberPayload {
    pub user_id: Option<String>,
    pub role: Option<String>,
}

/// Request payload for creating an installer group.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstallerGroupPayload {
    pub name: Option<String>,
}

fn parse_role(value: String) -> Result<TeamRole, Error> {
    TeamRole::from_str(&value).map_err(|_| {
        invalid_value_error(
            FieldName::new("role"),
            &value,
            "one of admin, member, installer, viewer",
        )
    })
}

/// Create a team; the caller becomes its first admin.
#[utoipa::path(
    post,
    path = "/api/v1/teams",
    request_body = CreateTeamPayload,
    responses(
        (status = 201, description = "Team created", body = Team),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["teams"],
    operation_id = "createTeam"
)]
#[post("/teams")]
pub async fn create_team(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreateTeamPayload>,
) -> ApiResult<HttpResponse> {
    let name = payload
        .into_inner()
        .name
        .ok_or_else(|| missing_field_error(FieldName::new("name")))?;
    let team = state
        .teams
        .create_team(CreateTeamRequest {
            caller: caller.user_id,
            name,
        })
        .await?;
    Ok(HttpResponse::Created().json(team))
}

/// List the caller's teams.
#[utoipa::path(
    get,
    path = "/api/v1/teams",
    responses(
        (status = 200, description = "Teams the caller belongs to", body = [Team]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["teams"],
    operation_id = "listTeams"
)]
#[get("/teams")]
pub async fn list_teams(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<Team>>> {
    let teams = state.teams_query.list_teams(caller.user_id).await?;
    Ok(web::Json(teams))
}

/// List the members of a team.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/members",
    params(("team_id" = String, Path, description = "Team identifier")),
    responses(
        (status = 200, description = "Team members", body = [TeamMember]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Team not found", body = Error)
    ),
    tags = ["teams"],
    operation_id = "listTeamMembers"
)]
#[get("/teams/{team_id}/members")]
pub async fn list_members(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<TeamMember>>> {
    let team_id = parse_team_id(&path.into_inner())?;
    let members = state
        .teams_query
        .list_members(caller.user_id, team_id)
        .await?;
    Ok(web::Json(members))
}

/// Add a member to a team or overwrite an existing member's role.
#[utoipa::path(
    post,
    path = "/api/v1/teams/{team_id}/members",
    params(("team_id" = String, Path, description = "Team identifier")),
    request_body = AddMemberPayload,
    responses(
        (status = 201, description = "Membership saved", body = TeamMember),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 404, description = "Team not found", body = Error)
    ),
    tags = ["teams"],
    operation_id = "addTeamMember"
)]
#[post("/teams/{team_id}/members")]
pub async fn add_member(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<AddMemberPayload>,
) -> ApiResult<HttpResponse> {
    let team_id = parse_team_id(&path.into_inner())?;
    let payload = payload.into_inner();
    let member_user_id = payload
        .user_id
        .ok_or_else(|| missing_field_error(FieldName::new("userId")))
        .and_then(|raw| parse_user_id(&raw))?;
    let role = payload
        .role
        .ok_or_else(|| missing_field_error(FieldName::new("role")))
        .and_then(parse_role)?;

    let member = state
        .teams
        .add_member(AddMemberRequest {
            caller: caller.user_id,
            team_id,
            member_user_id,
            role,
        })
        .await?;
    Ok(HttpResponse::Created().json(member))
}

/// List the installer groups of a team.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/installer-groups",
    params(("team_id" = String, Path, description = "Team identifier")),
    responses(
        (status = 200, description = "Installer groups", body = [InstallerGroup]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Team not found", body = Error)
    ),
    tags = ["teams"],
    operation_id = "listInstallerGroups"
)]
#[get("/teams/{team_id}/installer-groups")]
pub async fn list_installer_groups(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<InstallerGroup>>> {
    let team_id = parse_team_id(&path.into_inner())?;
    let groups = state
        .teams_query
        .list_installer_groups(caller.user_id, team_id)
        .await?;
    Ok(web::Json(groups))
}

/// Create an installer group within a team.
#[utoipa::path(
    post,
    path = "/api/v1/teams/{team_id}/installer-groups",
    params(("team_id" = String, Path, description = "Team identifier")),
    request_body = CreateInstallerGroupPayload,
    responses(
        (status = 201, description = "Installer group created", body = InstallerGroup),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 404, description = "Team not found", body = Error)
    ),
    tags = ["teams"],
    operation_id = "createInstallerGroup"
)]
#[post("/teams/{team_id}/installer-groups")]
pub async fn create_installer_group(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<CreateInstallerGroupPayload>,
) -> ApiResult<HttpResponse> {
    let team_id = parse_team_id(&path.into_inner())?;
    let name = payload
        .into_inner()
        .name
        .ok_or_else(|| missing_field_error(FieldName::new("name")))?;
    let group = state
        .teams
        .create_installer_group(CreateInstallerGroupRequest {
            caller: caller.user_id,
            team_id,
            name,
        })
        .await?;
    Ok(HttpResponse::Created().json(group))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("admin", TeamRole::Admin)]
    #[case("installer", TeamRole::Installer)]
    fn parse_role_accepts_known_roles(#[case] raw: &str, #[case] expected: TeamRole) {
        assert_eq!(parse_role(raw.to_owned()).expect("role"), expected);
    }

    #[test]
    fn parse_role_rejects_unknown_values() {
        let error = parse_role("owner".to_owned()).expect_err("unknown role");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }
}
