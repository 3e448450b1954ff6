//! Membership resolution and role checks shared by the domain services.
//!
//! Authorization is scope-first: a caller with no membership in the addressed
//! team is told the resource does not exist, never that it belongs to someone
//! else. Role checks only apply after membership is established.

use crate::domain::Error;
use crate::domain::ids::{TeamId, UserId};
use crate::domain::ports::{TeamRepository, TeamRepositoryError};
use crate::domain::team::TeamMember;

pub(crate) fn map_team_error(error: TeamRepositoryError) -> Error {
    match error {
        TeamRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("team repository unavailable: {message}"))
        }
        TeamRepositoryError::Query { message } => {
            Error::internal(format!("team repository error: {message}"))
        }
    }
}

/// Resolve the caller's membership in a team, or report the team missing.
pub(crate) async fn resolve_member<R>(
    repo: &R,
    team_id: &TeamId,
    caller: &UserId,
) -> Result<TeamMember, Error>
where
    R: TeamRepository + ?Sized,
{
    repo.membership(team_id, caller)
        .await
        .map_err(map_team_error)?
        .ok_or_else(|| Error::not_found("team not found"))
}

/// Require a role that may mutate leads, tasks, notes, and mail.
pub(crate) fn require_lead_editor(member: &TeamMember) -> Result<(), Error> {
    if member.role.can_edit_leads() {
        Ok(())
    } else {
        Err(Error::forbidden("role may not modify leads"))
    }
}

/// Require the admin role.
pub(crate) fn require_admin(member: &TeamMember) -> Result<(), Error> {
    if member.role.can_administer() {
        Ok(())
    } else {
        Err(Error::forbidden("admin role required"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockTeamRepository;
    use crate::domain::team::TeamRole;

    fn member_with_role(role: TeamRole) -> TeamMember {
        TeamMember {
            team_id: TeamId::random(),
            user_id: UserId::random(),
            role,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn missing_membership_reads_as_not_found() {
        let mut repo = MockTeamRepository::new();
        repo.expect_membership().times(1).return_once(|_, _| Ok(None));

        let error = resolve_member(&repo, &TeamId::random(), &UserId::random())
            .await
            .expect_err("no membership");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[test]
    fn viewer_cannot_edit_leads() {
        let error =
            require_lead_editor(&member_with_role(TeamRole::Viewer)).expect_err("read-only");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[test]
    fn member_cannot_administer() {
        let error = require_admin(&member_with_role(TeamRole::Member)).expect_err("not admin");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[test]
    fn admin_passes_both_checks() {
        let member = member_with_role(TeamRole::Admin);
        require_lead_editor(&member).expect("admin edits");
        require_admin(&member).expect("admin administers");
    }
}
