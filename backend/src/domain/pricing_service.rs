//! Price table domain service.
//!
//! Implements the pricing driving ports. Cost and markup figures arrive as
//! raw form strings and are coerced with the forgiving spreadsheet rules
//! before the breakdown is computed; row saves are independent upserts on the
//! (installer group, category, name) key.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::access::{map_team_error, require_admin, resolve_member};
use crate::domain::ports::{
    PriceItemRepository, PriceItemRepositoryError, PriceTableRequest, PricingCommand,
    PricingQuery, SavePriceItemRequest, TeamRepository,
};
use crate::domain::pricing::coerce_amount;
use crate::domain::{Error, InstallerGroupId, PriceItem, PriceTable, TeamId};

/// Pricing service implementing the driving ports.
#[derive(Clone)]
pub struct PricingService<T, P> {
    teams: Arc<T>,
    items: Arc<P>,
}

impl<T, P> PricingService<T, P> {
    /// Create a new service with the given repositories.
    pub fn new(teams: Arc<T>, items: Arc<P>) -> Self {
        Self { teams, items }
    }
}

fn map_price_error(error: PriceItemRepositoryError) -> Error {
    match error {
        PriceItemRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("price repository unavailable: {message}"))
        }
        PriceItemRepositoryError::Query { message } => {
            Error::internal(format!("price repository error: {message}"))
        }
    }
}

impl<T, P> PricingService<T, P>
where
    T: TeamRepository,
    P: PriceItemRepository,
{
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
}

#[async_trait]
impl<T, P> PricingCommand for PricingService<T, P>
where
    T: TeamRepository,
    P: PriceItemRepository,
{
    async fn save_price_item(&self, request: SavePriceItemRequest) -> Result<PriceItem, Error> {
        let member = resolve_member(self.teams.as_ref(), &request.team_id, &request.caller).await?;
        require_admin(&member)?;
        self.require_group(&request.team_id, &request.installer_group_id)
            .await?;
        if request.name.trim().is_empty() {
            return Err(Error::invalid_request("price row name must not be empty"));
        }

        let item = PriceItem {
            installer_group_id: request.installer_group_id,
            category: request.category,
            name: request.name,
            cost: coerce_amount(&request.cost),
            markup_percent: coerce_amount(&request.markup_percent),
            updated_at: Utc::now(),
        };
        self.items.upsert(&item).await.map_err(map_price_error)?;
        Ok(item)
    }
}

#[async_trait]
impl<T, P> PricingQuery for PricingService<T, P>
where
    T: TeamRepository,
    P: PriceItemRepository,
{
    async fn price_table(&self, request: PriceTableRequest) -> Result<PriceTable, Error> {
        resolve_member(self.teams.as_ref(), &request.team_id, &request.caller).await?;
        self.require_group(&request.team_id, &request.installer_group_id)
            .await?;

        let items = self
            .items
            .list(&request.installer_group_id)
            .await
            .map_err(map_price_error)?;
        Ok(PriceTable::compute(request.installer_group_id, items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockPriceItemRepository, MockTeamRepository};
    use crate::domain::pricing::PriceCategory;
    use crate::domain::team::{InstallerGroup, TeamMember, TeamRole};
    use crate::domain::{TeamId, UserId};

    fn teams_with_member(team_id: TeamId, caller: UserId, role: TeamRole) -> MockTeamRepository {
        let mut teams = MockTeamRepository::new();
        teams.expect_membership().return_once(move |_, _| {
            Ok(Some(TeamMember {
                team_id,
                user_id: caller,
                role,
                created_at: Utc::now(),
            }))
        });
        teams
    }

    fn with_group(mut teams: MockTeamRepository) -> MockTeamRepository {
        teams.expect_find_installer_group().return_once(|t, g| {
            Ok(Some(InstallerGroup {
                id: *g,
                team_id: *t,
                name: "North crew".to_owned(),
                created_at: Utc::now(),
            }))
        });
        teams
    }

    #[tokio::test]
    async fn saving_a_row_coerces_raw_figures() {
        let team_id = TeamId::random();
        let caller = UserId::random();
        let teams = with_group(teams_with_member(team_id, caller, TeamRole::Admin));
        let mut items = MockPriceItemRepository::new();
        items
            .expect_upsert()
            .withf(|item| item.cost == 1000.0 && item.markup_percent == 0.0)
            .times(1)
            .return_once(|_| Ok(()));

        let service = PricingService::new(Arc::new(teams), Arc::new(items));
        let item = service
            .save_price_item(SavePriceItemRequest {
                caller,
                team_id,
                installer_group_id: InstallerGroupId::random(),
                category: PriceCategory::RoofType,
                name: "Tile roof".to_owned(),
                cost: "1000".to_owned(),
                markup_percent: "not a number".to_owned(),
            })
            .await
            .expect("save row");
        assert_eq!(item.breakdown().total_incl_vat, 1250.0);
    }

    #[tokio::test]
    async fn non_admins_cannot_edit_pricing() {
        let team_id = TeamId::random();
        let caller = UserId::random();
        let teams = teams_with_member(team_id, caller, TeamRole::Member);

        let service = PricingService::new(Arc::new(teams), Arc::new(MockPriceItemRepository::new()));
        let error = service
            .save_price_item(SavePriceItemRequest {
                caller,
                team_id,
                installer_group_id: InstallerGroupId::random(),
                category: PriceCategory::Additional,
                name: "Scaffolding".to_owned(),
                cost: "100".to_owned(),
                markup_percent: "10".to_owned(),
            })
            .await
            .expect_err("not admin");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn price_table_sums_the_quote_total() {
        let team_id = TeamId::random();
        let caller = UserId::random();
        let group_id = InstallerGroupId::random();
        let teams = with_group(teams_with_member(team_id, caller, TeamRole::Viewer));
        let mut items = MockPriceItemRepository::new();
        items.expect_list().times(1).return_once(move |_| {
            Ok(vec![PriceItem {
                installer_group_id: group_id,
                category: PriceCategory::RoofType,
                name: "Tile roof".to_owned(),
                cost: 1000.0,
                markup_percent: 20.0,
                updated_at: Utc::now(),
            }])
        });

        let service = PricingService::new(Arc::new(teams), Arc::new(items));
        let table = service
            .price_table(PriceTableRequest {
                caller,
                team_id,
                installer_group_id: group_id,
            })
            .await
            .expect("table");
        assert_eq!(table.quote_total, 1500.0);
        assert_eq!(table.rows[0].figures.markup, 200.0);
    }

    #[tokio::test]
    async fn unknown_group_reads_as_not_found() {
        let team_id = TeamId::random();
        let caller = UserId::random();
        let mut teams = teams_with_member(team_id, caller, TeamRole::Admin);
        teams
            .expect_find_installer_group()
            .return_once(|_, _| Ok(None));

        let service = PricingService::new(Arc::new(teams), Arc::new(MockPriceItemRepository::new()));
        let error = service
            .price_table(PriceTableRequest {
                caller,
                team_id,
                installer_group_id: InstallerGroupId::random(),
            })
            .await
            .expect_err("unknown group");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
