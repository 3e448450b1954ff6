//! Builders for HTTP state ports backed by the database when available.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use solarcrm_backend::domain::ports::{
    FixtureLeadsCommand, FixtureLeadsQuery, FixtureMailCommand, FixtureMailQuery,
    FixturePricingCommand, FixturePricingQuery, FixtureSelectionCommand, FixtureSelectionQuery,
    FixtureTeamsCommand, FixtureTeamsQuery, FixtureTokenVerifier, LeadsCommand, LeadsQuery,
    MailCommand, MailQuery, PricingCommand, PricingQuery, SelectionCommand, SelectionQuery,
    TeamsCommand, TeamsQuery, TokenVerifier,
};
use solarcrm_backend::domain::{
    LeadsService, MailService, PricingService, SelectionService, TeamsService,
};
use solarcrm_backend::inbound::http::state::HttpState;
use solarcrm_backend::outbound::graph::GraphHttpGateway;
use solarcrm_backend::outbound::persistence::{
    DbPool, DieselEmailAccountRepository, DieselEmailMessageRepository, DieselEstimateRepository,
    DieselLeadRepository, DieselPriceItemRepository, DieselSelectionStore, DieselTeamRepository,
    DieselTokenVerifier,
};

use super::ServerConfig;

fn build_token_verifier(pool: &Option<DbPool>) -> Arc<dyn TokenVerifier> {
    match pool {
        Some(pool) => Arc::new(DieselTokenVerifier::new(pool.clone())),
        None => Arc::new(FixtureTokenVerifier),
    }
}

fn build_teams_pair(pool: &Option<DbPool>) -> (Arc<dyn TeamsCommand>, Arc<dyn TeamsQuery>) {
    match pool {
        Some(pool) => {
            let service = Arc::new(TeamsService::new(Arc::new(DieselTeamRepository::new(
                pool.clone(),
            ))));
            (
                service.clone() as Arc<dyn TeamsCommand>,
                service as Arc<dyn TeamsQuery>,
            )
        }
        None => (Arc::new(FixtureTeamsCommand), Arc::new(FixtureTeamsQuery)),
    }
}

fn build_leads_pair(pool: &Option<DbPool>) -> (Arc<dyn LeadsCommand>, Arc<dyn LeadsQuery>) {
    match pool {
        Some(pool) => {
            let service = Arc::new(LeadsService::new(
                Arc::new(DieselTeamRepository::new(pool.clone())),
                Arc::new(DieselLeadRepository::new(pool.clone())),
                Arc::new(DieselEstimateRepository::new(pool.clone())),
            ));
            (
                service.clone() as Arc<dyn LeadsCommand>,
                service as Arc<dyn LeadsQuery>,
            )
        }
        None => (Arc::new(FixtureLeadsCommand), Arc::new(FixtureLeadsQuery)),
    }
}

fn build_pricing_pair(pool: &Option<DbPool>) -> (Arc<dyn PricingCommand>, Arc<dyn PricingQuery>) {
    match pool {
        Some(pool) => {
            let service = Arc::new(PricingService::new(
                Arc::new(DieselTeamRepository::new(pool.clone())),
                Arc::new(DieselPriceItemRepository::new(pool.clone())),
            ));
            (
                service.clone() as Arc<dyn PricingCommand>,
                service as Arc<dyn PricingQuery>,
            )
        }
        None => (
            Arc::new(FixturePricingCommand),
            Arc::new(FixturePricingQuery),
        ),
    }
}

fn build_mail_pair(
    pool: &Option<DbPool>,
    gateway: Option<Arc<GraphHttpGateway>>,
) -> (Arc<dyn MailCommand>, Arc<dyn MailQuery>) {
    match (pool, gateway) {
        (Some(pool), Some(gateway)) => {
            let service = Arc::new(MailService::new(
                Arc::new(DieselTeamRepository::new(pool.clone())),
                Arc::new(DieselLeadRepository::new(pool.clone())),
                Arc::new(DieselEmailAccountRepository::new(pool.clone())),
                Arc::new(DieselEmailMessageRepository::new(pool.clone())),
                gateway,
            ));
            (
                service.clone() as Arc<dyn MailCommand>,
                service as Arc<dyn MailQuery>,
            )
        }
        (Some(_), None) => {
            warn!("Graph OAuth settings absent; mail endpoints serve fixture data");
            (Arc::new(FixtureMailCommand), Arc::new(FixtureMailQuery))
        }
        (None, _) => (Arc::new(FixtureMailCommand), Arc::new(FixtureMailQuery)),
    }
}

fn build_selection_pair(
    pool: &Option<DbPool>,
) -> (Arc<dyn SelectionCommand>, Arc<dyn SelectionQuery>) {
    match pool {
        Some(pool) => {
            let service = Arc::new(SelectionService::new(
                Arc::new(DieselTeamRepository::new(pool.clone())),
                Arc::new(DieselSelectionStore::new(pool.clone())),
            ));
            (
                service.clone() as Arc<dyn SelectionCommand>,
                service as Arc<dyn SelectionQuery>,
            )
        }
        None => (
            Arc::new(FixtureSelectionCommand),
            Arc::new(FixtureSelectionQuery),
        ),
    }
}

/// Build the shared HTTP state from configured ports and fixture fallbacks.
///
/// # Errors
///
/// Fails when Graph OAuth settings are present but the HTTP gateway cannot
/// be constructed from them.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let gateway = config
        .graph
        .clone()
        .map(GraphHttpGateway::new)
        .transpose()
        .map_err(|err| std::io::Error::other(format!("graph gateway setup failed: {err}")))?
        .map(Arc::new);

    let token_verifier = build_token_verifier(&config.db_pool);
    let (teams, teams_query) = build_teams_pair(&config.db_pool);
    let (leads, leads_query) = build_leads_pair(&config.db_pool);
    let (pricing, pricing_query) = build_pricing_pair(&config.db_pool);
    let (mail, mail_query) = build_mail_pair(&config.db_pool, gateway);
    let (selection, selection_query) = build_selection_pair(&config.db_pool);

    Ok(web::Data::new(HttpState {
        token_verifier,
        teams,
        teams_query,
        leads,
        leads_query,
        pricing,
        pricing_query,
        mail,
        mail_query,
        selection,
        selection_query,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use solarcrm_backend::domain::UserId;
    use solarcrm_backend::outbound::graph::GraphOAuthConfig;

    fn fixture_config() -> ServerConfig {
        ServerConfig::new("127.0.0.1:0".parse().expect("addr"))
    }

    #[rstest]
    #[tokio::test]
    async fn pool_absent_keeps_fixture_mail_disconnected() {
        let state = build_http_state(&fixture_config()).expect("state");

        let status = state
            .mail_query
            .status(UserId::random())
            .await
            .expect("status");
        assert!(!status.connected);
    }

    #[rstest]
    #[tokio::test]
    async fn graph_settings_without_pool_still_build() {
        let config = fixture_config().with_graph(GraphOAuthConfig {
            tenant: "common".to_owned(),
            client_id: "app".to_owned(),
            client_secret: "secret".to_owned(),
            redirect_uri: "https://crm.example.com/oauth/callback".to_owned(),
        });

        assert!(build_http_state(&config).is_ok());
    }
}
