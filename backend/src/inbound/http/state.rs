//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    LeadsCommand, LeadsQuery, MailCommand, MailQuery, PricingCommand, PricingQuery,
    SelectionCommand, SelectionQuery, TeamsCommand, TeamsQuery, TokenVerifier,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub token_verifier: Arc<dyn TokenVerifier>,
    pub teams: Arc<dyn TeamsCommand>,
    pub teams_query: Arc<dyn TeamsQuery>,
    pub leads: Arc<dyn LeadsCommand>,
    pub leads_query: Arc<dyn LeadsQuery>,
    pub pricing: Arc<dyn PricingCommand>,
    pub pricing_query: Arc<dyn PricingQuery>,
    pub mail: Arc<dyn MailCommand>,
    pub mail_query: Arc<dyn MailQuery>,
    pub selection: Arc<dyn SelectionCommand>,
    pub selection_query: Arc<dyn SelectionQuery>,
}

impl HttpState {
    /// State backed entirely by fixture ports; useful in tests and examples.
    ///
    /// # Examples
    /// ```
    /// use solarcrm_backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::fixture();
    /// let _teams = state.teams_query.clone();
    /// ```
    #[must_use]
    pub fn fixture() -> Self {
        use crate::domain::ports::{
            FixtureLeadsCommand, FixtureLeadsQuery, FixtureMailCommand, FixtureMailQuery,
            FixturePricingCommand, FixturePricingQuery, FixtureSelectionCommand,
            FixtureSelectionQuery, FixtureTeamsCommand, FixtureTeamsQuery, FixtureTokenVerifier,
        };

        Self {
            token_verifier: Arc::new(FixtureTokenVerifier),
            teams: Arc::new(FixtureTeamsCommand),
            teams_query: Arc::new(FixtureTeamsQuery),
            leads: Arc::new(FixtureLeadsCommand),
            leads_query: Arc::new(FixtureLeadsQuery),
            pricing: Arc::new(FixturePricingCommand),
            pricing_query: Arc::new(FixturePricingQuery),
            mail: Arc::new(FixtureMailCommand),
            mail_query: Arc::new(FixtureMailQuery),
            selection: Arc::new(FixtureSelectionCommand),
            selection_query: Arc::new(FixtureSelectionQuery),
        }
    }
}
