//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod email_repository;
mod estimate_repository;
mod lead_repository;
mod leads;
mod mail;
mod mail_gateway;
mod price_item_repository;
mod pricing;
mod selection;
mod selection_store;
mod team_repository;
mod teams;
mod token_verifier;

#[cfg(test)]
pub use email_repository::{MockEmailAccountRepository, MockEmailMessageRepository};
pub use email_repository::{
    EmailAccountRepository, EmailMessageRepository, EmailRepositoryError,
    FixtureEmailAccountRepository, FixtureEmailMessageRepository,
};
#[cfg(test)]
pub use estimate_repository::MockEstimateRepository;
pub use estimate_repository::{
    EstimateRepository, EstimateRepositoryError, FixtureEstimateRepository,
};
#[cfg(test)]
pub use lead_repository::MockLeadRepository;
pub use lead_repository::{FixtureLeadRepository, LeadRepository, LeadRepositoryError};
#[cfg(test)]
pub use leads::{MockLeadsCommand, MockLeadsQuery};
pub use leads::{
    AddNoteRequest, AddTaskRequest, BoardColumn, BoardRequest, CompleteTaskRequest,
    CreateLeadRequest, FixtureLeadsCommand, FixtureLeadsQuery, GetLeadRequest, ImportLeadsRequest,
    ImportLeadsResponse, LeadBoard, LeadDetail, LeadsCommand, LeadsQuery, SaveEstimateRequest,
    UpdateLeadStatusRequest,
};
#[cfg(test)]
pub use mail::{MockMailCommand, MockMailQuery};
pub use mail::{
    ConnectMailboxRequest, FixtureMailCommand, FixtureMailQuery, LeadMailRequest, MailCommand,
    MailQuery, MailboxStatus, SendMailRequest,
};
#[cfg(test)]
pub use mail_gateway::MockMailGateway;
pub use mail_gateway::{MailGateway, MailGatewayError, SentMessageRef};
#[cfg(test)]
pub use price_item_repository::MockPriceItemRepository;
pub use price_item_repository::{
    FixturePriceItemRepository, PriceItemRepository, PriceItemRepositoryError,
};
#[cfg(test)]
pub use pricing::{MockPricingCommand, MockPricingQuery};
pub use pricing::{
    FixturePricingCommand, FixturePricingQuery, PriceTableRequest, PricingCommand, PricingQuery,
    SavePriceItemRequest,
};
#[cfg(test)]
pub use selection::{MockSelectionCommand, MockSelectionQuery};
pub use selection::{
    FixtureSelectionCommand, FixtureSelectionQuery, SaveSelectionRequest, SelectionCommand,
    SelectionQuery,
};
#[cfg(test)]
pub use selection_store::MockSelectionStore;
pub use selection_store::{FixtureSelectionStore, SelectionStore, SelectionStoreError};
#[cfg(test)]
pub use team_repository::MockTeamRepository;
pub use team_repository::{FixtureTeamRepository, TeamRepository, TeamRepositoryError};
#[cfg(test)]
pub use teams::{MockTeamsCommand, MockTeamsQuery};
pub use teams::{
    AddMemberRequest, CreateInstallerGroupRequest, CreateTeamRequest, FixtureTeamsCommand,
    FixtureTeamsQuery, TeamsCommand, TeamsQuery,
};
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use token_verifier::{FixtureTokenVerifier, TokenVerifier, TokenVerifierError};
