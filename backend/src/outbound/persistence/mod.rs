//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain's repository ports, backed by
//! PostgreSQL through `diesel-async` with `bb8` connection pooling.
//!
//! The adapters are thin translators: Diesel row structs (`models`) and
//! table definitions (`schema`) stay internal, and every database error is
//! mapped to the owning port's error type. No business logic lives here.

mod diesel_email_repository;
mod diesel_estimate_repository;
mod diesel_lead_repository;
mod diesel_price_item_repository;
mod diesel_selection_store;
mod diesel_team_repository;
mod diesel_token_verifier;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_email_repository::{DieselEmailAccountRepository, DieselEmailMessageRepository};
pub use diesel_estimate_repository::DieselEstimateRepository;
pub use diesel_lead_repository::DieselLeadRepository;
pub use diesel_price_item_repository::DieselPriceItemRepository;
pub use diesel_selection_store::DieselSelectionStore;
pub use diesel_team_repository::DieselTeamRepository;
pub use diesel_token_verifier::DieselTokenVerifier;
pub use pool::{DbPool, PoolConfig, PoolError};
