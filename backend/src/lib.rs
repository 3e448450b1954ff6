//! Backend library: domain model, HTTP adapter, and infrastructure adapters
//! for the solar CRM.
//!
//! The crate follows a hexagonal layout. `domain` owns the entities, ports,
//! and services; `inbound::http` adapts Actix requests onto the driving
//! ports; `outbound` implements the driven ports against PostgreSQL and the
//! Microsoft Graph API.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use doc::ApiDoc;
pub use middleware::Trace;
