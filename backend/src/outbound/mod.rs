//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **graph**: Microsoft Graph mail gateway over reqwest
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations; they contain no business logic.

pub mod graph;
pub mod persistence;
