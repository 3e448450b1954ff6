//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod leads;
pub mod mail;
pub mod pricing;
pub mod selection;
pub mod state;
pub mod teams;
pub mod validation;

pub use error::ApiResult;
