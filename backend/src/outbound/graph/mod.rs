//! Microsoft Graph mail adapter.

mod dto;
mod http_gateway;

pub use http_gateway::{GatewayBuildError, GraphHttpGateway, GraphOAuthConfig};
