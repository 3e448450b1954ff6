//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use clap::Parser;
use solarcrm_backend::outbound::graph::GraphOAuthConfig;
use solarcrm_backend::outbound::persistence::DbPool;

/// Command-line and environment settings for the backend process.
#[derive(Debug, Parser)]
#[command(name = "solarcrm-backend", about = "Solar CRM backend API server")]
pub struct Cli {
    /// Socket address the HTTP listener binds to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: SocketAddr,

    /// PostgreSQL connection URL. Fixture ports serve requests when absent.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "DATABASE_POOL_SIZE", default_value_t = 10)]
    pub database_pool_size: u32,

    /// Microsoft Entra tenant for the Graph mail integration.
    #[arg(long, env = "GRAPH_TENANT")]
    pub graph_tenant: Option<String>,

    /// OAuth client id registered for the mail integration.
    #[arg(long, env = "GRAPH_CLIENT_ID")]
    pub graph_client_id: Option<String>,

    /// OAuth client secret registered for the mail integration.
    #[arg(long, env = "GRAPH_CLIENT_SECRET", hide_env_values = true)]
    pub graph_client_secret: Option<String>,

    /// Redirect URI the authorization code flow returns to.
    #[arg(long, env = "GRAPH_REDIRECT_URI")]
    pub graph_redirect_uri: Option<String>,
}

impl Cli {
    /// Assemble the Graph OAuth settings when all four values are present.
    ///
    /// A partially configured integration is treated as absent so the server
    /// still starts; mail endpoints then report the mailbox as disconnected.
    #[must_use]
    pub fn graph_config(&self) -> Option<GraphOAuthConfig> {
        match (
            &self.graph_tenant,
            &self.graph_client_id,
            &self.graph_client_secret,
            &self.graph_redirect_uri,
        ) {
            (Some(tenant), Some(client_id), Some(client_secret), Some(redirect_uri)) => {
                Some(GraphOAuthConfig {
                    tenant: tenant.clone(),
                    client_id: client_id.clone(),
                    client_secret: client_secret.clone(),
                    redirect_uri: redirect_uri.clone(),
                })
            }
            _ => None,
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) graph: Option<GraphOAuthConfig>,
}

impl ServerConfig {
    /// Construct a server configuration binding to the given address.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            graph: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses database-backed implementations for
    /// every port; otherwise fixture implementations serve requests.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach Graph OAuth settings enabling the Outlook mail integration.
    #[must_use]
    pub fn with_graph(mut self, graph: GraphOAuthConfig) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(
            dead_code,
            reason = "Exercised by integration tests; retained for fixture access"
        )
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn full_cli() -> Cli {
        Cli::parse_from([
            "solarcrm-backend",
            "--graph-tenant",
            "common",
            "--graph-client-id",
            "app",
            "--graph-client-secret",
            "secret",
            "--graph-redirect-uri",
            "https://crm.example.com/oauth/callback",
        ])
    }

    #[rstest]
    fn graph_config_requires_all_four_settings() {
        let mut cli = full_cli();
        cli.graph_client_secret = None;

        assert!(cli.graph_config().is_none());
    }

    #[rstest]
    fn graph_config_assembles_when_complete() {
        let cli = full_cli();

        let graph = cli.graph_config().expect("graph config");
        assert_eq!(graph.tenant, "common");
        assert_eq!(graph.redirect_uri, "https://crm.example.com/oauth/callback");
    }

    #[rstest]
    fn bind_addr_defaults_to_all_interfaces() {
        let cli = Cli::parse_from(["solarcrm-backend"]);

        assert_eq!(cli.bind_addr.port(), 8080);
    }
}
