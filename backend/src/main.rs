//! Backend entry-point: wires REST endpoints, persistence, and OpenAPI docs.

mod server;

use actix_web::web;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use server::{Cli, ServerConfig, create_server};
use solarcrm_backend::inbound::http::health::HealthState;
use solarcrm_backend::outbound::persistence::{DbPool, PoolConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();

    let db_pool = match &cli.database_url {
        Some(url) => {
            let pool_config = PoolConfig::new(url).with_max_size(cli.database_pool_size);
            Some(
                DbPool::new(pool_config)
                    .await
                    .map_err(std::io::Error::other)?,
            )
        }
        None => {
            warn!("DATABASE_URL not set; serving fixture data only");
            None
        }
    };

    let mut config = ServerConfig::new(cli.bind_addr);
    if let Some(pool) = db_pool {
        config = config.with_db_pool(pool);
    }
    if let Some(graph) = cli.graph_config() {
        config = config.with_graph(graph);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
