//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{Cli, ServerConfig};
use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use solarcrm_backend::Trace;
#[cfg(debug_assertions)]
use solarcrm_backend::doc::ApiDoc;
use solarcrm_backend::inbound::http::health::{HealthState, live, ready};
use solarcrm_backend::inbound::http::state::HttpState;
use solarcrm_backend::inbound::http::{leads, mail, pricing, selection, teams};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(teams::create_team)
        .service(teams::list_teams)
        .service(teams::list_members)
        .service(teams::add_member)
        .service(teams::list_installer_groups)
        .service(teams::create_installer_group)
        .service(leads::board)
        .service(leads::cold_calls)
        .service(leads::create_lead)
        .service(leads::import_leads)
        .service(leads::get_lead)
        .service(leads::update_status)
        .service(leads::add_task)
        .service(leads::complete_task)
        .service(leads::add_note)
        .service(leads::save_estimate)
        .service(pricing::save_price_item)
        .service(pricing::price_table)
        .service(mail::connect)
        .service(mail::status)
        .service(mail::send)
        .service(mail::list_for_lead)
        .service(selection::save)
        .service(selection::fetch);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] with binding, pool, and Graph settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when state construction, binding the socket,
/// or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config)?;
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
