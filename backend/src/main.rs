//! Backend entry-point: loads settings, wires the store and services, and
//! serves the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use countries_backend::inbound::http::health::HealthState;
use server::{ServerSettings, build_http_state, build_repository, create_server};

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

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let repository = build_repository(&settings)
        .await
        .map_err(std::io::Error::other)?;
    let http_state = build_http_state(&settings, repository).map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, &settings)?;
    info!(bind_addr = %settings.bind_addr(), "countries backend listening");
    server.await
}
