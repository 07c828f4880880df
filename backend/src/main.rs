//! Backend entry-point: loads settings, wires the REST endpoints and OpenAPI
//! docs, and optionally seeds the catalogue.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use beerorder::inbound::http::health::HealthState;
use server::{AppSettings, ServerConfig, create_server};

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

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = ServerConfig::from_settings(&settings)?;
    info!(
        bind_addr = %config.bind_addr,
        seeding = config.seeding.is_some(),
        "starting beer order server"
    );

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
