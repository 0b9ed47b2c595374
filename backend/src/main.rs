//! Backend entry-point: loads settings, wires adapters, and serves the API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use icumbi::inbound::http::health::HealthState;
use server::{AppSettings, create_server};

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
    let config = settings.validate().map_err(|e| {
        error!(error = %e, "invalid configuration");
        std::io::Error::other(e)
    })?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
