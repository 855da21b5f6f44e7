//! Backend entry-point: loads configuration, wires adapters and serves HTTP.

mod server;

use actix_web::web;
use campus_finder::config::AppSettings;
use campus_finder::inbound::http::health::HealthState;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};

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

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = ServerConfig::from_settings(&settings, |name| std::env::var(name).ok())
        .map_err(std::io::Error::other)?;

    info!(bind_addr = %config.bind_addr(), "starting campus-finder");
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
