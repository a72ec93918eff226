//! Backend entry-point: loads settings, picks a store, and serves the API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use wellness::inbound::http::health::HealthState;
use wellness::inbound::http::token_config::{BuildMode, token_secret_from_env};
use wellness::settings::AppSettings;

use server::{ServerConfig, build_http_state, connect_store, create_server};

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
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let mode = BuildMode::from_debug_assertions();
    let secret = token_secret_from_env(&DefaultEnv::new(), mode).map_err(std::io::Error::other)?;

    let backend = connect_store(&settings, mode).await?;
    let http_state = build_http_state(backend, secret);
    let bind_addr = settings.bind_addr();

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(bind_addr, http_state))?;
    info!(%bind_addr, "wellness API listening");
    server.await
}
