use std::net::SocketAddr;

use axum::Router;
use common::utils::logging::{init_logging, LogFormat};
use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Build the application from configuration.
pub fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let state = AppState::mock(cfg.server.seed_data, cfg.auth.jwt_secret.clone())?;
    if !state.tokens.is_jwt() {
        warn!("no JWT secret configured, issuing mock tokens");
    }
    Ok(routes::build_router(state))
}

/// Public entry: load configuration, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_or_default()?;
    init_logging(LogFormat::parse(&cfg.logging.format));

    let app = build_app(&cfg)?;
    let addr = bind_addr(&cfg)?;
    info!(%addr, seeded = cfg.server.seed_data, "starting admin api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
