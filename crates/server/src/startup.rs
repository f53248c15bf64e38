use std::net::SocketAddr;

use axum::Router;
use common::utils::logging::init_logging;
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::{backend, runtime};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Prepare directories and pick the storage backend for this process.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    runtime::ensure_env(&cfg.storage)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    let services = backend::build(cfg)
        .await
        .map_err(|e| StartupError::Backend(format!("{e:#}")))?;
    info!(backend = services.backend.as_str(), "storage backend selected");
    Ok(AppState::new(services, cfg))
}

/// Router with CORS and tracing layers, ready to serve.
pub fn app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Serve with an already loaded configuration until Ctrl+C.
pub async fn serve(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app = app(state);

    // Bind and serve
    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting catalog server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Public entry: load configuration, set up logging and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_or_default()?;
    init_logging(cfg.server.json_logs);
    serve(cfg).await
}
