use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use common::env::ensure_env;
use configs::AppConfig;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address: {e}")))
}

/// Assemble the router on top of an existing connection.
pub fn build_app(db: DatabaseConnection, cfg: &AppConfig) -> anyhow::Result<Router> {
    let state = ServerState::new(db, cfg).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    Ok(routes::build_router(state, build_cors(), cfg.uploads.max_bytes))
}

/// Connect, migrate when configured, then serve until `shutdown` resolves.
/// In-flight requests are allowed to finish before this returns.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if cfg.auth.uses_dev_secret() {
        warn!("JWT_SECRET not set; using the development secret");
    }
    ensure_env(&cfg.uploads.dir).await?;

    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.run_migrations {
        models::db::migrate(&db).await?;
    }

    let app = build_app(db.clone(), &cfg)?;
    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "storefront api listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    info!("listener closed; releasing database pool");
    db.close().await?;
    Ok(())
}

/// Resolves on Ctrl+C, or never when the signal handler cannot be installed.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
