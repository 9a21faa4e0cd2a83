/// Axum webserver lifecycle: bind, serve, and stop on Ctrl-C
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::shared::errors::AppError;
use crate::webserver::{routes, state::AppState};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// Serve until Ctrl-C is received
pub async fn start_server(state: AppState, host: &str, port: u16) -> Result<(), AppError> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| AppError::ConfigError(format!("Invalid bind address {}:{}: {}", host, port, e)))?;

    if !state.rpc_configured() {
        info!("No RPC endpoint configured; comparisons will answer HTTP 500");
    }

    let app = build_app(Arc::new(state));

    let listener = TcpListener::bind(&addr).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::AddrInUse => {
            AppError::ServerError(format!("Failed to bind to {}: address already in use", addr))
        }
        _ => AppError::ServerError(format!("Failed to bind to {}: {}", addr, e)),
    })?;

    info!("Listening on http://{}", addr);
    info!("Comparison endpoint: http://{}/api/pool-config-debug", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::ServerError(e.to_string()))?;

    info!("Webserver stopped");
    Ok(())
}

pub fn build_app(state: Arc<AppState>) -> Router {
    routes::create_router(state).layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        // Without a signal handler, keep serving
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal, stopping webserver...");
}
