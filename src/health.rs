//! Liveness endpoint for hosting platforms that expect the process to answer HTTP.

use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

pub const HEALTH_BODY: &str = "Dogbot is running! 🐶";

/// Creates the health-check router.
pub fn create_router() -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, HEALTH_BODY)
}

/// Binds the health server on all interfaces and serves until the process exits.
pub async fn serve(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener).await
}

pub async fn serve_on(listener: TcpListener) -> std::io::Result<()> {
    info!("Health server listening on {}", listener.local_addr()?);
    axum::serve(listener, create_router()).await
}
