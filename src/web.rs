use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api;
use crate::config::WxConfig;
use crate::service::WeatherService;

/// The full application router with CORS applied
pub fn app(service: Arc<WeatherService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::router(service).layer(cors)
}

pub async fn run(config: &WxConfig, service: Arc<WeatherService>) -> Result<()> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", config.server.port);

    axum::serve(listener, app(service))
        .await
        .context("Web server stopped unexpectedly")
}
