use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use wxreport::{NwsClient, WeatherService, WxConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional path to a config file as the only argument
    let config = match std::env::args().nth(1) {
        Some(path) => WxConfig::load_from_path(Some(PathBuf::from(path))),
        None => WxConfig::load(),
    }
    .context("Failed to load configuration")?;

    logging::init_tracing(&config.logging);
    info!("Starting wxreport {}", wxreport::VERSION);

    if config.upstream.api_key.is_none() {
        tracing::warn!("No geocoder API key configured; weather lookups will fail");
    }

    let client = NwsClient::new(&config.upstream).context("Failed to create upstream client")?;
    let service = Arc::new(WeatherService::new(Arc::new(client)));

    web::run(&config, service).await
}
