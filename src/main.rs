//! Courier pricing service.
//!
//! Reads configuration from the environment (and `.env` if present), then
//! serves the pricing API.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use courier_pricing::config::Config;
use courier_pricing::distance::DistanceMatrixClient;
use courier_pricing::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Starting courier pricing service...");
    if config.distance_matrix_api_key.is_none() {
        warn!("DISTANCE_MATRIX_API_KEY is not set; address quotes will need a fallback distance");
    }
    info!(
        "Service type parsing: {:?}, default fuel levy: {}%",
        config.service_type_parsing,
        config.default_fuel_levy_percent.value()
    );

    let distance = DistanceMatrixClient::new(
        config.distance_matrix_url.clone(),
        config.distance_matrix_api_key.clone(),
        config.distance_timeout,
    )
    .context("Failed to build distance client")?;

    let bind_addr = config.bind_addr;
    let app = create_app(AppState::new(config, Arc::new(distance)));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
