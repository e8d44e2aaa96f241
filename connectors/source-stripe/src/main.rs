//! Stripe Events Source Connector binary

use tributary_connect_core::{ConnectorConfig, ConnectorResult, ConnectorRuntime};
use tributary_source_stripe::StripeSourceConnector;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ConnectorResult<()> {
    // Initialize logging
    init_tracing();

    tracing::info!("Starting Stripe Events Source Connector");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = ConnectorConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    tracing::info!("Configuration loaded successfully");
    tracing::info!("Connector: {}", config.connector_name);

    // Create connector instance
    let connector = StripeSourceConnector::new();

    // Create the runtime and drive one sync pass
    let mut runtime = ConnectorRuntime::new(connector, config)?;
    runtime.run().await?;

    tracing::info!("Stripe Events Source Connector finished");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new("info,tributary_source_stripe=debug")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
