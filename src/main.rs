// Initialize configuration
// Set up logging
// Learn the starting height from the ledger
// Start block ingestion task
// Start HTTP server, shut both down on Ctrl-C

use eth_address_indexer::{
    api,
    blockchain::{spawn_ingestion, EthereumClient, LedgerClient},
    config::Config,
    state::AppState,
    EthereumParser, Parser, PollingSettings,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting eth-address-indexer");

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    let client: Arc<dyn LedgerClient> = Arc::new(EthereumClient::new(&config)?);
    let settings = PollingSettings::from(&config);

    // Without a starting height there is nothing to ingest from
    let parser = Arc::new(EthereumParser::connect(client.clone(), &settings).await?);
    let app_state = Arc::new(AppState::new(&config, parser.clone()));

    let shutdown = CancellationToken::new();

    // Start block ingestion task; if it gives up the server shuts down too
    let polling_handle = spawn_ingestion(parser.clone(), client, settings, shutdown.clone());
    info!("Block ingestion task started");

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                signal_shutdown.cancel();
            }
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        }
    });

    // Start HTTP server
    let app = api::create_router(app_state);
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server is listening on {}", addr);

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
        .await?;

    shutdown.cancel();
    match polling_handle.await {
        Ok(Ok(())) => info!("Block ingestion stopped at block {}", parser.current_block()),
        Ok(Err(e)) => return Err(e.into()),
        Err(e) => error!("Block ingestion task panicked: {}", e),
    }

    Ok(())
}
