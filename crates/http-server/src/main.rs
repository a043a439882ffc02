//! Exchange scraper
//!
//! Polls exchange ticker APIs into PostgreSQL and serves live pair prices

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};

use scraper_core::ScraperConfig;
use scraper_price_feed::{
    ExchangeRegistry, HttpFetcher, NormalizerRegistry, PollingScheduler, QueryService,
    QuotePipeline, SchedulerConfig,
};
use scraper_server::{telemetry, ApiServer, ApiServerConfig, AppState};
use scraper_store::{BatchWriter, PostgresStore, PostgresStoreConfig, QuoteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = ScraperConfig::load()?;
    telemetry::init_tracing(config.log_json);

    info!("Starting exchange scraper v{}", env!("CARGO_PKG_VERSION"));

    // The database must answer the probe before anything else starts
    let store = PostgresStore::connect(&PostgresStoreConfig::from(&config))
        .await
        .context("Unable to connect to DB")?;
    store
        .ping()
        .await
        .context("Healthcheck result - DB is unavailable")?;
    info!("API successfully connected to DB");

    store
        .ensure_schema()
        .await
        .with_context(|| format!("Unable to prepare table {}", store.table()))?;

    let postgres = Arc::new(store);
    let store: Arc<dyn QuoteStore> = postgres.clone();

    let registry = Arc::new(ExchangeRegistry::default());
    info!(exchanges = ?registry.ids(), "Exchanges registered");

    let pipeline = QuotePipeline::new(
        registry,
        Arc::new(HttpFetcher::new(&config.user_agent)?),
        Arc::new(NormalizerRegistry::with_defaults()),
    );

    let scheduler = PollingScheduler::new(
        SchedulerConfig {
            interval: config.poll_interval(),
        },
        pipeline.clone(),
        BatchWriter::new(store, config.write_timeout()),
    );
    let scheduler_handle = scheduler.spawn();

    let server = ApiServer::new(
        ApiServerConfig::from(&config),
        AppState::new(QueryService::new(pipeline)),
    );

    // Setup shutdown channel
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(e) => {
                    error!("Failed to install signal handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received Ctrl+C");
            }
            _ = terminate => {
                info!("Received termination signal");
            }
        }

        let _ = shutdown_tx.send(());
    });

    info!("Server starting on {}", server.address());

    let served = server.start_with_shutdown(shutdown_rx).await;
    scheduler_handle.abort();
    postgres.close().await;

    if let Err(e) = served {
        error!("Server error: {}", e);
        return Err(e);
    }

    info!("Server shutdown complete");
    Ok(())
}
