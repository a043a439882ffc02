//! HTTP server configuration and startup

use std::net::SocketAddr;

use axum::Router;
use tracing::info;

use scraper_core::ScraperConfig;

use crate::api::{create_router, AppState};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    pub listen_addr: String,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:80".to_string(),
        }
    }
}

impl From<&ScraperConfig> for ApiServerConfig {
    fn from(cfg: &ScraperConfig) -> Self {
        Self {
            listen_addr: cfg.listen_addr.clone(),
        }
    }
}

/// HTTP server wrapper
pub struct ApiServer {
    config: ApiServerConfig,
    router: Router,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig, state: AppState) -> Self {
        Self {
            config,
            router: create_router(state),
        }
    }

    /// Get server address
    pub fn address(&self) -> &str {
        &self.config.listen_addr
    }

    /// Serve until `shutdown` fires, then drain open connections
    pub async fn start_with_shutdown(
        self,
        shutdown: tokio::sync::oneshot::Receiver<()>,
    ) -> anyhow::Result<()> {
        let addr: SocketAddr = self.config.listen_addr.parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("Server ready! Listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async {
                shutdown.await.ok();
                info!("Shutdown signal received");
            })
            .await?;

        Ok(())
    }
}
