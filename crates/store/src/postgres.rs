//! PostgreSQL backend.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

use scraper_core::{CanonicalQuote, ScraperConfig, StoreError, StoreResult};

use crate::traits::QuoteStore;

/// md5('healthcheck'), returned by a live server for the probe query
pub const HEALTHCHECK_MD5: &str = "37c72e39a9cb88b7964daac6411f404b";

/// Connection settings
#[derive(Debug, Clone)]
pub struct PostgresStoreConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub table_name: String,
}

impl From<&ScraperConfig> for PostgresStoreConfig {
    fn from(cfg: &ScraperConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            min_connections: cfg.db_min_connections,
            max_connections: cfg.db_max_connections,
            acquire_timeout: Duration::from_secs(30),
            table_name: cfg.table_name.clone(),
        }
    }
}

/// Quote store backed by a bounded PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    table: String,
    insert_sql: String,
}

impl PostgresStore {
    /// Open the pool. The table name must already be validated as an identifier.
    pub async fn connect(config: &PostgresStoreConfig) -> StoreResult<Self> {
        if config.url.is_empty() {
            return Err(StoreError::Connection("connection string is empty".into()));
        }

        info!(
            min = config.min_connections,
            max = config.max_connections,
            "Attempting to connect to the DB..."
        );

        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self::with_pool(pool, &config.table_name))
    }

    /// Wrap an existing pool
    pub fn with_pool(pool: PgPool, table: &str) -> Self {
        Self {
            insert_sql: format!(
                "insert into {} (exchange, pair, price) values ($1, $2, $3)",
                table
            ),
            table: table.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl QuoteStore for PostgresStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        let digest: String = sqlx::query_scalar("select md5('healthcheck')")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::HealthCheck(e.to_string()))?;

        if digest.contains(HEALTHCHECK_MD5) {
            Ok(())
        } else {
            Err(StoreError::HealthCheck(format!("unexpected digest {digest}")))
        }
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        let ddl = format!(
            "create table if not exists {} (exchange text, pair text, price double precision)",
            self.table
        );
        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(())
    }

    async fn insert_batch(&self, exchange: &str, quotes: &[CanonicalQuote]) -> StoreResult<usize> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Query(format!("failed to start transaction: {e}")))?;

        for quote in quotes {
            sqlx::query(&self.insert_sql)
                .bind(exchange)
                .bind(&quote.symbol)
                .bind(quote.price)
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Query(format!("failed to commit transaction: {e}")))?;

        debug!(exchange, rows = quotes.len(), "Batch committed");
        Ok(quotes.len())
    }
}
