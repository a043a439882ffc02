//! PostgreSQL integration tests
//!
//! Require a reachable server:
//! `SCRAPER_TEST_DATABASE_URL=postgres://... cargo test -p scraper-store -- --ignored`

use std::sync::Arc;
use std::time::Duration;

use scraper_core::CanonicalQuote;
use scraper_store::{BatchWriter, PostgresStore, PostgresStoreConfig, QuoteStore};

fn test_config(table: &str) -> PostgresStoreConfig {
    PostgresStoreConfig {
        url: std::env::var("SCRAPER_TEST_DATABASE_URL")
            .expect("SCRAPER_TEST_DATABASE_URL must be set"),
        min_connections: 1,
        max_connections: 4,
        acquire_timeout: Duration::from_secs(10),
        table_name: table.to_string(),
    }
}

fn quotes(exchange: &str, prices: &[f64]) -> Vec<CanonicalQuote> {
    prices
        .iter()
        .enumerate()
        .map(|(i, price)| CanonicalQuote {
            exchange: exchange.to_string(),
            symbol: format!("PAIR{i}USDT"),
            price: *price,
        })
        .collect()
}

async fn row_count(store: &PostgresStore) -> i64 {
    sqlx::query_scalar(&format!("select count(*) from {}", store.table()))
        .fetch_one(store.pool())
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires SCRAPER_TEST_DATABASE_URL"]
async fn test_ping_and_batch_insert() {
    let store = PostgresStore::connect(&test_config("scraper_it_quotes"))
        .await
        .unwrap();
    store.ping().await.unwrap();
    store.ensure_schema().await.unwrap();
    sqlx::query("truncate scraper_it_quotes")
        .execute(store.pool())
        .await
        .unwrap();

    let store = Arc::new(store);
    let writer = BatchWriter::new(store.clone(), Duration::from_secs(15));
    let written = writer
        .write("gate.io", &quotes("gate.io", &[1.5, 2.5, 3.5]))
        .await
        .unwrap();

    assert_eq!(written, 3);
    assert_eq!(row_count(&store).await, 3);
}

#[tokio::test]
#[ignore = "requires SCRAPER_TEST_DATABASE_URL"]
async fn test_failing_last_statement_rolls_back_batch() {
    let store = PostgresStore::connect(&test_config("scraper_it_atomic"))
        .await
        .unwrap();
    sqlx::query("drop table if exists scraper_it_atomic")
        .execute(store.pool())
        .await
        .unwrap();
    // Negative prices violate the check, so only the last insert fails
    sqlx::query(
        "create table scraper_it_atomic \
         (exchange text, pair text, price double precision check (price >= 0))",
    )
    .execute(store.pool())
    .await
    .unwrap();

    let store = Arc::new(store);
    let writer = BatchWriter::new(store.clone(), Duration::from_secs(15));
    let result = writer
        .write("okx.com", &quotes("okx.com", &[1.0, 2.0, 3.0, -1.0]))
        .await;

    assert!(result.is_err());
    assert_eq!(row_count(&store).await, 0);
}
