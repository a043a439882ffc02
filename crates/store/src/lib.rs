//! Persistence for scraped quotes
//!
//! Features:
//! - `QuoteStore` trait over the append-only quote table
//! - PostgreSQL backend (sqlx) with one transaction per batch
//! - In-process backend with the same all-or-nothing contract
//! - `BatchWriter` enforcing the per-batch execution budget

pub mod traits;
pub mod postgres;
pub mod memory;
pub mod writer;

pub use traits::{QuoteStore, StoredRow};
pub use postgres::{PostgresStore, PostgresStoreConfig, HEALTHCHECK_MD5};
pub use memory::MemoryStore;
pub use writer::BatchWriter;
