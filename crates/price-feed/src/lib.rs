//! Exchange ticker ingestion
//!
//! Features:
//! - Static registry of exchange ticker endpoints
//! - Pluggable per-exchange response parsers
//! - Fixed-interval polling with atomic per-exchange batch writes
//! - Live cross-exchange price lookup

pub mod registry;
pub mod fetcher;
pub mod parsers;
pub mod pipeline;
pub mod scheduler;
pub mod query;

pub use registry::ExchangeRegistry;
pub use fetcher::{Fetcher, HttpFetcher, StaticFetcher};
pub use parsers::{NormalizerRegistry, QuoteParser};
pub use pipeline::{canonical_batch, QuotePipeline};
pub use scheduler::{PollingScheduler, SchedulerConfig, SchedulerSnapshot, SchedulerStats};
pub use query::QueryService;
