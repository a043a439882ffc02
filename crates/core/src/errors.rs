//! Error types

use thiserror::Error;

/// Errors raised while fetching or decoding an exchange response
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Request to {exchange} failed: {reason}")]
    Transport { exchange: String, reason: String },

    #[error("HTTP client setup failed: {0}")]
    Client(String),

    #[error("No parser registered for exchange {0}")]
    UnknownExchange(String),

    #[error("Unexpected {exchange} response schema: {reason}")]
    Schema { exchange: String, reason: String },
}

/// Errors on a single quote
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Pair price is not a finite number: {0:?}")]
    InvalidPrice(String),
}

/// Persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Database health check failed: {0}")]
    HealthCheck(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Batch write exceeded {0:?}")]
    Timeout(std::time::Duration),

    #[error("Invalid batch: {0}")]
    InvalidBatch(String),

    #[error("Injected failure on statement {0}")]
    Injected(usize),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias
pub type FeedResult<T> = Result<T, FeedError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
