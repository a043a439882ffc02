//! Core types and utilities for the exchange scraper
//!
//! This crate provides shared types used across all components:
//! - Exchange definitions
//! - Raw and canonical quote types
//! - Symbol canonicalization and price parsing
//! - Configuration and error types

pub mod types;
pub mod quotes;
pub mod settings;
pub mod errors;

pub use types::*;
pub use quotes::*;
pub use settings::*;
pub use errors::*;
