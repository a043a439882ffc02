//! HTTP front end for the exchange scraper
//!
//! Serves the liveness route and the live pair price lookup

pub mod api;
pub mod server;
pub mod telemetry;

pub use api::{create_router, AppState};
pub use server::{ApiServer, ApiServerConfig};
