//! Configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{ConfigError, ConfigResult};

/// Browser-like User-Agent sent to exchange APIs
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/104.0.0.0 Safari/537.36";

/// Environment variables consulted when `SCRAPER_DATABASE_URL` is unset
pub const LEGACY_DATABASE_URL_VARS: [&str; 2] = ["DATABASE_URL", "pgConnectionString"];

/// Complete scraper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub database_url: String,
    pub listen_addr: String,
    pub poll_interval_secs: u64,
    pub write_timeout_secs: u64,
    pub db_min_connections: u32,
    pub db_max_connections: u32,
    pub user_agent: String,
    pub log_json: bool,
    pub table_name: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            listen_addr: "0.0.0.0:80".to_string(),
            poll_interval_secs: 15,
            write_timeout_secs: 15,
            db_min_connections: 5,
            db_max_connections: 15,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_json: false,
            table_name: "exchange_scraped_data".to_string(),
        }
    }
}

impl ScraperConfig {
    /// Load from `scraper.toml` (optional) and `SCRAPER_*` environment
    /// variables, on top of the defaults.
    pub fn load() -> ConfigResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("scraper").required(false))
            .add_source(config::Environment::with_prefix("SCRAPER").try_parsing(true))
            .build()?;

        let mut cfg: ScraperConfig = settings.try_deserialize()?;
        cfg.apply_legacy_database_url(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Fill an empty `database_url` from the first legacy variable that is set
    pub fn apply_legacy_database_url<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if !self.database_url.is_empty() {
            return;
        }
        if let Some(url) = LEGACY_DATABASE_URL_VARS
            .iter()
            .filter_map(|key| lookup(*key))
            .find(|url| !url.is_empty())
        {
            self.database_url = url;
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid("poll_interval_secs must be positive".into()));
        }
        if self.write_timeout_secs == 0 {
            return Err(ConfigError::Invalid("write_timeout_secs must be positive".into()));
        }
        if self.db_max_connections == 0 {
            return Err(ConfigError::Invalid("db_max_connections must be positive".into()));
        }
        if self.db_min_connections > self.db_max_connections {
            return Err(ConfigError::Invalid(format!(
                "db_min_connections ({}) exceeds db_max_connections ({})",
                self.db_min_connections, self.db_max_connections
            )));
        }
        if !is_sql_identifier(&self.table_name) {
            return Err(ConfigError::Invalid(format!(
                "table_name {:?} is not a plain SQL identifier",
                self.table_name
            )));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, the table name is spliced into SQL text
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
