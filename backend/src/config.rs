//! Configuration management for the drink stock server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with DST_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::ViewPolicy;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Stock view behaviour
    pub stock: StockConfig,

    /// Report mail delivery
    pub mail: MailConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Seconds to wait for a pooled connection before failing
    pub acquire_timeout_secs: u64,

    /// Server-side statement timeout applied to every connection
    pub statement_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StockConfig {
    /// View policy used when a request does not name one
    pub default_view: ViewPolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    /// HTTP endpoint of the mail delivery API; mailing is disabled when unset
    pub api_endpoint: Option<String>,

    /// Bearer token for the mail API
    pub api_key: Option<String>,

    /// Sender address on outgoing reports
    pub from_address: String,

    /// Request timeout for the mail API
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("DST_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout_secs", 10)?
            .set_default("database.statement_timeout_ms", 15_000)?
            .set_default("stock.default_view", "dense")?
            .set_default("mail.from_address", "stock@localhost")?
            .set_default("mail.timeout_secs", 30)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (DST_ prefix)
            .add_source(
                Environment::with_prefix("DST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
