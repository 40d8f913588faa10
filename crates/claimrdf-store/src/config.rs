//! Store connection configuration
//!
//! Loaded from a TOML file or from the environment:
//!
//! ```toml
//! [store]
//! query_endpoint = "http://localhost:3030/claims/query"
//! update_endpoint = "http://localhost:3030/claims/update"
//! timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the query endpoint
pub const ENV_QUERY_ENDPOINT: &str = "CLAIMRDF_QUERY_ENDPOINT";

/// Environment variable holding the update endpoint
pub const ENV_UPDATE_ENDPOINT: &str = "CLAIMRDF_UPDATE_ENDPOINT";

/// Environment variable holding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "CLAIMRDF_TIMEOUT_SECS";

/// Default request timeout (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Where and how to reach a SPARQL endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SPARQL query endpoint URL
    pub query_endpoint: String,

    /// SPARQL update endpoint URL; defaults to the query endpoint
    #[serde(default)]
    pub update_endpoint: Option<String>,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl StoreConfig {
    /// Configuration for a single endpoint serving both queries and updates
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            query_endpoint: endpoint.into(),
            update_endpoint: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from a TOML file
    ///
    /// Settings may live at the top level or under a `[store]` table.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let mut table: toml::Table = toml::from_str(contents)?;
        let table = match table.remove("store") {
            Some(toml::Value::Table(store)) => store,
            Some(_) => return Err(ConfigError::Invalid("[store] must be a table".to_string())),
            None => table,
        };

        if !table.contains_key("query_endpoint") {
            return Err(ConfigError::MissingField("query_endpoint".to_string()));
        }

        let config: StoreConfig = toml::Value::Table(table).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `CLAIMRDF_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let query_endpoint = std::env::var(ENV_QUERY_ENDPOINT)
            .map_err(|_| ConfigError::MissingField(ENV_QUERY_ENDPOINT.to_string()))?;

        let timeout_secs = match std::env::var(ENV_TIMEOUT_SECS) {
            Ok(raw) => raw.parse().map_err(|_| {
                ConfigError::Invalid(format!("{} is not a number: {:?}", ENV_TIMEOUT_SECS, raw))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self {
            query_endpoint,
            update_endpoint: std::env::var(ENV_UPDATE_ENDPOINT).ok(),
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.query_endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("query_endpoint must not be empty".to_string()));
        }
        if matches!(&self.update_endpoint, Some(e) if e.trim().is_empty()) {
            return Err(ConfigError::Invalid("update_endpoint must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Endpoint that receives SPARQL updates
    pub fn update_endpoint(&self) -> &str {
        self.update_endpoint.as_deref().unwrap_or(&self.query_endpoint)
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
