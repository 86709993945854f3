//! Application settings loaded from config.toml
//!
//! Everything here is business policy that differs between deployments: the
//! store roster, which store is the studio, how stores are grouped on the
//! dashboard, which tables the HTTP surfaces may touch, and fetch retry limits.
//! Every section is optional and falls back to the defaults below.

use crate::{
    core::{
        grouping::{StoreGroup, StoreGrouping},
        records::DEFAULT_STUDIO_STORE_ID,
        snapshot::RetryPolicy,
    },
    errors::{Error, Result},
};
use serde::Deserialize;
use std::{path::Path, time::Duration};
use tracing::{debug, warn};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Store whose sales come from the studio ledger
    #[serde(default = "default_studio_store_id")]
    pub studio_store_id: i64,
    /// Snapshot fetch retry limits
    #[serde(default)]
    pub retry: RetryConfig,
    /// Table allow-lists for the generic data endpoints
    #[serde(default)]
    pub tables: TableConfig,
    /// Stores to seed on first run
    #[serde(default)]
    pub stores: Vec<StoreConfig>,
    /// Dashboard subtotal groups, in display order
    #[serde(default)]
    pub store_groups: Vec<StoreGroup>,
    /// Title of the subtotal card for stores in no group
    #[serde(default = "default_remainder_label")]
    pub remainder_label: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            studio_store_id: default_studio_store_id(),
            retry: RetryConfig::default(),
            tables: TableConfig::default(),
            stores: Vec::new(),
            store_groups: Vec::new(),
            remainder_label: default_remainder_label(),
        }
    }
}

impl AppConfig {
    /// Grouping policy for the dashboard subtotal cards.
    #[must_use]
    pub fn grouping(&self) -> StoreGrouping {
        StoreGrouping {
            groups: self.store_groups.clone(),
            remainder_label: self.remainder_label.clone(),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `0.0.0.0:3000`
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Snapshot fetch retry limits
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RetryConfig {
    /// Attempts including the first
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    /// Delay before the first retry, doubled for each further retry
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self {
            max_attempts: config.attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }
}

/// Table allow-lists
#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    /// Tables reachable through `POST /api/data`. Customers are edited only
    /// through `PUT /api/customers/{id}`, which validates room and name.
    #[serde(default = "default_data_tables")]
    pub data: Vec<String>,
    /// Tables reachable through `POST /api/supabase`
    #[serde(default = "default_action_tables")]
    pub actions: Vec<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            data: default_data_tables(),
            actions: default_action_tables(),
        }
    }
}

/// A store to seed
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Primary key in the stores table
    pub store_id: i64,
    /// Display name
    pub store_name: String,
}

const fn default_studio_store_id() -> i64 {
    DEFAULT_STUDIO_STORE_ID
}

fn default_remainder_label() -> String {
    "기타 매장".to_string()
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

const fn default_attempts() -> u32 {
    3
}

const fn default_base_delay_ms() -> u64 {
    500
}

fn default_data_tables() -> Vec<String> {
    [
        "stores",
        "vendors",
        "sales",
        "purchases",
        "expenses",
        "other_transactions",
        "studio_ledger",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn default_action_tables() -> Vec<String> {
    ["stores", "vendors", "expenses", "studio_ledger"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// # Errors
/// Returns [`Error::Config`] for invalid TOML or mistyped fields.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from `CONFIG_PATH` (default `./config.toml`).
///
/// A missing file is not fatal: the defaults are used and a warning is logged.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        warn!("{} not found, using default configuration", path);
        return Ok(AppConfig::default());
    }
    load_config(&path)
}
