//! Application configuration structures
//!
//! Every section has serde defaults so a partial JSON/TOML file (or an empty
//! one) still yields a usable configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_READ_ATTEMPTS};

/// Top-level configuration for the application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote data store connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total attempts for read requests. Mutations are always sent once.
    #[serde(default = "default_max_read_attempts")]
    pub max_read_attempts: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_read_attempts: default_max_read_attempts(),
        }
    }
}

/// Session settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Bearer token; `None` means the session starts unauthenticated.
    #[serde(default)]
    pub token: Option<String>,
}

/// Query cache settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Snapshots older than this are refetched on the next read. `None`
    /// keeps snapshots until they are explicitly invalidated.
    #[serde(default)]
    pub stale_after_secs: Option<u64>,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_max_read_attempts() -> usize {
    DEFAULT_MAX_READ_ATTEMPTS
}

fn default_log_level() -> String {
    "info".to_string()
}
