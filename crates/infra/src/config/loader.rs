//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `DEALFLOW_API_BASE_URL` is not set, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! The session token is a secret and is always taken from
//! `DEALFLOW_API_TOKEN` when present, whichever source supplied the rest.
//!
//! ## Environment Variables
//! - `DEALFLOW_API_BASE_URL`: Base URL of the CRM API (required for env loading)
//! - `DEALFLOW_API_TOKEN`: Bearer token of the signed-in user
//! - `DEALFLOW_HTTP_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `DEALFLOW_HTTP_MAX_READ_ATTEMPTS`: Total attempts for GET requests
//! - `DEALFLOW_CACHE_STALE_SECS`: Age after which cached data is refetched
//! - `DEALFLOW_LOG_LEVEL`: Default tracing filter
//! - `DEALFLOW_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./dealflow.{json,toml}` or `./config.{json,toml}` (current working directory)
//! 2. The same names one and two directories up
//! 3. Relative to executable location

use std::path::{Path, PathBuf};

use dealflow_domain::{
    ApiConfig, AppConfig, CacheSettings, CrmError, LoggingConfig, Result, SessionConfig,
};

const CONFIG_FILE_NAMES: [&str; 4] = ["dealflow.json", "dealflow.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `CrmError::Config` if configuration cannot be loaded from either
/// source or a value is malformed.
pub fn load() -> Result<AppConfig> {
    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };
    Ok(with_env_token(config))
}

/// Like [`load`], but falls back to built-in defaults when no source exists.
///
/// # Errors
/// Returns `CrmError::Config` only when a source exists but is malformed.
pub fn load_or_default() -> Result<AppConfig> {
    if std::env::var_os("DEALFLOW_API_BASE_URL").is_some() || probe_config_paths().is_some() {
        return load();
    }
    tracing::info!("No configuration found; using defaults");
    Ok(with_env_token(AppConfig::default()))
}

/// Load configuration from environment variables
///
/// Only `DEALFLOW_API_BASE_URL` is required; other variables fall back to
/// their defaults when unset.
///
/// # Errors
/// Returns `CrmError::Config` if the base URL is missing or a numeric
/// variable cannot be parsed.
pub fn load_from_env() -> Result<AppConfig> {
    let base_url = env_var("DEALFLOW_API_BASE_URL")?;
    validate_base_url(&base_url)?;

    let defaults = AppConfig::default();
    let timeout_secs =
        env_parse("DEALFLOW_HTTP_TIMEOUT_SECS", "timeout")?.unwrap_or(defaults.api.timeout_secs);
    let max_read_attempts = env_parse("DEALFLOW_HTTP_MAX_READ_ATTEMPTS", "read attempts")?
        .unwrap_or(defaults.api.max_read_attempts);
    let stale_after_secs = env_parse("DEALFLOW_CACHE_STALE_SECS", "cache staleness")?;

    Ok(AppConfig {
        api: ApiConfig { base_url, timeout_secs, max_read_attempts },
        session: SessionConfig { token: env_token() },
        cache: CacheSettings { stale_after_secs },
        logging: LoggingConfig {
            level: std::env::var("DEALFLOW_LOG_LEVEL").unwrap_or(defaults.logging.level),
            json: env_bool("DEALFLOW_LOG_JSON", false),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `CrmError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format or a value is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CrmError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CrmError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CrmError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    validate_base_url(&config.api.base_url)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CrmError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CrmError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(CrmError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join("..")]);
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let parsed = url::Url::parse(base_url)
        .map_err(|e| CrmError::Config(format!("Invalid API base URL '{}': {}", base_url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CrmError::Config(format!(
            "API base URL must use http or https, got '{}'",
            parsed.scheme()
        )));
    }
    Ok(())
}

fn with_env_token(mut config: AppConfig) -> AppConfig {
    if let Some(token) = env_token() {
        config.session.token = Some(token);
    }
    config
}

fn env_token() -> Option<String> {
    std::env::var("DEALFLOW_API_TOKEN").ok().filter(|token| !token.trim().is_empty())
}

/// Get required environment variable
///
/// # Errors
/// Returns `CrmError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| CrmError::Config(format!("Missing required environment variable: {}", key)))
}

/// Parse an optional numeric environment variable.
fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| CrmError::Config(format!("Invalid {}: {}", what, e))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
