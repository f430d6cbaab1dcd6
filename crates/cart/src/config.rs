//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ROCKETSHOES_API_URL` - Base URL of the store API (default: `http://localhost:3333`)
//! - `ROCKETSHOES_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
//! - `ROCKETSHOES_CATALOG_CACHE_TTL_SECS` - Product metadata cache TTL (default: 300)
//! - `ROCKETSHOES_STORAGE_DIR` - Directory holding the cart snapshot (default: `.rocketshoes`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_TIMEOUT_SECS: &str = "10";
const DEFAULT_CACHE_TTL_SECS: &str = "300";
const DEFAULT_STORAGE_DIR: &str = ".rocketshoes";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Store API configuration
    pub api: ApiConfig,
    /// Directory holding the persisted cart snapshot
    pub storage_dir: PathBuf,
}

/// Store API (stock and catalog) configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, always ending in `/` so relative paths join beneath it
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long product metadata stays cached
    pub catalog_cache_ttl: Duration,
}

impl ApiConfig {
    /// Build an API configuration for `base_url` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("ROCKETSHOES_API_URL", base_url)?,
            timeout: Duration::from_secs(10),
            catalog_cache_ttl: Duration::from_secs(300),
        })
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = ApiConfig::from_env()?;
        let storage_dir = PathBuf::from(get_env_or_default(
            "ROCKETSHOES_STORAGE_DIR",
            DEFAULT_STORAGE_DIR,
        ));

        Ok(Self { api, storage_dir })
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(
            "ROCKETSHOES_API_URL",
            &get_env_or_default("ROCKETSHOES_API_URL", DEFAULT_API_URL),
        )?;
        let timeout = parse_secs(
            "ROCKETSHOES_HTTP_TIMEOUT_SECS",
            &get_env_or_default("ROCKETSHOES_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
        )?;
        let catalog_cache_ttl = parse_secs(
            "ROCKETSHOES_CATALOG_CACHE_TTL_SECS",
            &get_env_or_default("ROCKETSHOES_CATALOG_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS),
        )?;

        Ok(Self {
            base_url,
            timeout,
            catalog_cache_ttl,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an http(s) base URL and make sure it ends in a slash.
fn parse_base_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Parse a whole number of seconds.
fn parse_secs(var_name: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))
}
