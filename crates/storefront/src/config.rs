//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CHOCO_CATALOG_URL` - HTTP(S) URL of the catalog JSON (takes precedence)
//! - `CHOCO_CATALOG_PATH` - Local catalog file (default: `./data/productos.json`)
//! - `CHOCO_STORE_PATH` - Local storage file (default: `./.choco/storage.json`)
//! - `CHOCO_LOG_JSON` - `1`/`true` for JSON log lines
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::catalog::CatalogSource;

const DEFAULT_CATALOG_PATH: &str = "./data/productos.json";
const DEFAULT_STORE_PATH: &str = "./.choco/storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Where the product catalog is loaded from
    pub catalog: CatalogSource,
    /// Local key-value storage file (cart, session)
    pub store_path: PathBuf,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let catalog = match non_empty(lookup("CHOCO_CATALOG_URL")) {
            Some(raw) => CatalogSource::Http(parse_http_url("CHOCO_CATALOG_URL", &raw)?),
            None => CatalogSource::File(PathBuf::from(
                non_empty(lookup("CHOCO_CATALOG_PATH"))
                    .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string()),
            )),
        };

        let store_path = PathBuf::from(
            non_empty(lookup("CHOCO_STORE_PATH")).unwrap_or_else(|| DEFAULT_STORE_PATH.to_string()),
        );

        let log_json = match non_empty(lookup("CHOCO_LOG_JSON")) {
            Some(raw) => parse_bool("CHOCO_LOG_JSON", &raw)?,
            None => false,
        };

        Ok(Self {
            catalog,
            store_path,
            log_json,
            sentry_dsn: non_empty(lookup("SENTRY_DSN")),
            sentry_environment: non_empty(lookup("SENTRY_ENVIRONMENT")),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Treat unset and blank variables the same.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a catalog URL, accepting only `http` and `https`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` naming `var_name` on failure.
pub fn parse_http_url(var_name: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{other}' (expected http or https)"),
        )),
    }
}

fn parse_bool(var_name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
