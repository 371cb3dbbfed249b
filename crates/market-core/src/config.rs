//! Storefront configuration.
//!
//! Configuration comes either from `MARKET_*` environment variables or from a
//! TOML/JSON file. Only the main API base URL is required; the listing and
//! vehicle services fall back to it when unset.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::endpoints;

/// Environment variable holding the main API base URL.
pub const ENV_API_BASE_URL: &str = "MARKET_API_BASE_URL";
/// Environment variable holding the listing service base URL.
pub const ENV_LISTING_API_URL: &str = "MARKET_LISTING_API_URL";
/// Environment variable holding the vehicle-type service base URL.
pub const ENV_CARS_API_URL: &str = "MARKET_CARS_API_URL";
/// Environment variable holding the banner image base URL.
pub const ENV_IMAGE_BASE_URL: &str = "MARKET_IMAGE_BASE_URL";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "MARKET_API_KEY";
/// Environment variable holding the client id.
pub const ENV_CLIENT_ID: &str = "MARKET_CLIENT_ID";
/// Environment variable holding the log format (`json` or `human`).
pub const ENV_LOG_FORMAT: &str = "MARKET_LOG_FORMAT";
/// Environment variable holding the log filter directive.
pub const ENV_LOG_FILTER: &str = "MARKET_LOG";

const REQUIRED_VARS: &[&str] = &[ENV_API_BASE_URL];
const OPTIONAL_VARS: &[&str] = &[ENV_API_KEY, ENV_CLIENT_ID];

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required settings are missing.
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),
}

/// Storefront configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Base URL of the main REST API (banners, categories, products).
    #[serde(default)]
    pub api_base_url: String,

    /// Base URL of the listing service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_api_url: Option<String>,

    /// Base URL of the vehicle-type service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cars_api_url: Option<String>,

    /// Base URL that banner image paths are appended to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,

    /// API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Client id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Request timeout in milliseconds. Declared for parity with deployments
    /// that set it; the HTTP wrapper does not enforce it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Banner/category cache lifetime in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_cache_ttl_secs() -> u64 {
    30 * 60
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Output format: `json` or `human`.
    #[serde(default = "default_log_format")]
    pub format: String,

    /// `EnvFilter` directive, e.g. `info,market_query=debug`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            filter: default_log_filter(),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            listing_api_url: None,
            cars_api_url: None,
            image_base_url: None,
            api_key: None,
            client_id: None,
            timeout_ms: None,
            cache_ttl_secs: default_cache_ttl_secs(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Outcome of checking which settings are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentReport {
    /// True when no required setting is missing.
    pub is_valid: bool,
    /// Required settings that are missing.
    pub missing: Vec<String>,
    /// Optional settings that are missing.
    pub warnings: Vec<String>,
}

impl EnvironmentReport {
    /// Convert into an error if anything required is missing.
    pub fn into_result(self) -> Result<Self, ConfigError> {
        if self.is_valid {
            Ok(self)
        } else {
            Err(ConfigError::MissingVariables(self.missing))
        }
    }
}

impl StorefrontConfig {
    /// Create a config pointing at one API base URL.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Default::default()
        }
    }

    /// Set the listing service URL.
    pub fn with_listing_api_url(mut self, url: impl Into<String>) -> Self {
        self.listing_api_url = Some(url.into());
        self
    }

    /// Set the vehicle-type service URL.
    pub fn with_cars_api_url(mut self, url: impl Into<String>) -> Self {
        self.cars_api_url = Some(url.into());
        self
    }

    /// Set the banner image base URL.
    pub fn with_image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = Some(url.into());
        self
    }

    /// Load config from a file (JSON when the extension is `.json`, else TOML).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Read config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read config through a variable lookup function.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self {
            api_base_url: get(ENV_API_BASE_URL).unwrap_or_default(),
            listing_api_url: get(ENV_LISTING_API_URL),
            cars_api_url: get(ENV_CARS_API_URL),
            image_base_url: get(ENV_IMAGE_BASE_URL),
            api_key: get(ENV_API_KEY),
            client_id: get(ENV_CLIENT_ID),
            ..Default::default()
        };

        if let Some(format) = get(ENV_LOG_FORMAT) {
            config.logging.format = format;
        }
        if let Some(filter) = get(ENV_LOG_FILTER) {
            config.logging.filter = filter;
        }

        config
    }

    /// Report missing required and optional settings.
    pub fn validate(&self) -> EnvironmentReport {
        let present = |key: &str| match key {
            ENV_API_BASE_URL => !self.api_base_url.is_empty(),
            ENV_API_KEY => self.api_key.is_some(),
            ENV_CLIENT_ID => self.client_id.is_some(),
            _ => true,
        };

        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .filter(|k| !present(k))
            .map(|k| k.to_string())
            .collect();
        let warnings: Vec<String> = OPTIONAL_VARS
            .iter()
            .filter(|k| !present(k))
            .map(|k| k.to_string())
            .collect();

        if !warnings.is_empty() {
            tracing::debug!(unset = ?warnings, "optional settings not set");
        }

        EnvironmentReport {
            is_valid: missing.is_empty(),
            missing,
            warnings,
        }
    }

    /// Listing service base URL (falls back to the main API).
    pub fn listing_base(&self) -> &str {
        self.listing_api_url.as_deref().unwrap_or(&self.api_base_url)
    }

    /// Vehicle-type service base URL (falls back to the main API).
    pub fn cars_base(&self) -> &str {
        self.cars_api_url.as_deref().unwrap_or(&self.api_base_url)
    }

    /// Banner image base URL (falls back to the main API).
    pub fn image_base(&self) -> &str {
        self.image_base_url.as_deref().unwrap_or(&self.api_base_url)
    }

    /// Lifetime of banner/category cache entries.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// URL that uploads into `directory` are posted to.
    pub fn upload_url(&self, directory: &str) -> String {
        format!(
            "{}{}",
            self.api_base_url,
            endpoints::upload_to_directory(directory)
        )
    }

    /// URL of a static asset.
    pub fn static_url(&self, path: &str) -> String {
        format!("{}/static/{}", self.api_base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_reads_urls() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            (ENV_API_BASE_URL, "https://api.example.com"),
            (ENV_LISTING_API_URL, "https://listings.example.com"),
            (ENV_LOG_FORMAT, "json"),
        ]));

        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.listing_base(), "https://listings.example.com");
        assert_eq!(config.cars_base(), "https://api.example.com");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_validate_reports_missing_and_warnings() {
        let config = StorefrontConfig::from_lookup(lookup(&[(ENV_API_KEY, "k")]));
        let report = config.validate();

        assert!(!report.is_valid);
        assert_eq!(report.missing, vec![ENV_API_BASE_URL.to_string()]);
        assert_eq!(report.warnings, vec![ENV_CLIENT_ID.to_string()]);

        let err = report.into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: MARKET_API_BASE_URL"
        );
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            (ENV_API_BASE_URL, "https://api.example.com"),
            (ENV_API_KEY, "  "),
        ]));
        assert!(config.api_key.is_none());
        assert!(config.validate().is_valid);
    }

    #[test]
    fn test_load_toml_with_defaults() {
        let dir = std::env::temp_dir().join(format!("market-core-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("storefront.toml");
        std::fs::write(
            &path,
            r#"
api_base_url = "https://api.example.com"
cars_api_url = "https://cars.example.com"

[logging]
format = "json"
"#,
        )
        .unwrap();

        let config = StorefrontConfig::load(&path).unwrap();
        assert_eq!(config.cars_base(), "https://cars.example.com");
        assert_eq!(config.cache_ttl(), Duration::from_secs(1800));
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.filter, "info");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_json() {
        let dir = std::env::temp_dir().join(format!("market-core-json-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("storefront.json");
        std::fs::write(
            &path,
            r#"{"api_base_url": "https://api.example.com", "cache_ttl_secs": 60}"#,
        )
        .unwrap();

        let config = StorefrontConfig::load(&path).unwrap();
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = StorefrontConfig::load("/nonexistent/storefront.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_url_helpers() {
        let config = StorefrontConfig::new("https://api.example.com");
        assert_eq!(
            config.upload_url("banners"),
            "https://api.example.com/uploads?folderName=banners"
        );
        assert_eq!(
            config.static_url("logo.png"),
            "https://api.example.com/static/logo.png"
        );
    }
}
