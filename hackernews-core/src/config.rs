//! Configuration types for the Hacker News server
//!
//! Configuration is built once at process start and handed to the client,
//! the batch fetcher and the MCP server. Nothing here is global.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{HackerNewsError, Result};

/// Public Hacker News API endpoint
pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

/// Default number of simultaneous in-flight item fetches
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Prefix of environment overrides, nested keys joined with `__`
pub const ENV_PREFIX: &str = "HACKERNEWS_";

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HackerNewsConfig {
    /// HTTP client configuration
    #[serde(default)]
    pub client: ClientConfig,

    /// Batch fetcher configuration
    #[serde(default)]
    pub batch: BatchConfig,

    /// MCP server identity
    #[serde(default)]
    pub server: ServerConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL, without trailing slash
    pub base_url: String,

    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Optional User-Agent header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }
}

/// Batch fetcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum simultaneous in-flight item fetches
    pub max_concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// MCP server identity reported during `initialize`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server name
    pub name: String,

    /// Server version
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "hacker-news".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl HackerNewsConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Loads in this order:
    /// 1. Default configuration
    /// 2. `hackernews.toml` in the working directory
    /// 3. File named by `HACKERNEWS_CONFIG_PATH`
    /// 4. `HACKERNEWS_` environment overrides, nested with `__`
    ///    (e.g. `HACKERNEWS_CLIENT__BASE_URL`)
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source is invalid or the merged
    /// configuration fails validation.
    pub fn load() -> Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Toml},
        };

        let mut figment = Figment::from(Serialized::defaults(HackerNewsConfig::default()))
            .merge(Toml::file("hackernews.toml"));

        if let Ok(path) = std::env::var("HACKERNEWS_CONFIG_PATH") {
            figment = figment.merge(Toml::file(path));
        }

        let config: HackerNewsConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| {
                HackerNewsError::Configuration(format!("Failed to load configuration: {}", e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path on top of the defaults.
    ///
    /// `HACKERNEWS_` environment overrides still apply on top of the file,
    /// exactly as in [`HackerNewsConfig::load`]; only the implicit
    /// `hackernews.toml` and `HACKERNEWS_CONFIG_PATH` lookups are replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, cannot be parsed or fails
    /// validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with_env(path, ENV_PREFIX)
    }

    fn from_file_with_env(path: impl AsRef<Path>, env_prefix: &str) -> Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Toml},
        };

        let path = path.as_ref();
        if !path.exists() {
            return Err(HackerNewsError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let config: HackerNewsConfig = Figment::from(Serialized::defaults(HackerNewsConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(env_prefix).split("__"))
            .extract()
            .map_err(|e| {
                HackerNewsError::Configuration(format!(
                    "Failed to load configuration file: {}",
                    e
                ))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-http base URL, a zero timeout or a zero
    /// concurrency limit.
    pub fn validate(&self) -> Result<()> {
        let base_url = self.client.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(HackerNewsError::Configuration(format!(
                "client.base_url must be an http(s) URL, got '{}'",
                self.client.base_url
            )));
        }

        if self.client.timeout.is_zero() {
            return Err(HackerNewsError::Configuration(
                "client.timeout must be greater than zero".to_string(),
            ));
        }

        if self.batch.max_concurrency == 0 {
            return Err(HackerNewsError::Configuration(
                "batch.max_concurrency must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = HackerNewsConfig::default();
        assert_eq!(config.client.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.client.timeout, Duration::from_secs(10));
        assert_eq!(config.batch.max_concurrency, 10);
        assert_eq!(config.server.name, "hacker-news");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[client]
base_url = "http://127.0.0.1:9000/v0"
timeout = "2s"

[batch]
max_concurrency = 4
"#
        )
        .unwrap();

        let config = HackerNewsConfig::from_file(file.path()).unwrap();
        assert_eq!(config.client.base_url, "http://127.0.0.1:9000/v0");
        assert_eq!(config.client.timeout, Duration::from_secs(2));
        assert_eq!(config.batch.max_concurrency, 4);
        // Untouched section keeps its default
        assert_eq!(config.server.name, "hacker-news");
    }

    #[test]
    fn test_from_file_rejects_zero_concurrency() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[batch]\nmax_concurrency = 0").unwrap();

        let err = HackerNewsConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("max_concurrency"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = HackerNewsConfig::from_file("/nonexistent/hackernews.toml").unwrap_err();
        assert!(matches!(err, HackerNewsError::Configuration(_)));
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = HackerNewsConfig::default();
        config.client.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.client.base_url = DEFAULT_BASE_URL.to_string();
        config.client.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_keeps_env_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[client]\nuser_agent = \"from-file\"\n\n[batch]\nmax_concurrency = 4"
        )
        .unwrap();

        // Private prefix so parallel tests never see this variable
        let prefix = "HNCFG_FROM_FILE_TEST_";
        unsafe { std::env::set_var("HNCFG_FROM_FILE_TEST_CLIENT__USER_AGENT", "from-env") };

        let config = HackerNewsConfig::from_file_with_env(file.path(), prefix).unwrap();
        assert_eq!(config.client.user_agent.as_deref(), Some("from-env"));
        assert_eq!(config.batch.max_concurrency, 4);

        unsafe { std::env::remove_var("HNCFG_FROM_FILE_TEST_CLIENT__USER_AGENT") };
    }
}
