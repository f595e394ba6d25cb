//! Configuration management for the client.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default API base URL (can be overridden at compile time via TRIPLOG_API_BASE_URL).
pub const DEFAULT_API_BASE_URL: &str = match option_env!("TRIPLOG_API_BASE_URL") {
    Some(url) => url,
    None => "http://localhost:3000",
};

/// Default OAuth client identifier (can be overridden at compile time via TRIPLOG_OAUTH_CLIENT_ID).
const DEFAULT_OAUTH_CLIENT_ID: &str = match option_env!("TRIPLOG_OAUTH_CLIENT_ID") {
    Some(id) => id,
    None => "",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Main client configuration.
///
/// The API base URL and the OAuth client identifier are opaque strings as far
/// as the session core is concerned; they are resolved here and handed to the
/// auth client unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Base URL of the backend API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// OAuth client identifier used for provider token exchanges.
    #[serde(default = "default_oauth_client_id")]
    pub oauth_client_id: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_oauth_client_id() -> String {
    DEFAULT_OAUTH_CLIENT_ID.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            oauth_client_id: DEFAULT_OAUTH_CLIENT_ID.to_string(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfig with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from the config file, falling back to defaults.
    ///
    /// Environment variables take precedence over both the file and the
    /// compile-time defaults.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "Loading configuration file");
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the config file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("TRIPLOG_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Ok(api_base_url) = std::env::var("TRIPLOG_API_BASE_URL") {
            self.api_base_url = api_base_url;
        }
        if let Ok(oauth_client_id) = std::env::var("TRIPLOG_OAUTH_CLIENT_ID") {
            self.oauth_client_id = oauth_client_id;
        }
    }

    /// Get the API base URL as a parsed URL.
    pub fn api_base_url(&self) -> CoreResult<Url> {
        Url::parse(&self.api_base_url).map_err(CoreError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        let config_json = r#"{
            "log_level": "debug",
            "api_base_url": "https://api.example.com"
        }"#;

        std::fs::write(&config_path, config_json).unwrap();

        let config = AppConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.api_base_url, "https://api.example.com");
    }

    #[test]
    fn test_config_file_missing_fields_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        std::fs::write(&config_path, r#"{ "log_level": "warn" }"#).unwrap();

        let config = AppConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let mut config = AppConfig::default();
        config.log_level = "trace".to_string();
        config.api_base_url = "https://api.triplog.test".to_string();

        config.save(&paths).unwrap();

        let loaded = AppConfig::load(&paths).unwrap();
        assert_eq!(loaded.log_level, "trace");
        assert_eq!(loaded.api_base_url, "https://api.triplog.test");
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = AppConfig::load(&paths).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_config_env_override() {
        // Only this test touches the OAuth client id, so no cross-test races
        std::env::set_var("TRIPLOG_OAUTH_CLIENT_ID", "env-client-id");

        let config = AppConfig::new();
        assert_eq!(config.oauth_client_id, "env-client-id");

        std::env::remove_var("TRIPLOG_OAUTH_CLIENT_ID");
    }

    #[test]
    fn test_config_api_base_url_parse() {
        let config = AppConfig::default();
        let url = config.api_base_url().unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn test_config_invalid_url() {
        let mut config = AppConfig::default();
        config.api_base_url = "not a valid url".to_string();

        assert!(config.api_base_url().is_err());
    }
}
