use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::types::FileType;

/// Environment prefix for configuration overrides
pub const ENV_PREFIX: &str = "DECKDROP";

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub ingestion: IngestionConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_env(ENV_PREFIX)
    }

    /// Load configuration from environment with custom prefix
    pub fn load_from_env(prefix: &str) -> Result<Self, ConfigError> {
        let builder = with_defaults(Config::builder())?.add_source(
            Environment::with_prefix(prefix)
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Load configuration from file with environment overrides
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let builder = with_defaults(Config::builder())?
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("api.base_url", default_base_url())?
        .set_default("api.timeout_seconds", default_timeout_seconds() as i64)?
        .set_default("ingestion.file_type", FileType::default().as_str())?
        .set_default("logging.level", default_log_level())?
        .set_default("logging.json", false)
}

/// Remote persistence endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Root URL the save endpoint is resolved against
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: default_timeout_seconds(),
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(default_base_url())
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Ingestion surface configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct IngestionConfig {
    /// Slot tag stored alongside every document ingested by this surface
    #[serde(default)]
    pub file_type: FileType,
}

impl IngestionConfig {
    pub fn new(file_type: FileType) -> Self {
        Self { file_type }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults() {
        let config = AppConfig::load_from_env("DECKDROP_CONFIG_TEST_UNSET").unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.ingestion.file_type, FileType::Original);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deckdrop.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://decks.example.com"
timeout_seconds = 5

[ingestion]
file_type = "modified"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from_file(path.to_str().unwrap()).unwrap();

        assert_eq!(config.api.base_url, "https://decks.example.com");
        assert_eq!(config.api.timeout(), Duration::from_secs(5));
        assert_eq!(config.ingestion.file_type, FileType::Modified);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_missing_file() {
        assert!(AppConfig::load_from_file("/no/such/deckdrop.toml").is_err());
    }

    #[test]
    fn test_api_config_builder() {
        let config = ApiConfig::new("http://127.0.0.1:9000").with_timeout(3);

        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::default().with_level("debug").with_json(true);

        assert_eq!(config.level, "debug");
        assert!(config.json);
    }
}
