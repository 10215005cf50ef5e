use crate::analysis::DataFiles;
use crate::enrichment::EnrichmentConfig;
use crate::error::Result;
use crate::ingest::{INCIDENT_FILE, SHIPPING_FILE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Input data location
    #[serde(default)]
    #[validate(nested)]
    pub data: DataConfig,

    /// Scenario enrichment service
    #[serde(default)]
    #[validate(nested)]
    pub enrichment: EnrichmentConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        let config: Config = config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: IDSS_)
            .add_source(
                config::Environment::with_prefix("IDSS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    /// Input file locations for the analysis service
    pub fn data_files(&self) -> DataFiles {
        DataFiles {
            data_dir: self.data.data_dir.clone(),
            incident_file: self.data.incident_file.clone(),
            shipping_file: self.data.shipping_file.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DataConfig {
    /// Directory holding the two GeoJSON collections
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_incident_file")]
    #[validate(length(min = 1))]
    pub incident_file: String,

    #[serde(default = "default_shipping_file")]
    #[validate(length(min = 1))]
    pub shipping_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            incident_file: default_incident_file(),
            shipping_file: default_shipping_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Service name
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            service_name: default_service_name(),
            prometheus_enabled: true,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    3000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_incident_file() -> String {
    INCIDENT_FILE.to_string()
}

fn default_shipping_file() -> String {
    SHIPPING_FILE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "idss-backend".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.http_port, 3000);
        assert_eq!(config.data.data_dir, PathBuf::from("./data"));
        assert_eq!(config.enrichment.timeout_secs, 30);
        assert!(config.observability.prometheus_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_embedded_defaults_parse() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.enrichment.model, "gpt-4");
        assert_eq!(config.enrichment.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.data.incident_file, "incident_data.geojson");
    }

    #[test]
    fn test_empty_file_name_is_invalid() {
        let mut config = Config::default();
        config.data.shipping_file = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_enrichment_timeout_is_invalid() {
        let mut config = Config::default();
        config.enrichment.timeout_secs = 0;

        let errors = config.validate().unwrap_err();
        assert!(errors.errors().contains_key("enrichment"));

        let err: crate::AppError = errors.into();
        assert!(matches!(err, crate::AppError::Validation(_)));
    }

    #[test]
    fn test_data_files() {
        let files = Config::default().data_files();
        assert_eq!(files.shipping_file, "shipping_data.geojson");
    }
}
