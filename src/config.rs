//! Configuration management for `gridcast`
//!
//! Handles loading configuration from a TOML file and environment variables,
//! and validates every setting before use.

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;
use crate::models::Granularity;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GridcastConfig {
    /// Upstream API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Forecast shaping settings
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the weather.gov API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// User-Agent sent with every request; weather.gov rejects anonymous clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Forecast shaping settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Registered backend to use
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Number of days to return
    #[serde(default = "default_num_days")]
    pub num_days: usize,
    /// Output period length
    #[serde(default)]
    pub granularity: Granularity,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_base_url() -> String {
    "https://api.weather.gov".to_string()
}

fn default_user_agent() -> String {
    format!("gridcast/{}", crate::VERSION)
}

fn default_timeout() -> u32 {
    30
}

fn default_backend() -> String {
    "weather.gov".to_string()
}

fn default_num_days() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            num_days: default_num_days(),
            granularity: Granularity::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl GridcastConfig {
    /// Load configuration from the default file and environment variables
    pub fn load() -> crate::Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> crate::Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.or_else(Self::get_config_path);

        if let Some(config_file) = config_file.filter(|path| path.exists()) {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides such as GRIDCAST_API__TIMEOUT_SECONDS=10
        builder = builder.add_source(
            Environment::with_prefix("GRIDCAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| ForecastError::config(format!("Failed to build configuration: {e}")))?;

        let config: GridcastConfig = settings.try_deserialize().map_err(|e| {
            ForecastError::config(format!("Failed to deserialize configuration: {e}"))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gridcast").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> crate::Result<()> {
        if self.api.timeout_seconds == 0 || self.api.timeout_seconds > 300 {
            return Err(ForecastError::config(
                "API timeout must be between 1 and 300 seconds",
            ));
        }

        if !(1..=14).contains(&self.forecast.num_days) {
            return Err(ForecastError::config(
                "Number of forecast days must be between 1 and 14",
            ));
        }

        Ok(())
    }

    fn validate_string_values(&self) -> crate::Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ForecastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ForecastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(ForecastError::config(
                "API base URL must be a valid HTTP or HTTPS URL",
            ));
        }

        if self.api.user_agent.trim().is_empty() {
            return Err(ForecastError::config("User agent cannot be empty"));
        }

        if self.forecast.backend.trim().is_empty() {
            return Err(ForecastError::config("Backend name cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GridcastConfig::default();
        assert_eq!(config.api.base_url, "https://api.weather.gov");
        assert_eq!(config.api.timeout_seconds, 30);
        assert!(config.api.user_agent.starts_with("gridcast/"));
        assert_eq!(config.forecast.backend, "weather.gov");
        assert_eq!(config.forecast.num_days, 3);
        assert_eq!(config.forecast.granularity, Granularity::Hour);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = GridcastConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = GridcastConfig::default();
        config.api.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout"));

        let mut config = GridcastConfig::default();
        config.forecast.num_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = GridcastConfig::default();
        config.api.base_url = "ftp://api.weather.gov".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!("gridcast-test-{}.toml", std::process::id()));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(
                file,
                "[forecast]\nnum_days = 5\ngranularity = \"day\"\n\n[api]\ntimeout_seconds = 12"
            )
            .unwrap();
        }

        let config = GridcastConfig::load_from_path(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.forecast.num_days, 5);
        assert_eq!(config.forecast.granularity, Granularity::Day);
        assert_eq!(config.api.timeout_seconds, 12);
        assert_eq!(config.api.base_url, "https://api.weather.gov");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = GridcastConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("gridcast"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
