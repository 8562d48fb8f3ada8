//! Configuration management for expenseweb
//!
//! This module handles loading, validation, and management of
//! expenseweb configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::{ConfigError, ConfigErrorCode, ConfigResult};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Data seeding configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataConfig {
    /// Optional JSON file with users and expenses loaded at startup
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

/// Analytics defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Default period for the category breakdown ("week", "month", "year")
    #[serde(default = "default_period")]
    pub default_period: String,
    /// Default number of months for the trend query
    #[serde(default = "default_trend_months")]
    pub default_trend_months: u32,
    /// Number of entries in the dashboard recent-expenses list
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_period: default_period(),
            default_trend_months: default_trend_months(),
            recent_limit: default_recent_limit(),
        }
    }
}

fn default_period() -> String {
    "month".to_string()
}

fn default_trend_months() -> u32 {
    6
}

fn default_recent_limit() -> usize {
    5
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Records per page for expense lists
    #[serde(default = "default_records_per_page")]
    pub records_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            records_per_page: default_records_per_page(),
        }
    }
}

fn default_records_per_page() -> usize {
    10
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Data seeding settings
    #[serde(default)]
    pub data: DataConfig,
    /// Analytics defaults
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.to_string_lossy().to_string(),
                }
            } else {
                ConfigError::IoError
            }
        })?;

        let config: Config =
            serde_yaml::from_str(&content).map_err(|_| ConfigError::InvalidYaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults when absent
    pub fn load_or_default(path: PathBuf) -> ConfigResult<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(ConfigError::FileNotFound { .. }) => Ok(Config::default()),
            Err(e) => Err(e),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.pagination.records_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.records_per_page".to_string(),
                reason: "Records per page must be greater than 0".to_string(),
            });
        }

        if self.analytics.default_trend_months == 0 {
            return Err(ConfigError::InvalidValue {
                field: "analytics.default_trend_months".to_string(),
                reason: "Trend months must be greater than 0".to_string(),
            });
        }

        if self.analytics.recent_limit == 0 || self.analytics.recent_limit > 100 {
            return Err(ConfigError::InvalidValue {
                field: "analytics.recent_limit".to_string(),
                reason: "Recent limit must be between 1 and 100".to_string(),
            });
        }

        Ok(())
    }
}

// ==================== Tests ====================
