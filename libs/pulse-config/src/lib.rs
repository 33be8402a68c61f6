//! Market pulse configuration
//!
//! YAML file with every field defaulted, plus environment overrides.

use pulse_feeds::{default_relays, FeedSettings, RelayEndpoint};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "config/pulse.yaml";
pub const CONFIG_PATH_ENV: &str = "PULSE_CONFIG_PATH";
pub const LOG_LEVEL_ENV: &str = "PULSE_LOG_LEVEL";

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseConfig {
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// Per-request timeout for every upstream call
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// CORS relays in failover order
    #[serde(default = "default_relays")]
    pub relays: Vec<RelayEndpoint>,
    /// JSON-RPC endpoints queried directly for the gas price, in order
    #[serde(default = "default_gas_rpc_endpoints")]
    pub gas_rpc_endpoints: Vec<String>,
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,
}

fn default_refresh_interval() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_gas_rpc_endpoints() -> Vec<String> {
    vec![pulse_feeds::endpoints::CLOUDFLARE_ETH_RPC.to_string()]
}

fn default_heartbeat_interval() -> u64 {
    300
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
            request_timeout_secs: default_request_timeout(),
            log_level: default_log_level(),
            relays: default_relays(),
            gas_rpc_endpoints: default_gas_rpc_endpoints(),
            heartbeat_interval_secs: default_heartbeat_interval(),
        }
    }
}

impl PulseConfig {
    /// Load configuration from YAML file
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        let config = Self::from_yaml(&yaml_content)?;
        Ok(config)
    }

    /// Like [`PulseConfig::load`], but a missing file means defaults
    pub fn load_or_default(config_path: impl AsRef<Path>) -> Result<Self> {
        let path = config_path.as_ref();
        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            let mut config = Self::default();
            config.apply_log_level_override(std::env::var(LOG_LEVEL_ENV).ok());
            config.validate()?;
            return Ok(config);
        }
        Self::load(path)
    }

    /// Parse, apply environment overrides and validate
    pub fn from_yaml(yaml_content: &str) -> Result<Self> {
        // An empty document is valid and means "all defaults"
        let mut config: PulseConfig = if yaml_content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml_content)?
        };

        config.apply_log_level_override(std::env::var(LOG_LEVEL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    fn apply_log_level_override(&mut self, level: Option<String>) {
        if let Some(level) = level.filter(|l| !l.trim().is_empty()) {
            info!("Overriding log level from {}", LOG_LEVEL_ENV);
            self.log_level = level.trim().to_string();
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "refresh_interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.heartbeat_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "heartbeat_interval_secs must be greater than 0".to_string(),
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        if self.relays.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one relay is required".to_string(),
            ));
        }
        for relay in &self.relays {
            if relay.name.trim().is_empty() || relay.endpoint.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "relay name and endpoint cannot be empty".to_string(),
                ));
            }
        }

        if self.gas_rpc_endpoints.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one gas_rpc_endpoint is required".to_string(),
            ));
        }
        if self.gas_rpc_endpoints.iter().any(|e| e.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "gas_rpc_endpoints cannot contain empty entries".to_string(),
            ));
        }

        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn feed_settings(&self) -> FeedSettings {
        FeedSettings {
            relays: self.relays.clone(),
            gas_rpc_endpoints: self.gas_rpc_endpoints.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  Refresh interval: {} seconds", self.refresh_interval_secs);
        info!("  Request timeout: {} seconds", self.request_timeout_secs);
        info!("  Heartbeat interval: {} seconds", self.heartbeat_interval_secs);
        info!("  Log level: {}", self.log_level);
        let relays: Vec<&str> = self.relays.iter().map(|r| r.name.as_str()).collect();
        info!("  Relays: {}", relays.join(" -> "));
        info!("  Gas RPC endpoints: {}", self.gas_rpc_endpoints.join(", "));
    }
}
