//! CLI utilities for binaries
//!
//! Handles configuration path lookup and command line flags.

use std::path::PathBuf;

/// Type of configuration to load
#[derive(Debug, Clone)]
pub enum ConfigType {
    /// Market pulse configuration (pulse.yaml)
    Pulse,
    /// Explicit path, never overridden by the environment
    Custom(String),
}

impl ConfigType {
    /// Get the default path for this config type
    pub fn default_path(&self) -> &str {
        match self {
            ConfigType::Pulse => pulse_config::DEFAULT_CONFIG_PATH,
            ConfigType::Custom(path) => path,
        }
    }

    /// Environment variable that overrides the default path, if any
    pub fn env_var_name(&self) -> Option<&str> {
        match self {
            ConfigType::Pulse => Some(pulse_config::CONFIG_PATH_ENV),
            ConfigType::Custom(_) => None,
        }
    }
}

/// Load configuration path from environment or use default
///
/// # Examples
/// ```
/// use market_pulse::bin_common::{load_config_from_env, ConfigType};
///
/// let path = load_config_from_env(ConfigType::Custom("pulse.yaml".to_string()));
/// assert_eq!(path.to_str(), Some("pulse.yaml"));
/// ```
pub fn load_config_from_env(config_type: ConfigType) -> PathBuf {
    config_type
        .env_var_name()
        .and_then(|name| std::env::var(name).ok())
        .filter(|path| !path.trim().is_empty())
        .unwrap_or_else(|| config_type.default_path().to_string())
        .into()
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

/// Flags understood by the market pulse runner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// Run a single cycle, print it as JSON and exit
    pub once: bool,
    /// Config path given with `--config <path>`
    pub config_path: Option<String>,
}

impl CliOptions {
    pub fn from_args(args: &[String]) -> Self {
        let mut options = Self::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--once" => options.once = true,
                "--config" => options.config_path = iter.next().cloned(),
                other => {
                    if let Some(path) = other.strip_prefix("--config=") {
                        options.config_path = Some(path.to_string());
                    }
                }
            }
        }

        options
    }

    /// Config location: `--config` wins over the environment
    pub fn config_type(&self) -> ConfigType {
        match &self.config_path {
            Some(path) => ConfigType::Custom(path.clone()),
            None => ConfigType::Pulse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_type_paths() {
        assert_eq!(ConfigType::Pulse.default_path(), "config/pulse.yaml");

        let custom = ConfigType::Custom("custom/path.yaml".to_string());
        assert_eq!(custom.default_path(), "custom/path.yaml");
    }

    #[test]
    fn test_config_type_env_vars() {
        assert_eq!(ConfigType::Pulse.env_var_name(), Some("PULSE_CONFIG_PATH"));
        assert_eq!(ConfigType::Custom("x.yaml".to_string()).env_var_name(), None);
    }

    #[test]
    fn test_cli_options() {
        assert_eq!(CliOptions::from_args(&[]), CliOptions::default());

        let options = CliOptions::from_args(&args(&["--once", "--config", "alt.yaml"]));
        assert!(options.once);
        assert_eq!(options.config_path.as_deref(), Some("alt.yaml"));

        let options = CliOptions::from_args(&args(&["--config=other.yaml", "--verbose"]));
        assert!(!options.once);
        assert_eq!(options.config_type().default_path(), "other.yaml");
    }

    #[test]
    fn test_dangling_config_flag() {
        let options = CliOptions::from_args(&args(&["--config"]));
        assert_eq!(options.config_path, None);
        assert_eq!(options.config_type().default_path(), "config/pulse.yaml");
    }
}
