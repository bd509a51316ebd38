//! Application configuration management
//!
//! Handles config loading and environment variable processing following the
//! precedence: defaults -> .env -> env vars -> CLI args.

use crate::auth::{EnvCredentials, store::default_config_dir};
use crate::primitives::*;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default configuration values
pub mod defaults {
    pub const LOG_LEVEL: &str = "0"; // Error-only logging by default
    pub const LOG_FORMAT: &str = "text";
    pub const NET_TIMEOUT: &str = "30";
    pub const LOG_OUTPUT: &str = "stderr";
    pub const COLOR: &str = "auto";
}

/// Default value functions for configuration fields
mod default_fns {
    use super::*;

    pub fn log_level() -> u8 {
        defaults::LOG_LEVEL.parse().unwrap_or(0)
    }

    pub fn log_format() -> LogFormat {
        defaults::LOG_FORMAT.parse().unwrap_or(LogFormat::Text)
    }

    pub fn net_timeout() -> u64 {
        defaults::NET_TIMEOUT.parse().unwrap_or(30)
    }

    pub fn log_output() -> LogOutput {
        defaults::LOG_OUTPUT.parse().unwrap_or(LogOutput::Stderr)
    }

    pub fn color() -> ColorChoice {
        defaults::COLOR.parse().unwrap_or(ColorChoice::Auto)
    }
}

/// Application configuration structure
#[derive(Debug, Clone, Parser, Deserialize)]
pub struct AppConfig {
    /// DailyBot API base URL (overrides DAILYBOT_API_URL and the stored URL)
    #[arg(long, global = true)]
    #[serde(default)]
    pub api_url: Option<String>,

    /// Directory holding credentials.json and config.json
    #[arg(long, global = true, env = "DAILYBOT_CONFIG_DIR")]
    #[serde(default)]
    pub config_dir: Option<PathBuf>,

    /// API timeout in seconds
    #[arg(long, global = true, env = "DAILYBOT_NET_TIMEOUT", default_value = defaults::NET_TIMEOUT)]
    #[serde(default = "default_fns::net_timeout")]
    pub net_timeout: u64,

    /// Verbosity level (0=error, 1=warn, 2=info, 3=debug, 4=trace)
    #[arg(long, global = true, env = "DAILYBOT_LOG_LEVEL", default_value = defaults::LOG_LEVEL)]
    #[serde(default = "default_fns::log_level")]
    pub log_level: u8,

    /// Log format (text, json, yaml)
    #[arg(long, global = true, env = "DAILYBOT_LOG_FORMAT", default_value = defaults::LOG_FORMAT)]
    #[serde(default = "default_fns::log_format")]
    pub log_format: LogFormat,

    /// Log output stream (stderr, stdout)
    #[arg(long, global = true, env = "DAILYBOT_LOG_OUTPUT", default_value = defaults::LOG_OUTPUT)]
    #[serde(default = "default_fns::log_output")]
    pub log_output: LogOutput,

    /// Color output control (auto, always, never)
    #[arg(long, global = true, env = "DAILYBOT_COLOR", default_value = defaults::COLOR)]
    #[serde(default = "default_fns::color")]
    pub color: ColorChoice,

    /// Credential overrides read from DAILYBOT_API_URL / DAILYBOT_CLI_TOKEN / DAILYBOT_API_KEY
    #[arg(skip)]
    #[serde(skip)]
    pub env_credentials: EnvCredentials,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            config_dir: None,
            net_timeout: default_fns::net_timeout(),
            log_level: default_fns::log_level(),
            log_format: default_fns::log_format(),
            log_output: default_fns::log_output(),
            color: default_fns::color(),
            env_credentials: EnvCredentials::default(),
        }
    }
}

impl AppConfig {
    /// Create LoggerConfig from AppConfig
    pub fn to_logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            level: LogLevel::from_verbosity(self.log_level),
            format: self.log_format,
            output: self.log_output,
            ansi: !matches!(self.color, ColorChoice::Never),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.net_timeout)
    }

    /// Merge this config with another, taking non-default values from other
    pub fn merge_with(mut self, other: Self) -> Self {
        if other.api_url.is_some() {
            self.api_url = other.api_url;
        }
        if other.config_dir.is_some() {
            self.config_dir = other.config_dir;
        }

        if other.log_level != default_fns::log_level() {
            self.log_level = other.log_level;
        }
        if other.net_timeout != default_fns::net_timeout() {
            self.net_timeout = other.net_timeout;
        }

        if !matches!(other.log_format, LogFormat::Text) {
            self.log_format = other.log_format;
        }
        if !matches!(other.log_output, LogOutput::Stderr) {
            self.log_output = other.log_output;
        }
        if !matches!(other.color, ColorChoice::Auto) {
            self.color = other.color;
        }

        self
    }

    /// Validate the final configuration
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.net_timeout == 0 {
            return Err(ConfigError::ParseError {
                value: self.net_timeout.to_string(),
                reason: "network timeout must be at least one second".to_string(),
            });
        }

        if self.config_dir.is_none() {
            self.config_dir = Some(default_config_dir()?);
        }

        Ok(())
    }

    /// Resolved config directory; falls back to the default location
    pub fn config_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.config_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_config_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    include!("config.test.rs");
}
