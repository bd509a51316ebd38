//! Environment variable handling for application configuration
//!
//! Reads the DailyBot credential overrides and the standard color and CI
//! conventions as one typed struct.

use crate::auth::EnvCredentials;
use crate::primitives::{ColorChoice, ConfigError};
use serde::Deserialize;

/// Environment variables that affect application behavior
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentConfig {
    /// DAILYBOT_API_URL: base URL override
    pub dailybot_api_url: Option<String>,
    /// DAILYBOT_CLI_TOKEN: session token override
    pub dailybot_cli_token: Option<String>,
    /// DAILYBOT_API_KEY: agent API key override
    pub dailybot_api_key: Option<String>,
    /// NO_COLOR environment variable (any value = disable color)
    pub no_color: Option<String>,
    /// FORCE_COLOR environment variable (0/false = disable, 1/2/3/true = enable)
    pub force_color: Option<String>,
    /// CLICOLOR environment variable (0 = disable color)
    pub clicolor: Option<String>,
    /// CI environment variable (any value = CI mode)
    pub ci: Option<String>,
}

impl EnvironmentConfig {
    /// Load environment configuration from current environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Load from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars).map_err(|e| ConfigError::EnvironmentParsingFailed { source: e })
    }

    /// Credential overrides for the resolver
    pub fn credentials(&self) -> EnvCredentials {
        EnvCredentials {
            dailybot_api_url: self.dailybot_api_url.clone(),
            dailybot_cli_token: self.dailybot_cli_token.clone(),
            dailybot_api_key: self.dailybot_api_key.clone(),
        }
    }

    /// Apply environment variables to color configuration
    ///
    /// Precedence: CI > CLICOLOR < NO_COLOR < FORCE_COLOR
    pub fn apply_color_config(&self, mut color: ColorChoice) -> ColorChoice {
        if self.ci.is_some() {
            return ColorChoice::Never;
        }

        if self.clicolor.as_deref() == Some("0") {
            color = ColorChoice::Never;
        }

        if self.no_color.as_deref().is_some_and(|v| !v.is_empty()) {
            color = ColorChoice::Never;
        }

        if let Some(force_color) = &self.force_color {
            match force_color.as_str() {
                "0" | "false" => color = ColorChoice::Never,
                "1" | "2" | "3" | "true" => color = ColorChoice::Always,
                _ => {} // Invalid values ignored
            }
        }

        color
    }
}

#[cfg(test)]
mod tests {
    include!("env.test.rs");
}
