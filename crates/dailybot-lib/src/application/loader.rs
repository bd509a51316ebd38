//! Configuration loading
//!
//! Coordinates loading configuration from the .env files, the process
//! environment and the command line.

use crate::primitives::ConfigError;

use super::{cli::CliConfig, config::AppConfig, env::EnvironmentConfig};

const ENV_FILES: [&str; 2] = [".env.local", ".env"];

/// Load `.env.local` and `.env` into the process environment
///
/// Missing files are fine; unreadable or malformed ones are an error.
pub fn load_env_files() -> Result<(), ConfigError> {
    for env_file in ENV_FILES {
        if let Err(e) = dotenvy::from_filename(env_file) {
            if !e.not_found() {
                return Err(ConfigError::EnvFileError {
                    file: env_file.to_string(),
                    source: e,
                });
            }
        }
    }
    Ok(())
}

impl AppConfig {
    /// Load config: defaults -> .env -> env vars -> CLI
    pub fn load() -> Result<Self, ConfigError> {
        Ok(CliConfig::load()?.app_config)
    }

    /// Combine parsed CLI arguments with the environment
    pub fn from_sources(cli: AppConfig, env: &EnvironmentConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        config.color = env.apply_color_config(config.color);
        config.env_credentials = env.credentials();

        // CLI arguments have the highest precedence
        config = config.merge_with(cli);
        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    include!("loader.test.rs");
}
