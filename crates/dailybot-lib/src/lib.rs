//! # dailybot Library
//!
//! Command-line client for DailyBot check-ins and agent reporting.
//!
//! ## Core Modules
//!
//! - [`primitives`] - Foundation types and configuration errors
//! - [`logger`] - Structured logging setup
//! - [`auth`] - Credential model, persistence and resolution
//! - [`api`] - Blocking HTTP client and wire types
//! - [`display`] - Terminal output behind a provider trait
//! - [`application`] - CLI interface, sessions and command handlers
//!
//! ## Quick Start
//!
//! ```no_run
//! // Parse arguments, then run the selected command
//! dailybot_lib::run().unwrap();
//! ```

pub mod api;
pub mod application;
pub mod auth;
pub mod display;
pub mod logger;
pub mod primitives;

// Re-export commonly used types for convenience
pub use api::{ApiError, DailyBotClient};
pub use application::{AppConfig, Cli, CommandError, Commands, execute_command};
pub use auth::{AuthMode, CredentialResolver, Credentials, ResolvedConfig};
pub use logger::Logger;
pub use primitives::{ColorChoice, ConfigError, LogFormat, LogLevel, LogOutput, LoggerError};

// Private imports for the run function
use anyhow::Result;
use application::CliConfig;

/// Load configuration and run one command
///
/// Failures are already shown to the user when this returns `Err`.
pub fn run() -> Result<()> {
    let config = CliConfig::load()
        .map_err(|error| application::commands::report_early_failure(error.into()))?;

    execute_command(config)
}
