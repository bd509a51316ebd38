use crate::primitives::*;
use std::sync::OnceLock;
use tracing::Span;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Global logger instance - ensures single initialization
static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// HTTP stack crates kept quiet unless explicitly asked for via RUST_LOG
const QUIET_CRATES: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls", "want"];

/// Logger implementation using tracing
#[derive(Debug)]
pub struct Logger {
    config: LoggerConfig,
}

impl Logger {
    /// Filter used when RUST_LOG is not set: dailybot at `level`, HTTP crates at warn
    pub fn filter_directive(level: LogLevel) -> String {
        let level = level.as_filter();
        let mut directives = vec![format!("dailybot={level}"), format!("dailybot_lib={level}")];
        directives.extend(QUIET_CRATES.iter().map(|krate| format!("{krate}=warn")));
        directives.push(level.to_string());
        directives.join(",")
    }

    /// Initialize the global logger
    pub fn init(config: LoggerConfig) -> Result<&'static Self, LoggerError> {
        if GLOBAL_LOGGER.get().is_some() {
            return Err(LoggerError::AlreadyInitialized);
        }

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Self::filter_directive(config.level)));

        let fmt_layer = match (config.output, config.format) {
            (LogOutput::Stderr, LogFormat::Text) => fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.ansi)
                .compact()
                .boxed(),
            (LogOutput::Stderr, LogFormat::Json) => fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .json()
                .boxed(),
            (LogOutput::Stderr, LogFormat::Yaml) => fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.ansi)
                .pretty()
                .boxed(),
            (LogOutput::Stdout, LogFormat::Text) => fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(config.ansi)
                .compact()
                .boxed(),
            (LogOutput::Stdout, LogFormat::Json) => fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(false)
                .json()
                .boxed(),
            (LogOutput::Stdout, LogFormat::Yaml) => fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(config.ansi)
                .pretty()
                .boxed(),
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| LoggerError::InitializationFailed {
                reason: e.to_string(),
            })?;

        let logger = GLOBAL_LOGGER.get_or_init(|| Logger {
            config: config.clone(),
        });

        tracing::debug!(
            level = ?config.level,
            format = ?config.format,
            output = ?config.output,
            ansi = config.ansi,
            "logger initialized"
        );

        Ok(logger)
    }

    /// Initialize unless a logger is already installed; other failures are errors
    pub fn ensure_init(config: LoggerConfig) -> Result<&'static Self, LoggerError> {
        match Self::init(config) {
            Err(LoggerError::AlreadyInitialized) => {
                Self::global().ok_or(LoggerError::AlreadyInitialized)
            }
            result => result,
        }
    }

    /// Get reference to the global logger instance
    pub fn global() -> Option<&'static Self> {
        GLOBAL_LOGGER.get()
    }

    /// Check if logger is initialized
    pub fn is_initialized() -> bool {
        GLOBAL_LOGGER.get().is_some()
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }
}

impl LogContext {
    /// Span wrapping everything a command does
    pub fn span(&self) -> Span {
        tracing::info_span!("command", operation = %self.operation)
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
