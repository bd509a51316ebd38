//! Command session architecture
//!
//! Implements the Session-Scoped Dependency Injection Pattern.
//! Each command execution creates a session that owns all ephemeral state.

use crate::api::DailyBotClient;
use crate::application::config::AppConfig;
use crate::auth::{
    CredentialResolver, CredentialSources, CredentialStore, FileCredentialStore, ResolvedConfig,
};
use crate::display::{DisplayProvider, LiveDisplayProvider};
use anyhow::{Context, Result, bail};
use std::io::{self, BufRead, IsTerminal};
use tracing::debug;

/// Provider trait for outbound API access
pub trait NetworkProvider {
    /// Build a client bound to one resolved configuration
    fn client(&self, config: ResolvedConfig) -> Result<DailyBotClient>;
}

/// Provider trait for configuration access
pub trait ConfigProvider {
    /// Get the application configuration
    fn app_config(&self) -> &AppConfig;
}

/// Provider trait for user input
pub trait InteractiveProvider {
    /// Prompt for a single line of text
    fn text_input(&self, prompt: &str) -> Result<String>;

    /// Prompt for a choice; returns the zero-based index
    fn select(&self, prompt: &str, options: &[&str]) -> Result<usize>;

    /// Read lines until a blank line follows some text, or input ends
    fn multiline(&self, prompt: &str) -> Result<String>;
}

/// Session trait that both CommandSession and MockCommandSession can implement
pub trait Session {
    /// Get the display provider for this session
    fn display(&self) -> &dyn DisplayProvider;

    /// Get the credential store for this session
    fn store(&self) -> &dyn CredentialStore;

    /// Get the network provider for this session
    fn network(&self) -> &dyn NetworkProvider;

    /// Get the config provider for this session
    fn config(&self) -> &dyn ConfigProvider;

    /// Get the interactive provider for this session
    fn interactive(&self) -> &dyn InteractiveProvider;

    /// Resolver over the flags, environment and stored files as they are now
    fn resolver(&self) -> Result<CredentialResolver> {
        let app_config = self.config().app_config();
        let credentials = self
            .store()
            .load_credentials()
            .context("Failed to load credentials")?;
        let settings = self
            .store()
            .load_settings()
            .context("Failed to load settings")?;

        Ok(CredentialResolver::new(CredentialSources {
            api_url_override: app_config.api_url.clone(),
            env: app_config.env_credentials.clone(),
            credentials,
            settings,
        }))
    }
}

/// Collect lines up to the first blank line that follows text
///
/// Leading blank lines are skipped. The result is trimmed.
pub fn read_until_blank(reader: impl BufRead) -> io::Result<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            if lines.is_empty() {
                continue;
            }
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n").trim().to_string())
}

/// Parse a 1-based menu number typed by the user
pub fn parse_choice(input: &str, options: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=options).contains(&n) => Some(n - 1),
        _ => None,
    }
}

/// Live implementation of NetworkProvider
#[derive(Debug, Default)]
pub struct LiveNetworkProvider;

impl NetworkProvider for LiveNetworkProvider {
    fn client(&self, config: ResolvedConfig) -> Result<DailyBotClient> {
        debug!(
            base_url = %config.base_url,
            auth = %config.agent_auth_mode(),
            "creating API client"
        );
        Ok(DailyBotClient::new(config)?)
    }
}

/// Live implementation of ConfigProvider
pub struct LiveConfigProvider {
    app_config: AppConfig,
}

impl LiveConfigProvider {
    pub fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }
}

impl ConfigProvider for LiveConfigProvider {
    fn app_config(&self) -> &AppConfig {
        &self.app_config
    }
}

/// Live implementation of InteractiveProvider
///
/// Uses dialoguer prompts on a terminal and plain stdin lines otherwise, so
/// input can be piped in.
#[derive(Debug, Default)]
pub struct LiveInteractiveProvider;

impl LiveInteractiveProvider {
    /// Check if we're in a TTY environment suitable for interactive prompts
    fn is_tty() -> bool {
        io::stdin().is_terminal() && io::stderr().is_terminal()
    }

    fn read_line(prompt: &str) -> Result<String> {
        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            bail!("No input available for: {prompt}");
        }
        Ok(line.trim().to_string())
    }
}

impl InteractiveProvider for LiveInteractiveProvider {
    fn text_input(&self, prompt: &str) -> Result<String> {
        if !Self::is_tty() {
            return Self::read_line(prompt);
        }

        dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
            .map(|value| value.trim().to_string())
            .context("Failed to read text input")
    }

    fn select(&self, prompt: &str, options: &[&str]) -> Result<usize> {
        if !Self::is_tty() {
            eprintln!("{prompt}:");
            for (i, option) in options.iter().enumerate() {
                eprintln!("  {}) {option}", i + 1);
            }
            let line = Self::read_line(prompt)?;
            return match parse_choice(&line, options.len()) {
                Some(index) => Ok(index),
                None => bail!("Invalid selection '{line}'"),
            };
        }

        dialoguer::Select::new()
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact()
            .context("Failed to read selection")
    }

    fn multiline(&self, prompt: &str) -> Result<String> {
        if Self::is_tty() {
            eprintln!("{prompt}");
        }
        read_until_blank(io::stdin().lock()).context("Failed to read update text")
    }
}

/// CommandSession owns all ephemeral state for a single command execution
pub struct CommandSession<D, S, N, C, I>
where
    D: DisplayProvider,
    S: CredentialStore,
    N: NetworkProvider,
    C: ConfigProvider,
    I: InteractiveProvider,
{
    /// Display provider for this session
    display_provider: D,
    /// Credential and settings persistence
    store_provider: S,
    /// Network operations provider
    network_provider: N,
    /// Configuration provider
    config_provider: C,
    /// Interactive input provider
    interactive_provider: I,
}

impl
    CommandSession<
        LiveDisplayProvider,
        FileCredentialStore,
        LiveNetworkProvider,
        LiveConfigProvider,
        LiveInteractiveProvider,
    >
{
    /// Create a new command session with owned state (production composition)
    pub fn new(app_config: AppConfig) -> Result<Self> {
        crate::logger::Logger::ensure_init(app_config.to_logger_config())
            .context("Failed to initialize logging")?;

        let config_dir = app_config
            .config_dir()
            .context("Failed to determine the config directory")?;

        Ok(Self {
            display_provider: LiveDisplayProvider::new(app_config.color),
            store_provider: FileCredentialStore::new(config_dir),
            network_provider: LiveNetworkProvider,
            config_provider: LiveConfigProvider::new(app_config),
            interactive_provider: LiveInteractiveProvider,
        })
    }
}

impl<D, S, N, C, I> CommandSession<D, S, N, C, I>
where
    D: DisplayProvider,
    S: CredentialStore,
    N: NetworkProvider,
    C: ConfigProvider,
    I: InteractiveProvider,
{
    /// Create a new generic command session with custom providers (for testing)
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_with_providers(
        display_provider: D,
        store_provider: S,
        network_provider: N,
        config_provider: C,
        interactive_provider: I,
    ) -> Self {
        Self {
            display_provider,
            store_provider,
            network_provider,
            config_provider,
            interactive_provider,
        }
    }
}

impl<D, S, N, C, I> Session for CommandSession<D, S, N, C, I>
where
    D: DisplayProvider,
    S: CredentialStore,
    N: NetworkProvider,
    C: ConfigProvider,
    I: InteractiveProvider,
{
    fn display(&self) -> &dyn DisplayProvider {
        &self.display_provider
    }

    fn store(&self) -> &dyn CredentialStore {
        &self.store_provider
    }

    fn network(&self) -> &dyn NetworkProvider {
        &self.network_provider
    }

    fn config(&self) -> &dyn ConfigProvider {
        &self.config_provider
    }

    fn interactive(&self) -> &dyn InteractiveProvider {
        &self.interactive_provider
    }
}

#[cfg(test)]
mod tests {
    include!("session.test.rs");
}
