//! Credential and endpoint resolution
//!
//! Every value is resolved by walking a fixed precedence list and taking the
//! first source that holds a non-empty value. Resolution itself never fails:
//! the worst outcome is an unauthenticated config pointing at the default API.

use super::{AuthMode, Credentials, Settings};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.dailybot.com";

/// Default per-request network timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Submitting an update may trigger server-side processing and needs longer
pub const UPDATE_TIMEOUT: Duration = Duration::from_secs(120);

/// Credential overrides read from the process environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvCredentials {
    pub dailybot_api_url: Option<String>,
    pub dailybot_cli_token: Option<String>,
    pub dailybot_api_key: Option<String>,
}

/// Everything the resolver looks at, gathered up front
#[derive(Debug, Clone, Default)]
pub struct CredentialSources {
    /// `--api-url` given on the command line
    pub api_url_override: Option<String>,
    pub env: EnvCredentials,
    /// Stored login session, if any
    pub credentials: Option<Credentials>,
    pub settings: Settings,
}

/// First source holding a non-empty value
pub fn first_present<'a, I>(sources: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    sources
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
}

/// Strip trailing slashes so paths can be appended verbatim
pub fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[derive(Debug, Clone)]
pub struct CredentialResolver {
    sources: CredentialSources,
}

impl CredentialResolver {
    pub fn new(mut sources: CredentialSources) -> Self {
        sources.credentials = sources.credentials.filter(Credentials::is_valid);
        Self { sources }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.sources.credentials.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.sources.settings
    }

    /// Override, then environment, then the URL saved at login, then the default
    pub fn api_url(&self) -> String {
        let stored = self
            .sources
            .credentials
            .as_ref()
            .and_then(|creds| creds.api_url.as_deref());

        // Normalized before the emptiness check so "/" counts as absent
        let sources = [
            self.sources.api_url_override.as_deref(),
            self.sources.env.dailybot_api_url.as_deref(),
            stored,
        ]
        .map(|url| url.map(|url| url.trim_end_matches('/')));

        normalize_url(first_present(sources).unwrap_or(DEFAULT_API_URL))
    }

    /// Environment token wins over the stored session
    pub fn session_token(&self) -> Option<String> {
        first_present([
            self.sources.env.dailybot_cli_token.as_deref(),
            self.sources
                .credentials
                .as_ref()
                .map(|creds| creds.token.as_str()),
        ])
        .map(str::to_string)
    }

    /// Environment key wins over the key saved in settings
    pub fn api_key(&self) -> Option<String> {
        first_present([
            self.sources.env.dailybot_api_key.as_deref(),
            self.sources.settings.api_key(),
        ])
        .map(str::to_string)
    }

    pub fn resolve(&self, timeout: Duration) -> ResolvedConfig {
        ResolvedConfig {
            base_url: self.api_url(),
            session_token: self.session_token(),
            agent_api_key: self.api_key(),
            timeout,
            update_timeout: UPDATE_TIMEOUT.max(timeout),
        }
    }
}

/// Effective endpoint and credentials for one process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub session_token: Option<String>,
    pub agent_api_key: Option<String>,
    pub timeout: Duration,
    pub update_timeout: Duration,
}

impl ResolvedConfig {
    /// Unauthenticated config against `base_url` with default timeouts
    pub fn anonymous(base_url: &str) -> Self {
        Self {
            base_url: normalize_url(base_url),
            session_token: None,
            agent_api_key: None,
            timeout: DEFAULT_TIMEOUT,
            update_timeout: UPDATE_TIMEOUT,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn with_agent_api_key(mut self, key: impl Into<String>) -> Self {
        self.agent_api_key = Some(key.into());
        self
    }

    pub fn with_timeouts(mut self, timeout: Duration, update_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.update_timeout = update_timeout;
        self
    }

    /// API key first, login session as fallback
    pub fn agent_auth_mode(&self) -> AuthMode {
        if self.agent_api_key.is_some() {
            AuthMode::ApiKey
        } else if self.session_token.is_some() {
            AuthMode::Bearer
        } else {
            AuthMode::Unauthenticated
        }
    }
}

#[cfg(test)]
mod tests {
    include!("resolver.test.rs");
}
