//! Credential model, persistence and resolution
//!
//! Two kinds of credential exist side by side: a session token obtained
//! through the one-time-code login, and an agent API key provisioned out of
//! band. [`resolver`] decides which values apply for a process, [`store`]
//! persists them between runs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

pub mod resolver;
pub mod store;

pub use resolver::{
    CredentialResolver, CredentialSources, DEFAULT_API_URL, EnvCredentials, ResolvedConfig,
    first_present, normalize_url,
};
pub use store::{CredentialStore, FileCredentialStore, StoreError};

/// Settings key holding the agent API key
pub const API_KEY_SETTING: &str = "api_key";

/// Persisted login session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "organization_name")]
    pub organization: String,
    #[serde(default)]
    pub organization_uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Credentials {
    /// A record only counts as a session when it carries a token
    pub fn is_valid(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Open key/value settings persisted next to the credentials
///
/// Values are kept as raw JSON so that keys written by other tools survive
/// a merge untouched; only string values are exposed through [`Settings::get`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, Value>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-empty string value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(Value::String(value)) if !value.is_empty() => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge updates into the settings.
    ///
    /// `Some(non-empty)` sets the key, `None` or an empty string removes it.
    /// Keys not named in `updates` are left alone.
    pub fn merge(&mut self, updates: &[(&str, Option<&str>)]) {
        for (key, value) in updates {
            match value {
                Some(value) if !value.is_empty() => {
                    self.values
                        .insert(key.to_string(), Value::String(value.to_string()));
                }
                _ => {
                    self.values.remove(*key);
                }
            }
        }
    }

    /// Agent API key stored with `dailybot config key=...`
    pub fn api_key(&self) -> Option<&str> {
        self.get(API_KEY_SETTING)
    }
}

/// Which credential authenticated an agent-scoped call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// `X-API-KEY` header
    ApiKey,
    /// `Authorization: Bearer` with the login session token
    Bearer,
    /// No credential could be resolved
    Unauthenticated,
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::ApiKey => "api_key",
            AuthMode::Bearer => "bearer",
            AuthMode::Unauthenticated => "none",
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, AuthMode::Unauthenticated)
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
