//! Mock implementations of session providers for testing
//!
//! Every mock is cheap to clone and shares its recorded state, so a test can
//! keep a handle after moving the provider into a session.

use crate::api::DailyBotClient;
use crate::application::config::AppConfig;
use crate::application::session::{
    ConfigProvider, InteractiveProvider, NetworkProvider, Session,
};
use crate::auth::{CredentialStore, Credentials, ResolvedConfig, Settings, StoreError};
use crate::display::{DisplayProvider, MockDisplayProvider};
use anyhow::{Result, bail};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// In-memory credential store
#[derive(Clone, Default)]
pub struct MockCredentialStore {
    credentials: Arc<Mutex<Option<Credentials>>>,
    settings: Arc<Mutex<Settings>>,
}

impl MockCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(self, credentials: Credentials) -> Self {
        *self.credentials.lock().unwrap() = Some(credentials);
        self
    }

    pub fn with_setting(self, key: &str, value: &str) -> Self {
        self.settings.lock().unwrap().merge(&[(key, Some(value))]);
        self
    }

    /// Raw stored credentials, including tokenless ones
    pub fn stored_credentials(&self) -> Option<Credentials> {
        self.credentials.lock().unwrap().clone()
    }

    pub fn stored_settings(&self) -> Settings {
        self.settings.lock().unwrap().clone()
    }
}

impl CredentialStore for MockCredentialStore {
    fn load_credentials(&self) -> Result<Option<Credentials>, StoreError> {
        Ok(self
            .credentials
            .lock()
            .unwrap()
            .clone()
            .filter(Credentials::is_valid))
    }

    fn save_credentials(&self, credentials: &Credentials) -> Result<(), StoreError> {
        *self.credentials.lock().unwrap() = Some(credentials.clone());
        Ok(())
    }

    fn clear_credentials(&self) -> Result<(), StoreError> {
        *self.credentials.lock().unwrap() = None;
        Ok(())
    }

    fn load_settings(&self) -> Result<Settings, StoreError> {
        Ok(self.stored_settings())
    }

    fn update_settings(&self, updates: &[(&str, Option<&str>)]) -> Result<Settings, StoreError> {
        let mut settings = self.settings.lock().unwrap();
        settings.merge(updates);
        Ok(settings.clone())
    }
}

/// Network provider that records each resolved configuration it is handed
///
/// Clients are real; point the config at a local mock server.
#[derive(Clone, Default)]
pub struct MockNetworkProvider {
    configs: Arc<Mutex<Vec<ResolvedConfig>>>,
}

impl MockNetworkProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configurations clients were built with, in order
    pub fn get_configs(&self) -> Vec<ResolvedConfig> {
        self.configs.lock().unwrap().clone()
    }
}

impl NetworkProvider for MockNetworkProvider {
    fn client(&self, config: ResolvedConfig) -> Result<DailyBotClient> {
        self.configs.lock().unwrap().push(config.clone());
        Ok(DailyBotClient::new(config)?)
    }
}

/// Mock implementation of ConfigProvider
pub struct MockConfigProvider {
    app_config: AppConfig,
}

impl MockConfigProvider {
    pub fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }
}

impl ConfigProvider for MockConfigProvider {
    fn app_config(&self) -> &AppConfig {
        &self.app_config
    }
}

/// Scripted user input
///
/// Answers are consumed in order. Running out of answers is an error, which
/// also ends interactive loops in tests.
#[derive(Clone, Default)]
pub struct MockInteractiveProvider {
    text_inputs: Arc<Mutex<VecDeque<String>>>,
    selections: Arc<Mutex<VecDeque<usize>>>,
    multilines: Arc<Mutex<VecDeque<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockInteractiveProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text_input(self, response: &str) -> Self {
        self.text_inputs
            .lock()
            .unwrap()
            .push_back(response.to_string());
        self
    }

    /// Zero-based option index
    pub fn with_select(self, response: usize) -> Self {
        self.selections.lock().unwrap().push_back(response);
        self
    }

    pub fn with_multiline(self, response: &str) -> Self {
        self.multilines
            .lock()
            .unwrap()
            .push_back(response.to_string());
        self
    }

    /// Every prompt shown, in order
    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn record(&self, prompt: &str) {
        self.prompts.lock().unwrap().push(prompt.to_string());
    }
}

impl InteractiveProvider for MockInteractiveProvider {
    fn text_input(&self, prompt: &str) -> Result<String> {
        self.record(prompt);
        match self.text_inputs.lock().unwrap().pop_front() {
            Some(response) => Ok(response),
            None => bail!("No scripted input for prompt: {prompt}"),
        }
    }

    fn select(&self, prompt: &str, options: &[&str]) -> Result<usize> {
        self.record(prompt);
        match self.selections.lock().unwrap().pop_front() {
            Some(index) if index < options.len() => Ok(index),
            Some(index) => bail!("Scripted selection {index} out of range for: {prompt}"),
            None => bail!("No scripted selection for prompt: {prompt}"),
        }
    }

    fn multiline(&self, prompt: &str) -> Result<String> {
        self.record(prompt);
        match self.multilines.lock().unwrap().pop_front() {
            Some(response) => Ok(response),
            None => bail!("No scripted input for prompt: {prompt}"),
        }
    }
}

/// Mock command session for testing
pub struct MockCommandSession {
    pub display_provider: MockDisplayProvider,
    pub store_provider: MockCredentialStore,
    pub network_provider: MockNetworkProvider,
    pub config_provider: MockConfigProvider,
    pub interactive_provider: MockInteractiveProvider,
}

impl Default for MockCommandSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCommandSession {
    pub fn new() -> Self {
        Self {
            display_provider: MockDisplayProvider::new(),
            store_provider: MockCredentialStore::new(),
            network_provider: MockNetworkProvider::new(),
            config_provider: MockConfigProvider::new(AppConfig::default()),
            interactive_provider: MockInteractiveProvider::new(),
        }
    }

    pub fn with_store(mut self, store: MockCredentialStore) -> Self {
        self.store_provider = store;
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config_provider = MockConfigProvider::new(config);
        self
    }

    /// Point every request at `url`, the same as `--api-url`
    pub fn with_api_url(self, url: &str) -> Self {
        let config = AppConfig {
            api_url: Some(url.to_string()),
            ..self.config_provider.app_config.clone()
        };
        self.with_config(config)
    }

    pub fn with_interactive(mut self, interactive: MockInteractiveProvider) -> Self {
        self.interactive_provider = interactive;
        self
    }

    /// Handle on the recorded display calls
    pub fn recorder(&self) -> MockDisplayProvider {
        self.display_provider.clone()
    }
}

impl Session for MockCommandSession {
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
    use super::*;

    #[test]
    fn test_mock_store_hides_tokenless_credentials() {
        let store = MockCredentialStore::new().with_credentials(Credentials::default());
        assert!(store.load_credentials().unwrap().is_none());
        assert!(store.stored_credentials().is_some());
    }

    #[test]
    fn test_mock_store_merges_settings() {
        let store = MockCredentialStore::new().with_setting("api_key", "k").with_setting("other", "x");
        let settings = store.update_settings(&[("api_key", None)]).unwrap();
        assert_eq!(settings.get("api_key"), None);
        assert_eq!(settings.get("other"), Some("x"));
    }

    #[test]
    fn test_mock_interactive_consumes_in_order() {
        let interactive = MockInteractiveProvider::new()
            .with_text_input("a@b.c")
            .with_text_input("123456")
            .with_select(1);

        assert_eq!(interactive.text_input("Email").unwrap(), "a@b.c");
        assert_eq!(interactive.text_input("Code").unwrap(), "123456");
        assert_eq!(interactive.select("Pick", &["x", "y"]).unwrap(), 1);
        assert!(interactive.text_input("More").is_err());
        assert_eq!(interactive.get_prompts(), vec!["Email", "Code", "Pick", "More"]);
    }
}
