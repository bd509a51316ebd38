//! Hermetic test environment for E2E testing
//!
//! Sessions built here use the real file-backed credential store in a
//! temporary config directory and real HTTP clients; point them at a local
//! mock server. Display output and user input are the recording mocks.

use anyhow::Result;
use dailybot_lib::application::config::AppConfig;
use dailybot_lib::application::session::{CommandSession, LiveConfigProvider};
use dailybot_lib::application::session_mocks::{MockInteractiveProvider, MockNetworkProvider};
use dailybot_lib::auth::{CredentialStore, Credentials, EnvCredentials, FileCredentialStore};
use dailybot_lib::display::MockDisplayProvider;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Session type produced by [`HermeticSessionBuilder`]
pub type HermeticSession = CommandSession<
    MockDisplayProvider,
    FileCredentialStore,
    MockNetworkProvider,
    LiveConfigProvider,
    MockInteractiveProvider,
>;

/// Isolated config directory
pub struct TestEnvironment {
    /// Temporary directory for the test environment
    pub temp_dir: TempDir,
    /// Directory holding credentials.json and config.json
    pub config_dir: PathBuf,
}

impl TestEnvironment {
    /// Create a new hermetic test environment
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let config_dir = temp_dir.path().join("dailybot");
        Ok(Self {
            temp_dir,
            config_dir,
        })
    }

    /// Store over the environment's config directory
    pub fn store(&self) -> FileCredentialStore {
        FileCredentialStore::new(&self.config_dir)
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.config_dir.join("credentials.json")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    /// Raw JSON of a file in the config directory
    pub fn read_json(&self, path: &Path) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}

/// Builder for hermetic sessions against a mock API
pub struct HermeticSessionBuilder {
    test_env: TestEnvironment,
    app_config: AppConfig,
    interactive: MockInteractiveProvider,
}

impl HermeticSessionBuilder {
    /// Create a new hermetic session builder
    pub fn new() -> Result<Self> {
        let test_env = TestEnvironment::new()?;
        let app_config = AppConfig {
            config_dir: Some(test_env.config_dir.clone()),
            ..AppConfig::default()
        };

        Ok(Self {
            test_env,
            app_config,
            interactive: MockInteractiveProvider::new(),
        })
    }

    /// Runtime API URL override, as `--api-url`
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.app_config.api_url = Some(url.to_string());
        self
    }

    /// Environment credential overrides
    pub fn with_env(mut self, env: EnvCredentials) -> Self {
        self.app_config.env_credentials = env;
        self
    }

    pub fn with_net_timeout(mut self, seconds: u64) -> Self {
        self.app_config.net_timeout = seconds;
        self
    }

    /// Persist a login session before the command runs
    pub fn with_credentials(self, credentials: Credentials) -> Result<Self> {
        self.test_env.store().save_credentials(&credentials)?;
        Ok(self)
    }

    /// Persist local settings before the command runs
    pub fn with_setting(self, key: &str, value: &str) -> Result<Self> {
        self.test_env.store().update_settings(&[(key, Some(value))])?;
        Ok(self)
    }

    pub fn with_interactive(mut self, interactive: MockInteractiveProvider) -> Self {
        self.interactive = interactive;
        self
    }

    /// Build the hermetic session with all configured providers
    pub fn build(self) -> (HermeticSession, MockDisplayProvider, TestEnvironment) {
        let display = MockDisplayProvider::new();
        let session = CommandSession::new_with_providers(
            display.clone(),
            self.test_env.store(),
            MockNetworkProvider::new(),
            LiveConfigProvider::new(self.app_config),
            self.interactive,
        );

        (session, display, self.test_env)
    }
}
