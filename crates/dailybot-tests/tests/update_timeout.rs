//! E2E test for update submissions against a server that never answers

use anyhow::Result;
use dailybot_lib::api::DailyBotClient;
use dailybot_lib::application::cli::Commands;
use dailybot_lib::application::commands::run_with_session;
use dailybot_lib::application::config::AppConfig;
use dailybot_lib::application::errors::CommandError;
use dailybot_lib::application::session::{
    CommandSession, LiveConfigProvider, NetworkProvider,
};
use dailybot_lib::application::session_mocks::MockInteractiveProvider;
use dailybot_lib::auth::{CredentialStore, Credentials, ResolvedConfig};
use dailybot_lib::display::MockDisplayProvider;
use dailybot_tests::TestEnvironment;
use std::net::TcpListener;
use std::time::Duration;

/// Builds clients whose timeouts are cut down to keep the test fast
struct ShortTimeouts(Duration);

impl NetworkProvider for ShortTimeouts {
    fn client(&self, config: ResolvedConfig) -> Result<DailyBotClient> {
        Ok(DailyBotClient::new(config.with_timeouts(self.0, self.0))?)
    }
}

#[test]
fn e2e_update_timeout_points_to_status() -> Result<()> {
    // Accepts connections into the backlog but never responds
    let silent = TcpListener::bind("127.0.0.1:0")?;
    let api_url = format!("http://{}", silent.local_addr()?);

    let env = TestEnvironment::new()?;
    env.store().save_credentials(&Credentials {
        token: "stored-token".into(),
        email: "dev@example.com".into(),
        ..Credentials::default()
    })?;

    let display = MockDisplayProvider::new();
    let session = CommandSession::new_with_providers(
        display.clone(),
        env.store(),
        ShortTimeouts(Duration::from_millis(300)),
        LiveConfigProvider::new(AppConfig {
            api_url: Some(api_url),
            config_dir: Some(env.config_dir.clone()),
            ..AppConfig::default()
        }),
        MockInteractiveProvider::new(),
    );

    let update = Commands::Update {
        message: None,
        done: Some("Shipped the importer".into()),
        doing: None,
        blocked: None,
    };
    let error = run_with_session(Some(update), &session).unwrap_err();

    assert!(matches!(
        error.downcast_ref::<CommandError>(),
        Some(CommandError::UpdateTimedOut { .. })
    ));
    let errors = display.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("dailybot status"));
    // Credentials survive a timed-out submission
    assert!(env.store().load_credentials()?.is_some());
    drop(silent);
    Ok(())
}
