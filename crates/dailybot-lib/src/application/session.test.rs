use super::*;
use crate::auth::{AuthMode, Credentials, EnvCredentials};
use std::io::Cursor;

#[test]
fn test_read_until_blank_stops_after_text() {
    let input = Cursor::new("\n\nFinished auth\nStarting tests\n\nignored\n");
    assert_eq!(
        read_until_blank(input).unwrap(),
        "Finished auth\nStarting tests"
    );
}

#[test]
fn test_read_until_blank_handles_eof_and_empty() {
    assert_eq!(read_until_blank(Cursor::new("one line")).unwrap(), "one line");
    assert_eq!(read_until_blank(Cursor::new("\n \n")).unwrap(), "");
}

#[test]
fn test_parse_choice_is_one_based() {
    assert_eq!(parse_choice("1", 3), Some(0));
    assert_eq!(parse_choice(" 3 ", 3), Some(2));
    assert_eq!(parse_choice("0", 3), None);
    assert_eq!(parse_choice("4", 3), None);
    assert_eq!(parse_choice("two", 3), None);
}

#[test]
fn test_session_resolver_reads_store_and_config() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileCredentialStore::new(dir.path());
    store
        .save_credentials(&Credentials {
            token: "stored-token".into(),
            api_url: Some("https://stored.example/".into()),
            ..Credentials::default()
        })
        .unwrap();

    let app_config = AppConfig {
        env_credentials: EnvCredentials {
            dailybot_api_key: Some("env-key".into()),
            ..EnvCredentials::default()
        },
        ..AppConfig::default()
    };
    let session = CommandSession {
        display_provider: crate::display::MockDisplayProvider::new(),
        store_provider: store,
        network_provider: LiveNetworkProvider,
        config_provider: LiveConfigProvider::new(app_config),
        interactive_provider: LiveInteractiveProvider,
    };

    let resolved = session.resolver().unwrap().resolve(DEFAULT_TEST_TIMEOUT);
    assert_eq!(resolved.base_url, "https://stored.example");
    assert_eq!(resolved.session_token.as_deref(), Some("stored-token"));
    assert_eq!(resolved.agent_auth_mode(), AuthMode::ApiKey);
}

const DEFAULT_TEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);
