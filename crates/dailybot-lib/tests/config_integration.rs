use dailybot_lib::application::config::AppConfig;
use dailybot_lib::application::env::EnvironmentConfig;
use dailybot_lib::auth::{
    AuthMode, CredentialResolver, CredentialSources, Credentials, DEFAULT_API_URL, Settings,
};
use dailybot_lib::primitives::ColorChoice;
use std::path::PathBuf;
use std::time::Duration;

fn env_of(pairs: &[(&str, &str)]) -> EnvironmentConfig {
    EnvironmentConfig::from_vars(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
        .unwrap()
}

fn cli_args() -> AppConfig {
    AppConfig {
        config_dir: Some(PathBuf::from("/tmp/dailybot-integration")),
        ..AppConfig::default()
    }
}

fn resolver_for(config: &AppConfig, credentials: Option<Credentials>) -> CredentialResolver {
    let mut settings = Settings::new();
    settings.merge(&[("api_key", Some("stored-key"))]);
    CredentialResolver::new(CredentialSources {
        api_url_override: config.api_url.clone(),
        env: config.env_credentials.clone(),
        credentials,
        settings,
    })
}

#[test]
fn test_defaults_resolve_to_public_api() {
    let config = AppConfig::from_sources(cli_args(), &env_of(&[])).unwrap();
    let resolved = resolver_for(&config, None).resolve(config.timeout());

    assert_eq!(resolved.base_url, DEFAULT_API_URL);
    assert_eq!(resolved.timeout, Duration::from_secs(30));
    assert!(resolved.update_timeout >= Duration::from_secs(120));
    assert_eq!(resolved.agent_api_key.as_deref(), Some("stored-key"));
    assert_eq!(resolved.agent_auth_mode(), AuthMode::ApiKey);
}

#[test]
fn test_environment_then_flag_precedence() {
    let env = env_of(&[
        ("DAILYBOT_API_URL", "https://env.example/"),
        ("DAILYBOT_API_KEY", "env-key"),
        ("DAILYBOT_CLI_TOKEN", "env-token"),
    ]);
    let stored = Credentials {
        token: "stored-token".into(),
        api_url: Some("https://stored.example".into()),
        ..Credentials::default()
    };

    let config = AppConfig::from_sources(cli_args(), &env).unwrap();
    let resolved = resolver_for(&config, Some(stored.clone())).resolve(config.timeout());
    assert_eq!(resolved.base_url, "https://env.example");
    assert_eq!(resolved.agent_api_key.as_deref(), Some("env-key"));
    assert_eq!(resolved.session_token.as_deref(), Some("env-token"));

    let flagged = AppConfig {
        api_url: Some("http://localhost:8000".into()),
        net_timeout: 5,
        ..cli_args()
    };
    let config = AppConfig::from_sources(flagged, &env).unwrap();
    let resolved = resolver_for(&config, Some(stored)).resolve(config.timeout());
    assert_eq!(resolved.base_url, "http://localhost:8000");
    assert_eq!(resolved.timeout, Duration::from_secs(5));
}

#[test]
fn test_ci_disables_color_unless_flag_given() {
    let env = env_of(&[("CI", "true")]);
    let config = AppConfig::from_sources(cli_args(), &env).unwrap();
    assert_eq!(config.color, ColorChoice::Never);

    let forced = AppConfig {
        color: ColorChoice::Always,
        ..cli_args()
    };
    let config = AppConfig::from_sources(forced, &env).unwrap();
    assert_eq!(config.color, ColorChoice::Always);
}
