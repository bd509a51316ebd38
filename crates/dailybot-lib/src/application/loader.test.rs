use super::*;
use crate::primitives::ColorChoice;
use std::path::PathBuf;

fn env_of(pairs: &[(&str, &str)]) -> EnvironmentConfig {
    EnvironmentConfig::from_vars(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
        .unwrap()
}

fn cli_with_dir() -> AppConfig {
    AppConfig {
        config_dir: Some(PathBuf::from("/tmp/dailybot-loader")),
        ..AppConfig::default()
    }
}

#[test]
fn test_env_credentials_are_carried() {
    let env = env_of(&[("DAILYBOT_API_KEY", "env-key"), ("DAILYBOT_CLI_TOKEN", "tok")]);
    let config = AppConfig::from_sources(cli_with_dir(), &env).unwrap();

    assert_eq!(config.env_credentials.dailybot_api_key.as_deref(), Some("env-key"));
    assert_eq!(config.env_credentials.dailybot_cli_token.as_deref(), Some("tok"));
    assert_eq!(config.api_url, None);
}

#[test]
fn test_cli_color_overrides_environment() {
    let env = env_of(&[("NO_COLOR", "1")]);
    let from_env = AppConfig::from_sources(cli_with_dir(), &env).unwrap();
    assert_eq!(from_env.color, ColorChoice::Never);

    let cli = AppConfig {
        color: ColorChoice::Always,
        ..cli_with_dir()
    };
    let config = AppConfig::from_sources(cli, &env).unwrap();
    assert_eq!(config.color, ColorChoice::Always);
}

#[test]
fn test_api_url_flag_is_kept_separate_from_env() {
    let env = env_of(&[("DAILYBOT_API_URL", "https://env.example")]);
    let cli = AppConfig {
        api_url: Some("https://flag.example".into()),
        ..cli_with_dir()
    };
    let config = AppConfig::from_sources(cli, &env).unwrap();

    assert_eq!(config.api_url.as_deref(), Some("https://flag.example"));
    assert_eq!(
        config.env_credentials.dailybot_api_url.as_deref(),
        Some("https://env.example")
    );
}

#[test]
fn test_invalid_timeout_fails_validation() {
    let cli = AppConfig {
        net_timeout: 0,
        ..cli_with_dir()
    };
    assert!(AppConfig::from_sources(cli, &env_of(&[])).is_err());
}

#[test]
fn test_missing_env_files_are_ignored() {
    // The test working directory carries no .env files
    assert!(load_env_files().is_ok());
}
