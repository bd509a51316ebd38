use super::*;

#[test]
fn defaults_match_declared_constants() {
    let config = AppConfig::default();
    assert_eq!(config.net_timeout, 30);
    assert_eq!(config.log_level, 0);
    assert_eq!(config.log_format, LogFormat::Text);
    assert_eq!(config.log_output, LogOutput::Stderr);
    assert_eq!(config.color, ColorChoice::Auto);
    assert_eq!(config.timeout(), Duration::from_secs(30));
}

#[test]
fn merge_takes_non_default_values() {
    let other = AppConfig {
        api_url: Some("http://localhost:8000".into()),
        net_timeout: 5,
        color: ColorChoice::Never,
        ..AppConfig::default()
    };
    let merged = AppConfig::default().merge_with(other);

    assert_eq!(merged.api_url.as_deref(), Some("http://localhost:8000"));
    assert_eq!(merged.net_timeout, 5);
    assert_eq!(merged.color, ColorChoice::Never);
    assert_eq!(merged.log_format, LogFormat::Text);
}

#[test]
fn merge_keeps_base_when_other_is_default() {
    let base = AppConfig {
        color: ColorChoice::Never,
        ..AppConfig::default()
    };
    let merged = base.merge_with(AppConfig::default());
    assert_eq!(merged.color, ColorChoice::Never);
}

#[test]
fn validate_rejects_zero_timeout() {
    let mut config = AppConfig {
        net_timeout: 0,
        config_dir: Some(PathBuf::from("/tmp/dailybot")),
        ..AppConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn validate_keeps_explicit_config_dir() {
    let mut config = AppConfig {
        config_dir: Some(PathBuf::from("/tmp/dailybot")),
        ..AppConfig::default()
    };
    config.validate().unwrap();
    assert_eq!(config.config_dir().unwrap(), PathBuf::from("/tmp/dailybot"));
}

#[test]
fn logger_config_disables_ansi_when_color_off() {
    let config = AppConfig {
        color: ColorChoice::Never,
        log_level: 3,
        ..AppConfig::default()
    };
    let logger = config.to_logger_config();
    assert!(!logger.ansi);
    assert_eq!(logger.level, LogLevel::Debug);
}
