use super::*;

fn env_of(pairs: &[(&str, &str)]) -> EnvironmentConfig {
    EnvironmentConfig::from_vars(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    )
    .unwrap()
}

#[test]
fn test_credentials_are_read() {
    let env = env_of(&[
        ("DAILYBOT_API_URL", "https://env.example"),
        ("DAILYBOT_CLI_TOKEN", "env-token"),
        ("DAILYBOT_API_KEY", "env-key"),
        ("UNRELATED", "x"),
    ]);
    let creds = env.credentials();
    assert_eq!(creds.dailybot_api_url.as_deref(), Some("https://env.example"));
    assert_eq!(creds.dailybot_cli_token.as_deref(), Some("env-token"));
    assert_eq!(creds.dailybot_api_key.as_deref(), Some("env-key"));
}

#[test]
fn test_missing_credentials_are_none() {
    let creds = env_of(&[]).credentials();
    assert_eq!(creds, EnvCredentials::default());
}

#[test]
fn test_no_color_environment_variable() {
    let env = env_of(&[("NO_COLOR", "1")]);
    assert_eq!(env.apply_color_config(ColorChoice::Auto), ColorChoice::Never);
}

#[test]
fn test_force_color_environment_variable() {
    let env = env_of(&[("FORCE_COLOR", "1")]);
    assert_eq!(env.apply_color_config(ColorChoice::Auto), ColorChoice::Always);
}

#[test]
fn test_environment_variable_precedence() {
    let env = env_of(&[("CLICOLOR", "0"), ("NO_COLOR", "1"), ("FORCE_COLOR", "1")]);
    // FORCE_COLOR wins over NO_COLOR and CLICOLOR
    assert_eq!(env.apply_color_config(ColorChoice::Auto), ColorChoice::Always);
}

#[test]
fn test_ci_environment_variable() {
    let env = env_of(&[("CI", "true"), ("FORCE_COLOR", "1")]);
    assert_eq!(env.apply_color_config(ColorChoice::Auto), ColorChoice::Never);
}

#[test]
fn test_empty_no_color_is_ignored() {
    let env = env_of(&[("NO_COLOR", "")]);
    assert_eq!(env.apply_color_config(ColorChoice::Auto), ColorChoice::Auto);
}

#[test]
fn test_invalid_force_color_values_ignored() {
    let env = env_of(&[("FORCE_COLOR", "invalid")]);
    assert_eq!(env.apply_color_config(ColorChoice::Auto), ColorChoice::Auto);
}
