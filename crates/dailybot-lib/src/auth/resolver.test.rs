use super::*;

fn stored(token: &str, api_url: Option<&str>) -> Credentials {
    Credentials {
        token: token.to_string(),
        email: "user@example.com".to_string(),
        organization: "Acme".to_string(),
        organization_uuid: "org-uuid".to_string(),
        api_url: api_url.map(str::to_string),
    }
}

fn settings_with_key(key: &str) -> Settings {
    let mut settings = Settings::new();
    settings.merge(&[("api_key", Some(key))]);
    settings
}

#[test]
fn first_present_skips_missing_and_empty() {
    assert_eq!(first_present([None, Some(""), Some("b"), Some("c")]), Some("b"));
    assert_eq!(first_present([None, Some("")]), None);
    assert_eq!(first_present(Vec::<Option<&str>>::new()), None);
}

#[test]
fn api_url_defaults_when_nothing_set() {
    let resolver = CredentialResolver::new(CredentialSources::default());
    assert_eq!(resolver.api_url(), DEFAULT_API_URL);
}

#[test]
fn api_url_precedence_and_trailing_slash() {
    let mut sources = CredentialSources {
        api_url_override: Some("https://flag.example/".to_string()),
        env: EnvCredentials {
            dailybot_api_url: Some("https://env.example".to_string()),
            ..Default::default()
        },
        credentials: Some(stored("tok", Some("https://stored.example//"))),
        settings: Settings::new(),
    };
    assert_eq!(
        CredentialResolver::new(sources.clone()).api_url(),
        "https://flag.example"
    );

    sources.api_url_override = Some(String::new());
    assert_eq!(
        CredentialResolver::new(sources.clone()).api_url(),
        "https://env.example"
    );

    sources.env.dailybot_api_url = None;
    assert_eq!(
        CredentialResolver::new(sources).api_url(),
        "https://stored.example"
    );
}

#[test]
fn api_url_of_only_slashes_counts_as_absent() {
    let mut sources = CredentialSources {
        api_url_override: Some("//".to_string()),
        env: EnvCredentials {
            dailybot_api_url: Some("/".to_string()),
            ..Default::default()
        },
        credentials: Some(stored("tok", Some("https://stored.example/"))),
        settings: Settings::new(),
    };
    assert_eq!(
        CredentialResolver::new(sources.clone()).api_url(),
        "https://stored.example"
    );

    sources.credentials = Some(stored("tok", Some("/")));
    assert_eq!(CredentialResolver::new(sources).api_url(), DEFAULT_API_URL);
}

#[test]
fn env_token_overrides_stored_session() {
    let sources = CredentialSources {
        env: EnvCredentials {
            dailybot_cli_token: Some("env-token".to_string()),
            ..Default::default()
        },
        credentials: Some(stored("file-token", None)),
        ..Default::default()
    };
    let resolver = CredentialResolver::new(sources);
    assert_eq!(resolver.session_token().as_deref(), Some("env-token"));
}

#[test]
fn invalid_stored_credentials_are_ignored() {
    let sources = CredentialSources {
        credentials: Some(stored("", Some("https://stored.example"))),
        ..Default::default()
    };
    let resolver = CredentialResolver::new(sources);
    assert!(resolver.credentials().is_none());
    assert_eq!(resolver.session_token(), None);
    assert_eq!(resolver.api_url(), DEFAULT_API_URL);
}

#[test]
fn env_api_key_overrides_settings() {
    let sources = CredentialSources {
        env: EnvCredentials {
            dailybot_api_key: Some("env-key".to_string()),
            ..Default::default()
        },
        settings: settings_with_key("cfg-key"),
        ..Default::default()
    };
    assert_eq!(
        CredentialResolver::new(sources).api_key().as_deref(),
        Some("env-key")
    );

    let sources = CredentialSources {
        settings: settings_with_key("cfg-key"),
        ..Default::default()
    };
    assert_eq!(
        CredentialResolver::new(sources).api_key().as_deref(),
        Some("cfg-key")
    );
}

#[test]
fn agent_auth_mode_prefers_api_key() {
    let sources = CredentialSources {
        credentials: Some(stored("tok", None)),
        settings: settings_with_key("key"),
        ..Default::default()
    };
    let resolved = CredentialResolver::new(sources).resolve(DEFAULT_TIMEOUT);
    assert_eq!(resolved.agent_auth_mode(), AuthMode::ApiKey);

    let bearer = ResolvedConfig::anonymous(DEFAULT_API_URL).with_session_token("tok");
    assert_eq!(bearer.agent_auth_mode(), AuthMode::Bearer);

    let none = ResolvedConfig::anonymous(DEFAULT_API_URL);
    assert_eq!(none.agent_auth_mode(), AuthMode::Unauthenticated);
}

#[test]
fn resolve_keeps_update_timeout_at_least_request_timeout() {
    let resolver = CredentialResolver::new(CredentialSources::default());

    let resolved = resolver.resolve(Duration::from_secs(10));
    assert_eq!(resolved.timeout, Duration::from_secs(10));
    assert_eq!(resolved.update_timeout, UPDATE_TIMEOUT);

    let resolved = resolver.resolve(Duration::from_secs(300));
    assert_eq!(resolved.update_timeout, Duration::from_secs(300));
}
