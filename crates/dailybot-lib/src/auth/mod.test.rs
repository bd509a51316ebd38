use super::*;

#[test]
fn credentials_without_token_are_invalid() {
    let creds: Credentials = serde_json::from_str(r#"{"email": "user@example.com"}"#).unwrap();
    assert!(!creds.is_valid());

    let creds: Credentials = serde_json::from_str(r#"{"token": "tok"}"#).unwrap();
    assert!(creds.is_valid());
}

#[test]
fn credentials_accept_organization_name_alias() {
    let creds: Credentials = serde_json::from_str(
        r#"{"token": "t", "organization_name": "Acme", "organization_uuid": "abc-123"}"#,
    )
    .unwrap();
    assert_eq!(creds.organization, "Acme");
    assert_eq!(creds.organization_uuid, "abc-123");
    assert_eq!(creds.api_url, None);
}

#[test]
fn settings_merge_adds_and_keeps_other_keys() {
    let mut settings = Settings::new();
    settings.merge(&[("api_key", Some("key1"))]);
    settings.merge(&[("other", Some("value"))]);

    assert_eq!(settings.get("api_key"), Some("key1"));
    assert_eq!(settings.get("other"), Some("value"));
    assert_eq!(settings.len(), 2);
}

#[test]
fn settings_merge_removes_absent_and_empty_values() {
    let mut settings = Settings::new();
    settings.merge(&[("api_key", Some("key1")), ("other", Some("val")), ("third", Some("x"))]);
    settings.merge(&[("api_key", None), ("third", Some(""))]);

    assert!(!settings.contains_key("api_key"));
    assert!(!settings.contains_key("third"));
    assert_eq!(settings.get("other"), Some("val"));
}

#[test]
fn settings_preserve_non_string_values() {
    let mut settings: Settings =
        serde_json::from_str(r#"{"api_key": "k", "retries": 3}"#).unwrap();
    settings.merge(&[("api_key", Some("k2"))]);

    assert_eq!(settings.get("retries"), None);
    let json = serde_json::to_value(&settings).unwrap();
    assert_eq!(json["retries"], 3);
    assert_eq!(json["api_key"], "k2");
}

#[test]
fn auth_mode_names() {
    assert_eq!(AuthMode::ApiKey.to_string(), "api_key");
    assert_eq!(AuthMode::Bearer.to_string(), "bearer");
    assert_eq!(AuthMode::Unauthenticated.to_string(), "none");
    assert!(!AuthMode::Unauthenticated.is_authenticated());
}
