use super::*;
use tempfile::TempDir;

fn sample_credentials() -> Credentials {
    Credentials {
        token: "tok-123".to_string(),
        email: "user@example.com".to_string(),
        organization: "Acme".to_string(),
        organization_uuid: "org-uuid".to_string(),
        api_url: Some("https://api.example.com".to_string()),
    }
}

#[test]
fn missing_files_load_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::new(dir.path().join("nested"));

    assert!(store.load_credentials().unwrap().is_none());
    assert!(store.load_settings().unwrap().is_empty());
}

#[test]
fn credentials_round_trip_and_clear() {
    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::new(dir.path().join("dailybot"));

    store.save_credentials(&sample_credentials()).unwrap();
    assert_eq!(store.load_credentials().unwrap(), Some(sample_credentials()));

    store.clear_credentials().unwrap();
    assert!(store.load_credentials().unwrap().is_none());

    // clearing twice is fine
    store.clear_credentials().unwrap();
}

#[test]
fn corrupt_or_tokenless_credentials_are_absent() {
    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::new(dir.path());

    fs::write(store.credentials_path(), "{not json").unwrap();
    assert!(store.load_credentials().unwrap().is_none());

    fs::write(store.credentials_path(), r#"{"token": "", "email": "a@b.c"}"#).unwrap();
    assert!(store.load_credentials().unwrap().is_none());

    fs::write(store.credentials_path(), r#"["a list"]"#).unwrap();
    assert!(store.load_credentials().unwrap().is_none());
}

#[test]
fn settings_update_merges_with_existing() {
    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::new(dir.path());

    store.update_settings(&[("api_key", Some("key1"))]).unwrap();
    store.update_settings(&[("other", Some("value"))]).unwrap();

    let settings = store.load_settings().unwrap();
    assert_eq!(settings.api_key(), Some("key1"));
    assert_eq!(settings.get("other"), Some("value"));

    let settings = store.update_settings(&[("api_key", None)]).unwrap();
    assert_eq!(settings.api_key(), None);
    assert_eq!(store.load_settings().unwrap().get("other"), Some("value"));
}

#[test]
fn corrupt_settings_load_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::new(dir.path());

    fs::write(store.settings_path(), "nope").unwrap();
    assert!(store.load_settings().unwrap().is_empty());

    fs::write(store.settings_path(), r#"["api_key", "k"]"#).unwrap();
    assert!(store.load_settings().unwrap().is_empty());
}

#[test]
fn non_object_credentials_are_absent() {
    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::new(dir.path());

    for content in [r#"["tok", "a@b.c"]"#, r#""tok""#, "42", "null"] {
        fs::write(store.credentials_path(), content).unwrap();
        assert!(store.load_credentials().unwrap().is_none(), "{content}");
    }

    // A token-bearing object still loads
    fs::write(store.credentials_path(), r#"{"token": "tok"}"#).unwrap();
    assert_eq!(store.load_credentials().unwrap().unwrap().token, "tok");
}

#[cfg(unix)]
#[test]
fn written_files_are_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::new(dir.path());

    store.save_credentials(&sample_credentials()).unwrap();
    store.update_settings(&[("api_key", Some("k"))]).unwrap();

    for path in [store.credentials_path(), store.settings_path()] {
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600, "{}", path.display());
    }
}
