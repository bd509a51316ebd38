//! E2E tests for login, whoami and logout over the file-backed store

use anyhow::Result;
use dailybot_lib::api::SESSION_EXPIRED;
use dailybot_lib::application::cli::Commands;
use dailybot_lib::application::commands::{execute_command_with_session, run_with_session};
use dailybot_lib::application::session_mocks::MockInteractiveProvider;
use dailybot_lib::auth::{CredentialStore, Credentials};
use dailybot_tests::HermeticSessionBuilder;
use mockito::{Matcher, Server};
use serde_json::json;

fn stored_session() -> Credentials {
    Credentials {
        token: "stored-token".into(),
        email: "dev@example.com".into(),
        organization: "Acme".into(),
        organization_uuid: "u-acme".into(),
        api_url: None,
    }
}

#[test]
fn e2e_multi_org_login_persists_selected_organization() -> Result<()> {
    let mut server = Server::new();
    server
        .mock("POST", "/v1/cli/auth/request-code/")
        .with_body(r#"{"detail": "Code sent."}"#)
        .create();
    server
        .mock("POST", "/v1/cli/auth/verify-code/")
        .match_body(Matcher::Json(json!({"email": "dev@example.com", "code": "482913"})))
        .with_body(
            r#"{"organization_selection_required": true, "organizations": [
                {"id": 11, "name": "Acme", "uuid": "u-acme"},
                {"id": 12, "name": "Globex", "uuid": "u-globex"}
            ]}"#,
        )
        .create();
    let chosen = server
        .mock("POST", "/v1/cli/auth/verify-code/")
        .match_body(Matcher::Json(json!({
            "email": "dev@example.com",
            "code": "482913",
            "organization_id": 12
        })))
        .with_body(r#"{"token": "globex-token", "organization": {"name": "Globex", "uuid": "u-globex"}}"#)
        .create();

    let (session, display, env) = HermeticSessionBuilder::new()?
        .with_api_url(&format!("{}/", server.url()))
        .with_interactive(
            MockInteractiveProvider::new()
                .with_text_input("dev@example.com")
                .with_text_input("482913")
                .with_select(1),
        )
        .build();

    execute_command_with_session(Commands::Login { email: None }, &session)?;
    chosen.assert();

    let saved = env.read_json(&env.credentials_path())?;
    assert_eq!(saved["token"], "globex-token");
    assert_eq!(saved["organization"], "Globex");
    assert_eq!(saved["organization_uuid"], "u-globex");
    assert_eq!(saved["email"], "dev@example.com");
    // Trailing slash of the override is not persisted
    assert_eq!(saved["api_url"], server.url());
    assert!(saved.get("organization_id").is_none());
    assert!(display.shows("Logged in as dev@example.com (Globex)"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(env.credentials_path())?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
    Ok(())
}

#[test]
fn e2e_whoami_uses_stored_session() -> Result<()> {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/v1/cli/auth/status/")
        .match_header("authorization", "Bearer stored-token")
        .with_body(r#"{"email": "dev@example.com", "organization": "Acme"}"#)
        .create();

    let (session, display, _env) = HermeticSessionBuilder::new()?
        .with_api_url(&server.url())
        .with_credentials(stored_session())?
        .build();

    execute_command_with_session(Commands::Whoami, &session)?;
    mock.assert();
    assert!(display.shows("Email: dev@example.com"));
    assert!(display.shows("Organization: Acme"));
    Ok(())
}

#[test]
fn e2e_expired_session_is_reported() -> Result<()> {
    let mut server = Server::new();
    server
        .mock("GET", "/v1/cli/status/")
        .with_status(401)
        .with_body(r#"{"detail": "Token revoked."}"#)
        .create();

    let (session, display, _env) = HermeticSessionBuilder::new()?
        .with_api_url(&server.url())
        .with_credentials(stored_session())?
        .build();

    assert!(run_with_session(Some(Commands::Status), &session).is_err());
    assert_eq!(display.errors(), vec![SESSION_EXPIRED.to_string()]);
    Ok(())
}

#[test]
fn e2e_logout_deletes_credentials_even_when_revoke_fails() -> Result<()> {
    let mut server = Server::new();
    let revoke = server
        .mock("POST", "/v1/cli/auth/logout/")
        .match_header("authorization", "Bearer stored-token")
        .with_status(503)
        .with_body("Service Unavailable")
        .create();

    let (session, display, env) = HermeticSessionBuilder::new()?
        .with_api_url(&server.url())
        .with_credentials(stored_session())?
        .with_setting("api_key", "kept-key")?
        .build();
    assert!(env.credentials_path().exists());

    execute_command_with_session(Commands::Logout, &session)?;

    revoke.assert();
    assert!(!env.credentials_path().exists());
    assert!(env.store().load_credentials()?.is_none());
    // Settings are independent of the session
    assert_eq!(env.store().load_settings()?.get("api_key"), Some("kept-key"));
    assert!(display.shows("Logged out."));
    Ok(())
}
