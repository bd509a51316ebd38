use super::*;
use crate::api::SESSION_EXPIRED;
use crate::api::types::MessageType;
use crate::application::config::AppConfig;
use crate::application::session_mocks::{
    MockCommandSession, MockCredentialStore, MockInteractiveProvider,
};
use crate::auth::EnvCredentials;
use crate::display::DisplayCall;
use mockito::{Matcher, Server};
use serde_json::json;

fn logged_in_store() -> MockCredentialStore {
    MockCredentialStore::new().with_credentials(Credentials {
        token: "stored-token".into(),
        email: "dev@example.com".into(),
        organization: "Acme".into(),
        organization_uuid: "org-uuid".into(),
        api_url: None,
    })
}

fn command_error(error: &anyhow::Error) -> &CommandError {
    error
        .downcast_ref::<CommandError>()
        .unwrap_or_else(|| panic!("not a command error: {error:#}"))
}

fn agent_update(content: &str, json_data: Option<&str>) -> Commands {
    Commands::Agent(AgentCommands::Update {
        content: content.into(),
        name: "CLI Agent".into(),
        json_data: json_data.map(str::to_string),
        metadata: None,
    })
}

fn update(message: Option<&str>, done: Option<&str>) -> Commands {
    Commands::Update {
        message: message.map(str::to_string),
        done: done.map(str::to_string),
        doing: None,
        blocked: None,
    }
}

// ----------------------------------------------------------------------
// Credential gates
// ----------------------------------------------------------------------

#[test]
fn test_session_commands_require_login_before_network() {
    let session = MockCommandSession::new().with_api_url("http://127.0.0.1:9");

    for command in [Commands::Status, Commands::Whoami, update(Some("x"), None)] {
        let error = execute_command_with_session(command, &session).unwrap_err();
        assert!(matches!(command_error(&error), CommandError::NotLoggedIn));
    }
    assert!(session.network_provider.get_configs().is_empty());
}

#[test]
fn test_agent_commands_require_credentials_before_network() {
    let session = MockCommandSession::new().with_api_url("http://127.0.0.1:9");

    let error = execute_command_with_session(agent_update("Deployed", None), &session).unwrap_err();
    assert!(matches!(
        command_error(&error),
        CommandError::NoAgentCredentials
    ));
    assert!(session.network_provider.get_configs().is_empty());
}

#[test]
fn test_invalid_json_is_rejected_before_sending() {
    let mut server = Server::new();
    let mock = server.mock("POST", "/v1/agent-reports/").expect(0).create();
    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(MockCredentialStore::new().with_setting("api_key", "stored-key"));

    let error =
        execute_command_with_session(agent_update("Deployed", Some("{not json")), &session)
            .unwrap_err();
    assert_eq!(error.to_string(), "Invalid JSON in --json-data.");
    mock.assert();
}

// ----------------------------------------------------------------------
// Agent auth selection
// ----------------------------------------------------------------------

#[test]
fn test_agent_report_uses_stored_key_then_env_key() {
    let mut server = Server::new();
    let stored = server
        .mock("POST", "/v1/agent-reports/")
        .match_header("x-api-key", "stored-key")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::PartialJson(json!({
            "agent_name": "CLI Agent",
            "content": "Deployed",
            "structured": {"build": 7}
        })))
        .with_status(201)
        .with_body(r#"{"id": 42}"#)
        .create();

    let store = MockCredentialStore::new().with_setting("api_key", "stored-key");
    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(store.clone());
    execute_command_with_session(agent_update("Deployed", Some(r#"{"build": 7}"#)), &session)
        .unwrap();
    stored.assert();
    assert!(session.recorder().has_call(&DisplayCall::StatusSuccess {
        message: "Report submitted (id: 42)".into()
    }));

    let from_env = server
        .mock("POST", "/v1/agent-reports/")
        .match_header("x-api-key", "env-key")
        .with_status(201)
        .with_body(r#"{"id": "r-1"}"#)
        .create();
    let config = AppConfig {
        api_url: Some(server.url()),
        env_credentials: EnvCredentials {
            dailybot_api_key: Some("env-key".into()),
            ..EnvCredentials::default()
        },
        ..AppConfig::default()
    };
    let session = MockCommandSession::new().with_config(config).with_store(store);
    execute_command_with_session(agent_update("Deployed", None), &session).unwrap();
    from_env.assert();
}

#[test]
fn test_agent_falls_back_to_session_token() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/v1/agent-health/")
        .match_query(Matcher::UrlEncoded("agent_name".into(), "Builder".into()))
        .match_header("authorization", "Bearer stored-token")
        .match_header("x-api-key", Matcher::Missing)
        .with_body(r#"{"agent_name": "Builder", "status": "healthy"}"#)
        .create();

    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(logged_in_store());
    let command = Commands::Agent(AgentCommands::Health(HealthArgs {
        ok: false,
        fail: false,
        status: true,
        message: None,
        name: "Builder".into(),
    }));
    execute_command_with_session(command, &session).unwrap();

    mock.assert();
    assert!(session.recorder().shows("Status: healthy"));
}

#[test]
fn test_agent_bearer_rejection_reads_as_expired_session() {
    let mut server = Server::new();
    server
        .mock("POST", "/v1/agent-health/")
        .with_status(401)
        .with_body(r#"{"detail": "Invalid token."}"#)
        .create();

    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(logged_in_store());
    let command = Commands::Agent(AgentCommands::Health(HealthArgs {
        ok: false,
        fail: true,
        status: false,
        message: Some("disk full".into()),
        name: "CLI Agent".into(),
    }));
    let error = execute_command_with_session(command, &session).unwrap_err();
    assert_eq!(error.to_string(), SESSION_EXPIRED);
}

#[test]
fn test_agent_key_rejection_keeps_server_detail() {
    let mut server = Server::new();
    server
        .mock("POST", "/v1/agent-reports/")
        .with_status(403)
        .with_body(r#"{"detail": "API key revoked."}"#)
        .create();

    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(logged_in_store().with_setting("api_key", "old-key"));
    let error = execute_command_with_session(agent_update("x", None), &session).unwrap_err();
    assert_eq!(error.to_string(), "API key revoked.");
}

#[test]
fn test_message_send_identifies_sender() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/agent-messages/")
        .match_body(Matcher::Json(json!({
            "agent_name": "Reviewer",
            "content": "Review PR #42",
            "message_type": "command",
            "metadata": {"pr": 42},
            "sender_type": "agent",
            "sender_name": "Builder"
        })))
        .with_status(201)
        .with_body(r#"{"id": 5, "agent_name": "Reviewer", "content": "Review PR #42", "message_type": "command", "sender_type": "agent", "sender_name": "Builder"}"#)
        .create();

    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(MockCredentialStore::new().with_setting("api_key", "k"));
    let command = Commands::Agent(AgentCommands::Message(MessageCommands::Send {
        to: "Reviewer".into(),
        content: "Review PR #42".into(),
        message_type: Some(MessageType::Command),
        name: "Builder".into(),
        json_data: Some(r#"{"pr": 42}"#.into()),
        expires_at: None,
    }));
    execute_command_with_session(command, &session).unwrap();

    mock.assert();
    assert!(session.recorder().shows("From: Builder"));
}

#[test]
fn test_webhook_unregister_without_body() {
    let mut server = Server::new();
    let mock = server
        .mock("DELETE", "/v1/agent-webhook/")
        .match_query(Matcher::UrlEncoded("agent_name".into(), "CLI Agent".into()))
        .with_status(204)
        .create();

    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(MockCredentialStore::new().with_setting("api_key", "k"));
    let command = Commands::Agent(AgentCommands::Webhook(WebhookCommands::Unregister {
        name: "CLI Agent".into(),
    }));
    execute_command_with_session(command, &session).unwrap();

    mock.assert();
    assert!(session.recorder().has_call(&DisplayCall::StatusSuccess {
        message: "Webhook unregistered.".into()
    }));
}

// ----------------------------------------------------------------------
// Session commands
// ----------------------------------------------------------------------

#[test]
fn test_status_expired_session_is_reported_once() {
    let mut server = Server::new();
    server
        .mock("GET", "/v1/cli/status/")
        .with_status(403)
        .with_body(r#"{"detail": "Forbidden"}"#)
        .create();

    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(logged_in_store());
    assert!(run_with_session(Some(Commands::Status), &session).is_err());
    assert_eq!(session.recorder().errors(), vec![SESSION_EXPIRED.to_string()]);
}

#[test]
fn test_whoami_shows_account() {
    let mut server = Server::new();
    server
        .mock("GET", "/v1/cli/auth/status/")
        .match_header("authorization", "Bearer stored-token")
        .with_body(r#"{"user": {"email": "dev@example.com"}, "organization": {"name": "Acme", "uuid": "org-uuid"}}"#)
        .create();

    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(logged_in_store());
    execute_command_with_session(Commands::Whoami, &session).unwrap();

    assert!(session.recorder().shows("Org UUID: org-uuid"));
}

#[test]
fn test_update_sends_structured_fields() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/cli/updates/")
        .match_body(Matcher::Json(json!({"done": "Auth module"})))
        .with_status(201)
        .with_body(r#"{"followups_count": 1, "attached_followups": [{"followup_name": "Daily", "action": "created"}]}"#)
        .create();

    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(logged_in_store());
    execute_command_with_session(update(None, Some("Auth module")), &session).unwrap();

    mock.assert();
    assert!(session.recorder().shows("Daily (Submitted)"));
}

#[test]
fn test_update_reads_text_when_no_fields_given() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/cli/updates/")
        .match_body(Matcher::Json(json!({"message": "Line one\nLine two"})))
        .with_status(201)
        .with_body(r#"{"followups_count": 0}"#)
        .create();

    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(logged_in_store())
        .with_interactive(MockInteractiveProvider::new().with_multiline("Line one\nLine two"));
    execute_command_with_session(update(None, None), &session).unwrap();

    mock.assert();
    assert_eq!(session.recorder().count_calls("status_warning"), 1);
}

#[test]
fn test_empty_update_sends_nothing() {
    let mut server = Server::new();
    let mock = server.mock("POST", "/v1/cli/updates/").expect(0).create();

    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(logged_in_store())
        .with_interactive(MockInteractiveProvider::new().with_multiline("   "));
    let error = execute_command_with_session(update(None, None), &session).unwrap_err();

    assert!(matches!(command_error(&error), CommandError::EmptyUpdate));
    mock.assert();
}

#[test]
fn test_update_processing_failure() {
    let mut server = Server::new();
    server
        .mock("POST", "/v1/cli/updates/")
        .with_status(400)
        .with_body(r#"{"error": "Update processing failed."}"#)
        .create();

    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(logged_in_store());
    let error = execute_command_with_session(update(Some("hi"), None), &session).unwrap_err();
    assert!(matches!(
        command_error(&error),
        CommandError::UpdateNotProcessed { .. }
    ));
}

// ----------------------------------------------------------------------
// Login and logout
// ----------------------------------------------------------------------

#[test]
fn test_login_with_organization_selection() {
    let mut server = Server::new();
    let request_code = server
        .mock("POST", "/v1/cli/auth/request-code/")
        .match_body(Matcher::Json(json!({"email": "dev@example.com"})))
        .with_body(r#"{"detail": "Code sent."}"#)
        .create();
    let first_verify = server
        .mock("POST", "/v1/cli/auth/verify-code/")
        .match_body(Matcher::Json(json!({"email": "dev@example.com", "code": "123456"})))
        .with_body(
            r#"{"requires_organization_selection": true, "organizations": [
                {"id": 3, "name": "Alpha", "uuid": "u-alpha"},
                {"id": 7, "name": "Beta", "uuid": "u-beta"}
            ]}"#,
        )
        .create();
    let second_verify = server
        .mock("POST", "/v1/cli/auth/verify-code/")
        .match_body(Matcher::PartialJson(json!({"organization_id": 7})))
        .with_body(r#"{"token": "new-token", "organization": {"name": "Beta", "uuid": "u-beta"}}"#)
        .create();

    let store = MockCredentialStore::new();
    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(store.clone())
        .with_interactive(
            MockInteractiveProvider::new()
                .with_text_input(" 123456 ")
                .with_select(1),
        );
    let command = Commands::Login {
        email: Some("dev@example.com".into()),
    };
    execute_command_with_session(command, &session).unwrap();

    request_code.assert();
    first_verify.assert();
    second_verify.assert();

    let saved = store.stored_credentials().unwrap();
    assert_eq!(saved.token, "new-token");
    assert_eq!(saved.email, "dev@example.com");
    assert_eq!(saved.organization, "Beta");
    assert_eq!(saved.organization_uuid, "u-beta");
    assert_eq!(saved.api_url, Some(server.url()));
    assert!(session.recorder().has_call(&DisplayCall::StatusSuccess {
        message: "Logged in as dev@example.com (Beta)".into()
    }));
}

#[test]
fn test_login_echoes_textual_organization_id() {
    let mut server = Server::new();
    server
        .mock("POST", "/v1/cli/auth/request-code/")
        .with_body("{}")
        .create();
    server
        .mock("POST", "/v1/cli/auth/verify-code/")
        .match_body(Matcher::Json(json!({"email": "dev@example.com", "code": "123456"})))
        .with_body(
            r#"{"requires_organization_selection": true, "organizations": [
                {"id": "a1b2", "name": "Alpha", "uuid": "u-alpha"},
                {"id": "c3d4", "name": "Beta", "uuid": "u-beta"}
            ]}"#,
        )
        .create();
    let chosen = server
        .mock("POST", "/v1/cli/auth/verify-code/")
        .match_body(Matcher::PartialJson(json!({"organization_id": "a1b2"})))
        .with_body(r#"{"token": "alpha-token", "organization": {"name": "Alpha", "uuid": "u-alpha"}}"#)
        .create();

    let store = MockCredentialStore::new();
    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(store.clone())
        .with_interactive(
            MockInteractiveProvider::new()
                .with_text_input("123456")
                .with_select(0),
        );
    let command = Commands::Login {
        email: Some("dev@example.com".into()),
    };
    execute_command_with_session(command, &session).unwrap();

    chosen.assert();
    assert_eq!(store.stored_credentials().unwrap().token, "alpha-token");
}

#[test]
fn test_login_rejects_organization_without_id() {
    let mut server = Server::new();
    server
        .mock("POST", "/v1/cli/auth/request-code/")
        .with_body("{}")
        .create();
    let verify = server
        .mock("POST", "/v1/cli/auth/verify-code/")
        .with_body(
            r#"{"requires_organization_selection": true, "organizations": [
                {"name": "Alpha"},
                {"id": null, "name": "Beta"}
            ]}"#,
        )
        .expect(1)
        .create();

    let store = MockCredentialStore::new();
    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(store.clone())
        .with_interactive(
            MockInteractiveProvider::new()
                .with_text_input("123456")
                .with_select(1),
        );
    let command = Commands::Login {
        email: Some("dev@example.com".into()),
    };
    let error = execute_command_with_session(command, &session).unwrap_err();

    // No second verify call with a missing organization
    verify.assert();
    assert!(matches!(
        error.downcast_ref::<CommandError>(),
        Some(CommandError::InvalidSelection)
    ));
    assert!(store.stored_credentials().is_none());
}

#[test]
fn test_login_without_token_saves_nothing() {
    let mut server = Server::new();
    server
        .mock("POST", "/v1/cli/auth/request-code/")
        .with_body("{}")
        .create();
    server
        .mock("POST", "/v1/cli/auth/verify-code/")
        .with_body(r#"{"organization": "Acme"}"#)
        .create();

    let store = MockCredentialStore::new();
    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(store.clone())
        .with_interactive(
            MockInteractiveProvider::new()
                .with_text_input("dev@example.com")
                .with_text_input("000000"),
        );
    let error =
        execute_command_with_session(Commands::Login { email: None }, &session).unwrap_err();

    assert_eq!(
        error.to_string(),
        "Authentication failed: no token received."
    );
    assert!(store.stored_credentials().is_none());
}

#[test]
fn test_logout_clears_credentials_when_revoke_fails() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/cli/auth/logout/")
        .with_status(500)
        .with_body("boom")
        .create();

    let store = logged_in_store();
    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(store.clone());
    execute_command_with_session(Commands::Logout, &session).unwrap();

    mock.assert();
    assert!(store.stored_credentials().is_none());
    assert!(session.recorder().has_call(&DisplayCall::StatusSuccess {
        message: "Logged out.".into()
    }));
}

#[test]
fn test_logout_when_not_logged_in() {
    let session = MockCommandSession::new().with_api_url("http://127.0.0.1:9");
    execute_command_with_session(Commands::Logout, &session).unwrap();

    assert!(session.recorder().has_call(&DisplayCall::StatusInfo {
        message: "Not logged in.".into()
    }));
    assert!(session.network_provider.get_configs().is_empty());
}

// ----------------------------------------------------------------------
// Local settings
// ----------------------------------------------------------------------

#[test]
fn test_mask_keeps_prefix() {
    assert_eq!(mask("abcdef123"), "abcd****");
    assert_eq!(mask("abcd"), "a****");
    assert_eq!(mask("x"), "x****");
    assert_eq!(mask(""), "****");
}

#[test]
fn test_config_key_lifecycle() {
    let store = MockCredentialStore::new().with_setting("theme", "dark");
    let session = MockCommandSession::new().with_store(store.clone());
    let run = |setting: &str| {
        execute_command_with_session(
            Commands::Config {
                setting: setting.into(),
            },
            &session,
        )
    };

    run("key").unwrap();
    run("key=abcdef123").unwrap();
    assert_eq!(store.stored_settings().get("api_key"), Some("abcdef123"));
    run("key").unwrap();
    run("key=").unwrap();
    assert_eq!(store.stored_settings().get("api_key"), None);
    assert_eq!(store.stored_settings().get("theme"), Some("dark"));

    let display = session.recorder();
    assert_eq!(
        display.get_calls(),
        vec![
            DisplayCall::StatusInfo {
                message: "key: not set".into()
            },
            DisplayCall::StatusSuccess {
                message: "API key saved (abcd****)".into()
            },
            DisplayCall::StatusInfo {
                message: "key: abcd****".into()
            },
            DisplayCall::StatusSuccess {
                message: "API key removed.".into()
            },
        ]
    );
}

#[test]
fn test_config_unknown_setting() {
    let session = MockCommandSession::new();
    let error = execute_command_with_session(
        Commands::Config {
            setting: "color=red".into(),
        },
        &session,
    )
    .unwrap_err();

    assert!(matches!(
        command_error(&error),
        CommandError::UnknownSetting { .. }
    ));
    assert!(error.to_string().starts_with("Unknown setting 'color'"));
}

// ----------------------------------------------------------------------
// Interactive mode
// ----------------------------------------------------------------------

#[test]
fn test_interactive_menu_survives_api_errors() {
    let mut server = Server::new();
    server
        .mock("GET", "/v1/cli/status/")
        .with_status(500)
        .with_body(r#"{"detail": "Temporarily unavailable"}"#)
        .create();

    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(logged_in_store())
        .with_interactive(MockInteractiveProvider::new().with_select(1).with_select(3));
    run_with_session(None, &session).unwrap();

    let display = session.recorder();
    assert_eq!(display.errors(), vec!["Temporarily unavailable".to_string()]);
    assert!(display.has_call(&DisplayCall::StatusInfo {
        message: "Goodbye!".into()
    }));
    assert!(display.shows("DailyBot CLI - dev@example.com (Acme)"));
}

#[test]
fn test_interactive_update_from_menu() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/cli/updates/")
        .match_body(Matcher::Json(json!({"message": "Pairing on tests"})))
        .with_status(201)
        .with_body(r#"{"followups_count": 1}"#)
        .create();

    let session = MockCommandSession::new()
        .with_api_url(&server.url())
        .with_store(logged_in_store())
        .with_interactive(
            MockInteractiveProvider::new()
                .with_select(0)
                .with_multiline("Pairing on tests")
                .with_select(3),
        );
    run_with_session(None, &session).unwrap();

    mock.assert();
    assert!(session.recorder().shows("Update submitted to 1 check-in(s)"));
}

// ----------------------------------------------------------------------
// Failures before a session exists
// ----------------------------------------------------------------------

#[test]
fn test_early_failure_message_keeps_context_chain() {
    let error = anyhow::anyhow!("subscriber already set").context("Failed to initialize logging");
    assert_eq!(
        early_failure_message(&error),
        "Error: Failed to initialize logging: subscriber already set"
    );

    let config_error: anyhow::Error = crate::primitives::ConfigError::NoHomeDir.into();
    assert!(early_failure_message(&config_error).starts_with("Error: "));
}

#[test]
fn test_report_early_failure_returns_the_same_error() {
    let error = report_early_failure(CommandError::NotLoggedIn.into());
    assert!(matches!(command_error(&error), CommandError::NotLoggedIn));
}
