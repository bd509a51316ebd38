//! E2E tests for agent authentication selection
//!
//! The API key saved with `config key=` authenticates agent calls until an
//! environment key takes over; without any key, a login session is used.

use anyhow::Result;
use dailybot_lib::application::cli::{AgentCommands, Commands, MessageCommands};
use dailybot_lib::application::commands::{execute_command_with_session, run_with_session};
use dailybot_lib::application::errors::CommandError;
use dailybot_lib::application::session::Session;
use dailybot_lib::auth::{AuthMode, Credentials, EnvCredentials};
use dailybot_tests::HermeticSessionBuilder;
use mockito::{Matcher, Server};
use std::time::Duration;

fn report(content: &str) -> Commands {
    Commands::Agent(AgentCommands::Update {
        content: content.into(),
        name: "Deploy Bot".into(),
        json_data: None,
        metadata: None,
    })
}

fn config(setting: &str) -> Commands {
    Commands::Config {
        setting: setting.into(),
    }
}

#[test]
fn e2e_saved_key_then_environment_key() -> Result<()> {
    let mut server = Server::new();
    let with_stored = server
        .mock("POST", "/v1/agent-reports/")
        .match_header("x-api-key", "stored-key")
        .with_status(201)
        .with_body(r#"{"id": 1}"#)
        .create();
    let with_env = server
        .mock("POST", "/v1/agent-reports/")
        .match_header("x-api-key", "env-key")
        .with_status(201)
        .with_body(r#"{"id": 2}"#)
        .create();

    let (session, display, env) = HermeticSessionBuilder::new()?
        .with_api_url(&server.url())
        .build();
    execute_command_with_session(config("key=stored-key"), &session)?;
    execute_command_with_session(report("Deployed v2.1"), &session)?;
    with_stored.assert();
    assert!(display.shows("API key saved (stor****)"));
    assert!(display.shows("Report submitted (id: 1)"));

    // Same config directory, now with DAILYBOT_API_KEY set
    let (session, display, _env2) = HermeticSessionBuilder::new()?
        .with_api_url(&server.url())
        .with_env(EnvCredentials {
            dailybot_api_key: Some("env-key".into()),
            ..EnvCredentials::default()
        })
        .with_setting("api_key", "stored-key")?
        .build();
    execute_command_with_session(report("Deployed v2.2"), &session)?;
    with_env.assert();
    assert!(display.shows("Report submitted (id: 2)"));

    let settings = env.read_json(&env.settings_path())?;
    assert_eq!(settings["api_key"], "stored-key");
    Ok(())
}

#[test]
fn e2e_login_session_backs_agent_calls() -> Result<()> {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/v1/agent-messages/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("agent_name".into(), "Deploy Bot".into()),
            Matcher::UrlEncoded("delivered".into(), "false".into()),
        ]))
        .match_header("authorization", "Bearer session-token")
        .match_header("x-api-key", Matcher::Missing)
        .with_body(r#"[{"id": 1, "content": "Roll back", "sender_type": "human", "sender_name": "Ana", "delivered": false, "created_at": "2026-01-01T10:00:00Z"}]"#)
        .create();

    let (session, display, _env) = HermeticSessionBuilder::new()?
        .with_api_url(&server.url())
        .with_credentials(Credentials {
            token: "session-token".into(),
            ..Credentials::default()
        })?
        .build();

    let command = Commands::Agent(AgentCommands::Message(MessageCommands::List {
        name: "Deploy Bot".into(),
        pending: true,
    }));
    execute_command_with_session(command, &session)?;

    mock.assert();
    assert!(display.shows("Ana (human)"));
    Ok(())
}

#[test]
fn e2e_agent_without_credentials_never_calls_the_api() -> Result<()> {
    let mut server = Server::new();
    let mock = server.mock("POST", "/v1/agent-reports/").expect(0).create();

    let (session, display, _env) = HermeticSessionBuilder::new()?
        .with_api_url(&server.url())
        .build();

    let error = run_with_session(Some(report("Deployed")), &session).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<CommandError>(),
        Some(CommandError::NoAgentCredentials)
    ));
    mock.assert();

    let errors = display.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("dailybot config key=<KEY>"));
    assert!(errors[0].contains("dailybot login"));
    Ok(())
}

#[test]
fn e2e_removed_key_falls_back_to_no_auth() -> Result<()> {
    let (session, display, _env) = HermeticSessionBuilder::new()?
        .with_api_url("http://127.0.0.1:9")
        .with_setting("api_key", "short")?
        .build();

    execute_command_with_session(config("key"), &session)?;
    execute_command_with_session(config("key="), &session)?;
    execute_command_with_session(config("key"), &session)?;

    assert!(display.shows("key: shor****"));
    assert!(display.shows("API key removed."));
    assert!(display.shows("key: not set"));

    let resolved = session.resolver()?.resolve(Duration::from_secs(30));
    assert_eq!(resolved.agent_auth_mode(), AuthMode::Unauthenticated);
    Ok(())
}
