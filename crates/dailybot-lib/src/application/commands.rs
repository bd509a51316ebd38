//! Command execution handlers
//!
//! Implements the Session-Scoped Dependency Injection Pattern: every handler
//! receives a `&dyn Session` and reaches the outside world only through it.

use crate::api::DailyBotClient;
use crate::api::types::{SendMessageRequest, UpdateRequest, display_id};
use crate::application::cli::{
    AgentCommands, CliConfig, Commands, HealthArgs, MessageCommands, WebhookCommands,
};
use crate::application::errors::CommandError;
use crate::application::session::{CommandSession, Session};
use crate::auth::{API_KEY_SETTING, Credentials, ResolvedConfig};
use crate::display::{DisplayProviderExt, render};
use crate::primitives::LogContext;
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info};

/// `config` setting names and the settings keys they map to
const KNOWN_SETTINGS: &[(&str, &str)] = &[("key", API_KEY_SETTING)];

const MENU_OPTIONS: [&str; 4] = ["Send update", "View pending check-ins", "Auth status", "Quit"];

const UPDATE_PROMPT: &str = "Enter your update (press Enter on an empty line to submit):";

/// Execute CLI commands using the session-based architecture
pub fn execute_command(config: CliConfig) -> Result<()> {
    // Create command session (owns all ephemeral state)
    let session = CommandSession::new(config.app_config).map_err(report_early_failure)?;
    run_with_session(config.command, &session)
}

/// Line printed for a failure that happens before any display provider exists
pub fn early_failure_message(error: &anyhow::Error) -> String {
    format!("Error: {error:#}")
}

/// Print a pre-session failure to stderr and hand it back
pub fn report_early_failure(error: anyhow::Error) -> anyhow::Error {
    eprintln!("{}", early_failure_message(&error));
    error
}

/// Run a command, or interactive mode, and report a failure once
pub fn run_with_session(command: Option<Commands>, session: &dyn Session) -> Result<()> {
    let operation = command.as_ref().map_or("interactive", Commands::name);
    let span = LogContext::new(operation).span();
    let _entered = span.enter();

    let result = match command {
        Some(command) => execute_command_with_session(command, session),
        None => run_interactive(session),
    };

    if let Err(error) = &result {
        debug!(error = ?error, "command failed");
        session.display().status().error(&format!("{error:#}"));
    }
    result
}

/// Execute a specific command with a provided session (for testing)
pub fn execute_command_with_session(command: Commands, session: &dyn Session) -> Result<()> {
    match command {
        Commands::Login { email } => handle_login(session, email),
        Commands::Logout => handle_logout(session),
        Commands::Whoami => handle_whoami(session),
        Commands::Status => handle_status(session),
        Commands::Update {
            message,
            done,
            doing,
            blocked,
        } => handle_update(session, UpdateRequest::new(message, done, doing, blocked)),
        Commands::Agent(agent) => handle_agent(session, agent),
        Commands::Config { setting } => handle_config(session, &setting),
    }
}

fn handle_agent(session: &dyn Session, command: AgentCommands) -> Result<()> {
    match command {
        AgentCommands::Update {
            content,
            name,
            json_data,
            metadata,
        } => handle_agent_update(
            session,
            &content,
            &name,
            json_data.as_deref(),
            metadata.as_deref(),
        ),
        AgentCommands::Health(args) => handle_agent_health(session, &args),
        AgentCommands::Webhook(WebhookCommands::Register { url, secret, name }) => {
            handle_webhook_register(session, &url, secret.as_deref(), &name)
        }
        AgentCommands::Webhook(WebhookCommands::Unregister { name }) => {
            handle_webhook_unregister(session, &name)
        }
        AgentCommands::Message(MessageCommands::Send {
            to,
            content,
            message_type,
            name,
            json_data,
            expires_at,
        }) => {
            let client = agent_client(session)?;
            let metadata = parse_json("--json-data", json_data.as_deref())?;
            let request = SendMessageRequest {
                agent_name: &to,
                content: &content,
                message_type,
                metadata: metadata.as_ref(),
                expires_at: expires_at.as_deref(),
                sender_type: "agent",
                sender_name: Some(&name),
            };
            let sent = session
                .display()
                .with_spinner("Sending message...", || client.send_agent_message(&request))
                .map_err(CommandError::Api)?;
            render::message_sent(session.display(), &sent);
            Ok(())
        }
        AgentCommands::Message(MessageCommands::List { name, pending }) => {
            let client = agent_client(session)?;
            let messages = session
                .display()
                .with_spinner("Fetching messages...", || {
                    client.agent_messages(&name, pending)
                })
                .map_err(CommandError::Api)?;
            render::agent_messages(session.display(), &messages);
            Ok(())
        }
    }
}

// ----------------------------------------------------------------------
// Client construction
// ----------------------------------------------------------------------

fn resolve(session: &dyn Session) -> Result<ResolvedConfig> {
    let timeout = session.config().app_config().timeout();
    Ok(session.resolver()?.resolve(timeout))
}

/// Client for calls made with the login session; fails without a token
fn session_client(session: &dyn Session) -> Result<DailyBotClient> {
    let resolved = resolve(session)?;
    if resolved.session_token.is_none() {
        return Err(CommandError::NotLoggedIn.into());
    }
    session.network().client(resolved)
}

/// Client for agent calls; fails when neither an API key nor a token resolves
fn agent_client(session: &dyn Session) -> Result<DailyBotClient> {
    let resolved = resolve(session)?;
    if !resolved.agent_auth_mode().is_authenticated() {
        return Err(CommandError::NoAgentCredentials.into());
    }
    session.network().client(resolved)
}

/// Parse an optional JSON flag value
fn parse_json(flag: &'static str, raw: Option<&str>) -> Result<Option<Value>, CommandError> {
    raw.map(|raw| serde_json::from_str(raw).map_err(|_| CommandError::InvalidJson { flag }))
        .transpose()
}

/// Keep the first four characters of a secret, or one for short values
pub fn mask(value: &str) -> String {
    let keep = if value.chars().count() <= 4 { 1 } else { 4 };
    let prefix: String = value.chars().take(keep).collect();
    format!("{prefix}****")
}

// ----------------------------------------------------------------------
// Session commands
// ----------------------------------------------------------------------

fn handle_login(session: &dyn Session, email: Option<String>) -> Result<()> {
    let email = match email.filter(|e| !e.trim().is_empty()) {
        Some(email) => email,
        None => session.interactive().text_input("Email")?,
    };
    login(session, email.trim())
}

/// One-time-code login; persists the final verify result only
fn login(session: &dyn Session, email: &str) -> Result<()> {
    let client = session.network().client(resolve(session)?)?;
    let display = session.display();

    display.with_spinner("Sending verification code...", || client.request_code(email))?;
    display
        .status()
        .success(&format!("Verification code sent to {email}"));
    display.status().info("Check your inbox (including spam folder).");

    let code = session.interactive().text_input("Enter the 6-digit code")?;
    let code = code.trim();

    let mut result =
        display.with_spinner("Verifying code...", || client.verify_code(email, code, None))?;

    if result.needs_organization_selection() {
        if result.organizations.is_empty() {
            return Err(CommandError::InvalidSelection.into());
        }
        display
            .status()
            .info("You belong to multiple organizations. Please select one:");
        let names: Vec<&str> = result
            .organizations
            .iter()
            .map(|org| org.name.as_str())
            .collect();
        let index = session.interactive().select("Select organization", &names)?;
        let organization_id = result
            .organizations
            .get(index)
            .map(|org| org.id.clone())
            .filter(|id| !id.is_null())
            .ok_or(CommandError::InvalidSelection)?;
        debug!(%organization_id, "organization selected");

        result = display.with_spinner("Verifying...", || {
            client.verify_code(email, code, Some(&organization_id))
        })?;
    }

    let token = result.token().ok_or(CommandError::NoTokenReceived)?;
    let credentials = Credentials {
        token: token.to_string(),
        email: email.to_string(),
        organization: result.organization_name().to_string(),
        organization_uuid: result.organization_uuid().to_string(),
        api_url: Some(client.base_url().to_string()),
    };
    session
        .store()
        .save_credentials(&credentials)
        .context("Failed to save credentials")?;

    info!(email, "logged in");
    display.status().success(&format!(
        "Logged in as {email} ({})",
        credentials.organization
    ));
    Ok(())
}

fn handle_logout(session: &dyn Session) -> Result<()> {
    let resolver = session.resolver()?;
    if resolver.session_token().is_none() {
        session.display().status().info("Not logged in.");
        return Ok(());
    }

    let timeout = session.config().app_config().timeout();
    let client = session.network().client(resolver.resolve(timeout))?;
    // Revocation is best-effort; local credentials go either way
    if let Err(error) = session
        .display()
        .with_spinner("Logging out...", || client.logout())
    {
        debug!(%error, "token revocation failed");
    }

    session
        .store()
        .clear_credentials()
        .context("Failed to delete credentials")?;
    session.display().status().success("Logged out.");
    Ok(())
}

fn handle_whoami(session: &dyn Session) -> Result<()> {
    let client = session_client(session)?;
    show_auth_status(session, &client)?;
    Ok(())
}

fn show_auth_status(session: &dyn Session, client: &DailyBotClient) -> Result<(), CommandError> {
    let status = session
        .display()
        .with_spinner("Fetching account...", || client.auth_status())
        .map_err(CommandError::from_session_call)?;
    render::auth_status(session.display(), &status);
    Ok(())
}

fn handle_status(session: &dyn Session) -> Result<()> {
    let client = session_client(session)?;
    show_pending(session, &client)?;
    Ok(())
}

fn show_pending(session: &dyn Session, client: &DailyBotClient) -> Result<(), CommandError> {
    let status = session
        .display()
        .with_spinner("Fetching pending check-ins...", || client.pending_checkins())
        .map_err(CommandError::from_session_call)?;
    render::pending_checkins(session.display(), &status.pending_checkins);
    Ok(())
}

fn handle_update(session: &dyn Session, update: UpdateRequest) -> Result<()> {
    let client = session_client(session)?;
    let update = if update.is_empty() {
        read_update(session)?
    } else {
        update
    };
    submit_update(session, &client, &update)?;
    Ok(())
}

/// Free-form update typed by the user
fn read_update(session: &dyn Session) -> Result<UpdateRequest> {
    let text = session.interactive().multiline(UPDATE_PROMPT)?;
    let update = UpdateRequest::new(Some(text), None, None, None);
    if update.is_empty() {
        return Err(CommandError::EmptyUpdate.into());
    }
    Ok(update)
}

fn submit_update(
    session: &dyn Session,
    client: &DailyBotClient,
    update: &UpdateRequest,
) -> Result<(), CommandError> {
    let result = session
        .display()
        .with_spinner("Submitting update...", || client.submit_update(update))
        .map_err(CommandError::from_update_call)?;
    render::update_result(session.display(), &result);
    Ok(())
}

// ----------------------------------------------------------------------
// Agent commands
// ----------------------------------------------------------------------

fn handle_agent_update(
    session: &dyn Session,
    content: &str,
    name: &str,
    json_data: Option<&str>,
    metadata: Option<&str>,
) -> Result<()> {
    let client = agent_client(session)?;
    let structured = parse_json("--json-data", json_data)?;
    let metadata = parse_json("--metadata", metadata)?;

    let report = session
        .display()
        .with_spinner("Submitting agent report...", || {
            client.submit_agent_report(name, content, structured.as_ref(), metadata.as_ref())
        })
        .map_err(CommandError::Api)?;
    session.display().status().success(&format!(
        "Report submitted (id: {})",
        display_id(&report.id)
    ));
    Ok(())
}

fn handle_agent_health(session: &dyn Session, args: &HealthArgs) -> Result<()> {
    let client = agent_client(session)?;
    let health = if args.status {
        session
            .display()
            .with_spinner("Fetching agent health...", || client.agent_health(&args.name))
    } else {
        session
            .display()
            .with_spinner("Submitting agent health...", || {
                client.submit_agent_health(&args.name, args.ok, args.message.as_deref())
            })
    };
    let health = health.map_err(CommandError::Api)?;
    render::agent_health(session.display(), &health);
    Ok(())
}

fn handle_webhook_register(
    session: &dyn Session,
    url: &str,
    secret: Option<&str>,
    name: &str,
) -> Result<()> {
    let client = agent_client(session)?;
    let registration = session
        .display()
        .with_spinner("Registering webhook...", || {
            client.register_webhook(name, url, secret)
        })
        .map_err(CommandError::Api)?;
    render::webhook_registration(session.display(), &registration);
    Ok(())
}

fn handle_webhook_unregister(session: &dyn Session, name: &str) -> Result<()> {
    let client = agent_client(session)?;
    let response = session
        .display()
        .with_spinner("Unregistering webhook...", || client.unregister_webhook(name))
        .map_err(CommandError::Api)?;
    let message = if response.detail.is_empty() {
        "Webhook unregistered."
    } else {
        response.detail.as_str()
    };
    session.display().status().success(message);
    Ok(())
}

// ----------------------------------------------------------------------
// Local settings
// ----------------------------------------------------------------------

fn handle_config(session: &dyn Session, setting: &str) -> Result<()> {
    let (name, value) = match setting.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (setting, None),
    };

    let Some(&(_, key)) = KNOWN_SETTINGS.iter().find(|(known, _)| *known == name) else {
        let available: Vec<&str> = KNOWN_SETTINGS.iter().map(|(known, _)| *known).collect();
        return Err(CommandError::UnknownSetting {
            name: name.to_string(),
            available: available.join(", "),
        }
        .into());
    };

    let store = session.store();
    let status = session.display().status();
    match value {
        None => {
            let settings = store.load_settings().context("Failed to load settings")?;
            match settings.get(key) {
                Some(current) => status.info(&format!("{name}: {}", mask(current))),
                None => status.info(&format!("{name}: not set")),
            }
        }
        Some("") => {
            store
                .update_settings(&[(key, None)])
                .context("Failed to save settings")?;
            status.success("API key removed.");
        }
        Some(value) => {
            store
                .update_settings(&[(key, Some(value))])
                .context("Failed to save settings")?;
            status.success(&format!("API key saved ({})", mask(value)));
        }
    }
    Ok(())
}

// ----------------------------------------------------------------------
// Interactive mode
// ----------------------------------------------------------------------

/// Menu loop; logs in first when no session resolves
fn run_interactive(session: &dyn Session) -> Result<()> {
    if session.resolver()?.session_token().is_none() {
        session
            .display()
            .status()
            .info("Not logged in. Let's sign you in.");
        let email = session.interactive().text_input("Email")?;
        login(session, email.trim())?;
    }

    let client = session_client(session)?;
    if let Some(credentials) = session.resolver()?.credentials() {
        session.display().status().emphasis(&format!(
            "DailyBot CLI - {} ({})",
            credentials.email, credentials.organization
        ));
    }

    loop {
        let choice = session.interactive().select("Choose", &MENU_OPTIONS)?;
        let outcome = match choice {
            0 => read_update(session).and_then(|update| {
                submit_update(session, &client, &update)?;
                Ok(())
            }),
            1 => show_pending(session, &client).map_err(anyhow::Error::from),
            2 => show_auth_status(session, &client).map_err(anyhow::Error::from),
            _ => {
                session.display().status().info("Goodbye!");
                return Ok(());
            }
        };

        // Failures inside the loop are shown and the menu comes back
        if let Err(error) = outcome {
            session.display().status().error(&format!("{error:#}"));
        }
    }
}

#[cfg(test)]
mod tests {
    include!("commands.test.rs");
}
