use crate::api::types::MessageType;
use crate::primitives::ConfigError;
use clap::{ArgGroup, Args, Parser, Subcommand};

use super::config::AppConfig;
use super::env::EnvironmentConfig;
use super::loader::load_env_files;

/// Default agent name when --name is omitted
pub const DEFAULT_AGENT_NAME: &str = "CLI Agent";

/// dailybot CLI - check-ins for humans and agents
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "dailybot")]
#[command(about = "Submit DailyBot check-ins and report agent activity from the terminal")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global configuration options
    #[command(flatten)]
    pub config: AppConfig,

    /// dailybot commands; interactive mode when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Configuration loaded from CLI and environment
pub struct CliConfig {
    pub app_config: AppConfig,
    pub command: Option<Commands>,
}

impl CliConfig {
    /// Load configuration from .env files, the environment and the command line
    pub fn load() -> Result<Self, ConfigError> {
        load_env_files()?;
        let cli = Cli::parse();
        let env = EnvironmentConfig::load()?;
        Ok(Self {
            app_config: AppConfig::from_sources(cli.config, &env)?,
            command: cli.command,
        })
    }
}

/// Available dailybot commands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Log in with a one-time code sent by email
    Login {
        /// Account email; prompted when omitted
        #[arg(long)]
        email: Option<String>,
    },

    /// Revoke the session and delete stored credentials
    Logout,

    /// Show the logged-in user and organization
    Whoami,

    /// Show pending check-ins for today
    Status,

    /// Submit a check-in update
    Update {
        /// Free-form update text; read interactively when no field is given
        message: Option<String>,

        /// What you completed
        #[arg(short, long)]
        done: Option<String>,

        /// What you are working on
        #[arg(short = 'w', long)]
        doing: Option<String>,

        /// What is blocking you
        #[arg(short, long)]
        blocked: Option<String>,
    },

    /// Agent reporting, health and messaging
    #[command(subcommand)]
    Agent(AgentCommands),

    /// Show or change a local setting (key, key=VALUE, key=)
    Config {
        #[arg(help = "Setting expression: key, key=VALUE or key=")]
        setting: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum AgentCommands {
    /// Submit an activity report
    Update {
        /// Report text
        content: String,

        #[arg(short, long, default_value = DEFAULT_AGENT_NAME)]
        name: String,

        /// Structured report payload as JSON
        #[arg(short = 'j', long)]
        json_data: Option<String>,

        /// Report metadata as JSON
        #[arg(long)]
        metadata: Option<String>,
    },

    /// Report agent health
    Health(HealthArgs),

    /// Manage the agent's webhook
    #[command(subcommand)]
    Webhook(WebhookCommands),

    /// Send and list agent messages
    #[command(subcommand)]
    Message(MessageCommands),
}

/// Exactly one of --ok, --fail or --status
#[derive(Debug, Clone, Args)]
#[command(group(ArgGroup::new("health").required(true).multiple(false)))]
pub struct HealthArgs {
    /// Report the agent as healthy
    #[arg(long, group = "health")]
    pub ok: bool,

    /// Report the agent as failing
    #[arg(long, group = "health")]
    pub fail: bool,

    /// Query the current health instead of reporting
    #[arg(long, group = "health")]
    pub status: bool,

    #[arg(short, long)]
    pub message: Option<String>,

    #[arg(short, long, default_value = DEFAULT_AGENT_NAME)]
    pub name: String,
}

#[derive(Debug, Clone, Subcommand)]
pub enum WebhookCommands {
    /// Register a webhook URL for the agent
    Register {
        #[arg(long)]
        url: String,

        #[arg(long)]
        secret: Option<String>,

        #[arg(short, long, default_value = DEFAULT_AGENT_NAME)]
        name: String,
    },

    /// Remove the agent's webhook
    Unregister {
        #[arg(short, long, default_value = DEFAULT_AGENT_NAME)]
        name: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum MessageCommands {
    /// Send a message to another agent
    Send {
        /// Recipient agent name
        #[arg(long)]
        to: String,

        #[arg(long)]
        content: String,

        #[arg(long = "type", value_enum)]
        message_type: Option<MessageType>,

        /// Sender name
        #[arg(short, long, default_value = DEFAULT_AGENT_NAME)]
        name: String,

        /// Message metadata as JSON
        #[arg(short = 'j', long)]
        json_data: Option<String>,

        /// Expiry timestamp (ISO 8601)
        #[arg(long)]
        expires_at: Option<String>,
    },

    /// List messages addressed to an agent
    List {
        #[arg(short, long)]
        name: String,

        /// Only undelivered messages
        #[arg(long)]
        pending: bool,
    },
}

impl Commands {
    /// Short name used for the command span
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Login { .. } => "login",
            Commands::Logout => "logout",
            Commands::Whoami => "whoami",
            Commands::Status => "status",
            Commands::Update { .. } => "update",
            Commands::Agent(agent) => match agent {
                AgentCommands::Update { .. } => "agent update",
                AgentCommands::Health(_) => "agent health",
                AgentCommands::Webhook(_) => "agent webhook",
                AgentCommands::Message(_) => "agent message",
            },
            Commands::Config { .. } => "config",
        }
    }

    /// Whether the command calls the API with a human session
    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            Commands::Whoami | Commands::Status | Commands::Update { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    include!("cli.test.rs");
}
