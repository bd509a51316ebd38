use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("dailybot").chain(args.iter().copied())).unwrap()
}

fn parse_err(args: &[&str]) -> clap::Error {
    Cli::try_parse_from(std::iter::once("dailybot").chain(args.iter().copied())).unwrap_err()
}

#[test]
fn test_no_subcommand_is_interactive() {
    assert!(parse(&[]).command.is_none());
}

#[test]
fn test_global_options_after_subcommand() {
    let cli = parse(&["whoami", "--api-url", "http://localhost:9000", "--net-timeout", "5"]);
    assert_eq!(cli.config.api_url.as_deref(), Some("http://localhost:9000"));
    assert_eq!(cli.config.net_timeout, 5);
    assert!(matches!(cli.command, Some(Commands::Whoami)));
}

#[test]
fn test_update_fields() {
    let cli = parse(&["update", "-d", "a", "--blocked", "b"]);
    match cli.command {
        Some(Commands::Update {
            message,
            done,
            doing,
            blocked,
        }) => {
            assert_eq!(message, None);
            assert_eq!(done.as_deref(), Some("a"));
            assert_eq!(doing, None);
            assert_eq!(blocked.as_deref(), Some("b"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_agent_update_defaults_name() {
    let cli = parse(&["agent", "update", "Deployed v2", "-j", "{\"a\":1}"]);
    match cli.command {
        Some(Commands::Agent(AgentCommands::Update {
            content,
            name,
            json_data,
            metadata,
        })) => {
            assert_eq!(content, "Deployed v2");
            assert_eq!(name, DEFAULT_AGENT_NAME);
            assert_eq!(json_data.as_deref(), Some("{\"a\":1}"));
            assert!(metadata.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_health_requires_exactly_one_mode() {
    let cli = parse(&["agent", "health", "--fail", "-m", "disk full"]);
    match cli.command {
        Some(Commands::Agent(AgentCommands::Health(args))) => {
            assert!(args.fail && !args.ok && !args.status);
            assert_eq!(args.message.as_deref(), Some("disk full"));
        }
        other => panic!("unexpected command: {other:?}"),
    }

    parse_err(&["agent", "health"]);
    parse_err(&["agent", "health", "--ok", "--fail"]);
}

#[test]
fn test_message_send_type() {
    let cli = parse(&[
        "agent", "message", "send", "--to", "Reviewer", "--content", "Go", "--type", "command",
    ]);
    match cli.command {
        Some(Commands::Agent(AgentCommands::Message(MessageCommands::Send {
            to,
            message_type,
            name,
            ..
        }))) => {
            assert_eq!(to, "Reviewer");
            assert_eq!(message_type, Some(MessageType::Command));
            assert_eq!(name, DEFAULT_AGENT_NAME);
        }
        other => panic!("unexpected command: {other:?}"),
    }

    parse_err(&["agent", "message", "send", "--to", "R", "--content", "x", "--type", "email"]);
}

#[test]
fn test_message_list_requires_name() {
    parse_err(&["agent", "message", "list"]);
    let cli = parse(&["agent", "message", "list", "--name", "Bot", "--pending"]);
    assert!(matches!(
        cli.command,
        Some(Commands::Agent(AgentCommands::Message(MessageCommands::List { pending: true, .. })))
    ));
}

#[test]
fn test_command_names() {
    assert_eq!(parse(&["logout"]).command.unwrap().name(), "logout");
    assert_eq!(
        parse(&["agent", "webhook", "unregister"]).command.unwrap().name(),
        "agent webhook"
    );
    assert!(parse(&["status"]).command.unwrap().requires_session());
    assert!(!parse(&["config", "key"]).command.unwrap().requires_session());
}
