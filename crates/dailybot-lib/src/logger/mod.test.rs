use super::*;

#[test]
fn test_log_context_creation() {
    let context = LogContext::new("login");
    assert_eq!(context.operation, "login");
}

#[test]
fn test_filter_directive_quiets_http_crates() {
    let filter = Logger::filter_directive(LogLevel::Debug);
    assert!(filter.starts_with("dailybot=debug,dailybot_lib=debug"));
    assert!(filter.contains("reqwest=warn"));
    assert!(filter.contains("hyper_util=warn"));
    assert!(filter.ends_with(",debug"));
}

#[test]
fn test_filter_directive_parses() {
    for level in [LogLevel::Error, LogLevel::Warning, LogLevel::Trace] {
        let directive = Logger::filter_directive(level);
        assert!(EnvFilter::try_new(&directive).is_ok(), "{directive}");
    }
}

#[test]
fn test_ensure_init_tolerates_repeat_only() {
    let config = LoggerConfig {
        level: LogLevel::Error,
        format: LogFormat::Text,
        output: LogOutput::Stderr,
        ansi: false,
    };

    let first = Logger::ensure_init(config.clone()).unwrap();
    let second = Logger::ensure_init(config.clone()).unwrap();
    assert!(std::ptr::eq(first, second));

    assert!(matches!(
        Logger::init(config),
        Err(LoggerError::AlreadyInitialized)
    ));
}

#[test]
fn test_logger_global_consistent() {
    // Initialization is one-way, so a set flag implies a global instance
    if Logger::is_initialized() {
        assert!(Logger::global().is_some());
    }
}
