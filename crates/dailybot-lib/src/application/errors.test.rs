use super::*;
use std::time::Duration;

fn api(status: u16, detail: &str) -> ApiError {
    ApiError::Api {
        status,
        detail: detail.to_string(),
    }
}

#[test]
fn test_session_auth_failures_become_expired() {
    for status in [401, 403] {
        let error = CommandError::from_session_call(api(status, "Invalid token."));
        assert!(matches!(error, CommandError::SessionExpired));
        assert_eq!(
            error.to_string(),
            "Session expired. Please log in again: dailybot login"
        );
    }
}

#[test]
fn test_other_session_failures_keep_detail() {
    let error = CommandError::from_session_call(api(500, "Server exploded"));
    assert_eq!(error.to_string(), "Server exploded");
}

#[test]
fn test_update_timeout_advises_checking_status() {
    let error = CommandError::from_update_call(ApiError::Timeout {
        timeout: Duration::from_secs(120),
    });
    let message = error.to_string();
    assert!(message.contains("120s"));
    assert!(message.contains("dailybot status"));
}

#[test]
fn test_update_processing_failure_mentions_support() {
    let error = CommandError::from_update_call(api(400, "Update processing failed."));
    assert!(matches!(error, CommandError::UpdateNotProcessed { .. }));
    assert!(error.to_string().contains("support@dailybot.com"));

    let error = CommandError::from_update_call(api(401, "expired"));
    assert!(matches!(error, CommandError::SessionExpired));
}

#[test]
fn test_agent_credentials_message_names_both_paths() {
    let message = CommandError::NoAgentCredentials.to_string();
    assert!(message.contains("dailybot config key=<KEY>"));
    assert!(message.contains("DAILYBOT_API_KEY"));
    assert!(message.contains("dailybot login"));
}
