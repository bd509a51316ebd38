use super::*;
use mockito::{Matcher, Server};
use serde_json::json;
use std::net::TcpListener;

fn client_for(config: ResolvedConfig) -> DailyBotClient {
    DailyBotClient::new(config).unwrap()
}

#[test]
fn agent_headers_prefer_api_key() {
    let client = client_for(
        ResolvedConfig::anonymous("https://api.example.com")
            .with_session_token("tok")
            .with_agent_api_key("key"),
    );
    let (headers, mode) = client.agent_headers().unwrap();

    assert_eq!(mode, AuthMode::ApiKey);
    assert_eq!(headers.get(X_API_KEY).unwrap(), "key");
    assert!(headers.get(AUTHORIZATION).is_none());
}

#[test]
fn agent_headers_fall_back_to_bearer() {
    let client = client_for(ResolvedConfig::anonymous("https://api.example.com").with_session_token("tok"));
    let (headers, mode) = client.agent_headers().unwrap();

    assert_eq!(mode, AuthMode::Bearer);
    assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
    assert!(headers.get(X_API_KEY).is_none());
}

#[test]
fn agent_headers_without_credentials() {
    let client = client_for(ResolvedConfig::anonymous("https://api.example.com"));
    let (headers, mode) = client.agent_headers().unwrap();

    assert_eq!(mode, AuthMode::Unauthenticated);
    assert!(headers.get(AUTHORIZATION).is_none());
    assert!(headers.get(X_API_KEY).is_none());
    assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
}

#[test]
fn session_headers_only_carry_token_when_present() {
    let client = client_for(ResolvedConfig::anonymous("https://api.example.com"));
    assert!(client.session_headers().unwrap().get(AUTHORIZATION).is_none());
    assert!(client.unauthenticated_headers().get(AUTHORIZATION).is_none());

    let client = client_for(ResolvedConfig::anonymous("https://api.example.com").with_session_token("tok"));
    assert_eq!(
        client.session_headers().unwrap().get(AUTHORIZATION).unwrap(),
        "Bearer tok"
    );
}

#[test]
fn classify_rewrites_bearer_auth_failures() {
    for code in [401, 403] {
        let status = StatusCode::from_u16(code).unwrap();
        let err = classify_response(status, r#"{"detail": "Invalid token."}"#, Some(AuthMode::Bearer))
            .unwrap_err();
        assert_eq!(err.status(), Some(code));
        assert_eq!(err.to_string(), SESSION_EXPIRED);
    }
}

#[test]
fn classify_passes_through_api_key_and_session_failures() {
    let err = classify_response(
        StatusCode::UNAUTHORIZED,
        r#"{"detail": "Invalid API key."}"#,
        Some(AuthMode::ApiKey),
    )
    .unwrap_err();
    assert_eq!(err.detail(), Some("Invalid API key."));

    let err = classify_response(StatusCode::FORBIDDEN, r#"{"detail": "Nope"}"#, None).unwrap_err();
    assert_eq!(err.detail(), Some("Nope"));
    assert!(err.is_auth_failure());
}

#[test]
fn classify_no_content_is_empty() {
    assert!(classify_response(StatusCode::NO_CONTENT, "", None).unwrap().is_none());
    assert!(classify_response(StatusCode::NO_CONTENT, "garbage", None).unwrap().is_none());
}

#[test]
fn classify_success_parses_json() {
    let value = classify_response(StatusCode::OK, r#"{"id": 7}"#, None)
        .unwrap()
        .unwrap();
    assert_eq!(value, json!({"id": 7}));

    let err = classify_response(StatusCode::OK, "<html>", None).unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}

#[test]
fn error_detail_fallback_chain() {
    assert_eq!(error_detail(400, r#"{"detail": "bad", "error": "x"}"#), "bad");
    assert_eq!(error_detail(400, r#"{"error": "oops"}"#), "oops");
    assert_eq!(error_detail(400, r#"{"detail": {"field": "required"}}"#), r#"{"field":"required"}"#);
    assert_eq!(error_detail(400, r#"{"message": "m"}"#), r#"{"message":"m"}"#);
    assert_eq!(error_detail(500, "Internal Server Error"), "Internal Server Error");
    assert_eq!(error_detail(500, r#"["a"]"#), r#"["a"]"#);
    assert_eq!(error_detail(502, ""), "HTTP 502");
}

#[test]
fn error_detail_skips_null_fields() {
    assert_eq!(error_detail(400, r#"{"detail": null, "error": "bad"}"#), "bad");
    assert_eq!(
        error_detail(400, r#"{"detail": null, "error": null}"#),
        r#"{"detail":null,"error":null}"#
    );
}

#[test]
fn submit_update_sends_bearer_and_payload() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/cli/updates/")
        .match_header("authorization", "Bearer tok")
        .match_body(Matcher::Json(json!({"message": "Shipped it", "blocked": "CI"})))
        .with_status(201)
        .with_body(r#"{"followups_count": 1, "attached_followups": [{"followup_name": "Daily", "action": "updated"}]}"#)
        .create();

    let client = client_for(ResolvedConfig::anonymous(&server.url()).with_session_token("tok"));
    let update = UpdateRequest::new(Some("Shipped it".into()), None, None, Some("CI".into()));
    let result = client.submit_update(&update).unwrap();

    mock.assert();
    assert_eq!(result.followups_count, 1);
    assert!(result.attached_followups[0].was_updated());
}

#[test]
fn verify_code_omits_absent_organization() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/cli/auth/verify-code/")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::Json(json!({"email": "a@b.c", "code": "123456"})))
        .with_status(200)
        .with_body(r#"{"token": "tok", "organization": {"name": "Acme", "uuid": "u-1"}}"#)
        .create();

    let client = client_for(ResolvedConfig::anonymous(&server.url()).with_session_token("stale"));
    let resp = client.verify_code("a@b.c", "123456", None).unwrap();

    mock.assert();
    assert_eq!(resp.token(), Some("tok"));
}

#[test]
fn agent_call_with_bearer_reports_session_expired() {
    let mut server = Server::new();
    server
        .mock("POST", "/v1/agent-reports/")
        .with_status(401)
        .with_body(r#"{"detail": "Authentication credentials were not provided."}"#)
        .create();

    let client = client_for(ResolvedConfig::anonymous(&server.url()).with_session_token("tok"));
    let err = client
        .submit_agent_report("CLI Agent", "done", None, None)
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), SESSION_EXPIRED);
}

#[test]
fn agent_call_with_api_key_keeps_server_detail() {
    let mut server = Server::new();
    server
        .mock("POST", "/v1/agent-health/")
        .match_header("x-api-key", "bad-key")
        .with_status(403)
        .with_body(r#"{"detail": "Invalid API key."}"#)
        .create();

    let client = client_for(ResolvedConfig::anonymous(&server.url()).with_agent_api_key("bad-key"));
    let err = client.submit_agent_health("CLI Agent", true, None).unwrap_err();

    assert_eq!(err.to_string(), "Invalid API key.");
}

#[test]
fn message_list_filters_pending() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/v1/agent-messages/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("agent_name".into(), "Code Reviewer".into()),
            Matcher::UrlEncoded("delivered".into(), "false".into()),
        ]))
        .with_status(200)
        .with_body(r#"[{"content": "hi", "sender_type": "agent", "delivered": false}]"#)
        .create();

    let client = client_for(ResolvedConfig::anonymous(&server.url()).with_agent_api_key("key"));
    let messages = client.agent_messages("Code Reviewer", true).unwrap();

    mock.assert();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "hi");
}

#[test]
fn unregister_webhook_accepts_no_content() {
    let mut server = Server::new();
    let mock = server
        .mock("DELETE", "/v1/agent-webhook/")
        .match_query(Matcher::UrlEncoded("agent_name".into(), "CLI Agent".into()))
        .with_status(204)
        .create();

    let client = client_for(ResolvedConfig::anonymous(&server.url()).with_agent_api_key("key"));
    let resp = client.unregister_webhook("CLI Agent").unwrap();

    mock.assert();
    assert!(resp.detail.is_empty());
}

#[test]
fn unresponsive_server_times_out() {
    // accepts connections but never answers
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let client = client_for(
        ResolvedConfig::anonymous(&url)
            .with_session_token("tok")
            .with_timeouts(Duration::from_millis(200), Duration::from_millis(300)),
    );
    let err = client
        .submit_update(&UpdateRequest::new(Some("hello".into()), None, None, None))
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
    assert_eq!(err.status(), None);
}

#[test]
fn unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = client_for(ResolvedConfig::anonymous(&url).with_session_token("tok"));
    let err = client.pending_checkins().unwrap_err();

    assert!(matches!(err, ApiError::Transport { .. }), "got {err:?}");
}
