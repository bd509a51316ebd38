use super::*;
use serde_json::json;

#[test]
fn verify_response_with_organization_object() {
    let resp: VerifyCodeResponse = serde_json::from_value(json!({
        "token": "tok",
        "user": {"email": "user@example.com"},
        "organization": {"name": "Acme", "uuid": "abc-123"}
    }))
    .unwrap();

    assert_eq!(resp.token(), Some("tok"));
    assert_eq!(resp.organization_name(), "Acme");
    assert_eq!(resp.organization_uuid(), "abc-123");
    assert!(!resp.needs_organization_selection());
}

#[test]
fn verify_response_with_organization_string() {
    let resp: VerifyCodeResponse = serde_json::from_value(json!({
        "token": "",
        "organization": "Acme"
    }))
    .unwrap();

    assert_eq!(resp.token(), None);
    assert_eq!(resp.organization_name(), "Acme");
    assert_eq!(resp.organization_uuid(), "");
}

#[test]
fn verify_response_with_top_level_uuid() {
    let resp: VerifyCodeResponse = serde_json::from_value(json!({
        "token": "tok",
        "organization": "Acme",
        "organization_uuid": "uuid-9"
    }))
    .unwrap();

    assert_eq!(resp.organization_uuid(), "uuid-9");
}

#[test]
fn verify_response_selection_flags() {
    let resp: VerifyCodeResponse = serde_json::from_value(json!({
        "organization_selection_required": true,
        "organizations": [
            {"id": 1, "name": "Org A", "uuid": "uuid-a"},
            {"id": null, "name": "Org B", "uuid": null}
        ]
    }))
    .unwrap();

    assert!(resp.needs_organization_selection());
    assert_eq!(resp.organizations.len(), 2);
    assert!(resp.organizations[1].id.is_null());
    assert_eq!(resp.organizations[1].uuid, "");
}

#[test]
fn verify_response_accepts_textual_organization_ids() {
    let resp: VerifyCodeResponse = serde_json::from_str(
        r#"{"requires_organization_selection": true, "organizations": [
            {"id": "a1b2", "name": "A"},
            {"name": "B"}
        ]}"#,
    )
    .unwrap();

    assert_eq!(resp.organizations[0].id, json!("a1b2"));
    assert!(resp.organizations[1].id.is_null());
}

#[test]
fn verify_request_echoes_organization_id_verbatim() {
    let id = json!("a1b2");
    let request = VerifyCodeRequest {
        email: "a@b.c",
        code: "123456",
        organization_id: Some(&id),
    };
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({"email": "a@b.c", "code": "123456", "organization_id": "a1b2"})
    );
}

#[test]
fn auth_status_email_fallbacks() {
    let status: AuthStatus = serde_json::from_value(json!({
        "user": "plain@example.com",
        "organization": {"name": "Acme", "uuid": "u"}
    }))
    .unwrap();
    assert_eq!(status.email(), "plain@example.com");

    let status: AuthStatus = serde_json::from_value(json!({
        "email": "top@example.com",
        "organization": "Acme"
    }))
    .unwrap();
    assert_eq!(status.email(), "top@example.com");
    assert_eq!(status.organization_uuid(), "");
}

#[test]
fn update_request_drops_blank_fields() {
    let req = UpdateRequest::new(Some("  ".into()), Some("shipped".into()), None, Some(String::new()));
    assert_eq!(serde_json::to_value(&req).unwrap(), json!({"done": "shipped"}));
    assert!(UpdateRequest::new(None, None, None, None).is_empty());
}

#[test]
fn null_fields_fall_back_to_defaults() {
    let msg: AgentMessage = serde_json::from_value(json!({
        "content": null,
        "sender_type": "agent",
        "sender_name": null,
        "delivered": null
    }))
    .unwrap();
    assert_eq!(msg.content, "");
    assert!(!msg.delivered);
    assert_eq!(msg.message_type(), "text");
}

#[test]
fn sender_formatting() {
    let mut msg = AgentMessage {
        sender_type: "agent".into(),
        sender_name: Some("Bot".into()),
        ..Default::default()
    };
    assert_eq!(msg.sender_prefix(), "[agent] Bot:");
    assert_eq!(msg.sender_label(), "Bot (agent)");

    msg.sender_name = Some(String::new());
    assert_eq!(msg.sender_prefix(), "[agent]:");
    assert_eq!(msg.sender_label(), "agent");

    msg.sender_type = String::new();
    assert_eq!(msg.sender_prefix(), "");
}

#[test]
fn message_request_serializes_type_lowercase() {
    let meta = json!({"pr": 42});
    let req = SendMessageRequest {
        agent_name: "Reviewer",
        content: "Review PR",
        message_type: Some(MessageType::Command),
        metadata: Some(&meta),
        expires_at: None,
        sender_type: "agent",
        sender_name: Some("CLI Agent"),
    };
    assert_eq!(
        serde_json::to_value(&req).unwrap(),
        json!({
            "agent_name": "Reviewer",
            "content": "Review PR",
            "message_type": "command",
            "metadata": {"pr": 42},
            "sender_type": "agent",
            "sender_name": "CLI Agent"
        })
    );
}

#[test]
fn ids_render_numbers_and_strings() {
    assert_eq!(display_id(&json!(42)), "42");
    assert_eq!(display_id(&json!("abc")), "abc");
    assert_eq!(display_id(&Value::Null), "N/A");
}
