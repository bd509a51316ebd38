use super::*;
use crate::display::{DisplayCall, MockDisplayProvider};
use serde_json::json;

fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
    serde_json::from_value(value).unwrap()
}

#[test]
fn update_result_lists_attached_followups() {
    let display = MockDisplayProvider::new();
    let result: UpdateResult = decode(json!({
        "followups_count": 2,
        "attached_followups": [
            {"followup_name": "Daily Standup", "action": "updated"},
            {"followup_name": "Retro", "action": "created"}
        ]
    }));

    update_result(&display, &result);

    assert!(display.has_call(&DisplayCall::StatusSuccess {
        message: "Update submitted to 2 check-in(s)".into()
    }));
    assert!(display.has_call(&DisplayCall::StatusList {
        items: vec![
            "Daily Standup (Updated)".into(),
            "Retro (Submitted)".into()
        ]
    }));
}

#[test]
fn update_result_warns_when_nothing_matched() {
    let display = MockDisplayProvider::new();
    update_result(&display, &UpdateResult::default());

    assert_eq!(display.count_calls("status_warning"), 1);
    assert_eq!(display.count_calls("status_success"), 0);
}

#[test]
fn pending_checkins_empty_and_blockers() {
    let display = MockDisplayProvider::new();
    pending_checkins(&display, &[]);
    assert!(display.has_call(&DisplayCall::StatusInfo {
        message: "No pending check-ins for today.".into()
    }));

    let display = MockDisplayProvider::new();
    let status: crate::api::types::PendingStatus = decode(json!({
        "pending_checkins": [{
            "template_questions": [
                {"question": "What did you do?"},
                {"question": "Anything blocking?", "is_blocker": true}
            ]
        }]
    }));
    pending_checkins(&display, &status.pending_checkins);

    assert!(display.has_call(&DisplayCall::StructuredPanel {
        title: "Check-in".into(),
        lines: vec![
            "1. What did you do?".into(),
            "2. Anything blocking? [blocker]".into()
        ]
    }));
}

#[test]
fn auth_status_hides_missing_uuid() {
    let display = MockDisplayProvider::new();
    let status: AuthStatus = decode(json!({"user": {"email": "a@b.c"}, "organization": "Acme"}));
    auth_status(&display, &status);

    assert!(display.has_call(&DisplayCall::StructuredProperties {
        title: "Auth Status".into(),
        pairs: vec![
            ("Email".into(), "a@b.c".into()),
            ("Organization".into(), "Acme".into())
        ]
    }));
}

#[test]
fn agent_health_with_history_and_messages() {
    let display = MockDisplayProvider::new();
    let health: AgentHealth = decode(json!({
        "agent_name": "Builder",
        "status": "healthy",
        "history": [{"timestamp": "t1", "status": "healthy", "message": "ok"}],
        "pending_messages": [
            {"content": "Deploy", "sender_type": "human", "sender_name": "Ana", "created_at": "t2"},
            {"content": "Ping", "created_at": "t3"}
        ]
    }));
    agent_health(&display, &health);

    assert!(display.shows("Last Check: N/A"));
    assert_eq!(display.count_calls("structured_table"), 1);
    assert!(display.has_call(&DisplayCall::StructuredPanel {
        title: "Pending messages (2)".into(),
        lines: vec!["[human] Ana: Deploy (t2)".into(), "Ping (t3)".into()]
    }));
}

#[test]
fn message_sent_falls_back_to_sender_type() {
    let display = MockDisplayProvider::new();
    let message: AgentMessage = decode(json!({
        "id": 12,
        "agent_name": "Reviewer",
        "content": "Review PR",
        "sender_type": "agent"
    }));
    message_sent(&display, &message);

    assert!(display.shows("ID: 12"));
    assert!(display.shows("From: agent"));
    assert!(display.shows("Type: text"));
}

#[test]
fn agent_messages_table_rows() {
    let display = MockDisplayProvider::new();
    agent_messages(&display, &[]);
    assert!(display.shows("No messages found."));

    let display = MockDisplayProvider::new();
    let messages: Vec<AgentMessage> = decode(json!([
        {"message_type": "command", "sender_type": "agent", "sender_name": "Bot",
         "content": "run", "delivered": true, "created_at": "t"}
    ]));
    agent_messages(&display, &messages);

    assert!(display.has_call(&DisplayCall::StructuredTable {
        title: "Agent Messages".into(),
        headers: vec![
            "Type".into(),
            "Sender".into(),
            "Content".into(),
            "Delivered".into(),
            "Created".into()
        ],
        rows: vec![vec![
            "command".into(),
            "Bot (agent)".into(),
            "run".into(),
            "yes".into(),
            "t".into()
        ]]
    }));
}
