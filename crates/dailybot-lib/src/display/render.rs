//! Rendering of API results
//!
//! Each function takes a display provider and a decoded response, so the
//! same rendering drives both live output and recorded test output.

use super::providers::DisplayProvider;
use crate::api::types::{
    AgentHealth, AgentMessage, AuthStatus, PendingCheckin, UpdateResult, WebhookRegistration,
    display_id,
};

pub fn update_result(display: &dyn DisplayProvider, result: &UpdateResult) {
    let status = display.status();
    if result.followups_count == 0 {
        status.warning("Update submitted but no check-ins were matched.");
        return;
    }

    status.success(&format!(
        "Update submitted to {} check-in(s)",
        result.followups_count
    ));
    let lines: Vec<String> = result
        .attached_followups
        .iter()
        .map(|followup| {
            let label = if followup.was_updated() {
                "Updated"
            } else {
                "Submitted"
            };
            format!("{} ({label})", followup.followup_name)
        })
        .collect();
    let items: Vec<&str> = lines.iter().map(String::as_str).collect();
    if !items.is_empty() {
        status.list(&items);
    }
}

pub fn pending_checkins(display: &dyn DisplayProvider, checkins: &[PendingCheckin]) {
    if checkins.is_empty() {
        display.status().info("No pending check-ins for today.");
        return;
    }

    for checkin in checkins {
        let lines: Vec<String> = checkin
            .template_questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let marker = if q.is_blocker { " [blocker]" } else { "" };
                format!("{}. {}{marker}", i + 1, q.question)
            })
            .collect();
        display.table().panel(checkin.name(), &lines);
    }
}

pub fn auth_status(display: &dyn DisplayProvider, status: &AuthStatus) {
    let mut pairs = vec![
        ("Email", status.email()),
        ("Organization", status.organization_name()),
    ];
    if !status.organization_uuid().is_empty() {
        pairs.push(("Org UUID", status.organization_uuid()));
    }
    display.table().properties("Auth Status", &pairs);
}

pub fn agent_health(display: &dyn DisplayProvider, health: &AgentHealth) {
    display.table().properties(
        "Agent Health",
        &[
            ("Agent", health.agent_name()),
            ("Status", health.status()),
            ("Last Check", health.last_check()),
        ],
    );

    if !health.history.is_empty() {
        let rows: Vec<Vec<String>> = health
            .history
            .iter()
            .map(|entry| {
                vec![
                    entry.timestamp.clone(),
                    entry.status.clone(),
                    entry.message.clone(),
                ]
            })
            .collect();
        display
            .table()
            .table("Recent History", &["Timestamp", "Status", "Message"], &rows);
    }

    if !health.pending_messages.is_empty() {
        let lines: Vec<String> = health
            .pending_messages
            .iter()
            .map(|msg| {
                let prefix = msg.sender_prefix();
                if prefix.is_empty() {
                    format!("{} ({})", msg.content, msg.created_at)
                } else {
                    format!("{prefix} {} ({})", msg.content, msg.created_at)
                }
            })
            .collect();
        display.table().panel(
            &format!("Pending messages ({})", health.pending_messages.len()),
            &lines,
        );
    }
}

pub fn webhook_registration(display: &dyn DisplayProvider, registration: &WebhookRegistration) {
    display.table().properties(
        "Webhook Registered",
        &[
            ("Agent", registration.agent_name.as_str()),
            ("Webhook URL", registration.webhook_url.as_str()),
        ],
    );
}

pub fn message_sent(display: &dyn DisplayProvider, message: &AgentMessage) {
    let id = display_id(&message.id);
    let from = message.sender_name().unwrap_or(&message.sender_type);
    display.table().properties(
        "Message Sent",
        &[
            ("ID", id.as_str()),
            ("To", message.agent_name.as_str()),
            ("From", from),
            ("Type", message.message_type()),
            ("Content", message.content.as_str()),
        ],
    );
}

pub fn agent_messages(display: &dyn DisplayProvider, messages: &[AgentMessage]) {
    if messages.is_empty() {
        display.status().info("No messages found.");
        return;
    }

    let rows: Vec<Vec<String>> = messages
        .iter()
        .map(|msg| {
            vec![
                msg.message_type().to_string(),
                msg.sender_label(),
                msg.content.clone(),
                if msg.delivered { "yes" } else { "no" }.to_string(),
                msg.created_at.clone(),
            ]
        })
        .collect();
    display.table().table(
        "Agent Messages",
        &["Type", "Sender", "Content", "Delivered", "Created"],
        &rows,
    );
}

#[cfg(test)]
mod tests {
    include!("render.test.rs");
}
