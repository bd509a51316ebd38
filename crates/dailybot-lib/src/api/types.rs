//! Wire types for the DailyBot CLI and agent endpoints
//!
//! Responses are decoded leniently: missing or `null` fields fall back to
//! their defaults so that older servers and partial payloads still render.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treat an explicit `null` like a missing field
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Render a server id that may be numeric or textual
pub fn display_id(id: &Value) -> String {
    match id {
        Value::Null => "N/A".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// AUTH
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RequestCodeRequest<'a> {
    pub email: &'a str,
}

/// Generic `{"detail": "..."}` acknowledgement
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailResponse {
    #[serde(default, deserialize_with = "nullable")]
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyCodeRequest<'a> {
    pub email: &'a str,
    pub code: &'a str,
    /// Echoed back exactly as the server listed it (numeric or textual)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<&'a Value>,
}

/// Organization offered when an account belongs to several
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrganizationChoice {
    /// `Null` when the server left it out
    #[serde(default)]
    pub id: Value,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub uuid: String,
}

/// Organization reference: a full object or just a name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OrganizationRef {
    Detailed {
        #[serde(default, deserialize_with = "nullable")]
        name: String,
        #[serde(default, deserialize_with = "nullable")]
        uuid: String,
    },
    Name(String),
}

impl OrganizationRef {
    pub fn name(&self) -> &str {
        match self {
            OrganizationRef::Detailed { name, .. } => name,
            OrganizationRef::Name(name) => name,
        }
    }

    pub fn uuid(&self) -> &str {
        match self {
            OrganizationRef::Detailed { uuid, .. } => uuid,
            OrganizationRef::Name(_) => "",
        }
    }
}

/// User reference: a full object or just an email
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Detailed {
        #[serde(default, deserialize_with = "nullable")]
        email: String,
    },
    Email(String),
}

impl UserRef {
    pub fn email(&self) -> &str {
        match self {
            UserRef::Detailed { email } => email,
            UserRef::Email(email) => email,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyCodeResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub requires_organization_selection: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub organization_selection_required: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub organizations: Vec<OrganizationChoice>,
    #[serde(default)]
    pub organization: Option<OrganizationRef>,
    /// Sent next to a plain organization name
    #[serde(default)]
    pub organization_uuid: Option<String>,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub email: Option<String>,
}

impl VerifyCodeResponse {
    pub fn needs_organization_selection(&self) -> bool {
        self.requires_organization_selection || self.organization_selection_required
    }

    /// Token, if the server issued a non-empty one
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }

    pub fn organization_name(&self) -> &str {
        self.organization.as_ref().map_or("", OrganizationRef::name)
    }

    pub fn organization_uuid(&self) -> &str {
        match &self.organization {
            Some(OrganizationRef::Detailed { uuid, .. }) => uuid,
            _ => self.organization_uuid.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthStatus {
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub organization: Option<OrganizationRef>,
}

impl AuthStatus {
    pub fn email(&self) -> &str {
        self.user
            .as_ref()
            .map(UserRef::email)
            .filter(|email| !email.is_empty())
            .or(self.email.as_deref())
            .unwrap_or("")
    }

    pub fn organization_name(&self) -> &str {
        self.organization.as_ref().map_or("", OrganizationRef::name)
    }

    pub fn organization_uuid(&self) -> &str {
        self.organization.as_ref().map_or("", OrganizationRef::uuid)
    }
}

// ============================================================================
// UPDATES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<String>,
}

impl UpdateRequest {
    /// Build from raw inputs, dropping empty fields
    pub fn new(
        message: Option<String>,
        done: Option<String>,
        doing: Option<String>,
        blocked: Option<String>,
    ) -> Self {
        let keep = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Self {
            message: keep(message),
            done: keep(done),
            doing: keep(doing),
            blocked: keep(blocked),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.done.is_none() && self.doing.is_none() && self.blocked.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachedFollowup {
    #[serde(default, deserialize_with = "nullable")]
    pub followup_name: String,
    #[serde(default)]
    pub action: Option<String>,
}

impl AttachedFollowup {
    pub fn was_updated(&self) -> bool {
        self.action.as_deref() == Some("updated")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateResult {
    #[serde(default, deserialize_with = "nullable")]
    pub followups_count: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub attached_followups: Vec<AttachedFollowup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateQuestion {
    #[serde(default, deserialize_with = "nullable")]
    pub question: String,
    #[serde(default, deserialize_with = "nullable")]
    pub is_blocker: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PendingCheckin {
    #[serde(default)]
    pub followup_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub template_questions: Vec<TemplateQuestion>,
}

impl PendingCheckin {
    pub fn name(&self) -> &str {
        self.followup_name.as_deref().unwrap_or("Check-in")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PendingStatus {
    #[serde(default, deserialize_with = "nullable")]
    pub pending_checkins: Vec<PendingCheckin>,
}

// ============================================================================
// AGENTS
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AgentReportRequest<'a> {
    pub agent_name: &'a str,
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentReport {
    #[serde(default)]
    pub id: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentHealthRequest<'a> {
    pub agent_name: &'a str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthEntry {
    #[serde(default, deserialize_with = "nullable")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentHealth {
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_check: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub history: Vec<HealthEntry>,
    #[serde(default, deserialize_with = "nullable")]
    pub pending_messages: Vec<AgentMessage>,
}

impl AgentHealth {
    pub fn agent_name(&self) -> &str {
        self.agent_name.as_deref().unwrap_or("Unknown")
    }

    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("unknown")
    }

    pub fn last_check(&self) -> &str {
        self.last_check.as_deref().unwrap_or("N/A")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookRequest<'a> {
    pub agent_name: &'a str,
    pub webhook_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_secret: Option<&'a str>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookRegistration {
    #[serde(default, deserialize_with = "nullable")]
    pub agent_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub webhook_url: String,
}

/// Kind of message exchanged between agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Command,
    System,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest<'a> {
    pub agent_name: &'a str,
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<MessageType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<&'a str>,
    pub sender_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<&'a str>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentMessage {
    #[serde(default)]
    pub id: Value,
    #[serde(default, deserialize_with = "nullable")]
    pub agent_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
    #[serde(default)]
    pub message_type: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub sender_type: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub delivered: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub created_at: String,
}

impl AgentMessage {
    pub fn message_type(&self) -> &str {
        self.message_type.as_deref().unwrap_or("text")
    }

    pub fn sender_name(&self) -> Option<&str> {
        self.sender_name.as_deref().filter(|name| !name.is_empty())
    }

    /// `[type] name:` / `[type]:` prefix, empty when the sender is unknown
    pub fn sender_prefix(&self) -> String {
        match (self.sender_type.as_str(), self.sender_name()) {
            (kind, Some(name)) => format!("[{kind}] {name}:"),
            ("", None) => String::new(),
            (kind, None) => format!("[{kind}]:"),
        }
    }

    /// `name (type)` when named, otherwise just the type
    pub fn sender_label(&self) -> String {
        match self.sender_name() {
            Some(name) => format!("{name} ({})", self.sender_type),
            None => self.sender_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    include!("types.test.rs");
}
