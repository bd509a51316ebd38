//! Blocking HTTP client for the DailyBot API
//!
//! Three call classes exist, each with its own header set:
//! unauthenticated (login), session (bearer token) and agent (API key with
//! bearer fallback). Every non-success response is classified into an
//! [`ApiError`]; nothing is retried.

use super::ApiError;
use super::types::*;
use crate::auth::{AuthMode, ResolvedConfig};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const X_API_KEY: &str = "x-api-key";

/// Detail shown when a bearer-authenticated agent call is rejected
pub const SESSION_EXPIRED: &str = "Session expired. Please log in again: dailybot login";

/// Classify a response by status code and body.
///
/// `mode` is the agent auth mode used for the call, `None` for
/// unauthenticated and session calls.
pub fn classify_response(
    status: StatusCode,
    body: &str,
    mode: Option<AuthMode>,
) -> Result<Option<Value>, ApiError> {
    if status.as_u16() >= 400 {
        let code = status.as_u16();
        let detail = if matches!(code, 401 | 403) && mode == Some(AuthMode::Bearer) {
            SESSION_EXPIRED.to_string()
        } else {
            error_detail(code, body)
        };
        return Err(ApiError::Api {
            status: code,
            detail,
        });
    }

    if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(body)
        .map(Some)
        .map_err(|source| ApiError::Decode { source })
}

/// Human-readable detail for an error body: `detail`, then `error`, then the
/// whole body, then the raw text, then `HTTP <code>`
pub fn error_detail(status: u16, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map
            .get("detail")
            .filter(|value| !value.is_null())
            .or_else(|| map.get("error").filter(|value| !value.is_null()))
            .map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| Value::Object(map.clone()).to_string()),
        _ if !body.is_empty() => body.to_string(),
        _ => format!("HTTP {status}"),
    }
}

fn transport_error(error: reqwest::Error, timeout: Duration) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout { timeout }
    } else {
        ApiError::Transport { source: error }
    }
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

fn secret_value(value: &str) -> Result<HeaderValue, ApiError> {
    let mut header = HeaderValue::from_str(value).map_err(|_| ApiError::InvalidCredential)?;
    header.set_sensitive(true);
    Ok(header)
}

pub struct DailyBotClient {
    http: Client,
    config: ResolvedConfig,
}

impl DailyBotClient {
    pub fn new(config: ResolvedConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("dailybot-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::Client { source })?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // ------------------------------------------------------------------
    // Headers
    // ------------------------------------------------------------------

    /// Content negotiation headers only
    pub fn unauthenticated_headers(&self) -> HeaderMap {
        json_headers()
    }

    /// Bearer token when a session token resolved
    pub fn session_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = json_headers();
        if let Some(token) = &self.config.session_token {
            headers.insert(AUTHORIZATION, secret_value(&format!("Bearer {token}"))?);
        }
        Ok(headers)
    }

    /// API key if one resolved, else bearer token, else nothing
    pub fn agent_headers(&self) -> Result<(HeaderMap, AuthMode), ApiError> {
        let mut headers = json_headers();
        let mode = self.config.agent_auth_mode();
        match mode {
            AuthMode::ApiKey => {
                if let Some(key) = &self.config.agent_api_key {
                    headers.insert(HeaderName::from_static(X_API_KEY), secret_value(key)?);
                }
            }
            AuthMode::Bearer => {
                if let Some(token) = &self.config.session_token {
                    headers.insert(AUTHORIZATION, secret_value(&format!("Bearer {token}"))?);
                }
            }
            AuthMode::Unauthenticated => {}
        }
        Ok((headers, mode))
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.config.base_url, path);
        let parsed = if query.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, query)
        };
        parsed.map_err(|_| ApiError::InvalidUrl { url: raw })
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        headers: HeaderMap,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path, query)?;
        Ok(self
            .http
            .request(method, url)
            .headers(headers)
            .timeout(self.config.timeout))
    }

    fn send(
        &self,
        request: RequestBuilder,
        mode: Option<AuthMode>,
        timeout: Duration,
    ) -> Result<Option<Value>, ApiError> {
        let response = request.send().map_err(|e| transport_error(e, timeout))?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url().path(), "response");

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.text().map_err(|e| transport_error(e, timeout))?;

        classify_response(status, &body, mode)
    }

    /// Decode a classified body; an empty result decodes as the default value
    fn decode<T: DeserializeOwned + Default>(value: Option<Value>) -> Result<T, ApiError> {
        match value {
            Some(value) => {
                serde_json::from_value(value).map_err(|source| ApiError::Decode { source })
            }
            None => Ok(T::default()),
        }
    }

    fn unauthenticated<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        debug!(%method, path, auth = "none", "request");
        let request = self
            .request(method, path, &[], self.unauthenticated_headers())?
            .json(body);
        Self::decode(self.send(request, None, self.config.timeout)?)
    }

    fn session<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        timeout: Duration,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        debug!(%method, path, auth = "session", "request");
        let mut request = self
            .request(method, path, &[], self.session_headers()?)?
            .timeout(timeout);
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::decode(self.send(request, None, timeout)?)
    }

    fn agent<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let (headers, mode) = self.agent_headers()?;
        debug!(%method, path, auth = %mode, "request");
        let mut request = self.request(method, path, query, headers)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::decode(self.send(request, Some(mode), self.config.timeout)?)
    }

    // ------------------------------------------------------------------
    // Auth endpoints
    // ------------------------------------------------------------------

    pub fn request_code(&self, email: &str) -> Result<DetailResponse, ApiError> {
        self.unauthenticated(
            Method::POST,
            "/v1/cli/auth/request-code/",
            &RequestCodeRequest { email },
        )
    }

    pub fn verify_code(
        &self,
        email: &str,
        code: &str,
        organization_id: Option<&Value>,
    ) -> Result<VerifyCodeResponse, ApiError> {
        self.unauthenticated(
            Method::POST,
            "/v1/cli/auth/verify-code/",
            &VerifyCodeRequest {
                email,
                code,
                organization_id,
            },
        )
    }

    pub fn auth_status(&self) -> Result<AuthStatus, ApiError> {
        self.session::<(), _>(
            Method::GET,
            "/v1/cli/auth/status/",
            None,
            self.config.timeout,
        )
    }

    pub fn logout(&self) -> Result<DetailResponse, ApiError> {
        self.session::<(), _>(
            Method::POST,
            "/v1/cli/auth/logout/",
            None,
            self.config.timeout,
        )
    }

    // ------------------------------------------------------------------
    // Updates and check-ins
    // ------------------------------------------------------------------

    /// Submit a check-in update with the extended timeout
    pub fn submit_update(&self, update: &UpdateRequest) -> Result<UpdateResult, ApiError> {
        self.session(
            Method::POST,
            "/v1/cli/updates/",
            Some(update),
            self.config.update_timeout,
        )
    }

    pub fn pending_checkins(&self) -> Result<PendingStatus, ApiError> {
        self.session::<(), _>(Method::GET, "/v1/cli/status/", None, self.config.timeout)
    }

    // ------------------------------------------------------------------
    // Agent endpoints
    // ------------------------------------------------------------------

    pub fn submit_agent_report(
        &self,
        agent_name: &str,
        content: &str,
        structured: Option<&Value>,
        metadata: Option<&Value>,
    ) -> Result<AgentReport, ApiError> {
        let body = AgentReportRequest {
            agent_name,
            content,
            structured,
            metadata,
        };
        self.agent(Method::POST, "/v1/agent-reports/", &[], Some(&body))
    }

    pub fn submit_agent_health(
        &self,
        agent_name: &str,
        ok: bool,
        message: Option<&str>,
    ) -> Result<AgentHealth, ApiError> {
        let body = AgentHealthRequest {
            agent_name,
            ok,
            message,
        };
        self.agent(Method::POST, "/v1/agent-health/", &[], Some(&body))
    }

    pub fn agent_health(&self, agent_name: &str) -> Result<AgentHealth, ApiError> {
        self.agent::<(), _>(
            Method::GET,
            "/v1/agent-health/",
            &[("agent_name", agent_name)],
            None,
        )
    }

    pub fn register_webhook(
        &self,
        agent_name: &str,
        webhook_url: &str,
        webhook_secret: Option<&str>,
    ) -> Result<WebhookRegistration, ApiError> {
        let body = WebhookRequest {
            agent_name,
            webhook_url,
            webhook_secret,
        };
        self.agent(Method::POST, "/v1/agent-webhook/", &[], Some(&body))
    }

    pub fn unregister_webhook(&self, agent_name: &str) -> Result<DetailResponse, ApiError> {
        self.agent::<(), _>(
            Method::DELETE,
            "/v1/agent-webhook/",
            &[("agent_name", agent_name)],
            None,
        )
    }

    pub fn send_agent_message(
        &self,
        message: &SendMessageRequest<'_>,
    ) -> Result<AgentMessage, ApiError> {
        self.agent(Method::POST, "/v1/agent-messages/", &[], Some(message))
    }

    /// Messages addressed to `agent_name`; `pending_only` limits to undelivered
    pub fn agent_messages(
        &self,
        agent_name: &str,
        pending_only: bool,
    ) -> Result<Vec<AgentMessage>, ApiError> {
        let mut query = vec![("agent_name", agent_name)];
        if pending_only {
            query.push(("delivered", "false"));
        }
        self.agent::<(), _>(Method::GET, "/v1/agent-messages/", &query, None)
    }
}

#[cfg(test)]
mod tests {
    include!("client.test.rs");
}
