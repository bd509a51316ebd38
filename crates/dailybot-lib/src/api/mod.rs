//! # API Module
//!
//! Blocking client for the DailyBot CLI and agent endpoints.
//!
//! ## Modules
//!
//! - [`client`] - Header construction, transport and response classification
//! - [`types`] - Request and response payloads

pub mod client;
pub mod types;

pub use client::{DailyBotClient, SESSION_EXPIRED, classify_response, error_detail};

use std::time::Duration;
use thiserror::Error;

/// Failure of a single API call
#[derive(Debug, Error)]
pub enum ApiError {
    /// Server answered with a status >= 400
    #[error("{detail}")]
    Api { status: u16, detail: String },

    #[error("Request timed out after {}s", timeout.as_secs())]
    Timeout { timeout: Duration },

    #[error("Could not reach the DailyBot API: {source}")]
    Transport { source: reqwest::Error },

    #[error("Unexpected response from the DailyBot API: {source}")]
    Decode { source: serde_json::Error },

    #[error("Invalid API URL: {url}")]
    InvalidUrl { url: String },

    #[error("Credential contains characters that cannot be sent in an HTTP header")]
    InvalidCredential,

    #[error("Failed to build HTTP client: {source}")]
    Client { source: reqwest::Error },
}

impl ApiError {
    /// HTTP status for server-side failures
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server detail for server-side failures
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Api { detail, .. } => Some(detail),
            _ => None,
        }
    }

    /// 401 or 403
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }
}
