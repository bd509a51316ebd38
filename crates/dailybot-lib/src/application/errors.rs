//! Command-level failures
//!
//! Each variant's message is what the user sees; the dispatcher prints it
//! once and exits non-zero.

use crate::api::{ApiError, SESSION_EXPIRED};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Not logged in. Run: dailybot login")]
    NotLoggedIn,

    #[error(
        "No agent credentials. Set an API key with 'dailybot config key=<KEY>' or \
         DAILYBOT_API_KEY, or log in with 'dailybot login'."
    )]
    NoAgentCredentials,

    #[error("{}", SESSION_EXPIRED)]
    SessionExpired,

    #[error("Invalid JSON in {flag}.")]
    InvalidJson { flag: &'static str },

    #[error("Empty update. Nothing sent.")]
    EmptyUpdate,

    #[error(
        "The update request timed out after {seconds}s. It may already have been processed; \
         run 'dailybot status' before submitting it again."
    )]
    UpdateTimedOut { seconds: u64 },

    #[error(
        "DailyBot could not process your update. Please try again later or contact \
         support@dailybot.com. ({detail})"
    )]
    UpdateNotProcessed { detail: String },

    #[error("Unknown setting '{name}'. Available: {available}")]
    UnknownSetting { name: String, available: String },

    #[error("Invalid selection.")]
    InvalidSelection,

    #[error("Authentication failed: no token received.")]
    NoTokenReceived,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CommandError {
    /// Failure of a call made with the login session
    ///
    /// Authentication rejections mean the stored session is no longer usable.
    pub fn from_session_call(error: ApiError) -> Self {
        if error.is_auth_failure() {
            CommandError::SessionExpired
        } else {
            CommandError::Api(error)
        }
    }

    /// Failure of an update submission
    pub fn from_update_call(error: ApiError) -> Self {
        if let ApiError::Timeout { timeout } = &error {
            return CommandError::UpdateTimedOut {
                seconds: timeout.as_secs(),
            };
        }
        if let Some(detail) = error.detail() {
            if detail.to_lowercase().contains("processing failed") {
                return CommandError::UpdateNotProcessed {
                    detail: detail.to_string(),
                };
            }
        }
        Self::from_session_call(error)
    }
}

#[cfg(test)]
mod tests {
    include!("errors.test.rs");
}
