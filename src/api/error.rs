//! Mapping of non-2xx helpdesk responses into [`DeskError`].

use std::fmt;

use serde::Deserialize;

use crate::error::DeskError;

/// Error body shapes the backend uses
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// A rejected API request
#[derive(Debug)]
pub struct ApiError {
    pub status: reqwest::StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: reqwest::StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Build from a response body, preferring the server's own error text
    pub fn from_body(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .error
            .or(parsed.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    status.canonical_reason().unwrap_or("Unknown").to_string()
                } else {
                    trimmed.to_string()
                }
            });
        Self::new(status, message)
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.status.as_u16())
    }
}

impl From<ApiError> for DeskError {
    fn from(error: ApiError) -> Self {
        DeskError::Api {
            status: error.status,
            message: error.message,
        }
    }
}
