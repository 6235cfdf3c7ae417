use thiserror::Error;

use crate::lifecycle::Transition;
use crate::types::TicketStatus;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("ticket '{0}' not found")]
    TicketNotFound(u64),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("cannot {transition} a ticket that is {status}")]
    InvalidTransition {
        transition: Transition,
        status: TicketStatus,
    },

    #[error("ticket {0} already has a transition in flight")]
    Busy(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("API error ({status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

impl DeskError {
    /// Whether the server answered and refused the request, as opposed to a
    /// transport failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, DeskError::Api { .. } | DeskError::TicketNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, DeskError>;
