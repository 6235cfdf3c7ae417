//! Helpdesk REST API.
//!
//! [`TicketApi`] is the seam between the inbox row and the backend. The
//! production implementation is [`HttpApi`]; tests substitute an in-memory one.

pub mod error;
pub mod http;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{MessagePage, Setting, Ticket, TicketPage, TicketStatus};

pub use error::ApiError;
pub use http::HttpApi;

/// Body of `PUT /tickets/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpdate {
    pub status: TicketStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_id: Option<u64>,
}

/// Body of `POST /messages/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub read: bool,
    pub from_me: bool,
    pub media_url: String,
    pub body: String,
}

impl OutgoingMessage {
    /// A message the agent side sends without user interaction
    pub fn automated(body: impl Into<String>) -> Self {
        Self {
            read: true,
            from_me: true,
            media_url: String::new(),
            body: body.into(),
        }
    }
}

/// Filters for `GET /tickets`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketQuery {
    pub status: Option<TicketStatus>,
    /// Include tickets owned by other agents
    pub show_all: bool,
}

impl TicketQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        pairs.push(("showAll", self.show_all.to_string()));
        pairs
    }
}

/// Operations the inbox needs from the helpdesk backend
pub trait TicketApi: Send + Sync {
    /// `PUT /tickets/{id}`
    fn update_ticket(
        &self,
        id: u64,
        update: &TicketUpdate,
    ) -> impl Future<Output = Result<Ticket>> + Send;

    /// `GET /settings`
    fn list_settings(&self) -> impl Future<Output = Result<Vec<Setting>>> + Send;

    /// `POST /messages/{id}`
    fn send_message(
        &self,
        ticket_id: u64,
        message: &OutgoingMessage,
    ) -> impl Future<Output = Result<()>> + Send;

    /// `GET /tickets`
    fn list_tickets(&self, query: &TicketQuery)
    -> impl Future<Output = Result<TicketPage>> + Send;

    /// `GET /tickets/{id}`
    fn get_ticket(&self, id: u64) -> impl Future<Output = Result<Ticket>> + Send;

    /// `GET /messages/{id}`
    fn list_messages(&self, ticket_id: u64) -> impl Future<Output = Result<MessagePage>> + Send;
}
