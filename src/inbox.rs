//! Inbox-level context shared by every row.
//!
//! The inbox owns two things its rows talk to:
//! - [`InboxEvents`], the outbound channel for navigation, tab switches and
//!   error reports
//! - [`SelectionContext`], the current-ticket store (one value, many readers)

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::DeskError;

/// A location in the inbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/tickets/`
    TicketList,
    /// `/tickets/{uuid}`
    TicketDetail(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::TicketList => "/tickets/".to_string(),
            Route::TicketDetail(uuid) => format!("/tickets/{uuid}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path())
    }
}

/// Inbox tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Open,
    Pending,
    Closed,
    Search,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Open => write!(f, "open"),
            Tab::Pending => write!(f, "pending"),
            Tab::Closed => write!(f, "closed"),
            Tab::Search => write!(f, "search"),
        }
    }
}

/// Something a row asks the surrounding inbox to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InboxEvent {
    Navigate(Route),
    ChangeTab(Tab),
    Error(String),
}

/// Sending half of the inbox event channel
#[derive(Debug, Clone)]
pub struct InboxEvents {
    tx: mpsc::UnboundedSender<InboxEvent>,
}

impl InboxEvents {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<InboxEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, event: InboxEvent) {
        if self.tx.send(event).is_err() {
            debug!("inbox event dropped, receiver gone");
        }
    }

    pub fn navigate(&self, route: Route) {
        self.emit(InboxEvent::Navigate(route));
    }

    pub fn change_tab(&self, tab: Tab) {
        self.emit(InboxEvent::ChangeTab(tab));
    }

    /// Report a failure to the agent. `context` says what was being attempted.
    pub fn report(&self, context: &str, error: &DeskError) {
        warn!("{context}: {error}");
        self.emit(InboxEvent::Error(format!("{context}: {error}")));
    }
}

/// The ticket the agent has opened in the detail pane.
///
/// `token` is fresh on every selection, so picking the same ticket twice is
/// still observable as a change (readers use it to force a detail refresh).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub id: u64,
    pub uuid: String,
    pub token: Uuid,
}

impl Selection {
    pub fn new(id: u64, uuid: impl Into<String>) -> Self {
        Self {
            id,
            uuid: uuid.into(),
            token: Uuid::new_v4(),
        }
    }
}

/// Current-selection store owned by the inbox and lent to its rows
#[derive(Debug)]
pub struct SelectionContext {
    tx: watch::Sender<Option<Selection>>,
}

impl Default for SelectionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionContext {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn publish(&self, selection: Selection) {
        debug!(id = selection.id, token = %selection.token, "ticket selected");
        self.tx.send_replace(Some(selection));
    }

    pub fn current(&self) -> Option<Selection> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Selection>> {
        self.tx.subscribe()
    }

    pub fn clear(&self) {
        self.tx.send_replace(None);
    }
}
