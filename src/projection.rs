//! Pure view-state projection for an inbox row.
//!
//! [`RowView::project`] is recomputed on every render from the current ticket;
//! rows never cache derived display fields.

use jiff::Zoned;
use serde::Serialize;

use crate::lifecycle::Transition;
use crate::types::{Profile, Tag, Ticket, TicketStatus};

pub const NO_QUEUE_LABEL: &str = "NO QUEUE";
pub const NO_QUEUE_COLOR: &str = "#7C7C7C";
pub const LOCATION_PREVIEW: &str = "Location";

/// Inline map snapshots arrive as a base64 PNG data URL
const LOCATION_MARKER: &str = "data:image/png;base64";

/// Inputs to a projection that do not come from the ticket
#[derive(Debug, Clone)]
pub struct ProjectionContext {
    pub now: Zoned,
    /// Ticket currently routed in the detail pane
    pub selected_id: Option<u64>,
    pub profile: Profile,
}

impl ProjectionContext {
    pub fn new(profile: Profile) -> Self {
        Self {
            now: Zoned::now(),
            selected_id: None,
            profile,
        }
    }

    pub fn with_selected(mut self, id: Option<u64>) -> Self {
        self.selected_id = id;
        self
    }
}

/// Everything a renderer needs to draw one row
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowView {
    pub id: u64,
    pub status: TicketStatus,
    pub contact_name: String,
    pub avatar_url: Option<String>,
    pub avatar_initial: String,
    pub user_badge: Option<String>,
    pub queue_badge: String,
    pub queue_color: String,
    pub channel_badge: Option<String>,
    pub tags: Vec<Tag>,
    pub preview: String,
    pub timestamp: Option<String>,
    pub unread: u32,
    pub actions: Vec<Transition>,
    pub is_pending: bool,
    pub is_selected: bool,
    pub show_chatbot: bool,
    pub can_peek: bool,
}

impl RowView {
    pub fn project(ticket: &Ticket, ctx: &ProjectionContext) -> Self {
        let user_badge = match (ticket.user_id, &ticket.user) {
            (Some(_), Some(user)) => Some(user.name.to_uppercase()),
            _ => None,
        };

        let channel_badge = match (ticket.whatsapp_id, &ticket.whatsapp) {
            (Some(_), Some(channel)) => Some(channel.name.to_uppercase()),
            _ => None,
        };

        let queue_badge = ticket
            .queue
            .as_ref()
            .map(|q| q.name.to_uppercase())
            .unwrap_or_else(|| NO_QUEUE_LABEL.to_string());
        let queue_color = ticket
            .queue
            .as_ref()
            .and_then(|q| q.color.clone())
            .unwrap_or_else(|| NO_QUEUE_COLOR.to_string());

        let preview = if ticket.last_message.contains(LOCATION_MARKER) {
            LOCATION_PREVIEW.to_string()
        } else {
            ticket.last_message.clone()
        };

        let timestamp = if ticket.last_message.is_empty() {
            None
        } else {
            Some(format_timestamp(ticket, &ctx.now))
        };

        let avatar_initial = ticket
            .contact
            .name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string());

        Self {
            id: ticket.id,
            status: ticket.status,
            contact_name: ticket.contact.name.clone(),
            avatar_url: ticket.contact.profile_pic_url.clone(),
            avatar_initial,
            user_badge,
            queue_badge,
            queue_color,
            channel_badge,
            tags: ticket.tags.clone(),
            preview,
            timestamp,
            unread: ticket.unread_messages,
            actions: ticket.status.available_transitions(),
            is_pending: ticket.status == TicketStatus::Pending,
            is_selected: ctx.selected_id == Some(ticket.id),
            show_chatbot: ticket.chatbot,
            can_peek: ctx.profile == Profile::Admin,
        }
    }
}

/// `HH:MM` for activity today, `DD/MM/YYYY` otherwise, in `now`'s time zone
fn format_timestamp(ticket: &Ticket, now: &Zoned) -> String {
    let updated = ticket.updated_at.to_zoned(now.time_zone().clone());
    if updated.date() == now.date() {
        updated.strftime("%H:%M").to_string()
    } else {
        updated.strftime("%d/%m/%Y").to_string()
    }
}
