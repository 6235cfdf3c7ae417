use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, connect};
use crate::api::TicketApi;
use crate::display::format_message_line;
use crate::error::{DeskError, Result};

/// Read-only look at a ticket's conversation. Admins only.
pub async fn cmd_peek(id: u64, output_json: bool) -> Result<()> {
    let (config, api) = connect()?;
    let actor = config.actor()?;
    if !actor.is_admin() {
        return Err(DeskError::Auth(format!(
            "peeking at conversations requires the admin profile ({} is {})",
            actor.name, actor.profile
        )));
    }

    let page = api.list_messages(id).await?;

    let text = if page.messages.is_empty() {
        "No messages".dimmed().to_string()
    } else {
        page.messages
            .iter()
            .map(format_message_line)
            .collect::<Vec<_>>()
            .join("\n")
    };

    CommandOutput::new(json!({
        "ticket_id": id,
        "messages": page.messages,
        "count": page.count,
        "has_more": page.has_more,
    }))
    .with_text(text)
    .print(output_json)
}
