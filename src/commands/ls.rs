use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, connect, parse_status_filter};
use crate::api::{TicketApi, TicketQuery};
use crate::config::Config;
use crate::display::{format_row_line, format_status_colored};
use crate::error::Result;
use crate::projection::{ProjectionContext, RowView};

fn projection_context(config: &Config) -> ProjectionContext {
    let profile = config
        .actor
        .as_ref()
        .map(|a| a.profile)
        .unwrap_or_default();
    ProjectionContext::new(profile)
}

/// List tickets from the helpdesk, one projected row per line
pub async fn cmd_ls(status: Option<&str>, show_all: bool, output_json: bool) -> Result<()> {
    let query = TicketQuery {
        status: parse_status_filter(status)?,
        show_all,
    };
    let (config, api) = connect()?;
    let page = api.list_tickets(&query).await?;

    let ctx = projection_context(&config);
    let rows: Vec<RowView> = page
        .tickets
        .iter()
        .map(|t| RowView::project(t, &ctx))
        .collect();

    let text = if rows.is_empty() {
        "No tickets".dimmed().to_string()
    } else {
        let mut lines: Vec<String> = rows.iter().map(|r| format_row_line(r, true)).collect();
        if page.has_more {
            lines.push(format!("{} of {} shown", rows.len(), page.count).dimmed().to_string());
        }
        lines.join("\n")
    };

    CommandOutput::new(json!({
        "tickets": rows,
        "count": page.count,
        "has_more": page.has_more,
    }))
    .with_text(text)
    .print(output_json)
}

/// Display one ticket
pub async fn cmd_show(id: u64, output_json: bool) -> Result<()> {
    let (config, api) = connect()?;
    let ticket = api.get_ticket(id).await?;
    let view = RowView::project(&ticket, &projection_context(&config));

    let mut text = format!(
        "{} {} {}\n",
        ticket.id.to_string().cyan(),
        format_status_colored(ticket.status),
        ticket.contact.name.bold()
    );
    text.push_str(&format!("{}: {}\n", "uuid".cyan(), ticket.uuid));
    if let Some(number) = &ticket.contact.number {
        text.push_str(&format!("{}: {}\n", "number".cyan(), number));
    }
    text.push_str(&format!(
        "{}: {}\n",
        "agent".cyan(),
        view.user_badge.as_deref().unwrap_or("-")
    ));
    text.push_str(&format!("{}: {}\n", "queue".cyan(), view.queue_badge));
    if let Some(channel) = &view.channel_badge {
        text.push_str(&format!("{}: {}\n", "channel".cyan(), channel));
    }
    if !view.tags.is_empty() {
        let tags: Vec<&str> = view.tags.iter().map(|t| t.name.as_str()).collect();
        text.push_str(&format!("{}: {}\n", "tags".cyan(), tags.join(", ")));
    }
    text.push_str(&format!(
        "{}: {}\n",
        "updated".cyan(),
        view.timestamp.as_deref().unwrap_or("-")
    ));
    text.push_str(&format!("{}: {}\n", "unread".cyan(), view.unread));
    if !view.preview.is_empty() {
        text.push_str(&format!("\n{}\n", view.preview));
    }
    let actions: Vec<&str> = view.actions.iter().map(|t| t.label()).collect();
    text.push_str(&format!("\n{}: {}", "actions".dimmed(), actions.join(", ")));

    CommandOutput::new(json!({
        "ticket": ticket,
        "view": view,
    }))
    .with_text(text)
    .print(output_json)
}
