use iocraft::prelude::*;

use super::{connect, parse_status_filter};
use crate::api::{TicketApi, TicketQuery};
use crate::error::Result;
use crate::projection::{ProjectionContext, RowView};
use crate::tui::InboxList;

/// Render the inbox rows with the terminal components
pub async fn cmd_inbox(status: Option<&str>, selected: Option<u64>) -> Result<()> {
    let status = parse_status_filter(status)?;
    let (config, api) = connect()?;
    let page = api
        .list_tickets(&TicketQuery {
            status,
            show_all: false,
        })
        .await?;

    let profile = config
        .actor
        .as_ref()
        .map(|a| a.profile)
        .unwrap_or_default();
    let ctx = ProjectionContext::new(profile).with_selected(selected);
    let rows: Vec<RowView> = page
        .tickets
        .iter()
        .map(|t| RowView::project(t, &ctx))
        .collect();

    let title = match status {
        Some(s) => {
            let s = s.to_string();
            let mut chars = s.chars();
            chars
                .next()
                .map(|c| c.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        }
        None => "Inbox".to_string(),
    };

    element! {
        InboxList(title: title, rows: rows)
    }
    .print();

    Ok(())
}
