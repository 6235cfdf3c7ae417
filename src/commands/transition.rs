//! Status transition commands: `accept`, `close`, `reopen`, and `select`.
//!
//! Each command fetches the ticket, wraps it in a [`TicketRow`] and drives
//! the row exactly as the inbox would, then reports what the row emitted.

use owo_colors::OwoColorize;
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;

use super::{CommandOutput, connect};
use crate::api::TicketApi;
use crate::display::{format_event, format_status_colored};
use crate::error::{DeskError, Result};
use crate::inbox::{InboxEvent, InboxEvents};
use crate::lifecycle::Transition;
use crate::row::{Outcome, RowContext, TicketRow};

fn outcome_name(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Completed(_) => "completed",
        Outcome::Failed => "failed",
        Outcome::Rejected => "rejected",
        Outcome::Aborted => "aborted",
    }
}

fn drain(rx: &mut UnboundedReceiver<InboxEvent>) -> Vec<InboxEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Run one transition against the live helpdesk
pub async fn cmd_transition(id: u64, transition: Transition, output_json: bool) -> Result<()> {
    let (config, api) = connect()?;
    let actor = config.actor()?;
    let ticket = api.get_ticket(id).await?;

    let (events, mut rx) = InboxEvents::channel();
    let ctx = RowContext::new(api, actor, events).with_greeting(config.greeting());
    let row = TicketRow::new(ctx, ticket);

    let outcome = row.run(transition).await;
    let emitted = drain(&mut rx);

    let status = match &outcome {
        Outcome::Completed(ticket) => Some(ticket.status),
        _ => None,
    };

    let mut lines = Vec::new();
    for event in &emitted {
        match event {
            InboxEvent::Error(_) if !output_json => eprintln!("{}", format_event(event)),
            _ => lines.push(format_event(event)),
        }
    }
    if let Some(status) = status {
        lines.insert(
            0,
            format!(
                "{} ticket {} is now {}",
                transition.label().green(),
                id.to_string().cyan(),
                format_status_colored(status)
            ),
        );
    }

    CommandOutput::new(json!({
        "action": transition.to_string(),
        "id": id,
        "outcome": outcome_name(&outcome),
        "status": status,
        "events": emitted,
    }))
    .with_text(lines.join("\n"))
    .print(output_json)?;

    if outcome.is_completed() {
        Ok(())
    } else {
        Err(DeskError::Other(format!(
            "{transition} of ticket {id} {}",
            outcome_name(&outcome)
        )))
    }
}

/// Open a ticket in the detail pane, as clicking its row would
pub async fn cmd_select(id: u64, output_json: bool) -> Result<()> {
    let (config, api) = connect()?;
    let actor = config.actor()?;
    let ticket = api.get_ticket(id).await?;

    let (events, _rx) = InboxEvents::channel();
    let ctx = RowContext::new(api, actor, events);
    let row = TicketRow::new(ctx, ticket);

    let Some(selection) = row.activate() else {
        return Err(DeskError::Other(format!(
            "ticket {id} is pending; accept it before opening"
        )));
    };

    let text = format!(
        "Selected ticket {} ({})",
        selection.id.to_string().cyan(),
        selection.uuid.dimmed()
    );
    CommandOutput::new(json!({
        "selection": selection,
    }))
    .with_text(text)
    .print(output_json)
}
