//! Plain-text rendering for CLI output.

use owo_colors::OwoColorize;

use crate::inbox::InboxEvent;
use crate::lifecycle::Transition;
use crate::projection::RowView;
use crate::types::{Message, TicketStatus};

pub fn format_status_colored(status: TicketStatus) -> String {
    format_status_colored_with_format(status, |s| format!("[{}]", s))
}

pub fn format_status_colored_with_format<F>(status: TicketStatus, format_fn: F) -> String
where
    F: Fn(&str) -> String,
{
    let badge = format_fn(&status.to_string());
    match status {
        TicketStatus::Pending => badge.yellow().to_string(),
        TicketStatus::Open => badge.green().to_string(),
        TicketStatus::Closed => badge.dimmed().to_string(),
    }
}

fn format_actions(actions: &[Transition]) -> String {
    actions
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Single-line summary of an inbox row
///
/// ```text
/// > 42     [open]    Maria <MAIN LINE> <ANA> <SALES> #vip (2) 09:05 - hello {close}
/// ```
pub fn format_row_line(view: &RowView, colored: bool) -> String {
    let marker = if view.is_selected { ">" } else { " " };
    let id = format!("{:<6}", view.id);
    let status = format!("{:<9}", format!("[{}]", view.status));

    let mut badges: Vec<String> = Vec::new();
    if view.show_chatbot {
        badges.push("<BOT>".to_string());
    }
    if let Some(channel) = &view.channel_badge {
        badges.push(format!("<{channel}>"));
    }
    if let Some(user) = &view.user_badge {
        badges.push(format!("<{user}>"));
    }
    badges.push(format!("<{}>", view.queue_badge));
    badges.extend(view.tags.iter().map(|t| format!("#{}", t.name)));

    let unread = if view.unread > 0 {
        format!(" ({})", view.unread)
    } else {
        String::new()
    };
    let time = view
        .timestamp
        .as_ref()
        .map(|t| format!(" {t}"))
        .unwrap_or_default();
    let actions = format!("{{{}}}", format_actions(&view.actions));

    if colored {
        let status = match view.status {
            TicketStatus::Pending => status.yellow().to_string(),
            TicketStatus::Open => status.green().to_string(),
            TicketStatus::Closed => status.dimmed().to_string(),
        };
        format!(
            "{} {} {} {} {}{}{} - {} {}",
            marker.bold(),
            id.cyan(),
            status,
            view.contact_name.bold(),
            badges.join(" ").magenta(),
            unread.red(),
            time.dimmed(),
            view.preview,
            actions.dimmed()
        )
    } else {
        format!(
            "{} {} {} {} {}{}{} - {} {}",
            marker,
            id,
            status,
            view.contact_name,
            badges.join(" "),
            unread,
            time,
            view.preview,
            actions
        )
    }
}

/// One line per event a transition emitted
pub fn format_event(event: &InboxEvent) -> String {
    match event {
        InboxEvent::Navigate(route) => format!("{} {}", "navigate".cyan(), route),
        InboxEvent::ChangeTab(tab) => format!("{} {}", "tab".cyan(), tab),
        InboxEvent::Error(message) => format!("{} {}", "error".red().bold(), message),
    }
}

pub fn format_message_line(message: &Message) -> String {
    let who = if message.from_me {
        "agent".green().to_string()
    } else {
        "contact".blue().to_string()
    };
    format!(
        "{} {}: {}",
        message.created_at.strftime("%Y-%m-%d %H:%M").to_string().dimmed(),
        who,
        message.body
    )
}
