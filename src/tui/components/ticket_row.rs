//! Inbox row component
//!
//! Renders a projected [`RowView`]: avatar initial, contact name, channel /
//! agent / queue badges, tags, last message preview, timestamp, unread count
//! and the available actions.

use iocraft::prelude::*;

use crate::projection::RowView;
use crate::tui::theme::{parse_hex_color, theme};

/// Props for the TicketRowView component
#[derive(Default, Props)]
pub struct TicketRowViewProps {
    /// The projected row to display
    pub view: RowView,
}

/// Two-line inbox row
///
/// Layout:
/// ```text
/// ╭──────────────────────────────────────────────────────╮
/// │> (M) Maria  MAIN LINE  ANA  SALES  #vip     (2) 09:05│
/// │      hello there                       [Close]        │
/// ╰──────────────────────────────────────────────────────╯
/// ```
#[component]
pub fn TicketRowView(props: &TicketRowViewProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let view = &props.view;

    let border_color = if view.is_selected {
        theme.border_focused
    } else {
        theme.status_color(view.status)
    };
    let text_color = if view.is_selected {
        theme.highlight_text
    } else {
        theme.text
    };
    let indicator = if view.is_selected { ">" } else { " " };
    let queue_color = parse_hex_color(&view.queue_color).unwrap_or(theme.text_dimmed);

    let unread = if view.unread > 0 {
        format!("({})", view.unread)
    } else {
        String::new()
    };
    let timestamp = view.timestamp.clone().unwrap_or_default();
    let actions: Vec<String> = view
        .actions
        .iter()
        .map(|t| format!("[{}]", t.label()))
        .collect();

    element! {
        View(
            width: 100pct,
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: border_color,
            padding_left: 1,
            padding_right: 1,
        ) {
            View(flex_direction: FlexDirection::Row, gap: 1) {
                Text(content: indicator, color: text_color, weight: Weight::Bold)
                Text(
                    content: format!("({})", view.avatar_initial),
                    color: theme.status_color(view.status),
                )
                Text(content: view.contact_name.clone(), color: text_color, weight: Weight::Bold)
                #(view.show_chatbot.then(|| element! {
                    Text(content: "BOT", color: theme.chatbot)
                }))
                #(view.channel_badge.clone().map(|channel| element! {
                    Text(content: channel, color: theme.badge_channel)
                }))
                #(view.user_badge.clone().map(|user| element! {
                    Text(content: user, color: theme.badge_user, weight: Weight::Bold)
                }))
                Text(content: view.queue_badge.clone(), color: queue_color)
                #(view.tags.iter().map(|tag| {
                    let color = tag
                        .color
                        .as_deref()
                        .and_then(parse_hex_color)
                        .unwrap_or(theme.badge_tag);
                    element! {
                        Text(content: format!("#{}", tag.name), color: color)
                    }
                }))
                View(flex_grow: 1.0)
                Text(content: unread, color: theme.unread, weight: Weight::Bold)
                Text(content: timestamp, color: theme.text_dimmed)
            }
            View(flex_direction: FlexDirection::Row, gap: 1, padding_left: 6) {
                View(flex_grow: 1.0, overflow: Overflow::Hidden) {
                    Text(content: view.preview.clone(), color: theme.text_dimmed)
                }
                #(actions.into_iter().map(|label| element! {
                    Text(content: label, color: theme.action)
                }))
            }
        }
    }
}

/// Props for the InboxList component
#[derive(Default, Props)]
pub struct InboxListProps {
    /// Tab title shown above the rows
    pub title: String,
    pub rows: Vec<RowView>,
}

/// Column of inbox rows under a title line
#[component]
pub fn InboxList(props: &InboxListProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    element! {
        View(width: 100pct, flex_direction: FlexDirection::Column) {
            View(height: 1, padding_left: 1) {
                Text(
                    content: format!("{} ({})", props.title, props.rows.len()),
                    color: theme.id_color,
                    weight: Weight::Bold,
                )
            }
            #(if props.rows.is_empty() {
                Some(element! {
                    View(height: 1, padding_left: 1) {
                        Text(content: "No tickets", color: theme.text_dimmed)
                    }
                })
            } else {
                None
            })
            #(props.rows.iter().map(|row| element! {
                TicketRowView(view: row.clone())
            }))
        }
    }
}
