//! Shared TUI components

pub mod ticket_row;

pub use ticket_row::{InboxList, InboxListProps, TicketRowView, TicketRowViewProps};
