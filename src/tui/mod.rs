//! Terminal rendering of the inbox with iocraft

pub mod components;
pub mod theme;

pub use components::{InboxList, TicketRowView};
pub use theme::Theme;
