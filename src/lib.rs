pub mod api;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod inbox;
pub mod lifecycle;
pub mod projection;
pub mod row;
pub mod tui;
pub mod types;

pub use api::{HttpApi, OutgoingMessage, TicketApi, TicketQuery, TicketUpdate};
pub use config::{Config, Greeting};
pub use error::{DeskError, Result};
pub use inbox::{InboxEvent, InboxEvents, Route, Selection, SelectionContext, Tab};
pub use lifecycle::Transition;
pub use projection::{ProjectionContext, RowView};
pub use row::{Outcome, RowContext, TicketRow, TransitionTask};
pub use types::{Actor, Profile, Ticket, TicketStatus};
