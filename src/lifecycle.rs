//! Ticket status state machine.
//!
//! ```text
//! pending --Accept--> open
//! pending --Close---> closed
//! open    --Close---> closed
//! closed  --Reopen--> open
//! ```
//!
//! There is no way back from `open` to `pending`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DeskError, Result};
use crate::types::TicketStatus;

/// A status change an agent can request for a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Accept,
    Close,
    Reopen,
}

impl Transition {
    pub const ALL: [Transition; 3] = [Transition::Accept, Transition::Close, Transition::Reopen];

    /// Status the server is asked to move the ticket to
    pub fn target(self) -> TicketStatus {
        match self {
            Transition::Accept | Transition::Reopen => TicketStatus::Open,
            Transition::Close => TicketStatus::Closed,
        }
    }

    /// Statuses this transition may start from
    pub fn sources(self) -> &'static [TicketStatus] {
        match self {
            Transition::Accept => &[TicketStatus::Pending],
            Transition::Close => &[TicketStatus::Pending, TicketStatus::Open],
            Transition::Reopen => &[TicketStatus::Closed],
        }
    }

    /// Button label
    pub fn label(self) -> &'static str {
        match self {
            Transition::Accept => "Accept",
            Transition::Close => "Close",
            Transition::Reopen => "Reopen",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Accept => write!(f, "accept"),
            Transition::Close => write!(f, "close"),
            Transition::Reopen => write!(f, "reopen"),
        }
    }
}

impl TicketStatus {
    /// Guard predicate for `transition`
    pub fn allows(self, transition: Transition) -> bool {
        transition.sources().contains(&self)
    }

    /// Transitions whose guard passes for this status, in display order
    pub fn available_transitions(self) -> Vec<Transition> {
        Transition::ALL
            .into_iter()
            .filter(|t| self.allows(*t))
            .collect()
    }

    /// Apply `transition`, returning the target status or the guard failure
    pub fn apply(self, transition: Transition) -> Result<TicketStatus> {
        if self.allows(transition) {
            Ok(transition.target())
        } else {
            Err(DeskError::InvalidTransition {
                transition,
                status: self,
            })
        }
    }
}
