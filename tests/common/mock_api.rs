//! In-memory [`TicketApi`] that records every call.
//!
//! Failures are switched on per operation. `update_ticket` can be held on a
//! gate so tests can observe a transition while its request is in flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use reqwest::StatusCode;
use tokio::sync::Notify;

use deskbox::api::{ApiError, OutgoingMessage, TicketApi, TicketQuery, TicketUpdate};
use deskbox::error::Result;
use deskbox::types::{
    Contact, GREETING_SETTING_KEY, MessagePage, Queue, Setting, Ticket, TicketPage, TicketStatus,
    UserRef,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UpdateTicket(u64, TicketUpdate),
    ListSettings,
    SendMessage(u64, OutgoingMessage),
    ListTickets(TicketQuery),
    GetTicket(u64),
    ListMessages(u64),
}

impl Call {
    pub fn is_update(&self) -> bool {
        matches!(self, Call::UpdateTicket(..))
    }

    pub fn is_send(&self) -> bool {
        matches!(self, Call::SendMessage(..))
    }
}

#[derive(Default)]
pub struct MockApi {
    calls: Mutex<Vec<Call>>,
    settings: Mutex<Vec<Setting>>,
    fail_update: AtomicBool,
    fail_settings: AtomicBool,
    fail_send: AtomicBool,
    gate: Mutex<Option<Arc<Notify>>>,
    /// Signalled once `update_ticket` has been entered
    entered: Arc<Notify>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_greeting(self, value: &str) -> Self {
        self.settings.lock().push(Setting {
            key: GREETING_SETTING_KEY.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn failing_update(self) -> Self {
        self.fail_update.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_settings(self) -> Self {
        self.fail_settings.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_send(self) -> Self {
        self.fail_send.store(true, Ordering::SeqCst);
        self
    }

    /// Hold every `update_ticket` until `gate` is notified
    pub fn gated(self, gate: Arc<Notify>) -> Self {
        *self.gate.lock() = Some(gate);
        self
    }

    pub fn entered(&self) -> Arc<Notify> {
        Arc::clone(&self.entered)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn updates(&self) -> Vec<(u64, TicketUpdate)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::UpdateTicket(id, update) => Some((id, update)),
                _ => None,
            })
            .collect()
    }

    pub fn sent_messages(&self) -> Vec<(u64, OutgoingMessage)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SendMessage(id, message) => Some((id, message)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

fn server_error(message: &str) -> deskbox::DeskError {
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, message).into()
}

impl TicketApi for MockApi {
    async fn update_ticket(&self, id: u64, update: &TicketUpdate) -> Result<Ticket> {
        self.record(Call::UpdateTicket(id, update.clone()));
        self.entered.notify_one();

        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.fail_update.load(Ordering::SeqCst) {
            return Err(server_error("ERR_UPDATE_TICKET"));
        }

        let mut ticket = TicketBuilder::new(id).status(update.status).build();
        ticket.user_id = update.user_id;
        ticket.queue_id = update.queue_id;
        Ok(ticket)
    }

    async fn list_settings(&self) -> Result<Vec<Setting>> {
        self.record(Call::ListSettings);
        if self.fail_settings.load(Ordering::SeqCst) {
            return Err(server_error("ERR_SETTINGS"));
        }
        Ok(self.settings.lock().clone())
    }

    async fn send_message(&self, ticket_id: u64, message: &OutgoingMessage) -> Result<()> {
        self.record(Call::SendMessage(ticket_id, message.clone()));
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(server_error("ERR_SENDING_WAPP_MSG"));
        }
        Ok(())
    }

    async fn list_tickets(&self, query: &TicketQuery) -> Result<TicketPage> {
        self.record(Call::ListTickets(query.clone()));
        Ok(TicketPage::default())
    }

    async fn get_ticket(&self, id: u64) -> Result<Ticket> {
        self.record(Call::GetTicket(id));
        Ok(TicketBuilder::new(id).build())
    }

    async fn list_messages(&self, ticket_id: u64) -> Result<MessagePage> {
        self.record(Call::ListMessages(ticket_id));
        Ok(MessagePage::default())
    }
}

/// Builder for test tickets
pub struct TicketBuilder {
    ticket: Ticket,
}

impl TicketBuilder {
    pub fn new(id: u64) -> Self {
        Self {
            ticket: Ticket {
                id,
                uuid: format!("uuid-{id}"),
                status: TicketStatus::Pending,
                user_id: None,
                queue_id: None,
                whatsapp_id: None,
                user: None,
                queue: None,
                whatsapp: None,
                contact: Contact {
                    id: 100 + id,
                    name: "Maria Silva".to_string(),
                    number: Some("5511999990000".to_string()),
                    profile_pic_url: None,
                },
                tags: Vec::new(),
                unread_messages: 0,
                last_message: "hello".to_string(),
                updated_at: "2024-05-01T09:05:00Z"
                    .parse()
                    .expect("test timestamp should be valid"),
                is_group: false,
                chatbot: false,
            },
        }
    }

    pub fn status(mut self, status: TicketStatus) -> Self {
        self.ticket.status = status;
        self
    }

    pub fn owner(mut self, user_id: u64, name: &str) -> Self {
        self.ticket.user_id = Some(user_id);
        self.ticket.user = Some(UserRef {
            id: user_id,
            name: name.to_string(),
        });
        self
    }

    pub fn queue(mut self, queue_id: u64, name: &str) -> Self {
        self.ticket.queue_id = Some(queue_id);
        self.ticket.queue = Some(Queue {
            id: queue_id,
            name: name.to_string(),
            color: Some("#00aa00".to_string()),
        });
        self
    }

    pub fn group(mut self) -> Self {
        self.ticket.is_group = true;
        self
    }

    pub fn build(self) -> Ticket {
        self.ticket
    }
}
