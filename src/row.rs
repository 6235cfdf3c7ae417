//! Inbox row controller.
//!
//! A [`TicketRow`] owns one ticket and drives its status transitions against
//! the helpdesk API. Transitions report progress through [`InboxEvents`];
//! they never return errors to the caller. The row never edits its own
//! ticket; the list owner hands it a fresh one via [`TicketRow::replace_ticket`].
//!
//! Transitions can run inline ([`TicketRow::run`]) or as background tasks
//! ([`TicketRow::spawn`]). Background tasks are aborted when the row is torn
//! down, and an aborted task emits nothing further.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::{AbortHandle, Abortable, Aborted};
use parking_lot::Mutex;
use tokio::task::{self, JoinHandle};
use tracing::{debug, warn};

use crate::api::{OutgoingMessage, TicketApi, TicketUpdate};
use crate::config::Greeting;
use crate::error::DeskError;
use crate::inbox::{InboxEvents, Route, Selection, SelectionContext, Tab};
use crate::lifecycle::Transition;
use crate::projection::{ProjectionContext, RowView};
use crate::types::{Actor, GREETING_SETTING_KEY, Ticket, TicketStatus, setting_value};

/// How a transition ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The server accepted the status change; carries the ticket it returned
    Completed(Ticket),
    /// The status update request failed
    Failed,
    /// Refused locally (guard failed or the row was busy); nothing was sent
    Rejected,
    /// The row was torn down before the transition finished
    Aborted,
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }
}

/// Collaborators shared by every row of an inbox
pub struct RowContext<A> {
    pub api: Arc<A>,
    pub actor: Arc<Actor>,
    pub greeting: Arc<Greeting>,
    pub events: InboxEvents,
    pub selection: Arc<SelectionContext>,
}

impl<A> Clone for RowContext<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            actor: Arc::clone(&self.actor),
            greeting: Arc::clone(&self.greeting),
            events: self.events.clone(),
            selection: Arc::clone(&self.selection),
        }
    }
}

impl<A: TicketApi> RowContext<A> {
    pub fn new(api: A, actor: Actor, events: InboxEvents) -> Self {
        Self {
            api: Arc::new(api),
            actor: Arc::new(actor),
            greeting: Arc::new(Greeting::default()),
            events,
            selection: Arc::new(SelectionContext::new()),
        }
    }

    pub fn with_greeting(mut self, greeting: Greeting) -> Self {
        self.greeting = Arc::new(greeting);
        self
    }

    pub fn with_selection(mut self, selection: Arc<SelectionContext>) -> Self {
        self.selection = selection;
        self
    }
}

/// Holds the row's busy flag for the lifetime of one transition
struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Abort registration for one background transition
struct InFlight {
    abort: AbortHandle,
    task: task::AbortHandle,
}

impl InFlight {
    fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// A transition in flight on the runtime
pub enum TransitionTask {
    Ready(Outcome),
    Running(JoinHandle<Result<Outcome, Aborted>>),
}

impl TransitionTask {
    pub async fn outcome(self) -> Outcome {
        match self {
            TransitionTask::Ready(outcome) => outcome,
            TransitionTask::Running(handle) => match handle.await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(Aborted)) => Outcome::Aborted,
                Err(e) => {
                    warn!("transition task failed: {e}");
                    if e.is_cancelled() {
                        Outcome::Aborted
                    } else {
                        Outcome::Failed
                    }
                }
            },
        }
    }
}

pub struct TicketRow<A> {
    ticket: Ticket,
    ctx: RowContext<A>,
    busy: Arc<AtomicBool>,
    in_flight: Mutex<Vec<InFlight>>,
}

impl<A: TicketApi + 'static> TicketRow<A> {
    pub fn new(ctx: RowContext<A>, ticket: Ticket) -> Self {
        Self {
            ticket,
            ctx,
            busy: Arc::new(AtomicBool::new(false)),
            in_flight: Mutex::new(Vec::new()),
        }
    }

    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    pub fn api(&self) -> Arc<A> {
        Arc::clone(&self.ctx.api)
    }

    /// Swap in the server's latest copy of the ticket
    pub fn replace_ticket(&mut self, ticket: Ticket) {
        self.ticket = ticket;
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Number of background transitions that have not finished yet
    pub fn in_flight(&self) -> usize {
        let mut in_flight = self.in_flight.lock();
        in_flight.retain(|t| !t.is_finished());
        in_flight.len()
    }

    /// Current display state, derived from the ticket as it is now
    pub fn view(&self, ctx: &ProjectionContext) -> RowView {
        RowView::project(&self.ticket, ctx)
    }

    /// Row activation. Pending tickets are inert until accepted.
    pub fn activate(&self) -> Option<Selection> {
        if self.ticket.status == TicketStatus::Pending {
            return None;
        }

        let selection = Selection::new(self.ticket.id, self.ticket.uuid.clone());
        self.ctx.selection.publish(selection.clone());
        Some(selection)
    }

    pub async fn accept(&self) -> Outcome {
        self.run(Transition::Accept).await
    }

    pub async fn close(&self) -> Outcome {
        self.run(Transition::Close).await
    }

    pub async fn reopen(&self) -> Outcome {
        self.run(Transition::Reopen).await
    }

    /// Run `transition` to completion on the current task
    pub async fn run(&self, transition: Transition) -> Outcome {
        match self.prepare(transition) {
            Ok(job) => job.execute().await,
            Err(outcome) => outcome,
        }
    }

    /// Run `transition` on the runtime. Torn down with the row.
    pub fn spawn(&self, transition: Transition) -> TransitionTask {
        let job = match self.prepare(transition) {
            Ok(job) => job,
            Err(outcome) => return TransitionTask::Ready(outcome),
        };

        let (abort, registration) = AbortHandle::new_pair();
        let join = tokio::spawn(Abortable::new(job.execute(), registration));

        let mut in_flight = self.in_flight.lock();
        in_flight.retain(|t| !t.is_finished());
        in_flight.push(InFlight {
            abort,
            task: join.abort_handle(),
        });
        TransitionTask::Running(join)
    }

    /// Abort every background transition this row started
    pub fn teardown(&self) {
        let handles = std::mem::take(&mut *self.in_flight.lock());
        if !handles.is_empty() {
            debug!(id = self.ticket.id, count = handles.len(), "aborting in-flight transitions");
        }
        for handle in handles {
            handle.abort.abort();
        }
    }

    /// Check the guard and claim the busy flag
    fn prepare(&self, transition: Transition) -> Result<TransitionJob<A>, Outcome> {
        let context = format!("could not {transition} ticket {}", self.ticket.id);

        if let Err(e) = self.ticket.status.apply(transition) {
            self.ctx.events.report(&context, &e);
            return Err(Outcome::Rejected);
        }

        let Some(busy) = BusyGuard::acquire(&self.busy) else {
            self.ctx
                .events
                .report(&context, &DeskError::Busy(self.ticket.id));
            return Err(Outcome::Rejected);
        };

        Ok(TransitionJob {
            transition,
            ticket: self.ticket.clone(),
            ctx: self.ctx.clone(),
            _busy: busy,
        })
    }
}

impl<A> Drop for TicketRow<A> {
    fn drop(&mut self) {
        for handle in self.in_flight.get_mut().drain(..) {
            handle.abort.abort();
        }
    }
}

/// Everything one transition needs, owned so it can move onto a task
struct TransitionJob<A> {
    transition: Transition,
    ticket: Ticket,
    ctx: RowContext<A>,
    _busy: BusyGuard,
}

impl<A: TicketApi> TransitionJob<A> {
    fn update_body(&self) -> TicketUpdate {
        let status = self.transition.target();
        match self.transition {
            Transition::Accept => TicketUpdate {
                status,
                user_id: Some(self.ctx.actor.id),
                queue_id: None,
            },
            Transition::Close | Transition::Reopen => TicketUpdate {
                status,
                user_id: self.ticket.user_id,
                queue_id: self.ticket.queue_id,
            },
        }
    }

    async fn execute(self) -> Outcome {
        let id = self.ticket.id;
        debug!(id, transition = %self.transition, "running transition");

        let update = self.update_body();
        let updated = match self.ctx.api.update_ticket(id, &update).await {
            Ok(ticket) => ticket,
            Err(e) => {
                self.ctx
                    .events
                    .report(&format!("could not {} ticket {id}", self.transition), &e);
                return Outcome::Failed;
            }
        };

        match self.transition {
            Transition::Accept => {
                self.send_greeting().await;
                self.ctx.events.change_tab(Tab::Open);
                self.ctx
                    .events
                    .navigate(Route::TicketDetail(self.ticket.uuid.clone()));
            }
            Transition::Close | Transition::Reopen => {
                self.ctx.events.navigate(Route::TicketList);
            }
        }

        debug!(id, status = %updated.status, "transition completed");
        Outcome::Completed(updated)
    }

    /// Greet the contact if the helpdesk has greetings enabled.
    /// Failures are reported and never undo the accept.
    async fn send_greeting(&self) {
        let settings = match self.ctx.api.list_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                self.ctx.events.report("could not load settings", &e);
                return;
            }
        };

        if setting_value(&settings, GREETING_SETTING_KEY) != Some("enabled") {
            return;
        }
        if self.ticket.is_group {
            debug!(id = self.ticket.id, "group conversation, greeting skipped");
            return;
        }

        let message = OutgoingMessage::automated(self.ctx.greeting.render(&self.ctx.actor.name));
        if let Err(e) = self.ctx.api.send_message(self.ticket.id, &message).await {
            self.ctx.events.report(
                &format!("could not send greeting to ticket {}", self.ticket.id),
                &e,
            );
        }
    }
}
