use std::sync::Arc;

use crate::context::AppContext;
use crate::domain::assignee::{AssigneeCandidate, AssigneeSelection};
use crate::domain::notification::NotificationEvent;
use crate::domain::ticket::{Ticket, TicketEdit, TicketUpdate};
use crate::domain::user::Session;
use crate::error::{AppError, AppResult};
use crate::services::{AssigneeDirectoryService, NotificationService, TicketStoreService};

const ANONYMOUS_ACTOR: &str = "Someone";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRoute {
    Ticket(String),
    NotFound,
}

/// Local draft state of one ticket view. Everything here is transient and
/// is re-derived from the server after every successful load.
#[derive(Debug, Clone)]
pub struct TicketViewState {
    pub ticket_id: String,
    pub route: ViewRoute,
    pub ticket: Option<Ticket>,
    pub selected: AssigneeSelection,
    pub candidates: Vec<AssigneeCandidate>,
    pub draft: String,
}

impl TicketViewState {
    fn new(ticket_id: String) -> Self {
        Self {
            route: ViewRoute::Ticket(ticket_id.clone()),
            ticket_id,
            ticket: None,
            selected: AssigneeSelection::default(),
            candidates: Vec::new(),
            draft: String::new(),
        }
    }
}

/// Token for an issued ticket fetch. Only the most recent one may land.
#[derive(Debug)]
pub struct PendingLoad {
    sequence: u64,
    ticket_id: String,
}

impl PendingLoad {
    #[cfg(test)]
    pub fn ticket_id(&self) -> &str {
        &self.ticket_id
    }
}

#[derive(Debug)]
pub enum LoadOutcome {
    Loaded,
    /// The ticket is missing or the id is malformed; the view moved to the
    /// not-found route.
    Redirected,
    /// Superseded by a later load or a navigation; the response was dropped.
    Stale,
    Failed(AppError),
}

#[derive(Debug)]
pub enum UpdateOutcome {
    Saved { message: String, reload: LoadOutcome },
    Failed(AppError),
}

#[derive(Debug)]
pub enum CommentOutcome {
    Posted { reload: LoadOutcome },
    EmptyDraft,
    Failed(AppError),
}

/// Keeps a ticket view in step with the server.
///
/// Edits stay local until submitted. Every successful write is followed by
/// a fresh read that replaces local state wholesale: there is no merge, the
/// last read wins.
pub struct TicketViewController {
    ticket_store: Arc<dyn TicketStoreService>,
    assignee_directory: Arc<dyn AssigneeDirectoryService>,
    notifier: Arc<dyn NotificationService>,
    session: Session,
    state: TicketViewState,
    load_sequence: u64,
}

impl TicketViewController {
    pub fn new(ctx: &AppContext, ticket_id: impl Into<String>) -> Self {
        Self {
            ticket_store: Arc::clone(&ctx.ticket_store),
            assignee_directory: Arc::clone(&ctx.assignee_directory),
            notifier: Arc::clone(&ctx.notifier),
            session: ctx.session().clone(),
            state: TicketViewState::new(ticket_id.into()),
            load_sequence: 0,
        }
    }

    pub fn state(&self) -> &TicketViewState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether the session user may change the author-only fields.
    pub fn can_edit(&self) -> bool {
        self.state
            .ticket
            .as_ref()
            .is_some_and(|ticket| self.session.is_author_of(&ticket.author))
    }

    /// Fetches the ticket and the assignee directory side by side.
    pub async fn mount(&mut self) -> LoadOutcome {
        let pending = self.begin_load();
        let (ticket, assignees) = tokio::join!(
            self.ticket_store.fetch_ticket(&pending.ticket_id),
            self.assignee_directory.list_assignees()
        );
        self.apply_assignees(assignees);
        self.finish_load(pending, ticket)
    }

    /// Switches the view to another ticket. Loads still in flight for the
    /// previous id will be discarded when they land.
    pub fn navigate(&mut self, ticket_id: impl Into<String>) {
        let candidates = std::mem::take(&mut self.state.candidates);
        self.state = TicketViewState::new(ticket_id.into());
        self.state.candidates = candidates;
    }

    pub async fn load_ticket(&mut self) -> LoadOutcome {
        let pending = self.begin_load();
        let result = self.ticket_store.fetch_ticket(&pending.ticket_id).await;
        self.finish_load(pending, result)
    }

    pub fn begin_load(&mut self) -> PendingLoad {
        self.load_sequence += 1;
        PendingLoad {
            sequence: self.load_sequence,
            ticket_id: self.state.ticket_id.clone(),
        }
    }

    pub fn finish_load(&mut self, pending: PendingLoad, result: AppResult<Ticket>) -> LoadOutcome {
        if pending.sequence != self.load_sequence || pending.ticket_id != self.state.ticket_id {
            tracing::debug!(
                ticket = %pending.ticket_id,
                sequence = pending.sequence,
                "discarding stale ticket response"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(ticket) => {
                self.state.selected = AssigneeSelection::from_ids(ticket.assignee_ids());
                self.state.ticket = Some(ticket);
                self.state.route = ViewRoute::Ticket(pending.ticket_id);
                LoadOutcome::Loaded
            }
            Err(err) if err.is_not_found() => {
                tracing::debug!(ticket = %pending.ticket_id, "ticket not found: {err}");
                self.state.ticket = None;
                self.state.selected = AssigneeSelection::default();
                self.state.route = ViewRoute::NotFound;
                LoadOutcome::Redirected
            }
            Err(err) => {
                tracing::warn!(
                    ticket = %pending.ticket_id,
                    status = ?err.status(),
                    "failed to load ticket: {err}"
                );
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Returns whether the directory answered. A failed lookup leaves the
    /// picker as it was.
    #[cfg(test)]
    pub async fn load_assignees(&mut self) -> bool {
        let result = self.assignee_directory.list_assignees().await;
        self.apply_assignees(result)
    }

    fn apply_assignees(&mut self, result: AppResult<Vec<AssigneeCandidate>>) -> bool {
        match result {
            Ok(candidates) => {
                self.state.candidates = candidates;
                true
            }
            Err(err) => {
                tracing::warn!("failed to load assignees: {err}");
                false
            }
        }
    }

    pub fn edit_field(&mut self, edit: TicketEdit) -> AppResult<()> {
        if !self.can_edit() {
            return Err(self.edit_refusal(edit.field_name()));
        }
        if let Some(ticket) = self.state.ticket.as_mut() {
            edit.apply(ticket);
        }
        Ok(())
    }

    pub fn add_assignee(&mut self, candidate_id: &str) -> bool {
        self.state.selected.insert(candidate_id.to_string())
    }

    pub fn remove_assignee(&mut self, candidate_id: &str) -> bool {
        self.state.selected.remove(candidate_id)
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.state.draft = text.into();
    }

    /// Sends the local snapshot and selection, then reloads from the server.
    pub async fn submit_ticket_update(&mut self) -> UpdateOutcome {
        if !self.can_edit() {
            return UpdateOutcome::Failed(self.edit_refusal("ticket"));
        }
        let Some(ticket) = self.state.ticket.as_ref() else {
            return UpdateOutcome::Failed(AppError::NotFound(self.state.ticket_id.clone()));
        };
        let update = TicketUpdate::from_snapshot(ticket, self.state.selected.ids());

        let result = self.ticket_store.update_ticket(update).await;
        match result {
            Ok(message) => {
                let reload = self.load_ticket().await;
                UpdateOutcome::Saved { message, reload }
            }
            Err(err) => {
                tracing::warn!(ticket = %self.state.ticket_id, "failed to update ticket: {err}");
                UpdateOutcome::Failed(err)
            }
        }
    }

    /// Posts the draft as a comment. The draft is cleared whatever happens.
    pub async fn submit_comment(&mut self) -> CommentOutcome {
        let outcome = self.post_draft().await;
        self.state.draft.clear();
        outcome
    }

    async fn post_draft(&mut self) -> CommentOutcome {
        if self.state.draft.trim().is_empty() {
            return CommentOutcome::EmptyDraft;
        }

        let ticket_id = self.state.ticket_id.clone();
        let ticket_author = self
            .state
            .ticket
            .as_ref()
            .map(|ticket| ticket.author.clone())
            .unwrap_or_default();

        if let Err(err) = self
            .ticket_store
            .create_comment(&ticket_id, &self.state.draft)
            .await
        {
            tracing::warn!(ticket = %ticket_id, "failed to post comment: {err}");
            return CommentOutcome::Failed(err);
        }

        let actor_name = self
            .session
            .username
            .as_deref()
            .unwrap_or(ANONYMOUS_ACTOR);
        self.notifier.emit(NotificationEvent::comment_created(
            actor_name,
            self.session.user_id.as_deref(),
            &ticket_id,
            &ticket_author,
        ));

        let reload = self.load_ticket().await;
        CommentOutcome::Posted { reload }
    }

    fn edit_refusal(&self, what: &str) -> AppError {
        match &self.state.ticket {
            None => AppError::NotFound(self.state.ticket_id.clone()),
            Some(_) => AppError::Forbidden(format!("only the ticket author can edit the {what}")),
        }
    }
}
