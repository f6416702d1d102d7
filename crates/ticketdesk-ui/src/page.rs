//! Root page: owns the shared ticket collection and drives every view
//!
//! The page is the only place requests run. Each [`Request`] a view returns
//! is spawned on a [`JoinSet`]; nothing is cancelled, and completions are
//! applied in whatever order they land. [`Page::step`] waits for the next
//! completion or the search debounce, whichever comes first.

use crate::card::StatusSelectors;
use crate::dashboard::Dashboard;
use crate::debounce::Debouncer;
use crate::form::TicketForm;
use crate::list::{TicketList, replace_ticket};
use crate::request::{Completion, Request};
use std::sync::Arc;
use ticketdesk_client::TicketApi;
use ticketdesk_core::config::UiConfig;
use ticketdesk_core::{
    Error, Result, Ticket, TicketCategory, TicketId, TicketPriority, TicketStatus,
};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info};

/// Top-level tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    /// Form and list
    #[default]
    Tickets,
    /// Statistics
    Dashboard,
}

/// Something the user did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Type into the title field
    SetTitle(String),
    /// Type into the description field
    SetDescription(String),
    /// Pick the form's category
    SetCategory(TicketCategory),
    /// Pick the form's priority
    SetPriority(TicketPriority),
    /// Press "AI Auto-Classify"
    Classify,
    /// Press "Submit Ticket"
    Submit,
    /// Type into the search box
    Search(String),
    /// Pick a category filter; `None` is "All Categories"
    FilterCategory(Option<TicketCategory>),
    /// Pick a priority filter; `None` is "All Priorities"
    FilterPriority(Option<TicketPriority>),
    /// Pick a status filter; `None` is "All Statuses"
    FilterStatus(Option<TicketStatus>),
    /// Press "Clear"
    ClearFilters,
    /// Pick a status on a ticket card
    ChangeStatus {
        /// Card's ticket
        id: TicketId,
        /// Picked status
        status: TicketStatus,
    },
    /// Switch tabs
    ShowTab(Tab),
}

enum Wake {
    Completed(std::result::Result<Completion, JoinError>),
    SearchSettled,
}

/// The whole front-end
pub struct Page {
    api: Arc<dyn TicketApi>,
    tasks: JoinSet<Completion>,
    search_debounce: Debouncer,
    form: TicketForm,
    list: TicketList,
    cards: StatusSelectors,
    dashboard: Dashboard,
    tickets: Vec<Ticket>,
    refresh_key: u64,
    tab: Tab,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("in_flight", &self.tasks.len())
            .field("search_pending", &self.search_debounce.is_armed())
            .field("tickets", &self.tickets.len())
            .field("refresh_key", &self.refresh_key)
            .field("tab", &self.tab)
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Build an unmounted page
    #[must_use]
    pub fn new(api: Arc<dyn TicketApi>, ui: &UiConfig) -> Self {
        Self {
            api,
            tasks: JoinSet::new(),
            search_debounce: Debouncer::new(ui.search_debounce()),
            form: TicketForm::new(),
            list: TicketList::new(),
            cards: StatusSelectors::new(),
            dashboard: Dashboard::new(ui.recent_activity_limit),
            tickets: Vec::new(),
            refresh_key: 0,
            tab: Tab::Tickets,
        }
    }

    /// Initial render: the list loads unfiltered
    pub fn mount(&mut self) {
        let request = self.list.load();
        self.spawn(request);
    }

    /// Shared ticket collection
    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Bumped once per created ticket
    #[must_use]
    pub const fn refresh_key(&self) -> u64 {
        self.refresh_key
    }

    /// Visible tab
    #[must_use]
    pub const fn tab(&self) -> Tab {
        self.tab
    }

    /// Form state
    #[must_use]
    pub const fn form(&self) -> &TicketForm {
        &self.form
    }

    /// List filter state
    #[must_use]
    pub const fn list(&self) -> &TicketList {
        &self.list
    }

    /// Card selector state
    #[must_use]
    pub const fn cards(&self) -> &StatusSelectors {
        &self.cards
    }

    /// Dashboard state
    #[must_use]
    pub const fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Requests still running
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// A debounced search refetch is pending
    #[must_use]
    pub const fn search_pending(&self) -> bool {
        self.search_debounce.is_armed()
    }

    /// Nothing running and nothing scheduled
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty() && !self.search_debounce.is_armed()
    }

    /// Apply a user action
    ///
    /// # Errors
    ///
    /// Returns a validation error when a status change names a ticket that is
    /// not in the current list.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        let request = match action {
            Action::SetTitle(title) => {
                self.form.set_title(&title);
                None
            }
            Action::SetDescription(description) => {
                self.form.set_description(&description);
                None
            }
            Action::SetCategory(category) => {
                self.form.set_category(category);
                None
            }
            Action::SetPriority(priority) => {
                self.form.set_priority(priority);
                None
            }
            Action::Classify => self.form.classify(),
            Action::Submit => self.form.submit(),
            Action::Search(text) => {
                if self.list.type_search(&text) {
                    self.search_debounce.arm();
                }
                None
            }
            Action::FilterCategory(category) => Some(self.list.set_category(category)),
            Action::FilterPriority(priority) => Some(self.list.set_priority(priority)),
            Action::FilterStatus(status) => Some(self.list.set_status(status)),
            Action::ClearFilters => {
                self.search_debounce.cancel();
                Some(self.list.clear())
            }
            Action::ChangeStatus { id, status } => {
                let ticket = self
                    .tickets
                    .iter()
                    .find(|t| t.id == id)
                    .ok_or_else(|| Error::validation("id", format!("no ticket #{id} in the list")))?;
                self.cards.select(ticket, status)
            }
            Action::ShowTab(tab) => self.show_tab(tab),
        };

        if let Some(request) = request {
            self.spawn(request);
        }
        Ok(())
    }

    fn show_tab(&mut self, tab: Tab) -> Option<Request> {
        self.tab = tab;
        match tab {
            Tab::Dashboard => self.dashboard.mount(),
            Tab::Tickets => {
                self.dashboard.unmount();
                None
            }
        }
    }

    fn spawn(&mut self, request: Request) {
        debug!(request = request.name(), "spawning request");
        let api = Arc::clone(&self.api);
        self.tasks.spawn(request.execute(api));
    }

    /// Feed a finished request back to the view that asked for it
    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Tickets(result) => self.list.on_loaded(result, &mut self.tickets),
            Completion::Classified(result) => self.form.on_classified(result),
            Completion::Created(result) => {
                if let Some(ticket) = self.form.on_created(result) {
                    self.on_ticket_created(ticket);
                }
            }
            Completion::StatusUpdated { id, result } => {
                if let Some(updated) = self.cards.on_updated(id, result) {
                    replace_ticket(&mut self.tickets, updated);
                }
            }
            Completion::Dashboard(result) => self.dashboard.on_loaded(result),
        }
    }

    /// Prepend the new ticket and bump the refresh key; every view keyed on
    /// it refetches
    fn on_ticket_created(&mut self, ticket: Ticket) {
        info!(ticket_id = ticket.id, "ticket created");
        self.tickets.insert(0, ticket);
        self.refresh_key += 1;

        let request = self.list.load();
        self.spawn(request);
        if let Some(request) = self.dashboard.refresh() {
            self.spawn(request);
        }
    }

    /// Wait for the next completion or debounce firing and apply it
    ///
    /// Returns false immediately when idle. Cancel-safe, so it can sit in a
    /// `select!` next to an input source.
    pub async fn step(&mut self) -> bool {
        if self.is_idle() {
            return false;
        }

        let wake = tokio::select! {
            Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => Wake::Completed(joined),
            () = self.search_debounce.fired(), if self.search_debounce.is_armed() => Wake::SearchSettled,
            else => return false,
        };

        match wake {
            Wake::Completed(Ok(completion)) => self.apply(completion),
            Wake::Completed(Err(e)) => error!(error = %e, "request task did not complete"),
            Wake::SearchSettled => {
                let request = self.list.load();
                self.spawn(request);
            }
        }
        true
    }

    /// Step until nothing is running or scheduled
    pub async fn settle(&mut self) {
        while self.step().await {}
    }
}
