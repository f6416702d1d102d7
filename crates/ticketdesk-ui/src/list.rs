//! Filterable, searchable ticket list
//!
//! The list owns filter and search state only. The tickets themselves belong
//! to the page and are handed in whenever a fetch lands or a card reports an
//! update. Timing of the search refetch is the page's job: [`TicketList::type_search`]
//! only reports whether the text changed.

use crate::request::Request;
use ticketdesk_core::{
    Result, Ticket, TicketCategory, TicketFilters, TicketPriority, TicketStatus,
};
use tracing::warn;

/// Empty-state hint while a filter or search is active
pub const FILTERED_EMPTY_HINT: &str = "Try adjusting your filters";

/// Empty-state hint with no constraint at all
pub const UNFILTERED_EMPTY_HINT: &str = "Submit your first ticket above";

/// Filter and search state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketList {
    category: Option<TicketCategory>,
    priority: Option<TicketPriority>,
    status: Option<TicketStatus>,
    search: String,
    is_loading: bool,
}

impl Default for TicketList {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketList {
    /// Unfiltered list, loading until its first fetch lands
    #[must_use]
    pub const fn new() -> Self {
        Self {
            category: None,
            priority: None,
            status: None,
            search: String::new(),
            is_loading: true,
        }
    }

    /// Category filter
    #[must_use]
    pub const fn category(&self) -> Option<TicketCategory> {
        self.category
    }

    /// Priority filter
    #[must_use]
    pub const fn priority(&self) -> Option<TicketPriority> {
        self.priority
    }

    /// Status filter
    #[must_use]
    pub const fn status(&self) -> Option<TicketStatus> {
        self.status
    }

    /// Raw search text as typed
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// A fetch is outstanding
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether a filter is set or any search text has been typed
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        self.category.is_some()
            || self.priority.is_some()
            || self.status.is_some()
            || !self.search.is_empty()
    }

    /// Filters as sent to the API; the search text is trimmed
    #[must_use]
    pub fn query(&self) -> TicketFilters {
        TicketFilters {
            category: self.category,
            priority: self.priority,
            status: self.status,
            search: None,
        }
        .with_search(&self.search)
    }

    /// Refetch with the current filters and search
    pub fn load(&mut self) -> Request {
        self.is_loading = true;
        Request::FetchTickets(self.query())
    }

    /// Change the category filter and refetch
    pub fn set_category(&mut self, category: Option<TicketCategory>) -> Request {
        self.category = category;
        self.load()
    }

    /// Change the priority filter and refetch
    pub fn set_priority(&mut self, priority: Option<TicketPriority>) -> Request {
        self.priority = priority;
        self.load()
    }

    /// Change the status filter and refetch
    pub fn set_status(&mut self, status: Option<TicketStatus>) -> Request {
        self.status = status;
        self.load()
    }

    /// Record a keystroke; true when the text actually changed and the
    /// debounced refetch should be (re)armed
    pub fn type_search(&mut self, text: &str) -> bool {
        if self.search == text {
            return false;
        }

        text.clone_into(&mut self.search);
        true
    }

    /// Drop every filter and the search text, refetching immediately
    pub fn clear(&mut self) -> Request {
        self.category = None;
        self.priority = None;
        self.status = None;
        self.search.clear();
        self.load()
    }

    /// Replace the whole collection with a fetch result
    ///
    /// A failed fetch keeps whatever was shown before.
    pub fn on_loaded(&mut self, result: Result<Vec<Ticket>>, tickets: &mut Vec<Ticket>) {
        self.is_loading = false;

        match result {
            Ok(fetched) => *tickets = fetched,
            Err(e) => warn!(error = %e, "failed to load tickets"),
        }
    }

    /// Hint under "No tickets found"
    #[must_use]
    pub fn empty_hint(&self) -> &'static str {
        if self.has_active_filters() {
            FILTERED_EMPTY_HINT
        } else {
            UNFILTERED_EMPTY_HINT
        }
    }
}

/// Swap in an updated ticket by id, keeping order; false if it is not listed
pub fn replace_ticket(tickets: &mut [Ticket], updated: Ticket) -> bool {
    match tickets.iter_mut().find(|t| t.id == updated.id) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}
