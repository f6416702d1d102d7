//! Requests the views ask for and the completions fed back to them
//!
//! Views never touch the network. An action that needs the API returns a
//! [`Request`]; the page runs it on its task set and hands the resulting
//! [`Completion`] back to the view that asked.

use std::sync::Arc;
use ticketdesk_client::TicketApi;
use ticketdesk_core::{
    ClassifyResponse, Result, Ticket, TicketCreatePayload, TicketFilters, TicketId, TicketStats,
    TicketStatus, TicketUpdatePayload,
};

/// A single API call a view wants made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Refetch the ticket list with these filters
    FetchTickets(TicketFilters),
    /// Classify a description
    Classify(String),
    /// Create a ticket
    Create(TicketCreatePayload),
    /// Change one ticket's status
    UpdateStatus {
        /// Ticket to update
        id: TicketId,
        /// New status
        status: TicketStatus,
    },
    /// Fetch stats and the unfiltered ticket list together
    LoadDashboard,
}

/// Everything the dashboard shows, fetched in one go
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    /// Aggregate counts
    pub stats: TicketStats,
    /// Unfiltered ticket list in server order
    pub tickets: Vec<Ticket>,
}

/// Result of a [`Request`]
#[derive(Debug)]
pub enum Completion {
    /// Ticket list arrived
    Tickets(Result<Vec<Ticket>>),
    /// Classification arrived
    Classified(Result<ClassifyResponse>),
    /// Creation finished
    Created(Result<Ticket>),
    /// Status update finished
    StatusUpdated {
        /// Ticket the update was for
        id: TicketId,
        /// Updated ticket or the failure
        result: Result<Ticket>,
    },
    /// Dashboard data arrived
    Dashboard(Result<DashboardData>),
}

impl Request {
    /// Short name for logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FetchTickets(_) => "fetch_tickets",
            Self::Classify(_) => "classify_ticket",
            Self::Create(_) => "create_ticket",
            Self::UpdateStatus { .. } => "update_ticket",
            Self::LoadDashboard => "load_dashboard",
        }
    }

    /// Perform the call; one attempt, never retried
    pub async fn execute(self, api: Arc<dyn TicketApi>) -> Completion {
        match self {
            Self::FetchTickets(filters) => Completion::Tickets(api.fetch_tickets(&filters).await),
            Self::Classify(description) => {
                Completion::Classified(api.classify_ticket(&description).await)
            }
            Self::Create(payload) => Completion::Created(api.create_ticket(&payload).await),
            Self::UpdateStatus { id, status } => Completion::StatusUpdated {
                id,
                result: api
                    .update_ticket(id, &TicketUpdatePayload::status(status))
                    .await,
            },
            Self::LoadDashboard => {
                let all = TicketFilters::default();
                let (stats, tickets) = tokio::join!(api.fetch_stats(), api.fetch_tickets(&all));
                Completion::Dashboard(
                    stats.and_then(|stats| tickets.map(|tickets| DashboardData { stats, tickets })),
                )
            }
        }
    }
}
