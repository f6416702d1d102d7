//! The operations the front-end needs from the ticketing API

use async_trait::async_trait;
use ticketdesk_core::{
    ClassifyResponse, Result, Ticket, TicketCreatePayload, TicketFilters, TicketId, TicketStats,
    TicketUpdatePayload,
};

/// Remote ticketing API
///
/// Every call is a single attempt: no retry, no backoff and no cancellation.
/// Implementations must be shareable across spawned tasks.
#[async_trait]
pub trait TicketApi: Send + Sync {
    /// List tickets matching `filters`, in server order (newest first)
    async fn fetch_tickets(&self, filters: &TicketFilters) -> Result<Vec<Ticket>>;

    /// Create a ticket; the server assigns id, status and creation time
    async fn create_ticket(&self, payload: &TicketCreatePayload) -> Result<Ticket>;

    /// Partially update a ticket and return the full updated record
    async fn update_ticket(&self, id: TicketId, payload: &TicketUpdatePayload) -> Result<Ticket>;

    /// Ask the classifier for a suggested category and priority
    async fn classify_ticket(&self, description: &str) -> Result<ClassifyResponse>;

    /// Aggregate statistics over all tickets
    async fn fetch_stats(&self) -> Result<TicketStats>;
}
