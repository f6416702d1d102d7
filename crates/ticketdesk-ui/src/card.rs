//! Per-card status selector state

use crate::request::Request;
use std::collections::HashSet;
use ticketdesk_core::{Result, Ticket, TicketId, TicketStatus};
use tracing::warn;

/// Which cards have a status update in flight
///
/// A card's selector is disabled while its update runs. The ticket shown is
/// never touched here; it changes only when the server confirms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSelectors {
    updating: HashSet<TicketId>,
}

impl StatusSelectors {
    /// No updates in flight
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the card for `id` is disabled
    #[must_use]
    pub fn is_updating(&self, id: TicketId) -> bool {
        self.updating.contains(&id)
    }

    /// Pick a status on a card
    ///
    /// Yields nothing while that card is disabled or when the status is the
    /// one already shown.
    pub fn select(&mut self, ticket: &Ticket, status: TicketStatus) -> Option<Request> {
        if self.is_updating(ticket.id) || ticket.status == status {
            return None;
        }

        self.updating.insert(ticket.id);
        Some(Request::UpdateStatus {
            id: ticket.id,
            status,
        })
    }

    /// Re-enable the card; the confirmed ticket is returned for the list
    pub fn on_updated(&mut self, id: TicketId, result: Result<Ticket>) -> Option<Ticket> {
        self.updating.remove(&id);

        result
            .inspect_err(|e| warn!(ticket_id = id, error = %e, "failed to update status"))
            .ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use ticketdesk_core::{Error, TicketCategory, TicketPriority};

    fn ticket(status: TicketStatus) -> Ticket {
        Ticket {
            id: 8,
            title: "Invoice missing".to_string(),
            description: "No invoice for February".to_string(),
            category: TicketCategory::Billing,
            priority: TicketPriority::Low,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_select_disables_until_settled() {
        let mut selectors = StatusSelectors::new();
        let current = ticket(TicketStatus::Open);

        let request = selectors.select(&current, TicketStatus::Resolved);
        assert_eq!(
            request,
            Some(Request::UpdateStatus {
                id: 8,
                status: TicketStatus::Resolved
            })
        );
        assert!(selectors.is_updating(8));
        assert_eq!(selectors.select(&current, TicketStatus::Closed), None);

        let confirmed = selectors.on_updated(8, Ok(ticket(TicketStatus::Resolved)));
        assert_eq!(confirmed.unwrap().status, TicketStatus::Resolved);
        assert!(!selectors.is_updating(8));
    }

    #[test]
    fn test_selecting_current_status_is_a_no_op() {
        let mut selectors = StatusSelectors::new();

        assert_eq!(
            selectors.select(&ticket(TicketStatus::Closed), TicketStatus::Closed),
            None
        );
        assert!(!selectors.is_updating(8));
    }

    #[test]
    fn test_failure_reenables_without_a_ticket() {
        let mut selectors = StatusSelectors::new();
        selectors.select(&ticket(TicketStatus::Open), TicketStatus::Closed);

        let outcome = selectors.on_updated(
            8,
            Err(Error::Http {
                status: 500,
                body: String::new(),
            }),
        );

        assert_eq!(outcome, None);
        assert!(!selectors.is_updating(8));
    }
}
