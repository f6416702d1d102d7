//! In-memory ticketing API for testing

use crate::api::TicketApi;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use ticketdesk_core::{
    ClassifyResponse, Error, Result, Ticket, TicketCategory, TicketCreatePayload, TicketFilters,
    TicketId, TicketPriority, TicketStats, TicketStatus, TicketUpdatePayload,
};
use tokio::time::{Duration, sleep};
use validator::Validate;

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `fetch_tickets`
    FetchTickets,
    /// `create_ticket`
    CreateTicket,
    /// `update_ticket`
    UpdateTicket,
    /// `classify_ticket`
    ClassifyTicket,
    /// `fetch_stats`
    FetchStats,
}

/// A recorded call, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// List request with its filters
    FetchTickets(TicketFilters),
    /// Create request
    CreateTicket(TicketCreatePayload),
    /// Partial update
    UpdateTicket {
        /// Target ticket
        id: TicketId,
        /// Fields sent
        payload: TicketUpdatePayload,
    },
    /// Classification of a description
    ClassifyTicket(String),
    /// Stats request
    FetchStats,
}

#[derive(Debug)]
struct MockState {
    tickets: Vec<Ticket>,
    next_id: TicketId,
    calls: Vec<ApiCall>,
}

/// Mock ticketing API backed by a vector of tickets
///
/// Behaves like the real server: ids and creation times are assigned on
/// create, new tickets get status `open`, listings are newest first and
/// searches match title or description case-insensitively. Clones share
/// state, so a test can keep a handle while the UI owns another.
#[derive(Debug, Clone)]
pub struct MockTicketApi {
    state: Arc<Mutex<MockState>>,

    /// Mock response delay
    delay: Duration,

    /// Operations that answer with a server error
    failing: HashSet<Operation>,

    /// Classifier answer
    classification: ClassifyResponse,
}

impl Default for MockTicketApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTicketApi {
    /// Create an empty mock
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                tickets: Vec::new(),
                next_id: 1,
                calls: Vec::new(),
            })),
            delay: Duration::ZERO,
            failing: HashSet::new(),
            classification: ClassifyResponse {
                suggested_category: TicketCategory::General,
                suggested_priority: TicketPriority::Medium,
            },
        }
    }

    /// Seed existing tickets; ids continue after the largest seeded id
    #[must_use]
    pub fn with_tickets(self, tickets: impl IntoIterator<Item = Ticket>) -> Self {
        {
            let mut state = self.lock();
            state.tickets.extend(tickets);
            let max_id = state.tickets.iter().map(|t| t.id).max().unwrap_or(0);
            state.next_id = state.next_id.max(max_id + 1);
        }
        self
    }

    /// Set response delay for testing
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make `operation` answer with HTTP 500
    #[must_use]
    pub fn with_failure(mut self, operation: Operation) -> Self {
        self.failing.insert(operation);
        self
    }

    /// Set the classifier's answer
    #[must_use]
    pub const fn with_classification(
        mut self,
        category: TicketCategory,
        priority: TicketPriority,
    ) -> Self {
        self.classification = ClassifyResponse {
            suggested_category: category,
            suggested_priority: priority,
        };
        self
    }

    /// Every call received so far
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Filters of every list request received so far
    #[must_use]
    pub fn fetches(&self) -> Vec<TicketFilters> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                ApiCall::FetchTickets(filters) => Some(filters.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Current server-side copy of a ticket
    #[must_use]
    pub fn ticket(&self, id: TicketId) -> Option<Ticket> {
        self.lock().tickets.iter().find(|t| t.id == id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn respond(&self, operation: Operation, call: ApiCall) -> Result<()> {
        self.lock().calls.push(call);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        if self.failing.contains(&operation) {
            return Err(Error::Http {
                status: 500,
                body: format!("mock failure in {operation:?}"),
            });
        }

        Ok(())
    }
}

fn matches(ticket: &Ticket, filters: &TicketFilters) -> bool {
    if filters.category.is_some_and(|c| c != ticket.category)
        || filters.priority.is_some_and(|p| p != ticket.priority)
        || filters.status.is_some_and(|s| s != ticket.status)
    {
        return false;
    }

    filters.search_term().is_none_or(|term| {
        let term = term.to_lowercase();
        ticket.title.to_lowercase().contains(&term)
            || ticket.description.to_lowercase().contains(&term)
    })
}

#[allow(clippy::cast_precision_loss)]
fn average_per_day(total: u64, earliest: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(earliest) = earliest else {
        return 0.0;
    };
    if total == 0 {
        return 0.0;
    }

    let days = (now - earliest).num_days().max(1);
    ((total as f64 / days as f64) * 10.0).round() / 10.0
}

#[async_trait]
impl TicketApi for MockTicketApi {
    async fn fetch_tickets(&self, filters: &TicketFilters) -> Result<Vec<Ticket>> {
        self.respond(Operation::FetchTickets, ApiCall::FetchTickets(filters.clone()))
            .await?;

        let mut tickets: Vec<Ticket> = self
            .lock()
            .tickets
            .iter()
            .filter(|t| matches(t, filters))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(tickets)
    }

    async fn create_ticket(&self, payload: &TicketCreatePayload) -> Result<Ticket> {
        payload.validate()?;
        self.respond(Operation::CreateTicket, ApiCall::CreateTicket(payload.clone()))
            .await?;

        let mut state = self.lock();
        let ticket = Ticket {
            id: state.next_id,
            title: payload.title.clone(),
            description: payload.description.clone(),
            category: payload.category,
            priority: payload.priority,
            status: TicketStatus::Open,
            created_at: Utc::now(),
        };
        state.next_id += 1;
        state.tickets.push(ticket.clone());
        drop(state);

        Ok(ticket)
    }

    async fn update_ticket(&self, id: TicketId, payload: &TicketUpdatePayload) -> Result<Ticket> {
        self.respond(
            Operation::UpdateTicket,
            ApiCall::UpdateTicket {
                id,
                payload: payload.clone(),
            },
        )
        .await?;

        let mut state = self.lock();
        let Some(ticket) = state.tickets.iter_mut().find(|t| t.id == id) else {
            return Err(Error::Http {
                status: 404,
                body: r#"{"detail":"No Ticket matches the given query."}"#.to_string(),
            });
        };

        if let Some(title) = &payload.title {
            ticket.title.clone_from(title);
        }
        if let Some(description) = &payload.description {
            ticket.description.clone_from(description);
        }
        if let Some(category) = payload.category {
            ticket.category = category;
        }
        if let Some(priority) = payload.priority {
            ticket.priority = priority;
        }
        if let Some(status) = payload.status {
            ticket.status = status;
        }
        let updated = ticket.clone();
        drop(state);

        Ok(updated)
    }

    async fn classify_ticket(&self, description: &str) -> Result<ClassifyResponse> {
        self.respond(
            Operation::ClassifyTicket,
            ApiCall::ClassifyTicket(description.to_string()),
        )
        .await?;

        Ok(self.classification)
    }

    async fn fetch_stats(&self) -> Result<TicketStats> {
        self.respond(Operation::FetchStats, ApiCall::FetchStats).await?;

        let tickets = self.lock().tickets.clone();
        let total = tickets.len() as u64;
        let open = tickets
            .iter()
            .filter(|t| t.status == TicketStatus::Open)
            .count() as u64;
        let earliest = tickets.iter().map(|t| t.created_at).min();

        let mut priority_breakdown: BTreeMap<String, u64> = TicketPriority::ALL
            .iter()
            .map(|p| (p.as_str().to_string(), 0))
            .collect();
        let mut category_breakdown: BTreeMap<String, u64> = TicketCategory::ALL
            .iter()
            .map(|c| (c.as_str().to_string(), 0))
            .collect();
        for ticket in &tickets {
            *priority_breakdown
                .entry(ticket.priority.as_str().to_string())
                .or_default() += 1;
            *category_breakdown
                .entry(ticket.category.as_str().to_string())
                .or_default() += 1;
        }

        Ok(TicketStats {
            total_tickets: total,
            open_tickets: open,
            avg_tickets_per_day: average_per_day(total, earliest, Utc::now()),
            priority_breakdown,
            category_breakdown,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn ticket(id: TicketId, title: &str, hours_ago: i64) -> Ticket {
        Ticket {
            id,
            title: title.to_string(),
            description: format!("{title} details"),
            category: TicketCategory::Technical,
            priority: TicketPriority::Low,
            status: TicketStatus::Open,
            created_at: Utc::now() - chrono::Duration::hours(hours_ago),
        }
    }

    #[tokio::test]
    async fn test_listing_is_newest_first_and_searchable() {
        let api = MockTicketApi::new().with_tickets([
            ticket(1, "Printer jammed", 5),
            ticket(2, "VPN drops", 1),
            ticket(3, "Second PRINTER", 3),
        ]);

        let all = api.fetch_tickets(&TicketFilters::default()).await.unwrap();
        assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 3, 1]);

        let found = api
            .fetch_tickets(&TicketFilters::default().with_search("printer"))
            .await
            .unwrap();
        assert_eq!(found.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 1]);
        assert_eq!(api.fetches().len(), 2);
    }

    #[tokio::test]
    async fn test_create_assigns_id_after_seeded_tickets() {
        let api = MockTicketApi::new().with_tickets([ticket(41, "Old", 2)]);

        let created = api
            .create_ticket(&TicketCreatePayload::new(
                "New",
                "Something broke",
                TicketCategory::Billing,
                TicketPriority::High,
            ))
            .await
            .unwrap();

        assert_eq!(created.id, 42);
        assert_eq!(created.status, TicketStatus::Open);
        assert_eq!(api.ticket(42), Some(created));
    }

    #[tokio::test]
    async fn test_update_unknown_ticket_is_not_found() {
        let api = MockTicketApi::new();

        let err = api
            .update_ticket(9, &TicketUpdatePayload::status(TicketStatus::Closed))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_reported() {
        let api = MockTicketApi::new().with_failure(Operation::ClassifyTicket);

        let err = api.classify_ticket("my card was charged twice").await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(
            api.calls(),
            vec![ApiCall::ClassifyTicket("my card was charged twice".to_string())]
        );
    }

    #[tokio::test]
    async fn test_stats_cover_every_key() {
        let api = MockTicketApi::new().with_tickets([ticket(1, "a", 1), ticket(2, "b", 2)]);

        let stats = api.fetch_stats().await.unwrap();

        assert_eq!(stats.total_tickets, 2);
        assert_eq!(stats.open_tickets, 2);
        assert_eq!(stats.priority_breakdown.len(), 4);
        assert_eq!(stats.category_breakdown.get("technical"), Some(&2));
        assert_eq!(stats.category_breakdown.get("billing"), Some(&0));
    }

    #[test]
    fn test_average_per_day_uses_at_least_one_day() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();

        assert_eq!(average_per_day(0, None, now), 0.0);
        assert_eq!(average_per_day(3, Some(now), now), 3.0);
        assert_eq!(
            average_per_day(10, Some(now - chrono::Duration::days(3)), now),
            3.3
        );
    }
}
