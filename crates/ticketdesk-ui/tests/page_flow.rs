//! End-to-end flows through `Page` against the in-memory API
//!
//! Tests run on a paused clock so debounce timing is exact.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chrono::{Duration as ChronoDuration, Utc};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use ticketdesk_client::mock::{ApiCall, MockTicketApi, Operation};
use ticketdesk_core::config::UiConfig;
use ticketdesk_core::{
    Ticket, TicketCategory, TicketCreatePayload, TicketFilters, TicketPriority, TicketStatus,
};
use ticketdesk_ui::form::REQUIRED_FIELDS_ERROR;
use ticketdesk_ui::{Action, Page, Tab};
use tokio::time::{Duration, Instant, advance};

fn seed(count: i64) -> Vec<Ticket> {
    (1..=count)
        .map(|id| Ticket {
            id,
            title: if id % 2 == 0 {
                format!("Printer problem {id}")
            } else {
                format!("VPN problem {id}")
            },
            description: "Reported by the front desk".to_string(),
            category: if id % 2 == 0 {
                TicketCategory::Technical
            } else {
                TicketCategory::Account
            },
            priority: TicketPriority::Medium,
            status: TicketStatus::Open,
            created_at: Utc::now() - ChronoDuration::hours(count - id + 1),
        })
        .collect()
}

async fn mounted(mock: &MockTicketApi) -> Page {
    let mut page = Page::new(Arc::new(mock.clone()), &UiConfig::default());
    page.mount();
    page.settle().await;
    mock.clear_calls();
    page
}

fn ids(page: &Page) -> Vec<i64> {
    page.tickets().iter().map(|t| t.id).collect()
}

#[tokio::test(start_paused = true)]
async fn test_typing_search_issues_one_fetch_after_quiet_period() {
    let mock = MockTicketApi::new().with_tickets(seed(4));
    let mut page = mounted(&mock).await;

    let mut typed = String::new();
    for ch in "printer".chars() {
        typed.push(ch);
        page.dispatch(Action::Search(typed.clone())).unwrap();
        advance(Duration::from_millis(120)).await;
    }
    assert!(mock.fetches().is_empty());

    let last_keystroke = Instant::now() - Duration::from_millis(120);
    page.settle().await;

    assert_eq!(
        mock.fetches(),
        vec![TicketFilters::default().with_search("printer")]
    );
    assert!(Instant::now() - last_keystroke >= Duration::from_millis(300));
    assert_eq!(ids(&page), vec![4, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_pauses_longer_than_debounce_fetch_each_time() {
    let mock = MockTicketApi::new().with_tickets(seed(2));
    let mut page = mounted(&mock).await;

    page.dispatch(Action::Search("vpn".to_string())).unwrap();
    page.settle().await;
    page.dispatch(Action::Search("printer".to_string())).unwrap();
    page.settle().await;

    assert_eq!(
        mock.fetches(),
        vec![
            TicketFilters::default().with_search("vpn"),
            TicketFilters::default().with_search("printer"),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_filter_change_fetches_immediately() {
    let mock = MockTicketApi::new().with_tickets(seed(4));
    let mut page = mounted(&mock).await;
    let start = Instant::now();

    page.dispatch(Action::FilterCategory(Some(TicketCategory::Account)))
        .unwrap();
    assert!(page.list().is_loading());
    page.settle().await;

    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(
        mock.fetches(),
        vec![TicketFilters {
            category: Some(TicketCategory::Account),
            ..TicketFilters::default()
        }]
    );
    assert_eq!(ids(&page), vec![3, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_clear_filters_refetches_once_and_drops_pending_search() {
    let mock = MockTicketApi::new().with_tickets(seed(4));
    let mut page = mounted(&mock).await;

    page.dispatch(Action::FilterStatus(Some(TicketStatus::Closed)))
        .unwrap();
    page.settle().await;
    assert!(page.tickets().is_empty());
    mock.clear_calls();

    page.dispatch(Action::Search("print".to_string())).unwrap();
    assert!(page.search_pending());
    page.dispatch(Action::ClearFilters).unwrap();
    assert!(!page.search_pending());
    page.settle().await;

    assert_eq!(mock.fetches(), vec![TicketFilters::default()]);
    assert_eq!(ids(&page), vec![4, 3, 2, 1]);
    assert!(!page.list().has_active_filters());
}

#[tokio::test(start_paused = true)]
async fn test_create_prepends_ticket_and_bumps_refresh_key() {
    let mock = MockTicketApi::new().with_tickets(seed(2));
    let mut page = mounted(&mock).await;

    page.dispatch(Action::SetTitle("Can't log in".to_string()))
        .unwrap();
    page.dispatch(Action::SetDescription("Password reset loop".to_string()))
        .unwrap();
    page.dispatch(Action::SetCategory(TicketCategory::Technical))
        .unwrap();
    page.dispatch(Action::SetPriority(TicketPriority::High)).unwrap();
    page.dispatch(Action::Submit).unwrap();
    assert!(page.form().is_submitting());

    // The creation lands first; the refresh it triggers is still in flight
    assert!(page.step().await);
    assert_eq!(page.refresh_key(), 1);
    assert_eq!(page.tickets()[0].id, 3);
    assert_eq!(page.tickets()[0].title, "Can't log in");
    assert_eq!(ids(&page), vec![3, 2, 1]);

    page.settle().await;

    assert_eq!(
        mock.calls(),
        vec![
            ApiCall::CreateTicket(TicketCreatePayload::new(
                "Can't log in",
                "Password reset loop",
                TicketCategory::Technical,
                TicketPriority::High,
            )),
            ApiCall::FetchTickets(TicketFilters::default()),
        ]
    );
    assert_eq!(ids(&page), vec![3, 2, 1]);
    assert_eq!(page.form().title(), "");
    assert_eq!(page.form().category(), TicketCategory::General);
    assert_eq!(page.form().priority(), TicketPriority::Medium);
    assert!(!page.form().is_classified());
}

#[tokio::test(start_paused = true)]
async fn test_blank_submit_never_reaches_the_api() {
    let mock = MockTicketApi::new();
    let mut page = mounted(&mock).await;

    page.dispatch(Action::SetTitle("   ".to_string())).unwrap();
    page.dispatch(Action::SetDescription("Password reset loop".to_string()))
        .unwrap();
    page.dispatch(Action::Submit).unwrap();
    page.settle().await;

    assert!(mock.calls().is_empty());
    assert_eq!(page.form().error(), Some(REQUIRED_FIELDS_ERROR));
    assert_eq!(page.refresh_key(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_create_keeps_form_and_list() {
    let mock = MockTicketApi::new()
        .with_tickets(seed(2))
        .with_failure(Operation::CreateTicket);
    let mut page = mounted(&mock).await;

    page.dispatch(Action::SetTitle("Refund".to_string())).unwrap();
    page.dispatch(Action::SetDescription("Charged twice".to_string()))
        .unwrap();
    page.dispatch(Action::Submit).unwrap();
    page.settle().await;

    assert_eq!(page.form().title(), "Refund");
    assert!(page.form().error().unwrap().starts_with("API Error 500"));
    assert_eq!(page.refresh_key(), 0);
    assert_eq!(ids(&page), vec![2, 1]);
    assert_eq!(mock.fetches().len(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_status_change_replaces_only_that_ticket() {
    let mock = MockTicketApi::new().with_tickets(seed(3));
    let mut page = mounted(&mock).await;
    let before = page.tickets().to_vec();

    page.dispatch(Action::ChangeStatus {
        id: 2,
        status: TicketStatus::Resolved,
    })
    .unwrap();
    assert!(page.cards().is_updating(2));
    assert_eq!(page.tickets()[1].status, TicketStatus::Open);
    page.settle().await;

    assert!(!page.cards().is_updating(2));
    assert_eq!(ids(&page), vec![3, 2, 1]);
    assert_eq!(page.tickets()[1].status, TicketStatus::Resolved);
    assert_eq!(page.tickets()[0], before[0]);
    assert_eq!(page.tickets()[2], before[2]);
    assert!(mock.fetches().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failed_status_change_leaves_ticket_unchanged() {
    let mock = MockTicketApi::new()
        .with_tickets(seed(3))
        .with_failure(Operation::UpdateTicket);
    let mut page = mounted(&mock).await;
    let before = page.tickets().to_vec();

    page.dispatch(Action::ChangeStatus {
        id: 1,
        status: TicketStatus::Closed,
    })
    .unwrap();
    page.settle().await;

    assert_eq!(page.tickets(), before.as_slice());
    assert!(!page.cards().is_updating(1));
}

#[tokio::test(start_paused = true)]
async fn test_classify_fills_category_and_priority_only() {
    let mock = MockTicketApi::new()
        .with_classification(TicketCategory::Billing, TicketPriority::Critical);
    let mut page = mounted(&mock).await;

    page.dispatch(Action::SetTitle("Refund".to_string())).unwrap();
    page.dispatch(Action::SetDescription("0123456789".to_string()))
        .unwrap();
    page.dispatch(Action::Classify).unwrap();
    assert!(page.form().is_classifying());
    page.settle().await;

    assert_eq!(
        mock.calls(),
        vec![ApiCall::ClassifyTicket("0123456789".to_string())]
    );
    assert_eq!(page.form().category(), TicketCategory::Billing);
    assert_eq!(page.form().priority(), TicketPriority::Critical);
    assert_eq!(page.form().title(), "Refund");
    assert_eq!(page.form().description(), "0123456789");
    assert!(page.form().is_classified());

    page.dispatch(Action::SetDescription("0123456789!".to_string()))
        .unwrap();
    assert!(!page.form().is_classified());
}

#[tokio::test(start_paused = true)]
async fn test_short_description_is_not_classified() {
    let mock = MockTicketApi::new();
    let mut page = mounted(&mock).await;

    page.dispatch(Action::SetDescription("   too short   ".to_string()))
        .unwrap();
    page.dispatch(Action::Classify).unwrap();

    assert!(page.is_idle());
    assert!(mock.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dashboard_shows_stats_and_five_recent() {
    let mock = MockTicketApi::new().with_tickets(seed(7));
    let mut page = mounted(&mock).await;

    page.dispatch(Action::ShowTab(Tab::Dashboard)).unwrap();
    page.settle().await;

    let dashboard = page.dashboard();
    let stats = dashboard.stats().unwrap();
    assert_eq!(stats.total_tickets, 7);
    assert_eq!(dashboard.resolution_rate(), Some(0));
    assert_eq!(
        dashboard.recent().iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![7, 6, 5, 4, 3]
    );
}

#[tokio::test(start_paused = true)]
async fn test_dashboard_reloads_on_refresh_while_mounted() {
    let mock = MockTicketApi::new().with_tickets(seed(1));
    let mut page = mounted(&mock).await;
    page.dispatch(Action::ShowTab(Tab::Dashboard)).unwrap();
    page.settle().await;

    page.dispatch(Action::SetTitle("New".to_string())).unwrap();
    page.dispatch(Action::SetDescription("Brand new issue".to_string()))
        .unwrap();
    page.dispatch(Action::Submit).unwrap();
    page.settle().await;

    assert_eq!(page.refresh_key(), 1);
    assert_eq!(page.dashboard().stats().unwrap().total_tickets, 2);
    assert_eq!(page.dashboard().recent()[0].title, "New");
}

#[tokio::test(start_paused = true)]
async fn test_create_landing_mid_classification_keeps_classify_locked() {
    let mock = MockTicketApi::new()
        .with_delay(Duration::from_millis(500))
        .with_classification(TicketCategory::Billing, TicketPriority::High);
    let mut page = mounted(&mock).await;

    page.dispatch(Action::SetTitle("Refund".to_string())).unwrap();
    page.dispatch(Action::SetDescription("Charged twice for one order".to_string()))
        .unwrap();
    page.dispatch(Action::Submit).unwrap();
    tokio::task::yield_now().await;
    advance(Duration::from_millis(100)).await;
    page.dispatch(Action::Classify).unwrap();

    while page.refresh_key() == 0 {
        assert!(page.step().await);
    }
    assert!(page.form().is_classifying());

    page.dispatch(Action::SetDescription("Another long description".to_string()))
        .unwrap();
    page.dispatch(Action::Classify).unwrap();
    page.settle().await;

    let classifications = mock
        .calls()
        .into_iter()
        .filter(|call| matches!(call, ApiCall::ClassifyTicket(_)))
        .count();
    assert_eq!(classifications, 1);
    assert!(!page.form().is_classifying());
}
