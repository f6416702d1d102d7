//! Ticket submission form

use crate::request::Request;
use ticketdesk_core::types::TITLE_MAX_CHARS;
use ticketdesk_core::utils::cap_chars;
use ticketdesk_core::{
    ClassifyResponse, Result, Ticket, TicketCategory, TicketCreatePayload, TicketPriority,
};
use tracing::{error, warn};

/// Shortest trimmed description worth classifying
pub const CLASSIFY_MIN_CHARS: usize = 10;

/// Shown when submit is attempted with a blank field
pub const REQUIRED_FIELDS_ERROR: &str = "Title and description are required.";

/// Form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketForm {
    title: String,
    description: String,
    category: TicketCategory,
    priority: TicketPriority,
    is_classifying: bool,
    is_submitting: bool,
    classified: bool,
    error: Option<String>,
}

impl TicketForm {
    /// Empty form with default category and priority
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Selected category
    #[must_use]
    pub const fn category(&self) -> TicketCategory {
        self.category
    }

    /// Selected priority
    #[must_use]
    pub const fn priority(&self) -> TicketPriority {
        self.priority
    }

    /// A classification is in flight
    #[must_use]
    pub const fn is_classifying(&self) -> bool {
        self.is_classifying
    }

    /// A submission is in flight
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Category and priority currently hold unedited AI suggestions
    #[must_use]
    pub const fn is_classified(&self) -> bool {
        self.classified
    }

    /// Last error shown under the form
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Title length for the `n/200` counter
    #[must_use]
    pub fn title_len(&self) -> usize {
        self.title.chars().count()
    }

    /// Replace the title, capped at the API maximum
    pub fn set_title(&mut self, title: &str) {
        self.title = cap_chars(title, TITLE_MAX_CHARS);
    }

    /// Replace the description; any earlier suggestion is now stale
    pub fn set_description(&mut self, description: &str) {
        description.clone_into(&mut self.description);
        self.classified = false;
    }

    /// Pick a category by hand
    pub const fn set_category(&mut self, category: TicketCategory) {
        self.category = category;
    }

    /// Pick a priority by hand
    pub const fn set_priority(&mut self, priority: TicketPriority) {
        self.priority = priority;
    }

    /// Whether the classify control is enabled
    #[must_use]
    pub fn can_classify(&self) -> bool {
        !self.is_classifying && self.description.trim().chars().count() >= CLASSIFY_MIN_CHARS
    }

    /// Whether the submit control is enabled
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_submitting && !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }

    /// Ask for suggestions; `None` while the control is disabled
    pub fn classify(&mut self) -> Option<Request> {
        if !self.can_classify() {
            return None;
        }

        self.is_classifying = true;
        self.error = None;
        Some(Request::Classify(self.description.clone()))
    }

    /// Apply suggestions; failures leave the fields alone
    pub fn on_classified(&mut self, result: Result<ClassifyResponse>) {
        self.is_classifying = false;

        match result {
            Ok(suggestion) => {
                self.category = suggestion.suggested_category;
                self.priority = suggestion.suggested_priority;
                self.classified = true;
            }
            Err(e) => warn!(error = %e, "classification failed, keeping manual selection"),
        }
    }

    /// Validate and build the create request
    ///
    /// A blank title or description sets the required-fields error and
    /// yields no request.
    pub fn submit(&mut self) -> Option<Request> {
        if self.is_submitting {
            return None;
        }
        self.error = None;

        let title = self.title.trim();
        let description = self.description.trim();
        if title.is_empty() || description.is_empty() {
            self.error = Some(REQUIRED_FIELDS_ERROR.to_string());
            return None;
        }

        self.is_submitting = true;
        Some(Request::Create(TicketCreatePayload::new(
            title,
            description,
            self.category,
            self.priority,
        )))
    }

    /// Finish a submission; returns the new ticket on success
    ///
    /// Success resets the input fields; a classification still in flight
    /// keeps its control disabled until it lands. Failure keeps the input so
    /// the user can retry, and shows the error.
    pub fn on_created(&mut self, result: Result<Ticket>) -> Option<Ticket> {
        self.is_submitting = false;

        match result {
            Ok(ticket) => {
                self.title.clear();
                self.description.clear();
                self.category = TicketCategory::default();
                self.priority = TicketPriority::default();
                self.classified = false;
                self.error = None;
                Some(ticket)
            }
            Err(e) => {
                error!(error = %e, "failed to create ticket");
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use ticketdesk_core::{Error, TicketStatus};

    fn filled() -> TicketForm {
        let mut form = TicketForm::new();
        form.set_title("  Can't log in ");
        form.set_description(" Password reset loop ");
        form.set_category(TicketCategory::Technical);
        form.set_priority(TicketPriority::High);
        form
    }

    fn created(id: i64) -> Ticket {
        Ticket {
            id,
            title: "Can't log in".to_string(),
            description: "Password reset loop".to_string(),
            category: TicketCategory::Technical,
            priority: TicketPriority::High,
            status: TicketStatus::Open,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_defaults() {
        let form = TicketForm::new();

        assert_eq!(form.category(), TicketCategory::General);
        assert_eq!(form.priority(), TicketPriority::Medium);
        assert!(!form.is_classified());
        assert!(!form.can_submit());
        assert!(!form.can_classify());
    }

    #[rstest]
    #[case("", "description")]
    #[case("title", "")]
    #[case("   ", "description")]
    #[case("title", " \n\t ")]
    fn test_blank_fields_never_produce_a_request(#[case] title: &str, #[case] description: &str) {
        let mut form = TicketForm::new();
        form.set_title(title);
        form.set_description(description);

        assert_eq!(form.submit(), None);
        assert_eq!(form.error(), Some(REQUIRED_FIELDS_ERROR));
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_submit_trims_and_carries_four_fields() {
        let mut form = filled();

        let request = form.submit().unwrap();

        assert_eq!(
            request,
            Request::Create(TicketCreatePayload::new(
                "Can't log in",
                "Password reset loop",
                TicketCategory::Technical,
                TicketPriority::High,
            ))
        );
        assert!(form.is_submitting());
        assert_eq!(form.submit(), None);
    }

    #[test]
    fn test_success_resets_to_defaults() {
        let mut form = filled();
        form.submit().unwrap();

        let ticket = form.on_created(Ok(created(1))).unwrap();

        assert_eq!(ticket.id, 1);
        assert_eq!(form, TicketForm::default());
    }

    #[test]
    fn test_success_keeps_pending_classification_locked() {
        let mut form = filled();
        form.classify().unwrap();
        form.submit().unwrap();

        form.on_created(Ok(created(1))).unwrap();
        form.set_description("Another long description");

        assert!(form.is_classifying());
        assert_eq!(form.classify(), None);
        assert_eq!(form.title(), "");
        assert_eq!(form.category(), TicketCategory::General);

        form.on_classified(Ok(ClassifyResponse {
            suggested_category: TicketCategory::Account,
            suggested_priority: TicketPriority::Low,
        }));
        assert!(!form.is_classifying());
        assert!(form.classify().is_some());
    }

    #[test]
    fn test_failure_keeps_input_and_shows_error() {
        let mut form = filled();
        form.submit().unwrap();

        let outcome = form.on_created(Err(Error::Http {
            status: 400,
            body: "bad".to_string(),
        }));

        assert_eq!(outcome, None);
        assert_eq!(form.title(), "  Can't log in ");
        assert_eq!(form.category(), TicketCategory::Technical);
        assert_eq!(form.error(), Some("API Error 400: bad"));
        assert!(form.can_submit());
    }

    #[rstest]
    #[case("too short", false)]
    #[case("   too short   ", false)]
    #[case("ten chars!", true)]
    #[case("my card was charged twice", true)]
    fn test_classify_threshold(#[case] description: &str, #[case] enabled: bool) {
        let mut form = TicketForm::new();
        form.set_description(description);

        assert_eq!(form.can_classify(), enabled);
        assert_eq!(form.classify().is_some(), enabled);
    }

    #[test]
    fn test_classification_applies_suggestions_only() {
        let mut form = filled();
        form.set_description("Charged twice for March");
        let request = form.classify().unwrap();
        assert_eq!(request, Request::Classify("Charged twice for March".to_string()));
        assert!(form.is_classifying());
        assert_eq!(form.classify(), None);

        form.on_classified(Ok(ClassifyResponse {
            suggested_category: TicketCategory::Billing,
            suggested_priority: TicketPriority::Critical,
        }));

        assert_eq!(form.category(), TicketCategory::Billing);
        assert_eq!(form.priority(), TicketPriority::Critical);
        assert_eq!(form.title(), "  Can't log in ");
        assert_eq!(form.description(), "Charged twice for March");
        assert!(form.is_classified());
        assert!(!form.is_classifying());
    }

    #[test]
    fn test_classification_failure_is_silent() {
        let mut form = filled();
        form.classify().unwrap();

        form.on_classified(Err(Error::Transport {
            message: "connection refused".to_string(),
        }));

        assert_eq!(form.category(), TicketCategory::Technical);
        assert!(!form.is_classified());
        assert_eq!(form.error(), None);
    }

    #[test]
    fn test_editing_description_clears_classified() {
        let mut form = filled();
        form.classify().unwrap();
        form.on_classified(Ok(ClassifyResponse {
            suggested_category: TicketCategory::Account,
            suggested_priority: TicketPriority::Low,
        }));
        assert!(form.is_classified());

        form.set_description("Password reset loop, again");

        assert!(!form.is_classified());
        assert_eq!(form.category(), TicketCategory::Account);
    }

    #[test]
    fn test_title_is_capped() {
        let mut form = TicketForm::new();
        form.set_title(&"é".repeat(TITLE_MAX_CHARS + 20));

        assert_eq!(form.title_len(), TITLE_MAX_CHARS);
    }
}
