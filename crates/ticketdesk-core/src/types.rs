//! Ticket data model exchanged with the ticketing API

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Server-assigned ticket identifier
pub type TicketId = i64;

/// Maximum title length accepted by the API
pub const TITLE_MAX_CHARS: usize = 200;

/// Declares a closed enum carried on the wire as a lowercase string.
///
/// Deserialization never fails: a value the server sends that this build does
/// not know degrades to the enum's default so a single odd row cannot take
/// down a whole list.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $field:literal (default $default:ident) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $wire:literal $(| $alias:literal)*
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every value, in display order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire representation
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let normalized = s.trim().to_ascii_lowercase();
                match normalized.as_str() {
                    $($wire $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(Error::validation(
                        $field,
                        format!(
                            "unknown {} '{}' (expected one of: {})",
                            $field,
                            s.trim(),
                            Self::ALL
                                .iter()
                                .map(|value| value.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        ),
                    )),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(raw.parse().unwrap_or_else(|_| {
                    tracing::warn!(field = $field, value = %raw, "unrecognized value, using default");
                    Self::default()
                }))
            }
        }
    };
}

wire_enum! {
    /// Ticket category
    pub enum TicketCategory as "category" (default General) {
        /// Invoices, refunds, payment methods
        Billing = "billing",
        /// Bugs and outages
        Technical = "technical",
        /// Login, profile and access problems
        Account = "account",
        /// Anything else
        General = "general",
    }
}

wire_enum! {
    /// Ticket priority
    pub enum TicketPriority as "priority" (default Medium) {
        /// Can wait
        Low = "low",
        /// Normal handling
        Medium = "medium",
        /// Needs attention soon
        High = "high",
        /// Drop everything
        Critical = "critical",
    }
}

wire_enum! {
    /// Ticket workflow status
    pub enum TicketStatus as "status" (default Open) {
        /// Newly submitted
        Open = "open",
        /// Someone is working on it
        InProgress = "in_progress" | "in-progress",
        /// Fixed, awaiting confirmation
        Resolved = "resolved",
        /// Done
        Closed = "closed",
    }
}

/// A support ticket as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Server-assigned identifier
    pub id: TicketId,
    /// Short summary
    pub title: String,
    /// Full problem description
    pub description: String,
    /// Category
    pub category: TicketCategory,
    /// Priority
    pub priority: TicketPriority,
    /// Workflow status
    pub status: TicketStatus,
    /// Server-assigned creation time
    pub created_at: DateTime<Utc>,
}

/// Body of a ticket creation request
///
/// Neither id nor status is sent; the server assigns both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TicketCreatePayload {
    /// Short summary
    #[validate(length(min = 1, max = 200, message = "title must be between 1 and 200 characters"))]
    pub title: String,
    /// Full problem description
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    /// Category
    pub category: TicketCategory,
    /// Priority
    pub priority: TicketPriority,
}

impl TicketCreatePayload {
    /// Create a payload from already-trimmed field values
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: TicketCategory,
        priority: TicketPriority,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category,
            priority,
        }
    }
}

/// Body of a partial ticket update
///
/// Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketUpdatePayload {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TicketCategory>,
    /// New priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,
    /// New status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
}

impl TicketUpdatePayload {
    /// A status-only update
    #[must_use]
    pub fn status(status: TicketStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// List filters; `None` means "no constraint", never "match empty"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFilters {
    /// Category constraint
    pub category: Option<TicketCategory>,
    /// Priority constraint
    pub priority: Option<TicketPriority>,
    /// Status constraint
    pub status: Option<TicketStatus>,
    /// Free-text search over title and description
    pub search: Option<String>,
}

impl TicketFilters {
    /// Builder-style search setter; blank text clears the constraint
    #[must_use]
    pub fn with_search(mut self, search: &str) -> Self {
        let trimmed = search.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Whether any constraint is set
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.category.is_some()
            || self.priority.is_some()
            || self.status.is_some()
            || self.search_term().is_some()
    }

    /// Trimmed search term, if non-blank
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Query parameters for the constraints that are set, in a fixed order
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);

        if let Some(category) = self.category {
            pairs.push(("category", category.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(term) = self.search_term() {
            pairs.push(("search", term.to_string()));
        }

        pairs
    }

    /// Percent-encoded query string without the leading `?`; empty when no
    /// constraint is set
    #[must_use]
    pub fn query_string(&self) -> String {
        self.query_pairs()
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Classification request body
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClassifyRequest<'a> {
    /// Ticket description to classify
    pub description: &'a str,
}

/// AI-suggested category and priority; advisory only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyResponse {
    /// Suggested category
    pub suggested_category: TicketCategory,
    /// Suggested priority
    pub suggested_priority: TicketPriority,
}

/// Aggregate ticket statistics computed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketStats {
    /// Number of tickets
    pub total_tickets: u64,
    /// Number of tickets with status `open`
    pub open_tickets: u64,
    /// Average tickets submitted per day
    pub avg_tickets_per_day: f64,
    /// Count per priority, keyed by wire value
    #[serde(default)]
    pub priority_breakdown: BTreeMap<String, u64>,
    /// Count per category, keyed by wire value
    #[serde(default)]
    pub category_breakdown: BTreeMap<String, u64>,
}

impl TicketStats {
    /// Count for every priority in display order; absent keys count as zero
    #[must_use]
    pub fn priority_counts(&self) -> Vec<(TicketPriority, u64)> {
        TicketPriority::ALL
            .iter()
            .map(|&priority| {
                let count = self
                    .priority_breakdown
                    .get(priority.as_str())
                    .copied()
                    .unwrap_or(0);
                (priority, count)
            })
            .collect()
    }

    /// Count for every category in display order; absent keys count as zero
    #[must_use]
    pub fn category_counts(&self) -> Vec<(TicketCategory, u64)> {
        TicketCategory::ALL
            .iter()
            .map(|&category| {
                let count = self
                    .category_breakdown
                    .get(category.as_str())
                    .copied()
                    .unwrap_or(0);
                (category, count)
            })
            .collect()
    }

    /// Share of tickets no longer open, as a whole percentage
    #[must_use]
    pub fn resolution_rate(&self) -> u32 {
        crate::utils::resolution_rate(self.total_tickets, self.open_tickets)
    }
}
