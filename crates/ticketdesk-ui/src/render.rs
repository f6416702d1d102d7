//! Text rendering of every view

use crate::card::StatusSelectors;
use crate::dashboard::Dashboard;
use crate::form::TicketForm;
use crate::list::TicketList;
use crate::page::{Page, Tab};
use chrono::{DateTime, Utc};
use ticketdesk_core::display::{
    Tone, category_badge, category_tone, priority_badge, priority_icon, priority_tone,
    status_badge,
};
use ticketdesk_core::types::TITLE_MAX_CHARS;
use ticketdesk_core::utils::{breakdown_bars, time_ago, truncate_chars};
use ticketdesk_core::{ClassifyResponse, Ticket, TicketStats};

/// Cells in a full-width chart bar
pub const BAR_CELLS: usize = 24;

const TITLE_WIDTH: usize = 60;
const DESCRIPTION_WIDTH: usize = 140;
const PLACEHOLDER: &str = "░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░";

/// Rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Paint with ANSI colours
    pub color: bool,
}

impl Theme {
    /// Plain text, no escapes
    pub const PLAIN: Self = Self { color: false };

    fn paint(self, tone: Tone, text: &str) -> String {
        tone.paint(text, self.color)
    }
}

fn section(title: &str) -> String {
    format!("── {title} ──")
}

// --- Page ---

/// Whole screen for the visible tab
#[must_use]
pub fn format_page(page: &Page, theme: Theme, now: DateTime<Utc>) -> String {
    let mut blocks = vec![format_header(page.tab(), theme)];

    match page.tab() {
        Tab::Tickets => {
            blocks.push(format_form(page.form(), theme));
            blocks.push(format_list(
                page.list(),
                page.tickets(),
                page.cards(),
                theme,
                now,
            ));
        }
        Tab::Dashboard => blocks.push(format_dashboard(page.dashboard(), theme, now)),
    }

    blocks.join("\n\n")
}

/// Title block and tab strip
#[must_use]
pub fn format_header(tab: Tab, theme: Theme) -> String {
    let (tickets, dashboard) = match tab {
        Tab::Tickets => ("[Tickets]", " Dashboard "),
        Tab::Dashboard => (" Tickets ", "[Dashboard]"),
    };

    format!(
        "{}\n{}\n{tickets}  {dashboard}",
        theme.paint(Tone::Purple, "ST  Support Tickets"),
        theme.paint(Tone::Gray, "    AI-powered ticket management"),
    )
}

// --- Form ---

/// Submission form
#[must_use]
pub fn format_form(form: &TicketForm, theme: Theme) -> String {
    let mut lines = vec![section("Submit a Ticket")];

    lines.push(format!(
        "Title*: {}  ({}/{TITLE_MAX_CHARS})",
        form.title(),
        form.title_len()
    ));
    lines.push(format!("Description*: {}", form.description()));

    let mut classify = if form.is_classifying() {
        "[ Classifying... ]".to_string()
    } else if form.can_classify() {
        "[ AI Auto-Classify ]".to_string()
    } else {
        theme.paint(Tone::Gray, "[ AI Auto-Classify ] (disabled)")
    };
    if form.is_classified() {
        classify.push_str("  ✨ AI suggestions applied — feel free to override");
    }
    lines.push(classify);

    lines.push(format!(
        "Category: {}    Priority: {} {}",
        category_badge(form.category()).text(),
        priority_icon(form.priority()),
        priority_badge(form.priority()).label,
    ));

    if let Some(error) = form.error() {
        lines.push(theme.paint(Tone::Red, &format!("! {error}")));
    }

    lines.push(if form.is_submitting() {
        "[ Submitting... ]".to_string()
    } else if form.can_submit() {
        "[ Submit Ticket ]".to_string()
    } else {
        theme.paint(Tone::Gray, "[ Submit Ticket ] (disabled)")
    });

    lines.join("\n")
}

// --- List ---

/// Filter bar, result count and cards
#[must_use]
pub fn format_list(
    list: &TicketList,
    tickets: &[Ticket],
    cards: &StatusSelectors,
    theme: Theme,
    now: DateTime<Utc>,
) -> String {
    let mut lines = vec![section("Tickets")];

    let mut filter_bar = format!(
        "Search: \"{}\"  Category: {}  Priority: {}  Status: {}",
        list.search(),
        list.category()
            .map_or_else(|| "All Categories".to_string(), |c| category_badge(c).text()),
        list.priority()
            .map_or_else(|| "All Priorities".to_string(), |p| {
                format!("{} {}", priority_icon(p), priority_badge(p).label)
            }),
        list.status()
            .map_or("All Statuses", |s| status_badge(s).label),
    );
    if list.has_active_filters() {
        filter_bar.push_str("  [✕ Clear]");
    }
    lines.push(filter_bar);

    if list.is_loading() {
        lines.push("Loading...".to_string());
        lines.extend(std::iter::repeat_n(theme.paint(Tone::Gray, PLACEHOLDER), 3));
        return lines.join("\n");
    }

    let count = tickets.len();
    lines.push(format!(
        "{count} ticket{}",
        if count == 1 { "" } else { "s" }
    ));

    if tickets.is_empty() {
        lines.push(String::new());
        lines.push("No tickets found".to_string());
        lines.push(theme.paint(Tone::Gray, list.empty_hint()));
        return lines.join("\n");
    }

    for ticket in tickets {
        lines.push(String::new());
        lines.push(format_card(ticket, cards.is_updating(ticket.id), theme, now));
    }

    lines.join("\n")
}

// --- Card ---

/// One ticket with its badges and status selector
#[must_use]
pub fn format_card(ticket: &Ticket, updating: bool, theme: Theme, now: DateTime<Utc>) -> String {
    let category = category_badge(ticket.category);
    let priority = priority_badge(ticket.priority);
    let status = status_badge(ticket.status);

    let mut selector = format!("Status: {}", status.label);
    if updating {
        selector.push_str(" ⟳ updating...");
    }

    [
        format!(
            "#{} {}  {}",
            ticket.id,
            truncate_chars(&ticket.title, TITLE_WIDTH),
            theme.paint(Tone::Gray, &time_ago(ticket.created_at, now)),
        ),
        format!(
            "    {}",
            truncate_chars(&ticket.description, DESCRIPTION_WIDTH)
        ),
        format!(
            "    {} {} {}",
            category.render(theme.color),
            priority.render(theme.color),
            status.render(theme.color),
        ),
        format!("    {selector}"),
    ]
    .join("\n")
}

// --- Dashboard ---

/// Dashboard tab
#[must_use]
pub fn format_dashboard(dashboard: &Dashboard, theme: Theme, now: DateTime<Utc>) -> String {
    let mut lines = vec![section("Dashboard")];

    if dashboard.is_loading() {
        lines.extend(std::iter::repeat_n(theme.paint(Tone::Gray, PLACEHOLDER), 4));
        return lines.join("\n");
    }

    let Some(stats) = dashboard.stats() else {
        lines.push("No statistics available".to_string());
        return lines.join("\n");
    };

    lines.push(format_stats(stats, theme));
    lines.push(String::new());
    lines.push(format_recent(dashboard.recent(), theme, now));

    lines.join("\n")
}

/// Summary cards and both breakdown charts
#[must_use]
pub fn format_stats(stats: &TicketStats, theme: Theme) -> String {
    let mut lines = vec![
        format!(
            "Total Tickets: {}   Open: {}   Resolution Rate: {}%   Avg / Day: {}",
            stats.total_tickets,
            theme.paint(Tone::Sky, &stats.open_tickets.to_string()),
            stats.resolution_rate(),
            stats.avg_tickets_per_day,
        ),
        String::new(),
        "Priority Breakdown".to_string(),
    ];

    for bar in breakdown_bars(&stats.priority_counts()) {
        lines.push(format_bar(
            priority_badge(bar.key).label,
            bar.count,
            bar.percent,
            priority_tone(bar.key),
            theme,
        ));
    }

    lines.push(String::new());
    lines.push("Category Breakdown".to_string());
    for bar in breakdown_bars(&stats.category_counts()) {
        lines.push(format_bar(
            category_badge(bar.key).label,
            bar.count,
            bar.percent,
            category_tone(bar.key),
            theme,
        ));
    }

    lines.join("\n")
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn bar_cells(percent: f64) -> usize {
    let cells = ((percent / 100.0) * BAR_CELLS as f64).ceil() as usize;
    cells.clamp(1, BAR_CELLS)
}

fn format_bar(label: &str, count: u64, percent: f64, tone: Tone, theme: Theme) -> String {
    let cells = bar_cells(percent);
    let bar = format!("{}{}", "█".repeat(cells), "·".repeat(BAR_CELLS - cells));

    format!("  {label:<10} {} {count:>4}", theme.paint(tone, &bar))
}

/// Recent activity feed
#[must_use]
pub fn format_recent(tickets: &[Ticket], theme: Theme, now: DateTime<Utc>) -> String {
    let mut lines = vec!["Recent Activity".to_string()];

    if tickets.is_empty() {
        lines.push(theme.paint(Tone::Gray, "  No tickets yet"));
    }

    for ticket in tickets {
        lines.push(format!(
            "  {} {}  {}  {}",
            priority_icon(ticket.priority),
            truncate_chars(&ticket.title, TITLE_WIDTH),
            category_badge(ticket.category).render(theme.color),
            theme.paint(Tone::Gray, &time_ago(ticket.created_at, now)),
        ));
    }

    lines.join("\n")
}

/// Classifier answer
#[must_use]
pub fn format_classification(suggestion: &ClassifyResponse, theme: Theme) -> String {
    format!(
        "Suggested category: {}\nSuggested priority: {}",
        category_badge(suggestion.suggested_category).render(theme.color),
        priority_badge(suggestion.suggested_priority).render(theme.color),
    )
}
