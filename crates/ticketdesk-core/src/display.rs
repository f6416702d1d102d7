//! Badge lookup tables shared by every view
//!
//! Each enum value maps to exactly one [`Badge`]. Because the enums are closed
//! the tables are exhaustive matches; values the server sends that this build
//! does not recognize were already folded into the enum default while
//! decoding, so they render with the default entry.

use crate::types::{TicketCategory, TicketPriority, TicketStatus};

/// Visual style of a badge or chart bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Blue
    Blue,
    /// Purple
    Purple,
    /// Amber
    Amber,
    /// Gray
    Gray,
    /// Emerald
    Emerald,
    /// Yellow
    Yellow,
    /// Orange
    Orange,
    /// Red
    Red,
    /// Sky
    Sky,
    /// Indigo
    Indigo,
}

impl Tone {
    /// ANSI SGR foreground code closest to the tone
    #[must_use]
    pub const fn ansi_code(self) -> &'static str {
        match self {
            Self::Blue => "34",
            Self::Purple => "35",
            Self::Amber | Self::Yellow => "33",
            Self::Gray => "90",
            Self::Emerald => "32",
            Self::Orange => "38;5;208",
            Self::Red => "31",
            Self::Sky => "36",
            Self::Indigo => "38;5;63",
        }
    }

    /// Wrap `text` in the tone's colour, or return it unchanged
    #[must_use]
    pub fn paint(self, text: &str, color: bool) -> String {
        if color {
            format!("\u{1b}[{}m{text}\u{1b}[0m", self.ansi_code())
        } else {
            text.to_string()
        }
    }
}

/// Label and style for one enum value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    /// Leading glyph
    pub icon: Option<&'static str>,
    /// Human-readable label
    pub label: &'static str,
    /// Visual style
    pub tone: Tone,
}

impl Badge {
    const fn new(icon: Option<&'static str>, label: &'static str, tone: Tone) -> Self {
        Self { icon, label, tone }
    }

    /// `icon label`, or just the label
    #[must_use]
    pub fn text(&self) -> String {
        match self.icon {
            Some(icon) => format!("{icon} {}", self.label),
            None => self.label.to_string(),
        }
    }

    /// Bracketed badge, optionally coloured
    #[must_use]
    pub fn render(&self, color: bool) -> String {
        self.tone.paint(&format!("[{}]", self.text()), color)
    }
}

/// Badge for a category
#[must_use]
pub const fn category_badge(category: TicketCategory) -> Badge {
    match category {
        TicketCategory::Billing => Badge::new(Some("💳"), "Billing", Tone::Blue),
        TicketCategory::Technical => Badge::new(Some("🔧"), "Technical", Tone::Purple),
        TicketCategory::Account => Badge::new(Some("👤"), "Account", Tone::Amber),
        TicketCategory::General => Badge::new(Some("📋"), "General", Tone::Gray),
    }
}

/// Badge for a priority, as shown on a ticket card
#[must_use]
pub const fn priority_badge(priority: TicketPriority) -> Badge {
    match priority {
        TicketPriority::Low => Badge::new(None, "Low", Tone::Emerald),
        TicketPriority::Medium => Badge::new(None, "Medium", Tone::Yellow),
        TicketPriority::High => Badge::new(None, "High", Tone::Orange),
        TicketPriority::Critical => Badge::new(None, "Critical", Tone::Red),
    }
}

/// Marker used for a priority in selection menus
#[must_use]
pub const fn priority_icon(priority: TicketPriority) -> &'static str {
    match priority {
        TicketPriority::Low => "🟢",
        TicketPriority::Medium => "🟡",
        TicketPriority::High => "🟠",
        TicketPriority::Critical => "🔴",
    }
}

/// Badge for a status
#[must_use]
pub const fn status_badge(status: TicketStatus) -> Badge {
    match status {
        TicketStatus::Open => Badge::new(None, "Open", Tone::Sky),
        TicketStatus::InProgress => Badge::new(None, "In Progress", Tone::Indigo),
        TicketStatus::Resolved => Badge::new(None, "Resolved", Tone::Emerald),
        TicketStatus::Closed => Badge::new(None, "Closed", Tone::Gray),
    }
}

/// Bar colour for the priority chart
#[must_use]
pub const fn priority_tone(priority: TicketPriority) -> Tone {
    priority_badge(priority).tone
}

/// Bar colour for the category chart
#[must_use]
pub const fn category_tone(category: TicketCategory) -> Tone {
    category_badge(category).tone
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_value_has_a_distinct_label() {
        let labels: Vec<_> = TicketStatus::ALL
            .iter()
            .map(|&s| status_badge(s).label)
            .collect();
        assert_eq!(labels, vec!["Open", "In Progress", "Resolved", "Closed"]);

        let labels: Vec<_> = TicketCategory::ALL
            .iter()
            .map(|&c| category_badge(c).text())
            .collect();
        assert_eq!(
            labels,
            vec!["💳 Billing", "🔧 Technical", "👤 Account", "📋 General"]
        );
    }

    #[test]
    fn test_default_values_map_to_default_entries() {
        assert_eq!(
            category_badge(TicketCategory::default()),
            category_badge(TicketCategory::General)
        );
        assert_eq!(priority_badge(TicketPriority::default()).label, "Medium");
        assert_eq!(status_badge(TicketStatus::default()).label, "Open");
    }

    #[test]
    fn test_render_without_color_is_plain() {
        let badge = priority_badge(TicketPriority::Critical);

        assert_eq!(badge.render(false), "[Critical]");
        assert_eq!(badge.render(true), "\u{1b}[31m[Critical]\u{1b}[0m");
    }
}
