//! Derived values shown by the views

use chrono::{DateTime, Utc};

/// Smallest width a non-empty chart bar is drawn at, in percent
pub const MIN_BAR_PERCENT: f64 = 2.0;

/// Percentage of tickets that are no longer open, rounded to a whole number
///
/// Zero tickets means a rate of zero. An open count larger than the total
/// (a racy server snapshot) saturates at zero instead of going negative.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn resolution_rate(total: u64, open: u64) -> u32 {
    if total == 0 {
        return 0;
    }

    let resolved = total.saturating_sub(open);
    ((resolved as f64 / total as f64) * 100.0).round() as u32
}

/// Coarse relative age: `just now`, `Nm ago`, `Nh ago` or `Nd ago`
///
/// Timestamps in the future (clock skew) read as `just now`.
#[must_use]
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds();

    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3_600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3_600)
    } else {
        format!("{}d ago", seconds / 86_400)
    }
}

/// Width of a bar as a share of `total`, never below [`MIN_BAR_PERCENT`]
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn bar_width_percent(value: u64, total: u64) -> f64 {
    let total = total.max(1);
    ((value as f64 / total as f64) * 100.0).max(MIN_BAR_PERCENT)
}

/// One bar of a breakdown chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSegment<K> {
    /// The enum value the bar stands for
    pub key: K,
    /// Raw count
    pub count: u64,
    /// Drawn width in percent
    pub percent: f64,
}

/// Bars for a breakdown, one per key, in the order given
#[must_use]
pub fn breakdown_bars<K: Copy>(counts: &[(K, u64)]) -> Vec<BarSegment<K>> {
    let total: u64 = counts.iter().map(|(_, count)| count).sum();

    counts
        .iter()
        .map(|&(key, count)| BarSegment {
            key,
            count,
            percent: bar_width_percent(count, total),
        })
        .collect()
}

/// Truncate to at most `max_chars` characters, marking the cut with `…`
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// First `max_chars` characters, without a marker
#[must_use]
pub fn cap_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
