//! Statistics dashboard state

use crate::request::{DashboardData, Request};
use ticketdesk_core::{Result, Ticket, TicketStats};
use tracing::warn;

/// Dashboard state
///
/// Mounted while its tab is visible. It loads on every mount and again on
/// each refresh while mounted; data from an earlier mount stays on screen
/// until the new load lands.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    stats: Option<TicketStats>,
    recent: Vec<Ticket>,
    is_loading: bool,
    mounted: bool,
    recent_limit: usize,
}

impl Dashboard {
    /// Unmounted dashboard showing up to `recent_limit` recent tickets
    #[must_use]
    pub const fn new(recent_limit: usize) -> Self {
        Self {
            stats: None,
            recent: Vec::new(),
            is_loading: true,
            mounted: false,
            recent_limit,
        }
    }

    /// Last loaded statistics
    #[must_use]
    pub const fn stats(&self) -> Option<&TicketStats> {
        self.stats.as_ref()
    }

    /// Recent activity, in server order
    #[must_use]
    pub fn recent(&self) -> &[Ticket] {
        &self.recent
    }

    /// Nothing has loaded yet
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Tab is visible
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Resolution rate of the loaded stats
    #[must_use]
    pub fn resolution_rate(&self) -> Option<u32> {
        self.stats.as_ref().map(TicketStats::resolution_rate)
    }

    /// Tab shown; `None` if it already was
    pub const fn mount(&mut self) -> Option<Request> {
        if self.mounted {
            return None;
        }

        self.mounted = true;
        Some(Request::LoadDashboard)
    }

    /// Tab hidden
    pub const fn unmount(&mut self) {
        self.mounted = false;
    }

    /// Refresh key changed; reload only while visible
    #[must_use]
    pub const fn refresh(&self) -> Option<Request> {
        if self.mounted {
            Some(Request::LoadDashboard)
        } else {
            None
        }
    }

    /// Take in a load result; failures keep the previous data
    pub fn on_loaded(&mut self, result: Result<DashboardData>) {
        self.is_loading = false;

        match result {
            Ok(DashboardData { stats, tickets }) => {
                self.stats = Some(stats);
                self.recent = tickets.into_iter().take(self.recent_limit).collect();
            }
            Err(e) => warn!(error = %e, "failed to load dashboard"),
        }
    }
}
