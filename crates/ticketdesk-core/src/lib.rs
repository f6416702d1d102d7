//! Core types and utilities for the ticketdesk support console
//!
//! Everything here is free of I/O: the ticket data model exchanged with the
//! remote ticketing API, the badge lookup tables used by every view, the
//! derived numbers shown on the dashboard, configuration and the error type.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod display;
pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, LoggingConfig};
pub use error::{Error, Result};
pub use types::{
    ClassifyResponse, Ticket, TicketCategory, TicketCreatePayload, TicketFilters, TicketId,
    TicketPriority, TicketStats, TicketStatus, TicketUpdatePayload,
};

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over the configured level. Output goes to
/// stderr so the rendered console on stdout is never interleaved with logs.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_logging(logging: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let installed = if logging.format.eq_ignore_ascii_case("json") {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    installed.map_err(|e| Error::Configuration {
        message: format!("failed to install logger: {e}"),
    })
}
