//! Client for the remote ticketing API
//!
//! [`TicketApi`] is the seam every view talks through; [`ApiClient`] is the
//! HTTP implementation. With the `mock` feature enabled, [`mock::MockTicketApi`]
//! provides an in-memory stand-in for tests.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod api;
pub mod api_client;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use api::TicketApi;
pub use api_client::ApiClient;
