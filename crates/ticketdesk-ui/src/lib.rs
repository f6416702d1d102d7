//! Terminal front-end for the ticketing API
//!
//! Each view is a plain state machine ([`form`], [`list`], [`card`],
//! [`dashboard`]) that turns user actions into [`request::Request`]s and
//! takes their completions back. [`page::Page`] owns the shared ticket
//! collection, runs the requests and schedules the debounced search;
//! [`render`] draws it all as text and [`console`] reads commands from a
//! terminal.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod card;
pub mod console;
pub mod dashboard;
pub mod debounce;
pub mod form;
pub mod list;
pub mod page;
pub mod render;
pub mod request;

pub use page::{Action, Page, Tab};
pub use render::Theme;
