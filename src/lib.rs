//! Operator console for the HYNET power-system simulation API.
//!
//! A fixed catalogue of simulation actions is bound to form values, sent to
//! the backend one at a time, and the latest response or error is kept in a
//! small view state machine.

pub mod catalogue;
pub mod cli;
pub mod client;
pub mod config;
pub mod dispatch;
/// Stand-in backend serving the catalogue routes.
#[cfg(feature = "stub")]
pub mod stub;
/// Interactive terminal console.
#[cfg(feature = "tui")]
pub mod tui;
pub mod view;
