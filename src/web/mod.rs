//! Web runtime for the dashboard
//!
//! Serves the page shell and its script, exposes the layout tree and the
//! binding table, and runs the chart handlers when the page reports a
//! control change.

pub mod routes;
pub mod server;

pub use server::{AppState, ServerConfig, router, start_server};
