//! Web server module for the notification endpoint.
//!
//! This module adapts axum requests to the transport-neutral
//! [`Gateway`](crate::Gateway):
//! - Any method on the notify route is forwarded to `Gateway::serve`
//! - Successful results are written with a 200 status
//! - Errors map to a status code with an empty body

pub mod handlers;

pub use handlers::{health, notify, router, status_for, AppState, HealthResponse};
