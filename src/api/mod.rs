//! HTTP API for follow-ups.
//!
//! `router` builds the axum `Router`, `server` runs it with graceful
//! shutdown, `endpoints` holds the handlers.

pub mod endpoints;
pub mod router;
pub mod server;

pub use router::api_router;
pub use server::{serve, shutdown_signal};
