//! followup-tracker library
//!
//! Follow-up reminders stored in SQLite and served over a small JSON API.

pub mod api;
pub mod config;
pub mod core;
pub mod db;
pub mod error;

// Re-exports for convenience
pub use config::Config;
pub use crate::core::Tracker;
pub use db::Database;
pub use error::{Result, TrackerError};
