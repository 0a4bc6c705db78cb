/// Database module for followup-tracker
///
/// Handles all database operations using SQLite and sqlx.
/// A single pool is shared by every request.

pub mod connection;
pub mod models;
pub mod queries;

pub use connection::Database;
pub use models::*;
