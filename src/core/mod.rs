/// Core functionality modules
///
/// Request payloads and the follow-up service that validates them.

pub mod payload;
pub mod tracker;

pub use payload::{CreateFollowUp, UpdateFollowUp};
pub use tracker::Tracker;
