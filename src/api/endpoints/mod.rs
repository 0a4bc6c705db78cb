//! Route handlers, one module per resource.

pub mod followups;
pub mod health;
